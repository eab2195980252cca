use leptos::prelude::*;

use crate::types::{LocationGroup, PoemCursor};

/// Carousel of every poem at one location.
#[component]
pub fn PoemCards(location: LocationGroup, on_close: Callback<()>) -> impl IntoView {
    let cursor = RwSignal::new(PoemCursor::new(location.poem_count()));
    let count_label = location.count_label();

    view! {
        <div class="poem-cards-container">
            <div class="poem-cards-header">
                <h3>{location.name.clone()}</h3>
                <span class="poem-count">{count_label}</span>
                <button class="close-btn" on:click=move |_| on_close.run(())>"×"</button>
            </div>
            <div class="poem-cards-wrapper">
                {location.poems.iter().enumerate().map(|(i, poem)| {
                    view! {
                        <div class="poem-card" class:active=move || cursor.get().index() == i>
                            <div class="poem-title">{poem.title.clone()}</div>
                            <div class="poem-author">"作者：" {poem.author.clone()}</div>
                            <div class="poem-content">{poem.formatted()}</div>
                        </div>
                    }
                }).collect_view()}
            </div>
            <div class="poem-navigation">
                <button
                    class="nav-btn prev-btn"
                    on:click=move |_| cursor.update(|c| { c.advance(-1); })
                >"← 上一首"</button>
                <span class="poem-indicator">{move || cursor.get().indicator()}</span>
                <button
                    class="nav-btn next-btn"
                    on:click=move |_| cursor.update(|c| { c.advance(1); })
                >"下一首 →"</button>
            </div>
        </div>
    }
}
