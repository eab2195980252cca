use leptos::prelude::*;
use leptos_router::{
    components::{A, Route, Router, Routes},
    path,
};

use crate::pages::map::{DynastyMapPage, TitleMapPage};
use crate::types::Dynasty;

#[component]
pub fn App() -> impl IntoView {
    view! {
        <Router>
            <div id="app">
                <header>
                    <h1>"金陵诗词地图"</h1>
                    <nav>
                        {Dynasty::ALL.into_iter().map(|d| {
                            view! { <A href=format!("/{}", d.slug())>{d.as_chinese()}</A> }
                        }).collect_view()}
                    </nav>
                </header>
                <main>
                    <Routes fallback=|| {
                        view! { <p class="error">"页面未找到"</p> }
                    }>
                        <Route path=path!("/") view=TitleMapPage/>
                        <Route path=path!("/:dynasty") view=DynastyMapPage/>
                    </Routes>
                </main>
            </div>
        </Router>
    }
}
