use std::time::Duration;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_params_map;
use poem_types::dataset::load_locations;
use poem_types::geo::MapOptions;
use wasm_bindgen::prelude::*;
use web_sys::console;

use crate::mapbox::{self, Map, NavigationControl, NavigationOptions, to_js};
use crate::pages::cards::PoemCards;
use crate::session::MapSession;
use crate::types::{Dynasty, LoadError, LocationGroup, PageError, STYLE_NOT_DONE};

const MAP_CONTAINER_ID: &str = "map";
const BANNER_TIMEOUT: Duration = Duration::from_secs(5);
const MAPBOX_TOKEN: &str = match option_env!("MAPBOX_TOKEN") {
    Some(token) => token,
    None => "",
};

type Session = StoredValue<MapSession, LocalStorage>;

async fn fetch_dataset(url: &str) -> Result<String, LoadError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| LoadError::Fetch(e.to_string()))?;
    if !resp.ok() {
        return Err(LoadError::Fetch(format!("HTTP {} for {url}", resp.status())));
    }
    resp.text().await.map_err(|e| LoadError::Fetch(e.to_string()))
}

async fn load_poem_data(dynasty: Dynasty) -> Result<Vec<LocationGroup>, LoadError> {
    // Output of `poem_map build`, already deduplicated and filtered
    let json = fetch_dataset(&dynasty.locations_url()).await?;
    load_locations(&json, dynasty.config(), false)
}

/// Log and show `error`; the banner clears itself after a few seconds.
fn show_error(banner: RwSignal<Option<String>>, error: PageError) {
    console::error_2(&error.to_string().into(), &error.detail().into());
    let message = error.to_string();
    banner.try_set(Some(message.clone()));
    set_timeout(
        move || {
            if banner.try_get_untracked().flatten().as_deref() == Some(message.as_str()) {
                banner.try_set(None);
            }
        },
        BANNER_TIMEOUT,
    );
}

fn create_markers(session: Session, selected: RwSignal<Option<LocationGroup>>, banner: RwSignal<Option<String>>) {
    let result = session.try_update_value(|s| s.add_markers(move |location| selected.set(Some(location))));
    match result {
        Some(Ok(count)) => console::log_1(&format!("添加标记点: {count} 个").into()),
        Some(Err(e)) => {
            session.try_update_value(|s| s.gate_mut().release());
            show_error(banner, e);
        }
        None => {}
    }
}

/// Register `handler` and hand the closure to the session, which keeps it
/// alive until teardown. Fails without registering once the page is gone.
fn listen(
    map: &Map,
    session: Session,
    event: &str,
    handler: impl FnMut(JsValue) + 'static,
) -> Result<(), PageError> {
    if !is_alive(session) {
        return Err(PageError::Closed(event.to_string()));
    }
    let closure = Closure::<dyn FnMut(JsValue)>::new(handler);
    map.on(event, &closure);
    session.try_update_value(|s| s.keep_handler(closure));
    Ok(())
}

fn is_alive(session: Session) -> bool {
    session.try_with_value(|_| ()).is_some()
}

fn mark_style_loaded(
    session: Session,
    selected: RwSignal<Option<LocationGroup>>,
    banner: RwSignal<Option<String>>,
) {
    if session.try_update_value(|s| s.gate_mut().style_loaded()) == Some(true) {
        create_markers(session, selected, banner);
    }
}

fn init_map(
    session: Session,
    loading: RwSignal<bool>,
    selected: RwSignal<Option<LocationGroup>>,
    banner: RwSignal<Option<String>>,
) -> Result<(), PageError> {
    if !mapbox::set_access_token(MAPBOX_TOKEN) {
        return Err(PageError::MapInit("mapboxgl 未加载".to_string()));
    }

    let options = to_js(&MapOptions::nanjing(MAP_CONTAINER_ID)).map_err(PageError::map_init)?;
    let map = Map::new(&options).map_err(PageError::map_init)?;
    let nav = NavigationOptions {
        show_compass: false,
        show_zoom: true,
        visualize_pitch: false,
    };
    map.add_control(
        &NavigationControl::new(&to_js(&nav).map_err(PageError::map_init)?),
        "bottom-right",
    );
    if session.try_update_value(|s| s.attach(map.clone())).is_none() {
        map.remove();
        return Err(PageError::Closed("attach".to_string()));
    }

    let loaded_map = map.clone();
    listen(&map, session, "load", move |_| {
        console::log_1(&"地图加载完成".into());
        loading.try_set(false);
        if session.try_update_value(|s| s.gate_mut().map_ready()) == Some(true) {
            create_markers(session, selected, banner);
        }
        match mapbox::custom_style() {
            Some(style) => {
                // Registered only now so the base style's style.load is not counted
                let registered = listen(&loaded_map, session, "style.load", move |_| {
                    console::log_1(&"地图样式加载完成".into());
                    mark_style_loaded(session, selected, banner);
                });
                if registered.is_ok() {
                    if let Err(e) = loaded_map.set_style(&style) {
                        show_error(banner, PageError::set_style(e));
                        mark_style_loaded(session, selected, banner);
                    }
                }
            }
            None => mark_style_loaded(session, selected, banner),
        }
    })?;

    listen(&map, session, "style.error", move |e| {
        show_error(banner, PageError::StyleLoad(mapbox::js_message(&e)));
    })?;

    listen(&map, session, "error", move |e| {
        let message = mapbox::js_message(&e);
        if message.contains(STYLE_NOT_DONE) {
            console::debug_1(&message.into());
        } else {
            show_error(banner, PageError::Map(message));
        }
    })?;

    listen(&map, session, "zoomend", move |_| {
        session.try_update_value(|s| s.adjust_for_zoom(true));
    })?;

    listen(&map, session, "zoom", move |_| {
        session.try_update_value(|s| s.adjust_for_zoom(false));
    })?;

    Ok(())
}

/// The map for one dynasty: load its poems, then set up the map.
#[component]
pub fn MapPage(dynasty: Dynasty) -> impl IntoView {
    let config = dynasty.config();
    document().set_title(&format!("{}诗词地图", config.label));

    let loading = RwSignal::new(true);
    let banner: RwSignal<Option<String>> = RwSignal::new(None);
    let selected: RwSignal<Option<LocationGroup>> = RwSignal::new(None);
    let session: Session = StoredValue::new_local(MapSession::new(config));

    spawn_local(async move {
        match load_poem_data(dynasty).await {
            Ok(groups) => {
                console::log_1(&format!("{}诗歌数据加载成功: {} 个地点", config.label, groups.len()).into());
                session.try_update_value(|s| s.set_locations(groups));
            }
            Err(e) => show_error(banner, e.into()),
        }
        if !is_alive(session) {
            // Navigated away while loading; the next page owns #map now
            return;
        }
        match init_map(session, loading, selected, banner) {
            Ok(()) | Err(PageError::Closed(_)) => {}
            Err(e) => {
                loading.try_set(false);
                show_error(banner, e);
            }
        }
    });

    on_cleanup(move || {
        session.try_update_value(|s| s.teardown());
    });

    view! {
        <div class="map-page">
            <div id=MAP_CONTAINER_ID class="map"></div>
            <Show when=move || loading.get()>
                <div class="loading">"地图加载中…"</div>
            </Show>
            {move || banner.get().map(|message| view! { <div class="error">{message}</div> })}
            {move || selected.get().map(|location| {
                view! {
                    <PoemCards location=location on_close=Callback::new(move |_| selected.set(None))/>
                }
            })}
        </div>
    }
}

/// `/`: the dynasty comes from the document title.
#[component]
pub fn TitleMapPage() -> impl IntoView {
    let dynasty = Dynasty::from_title(&document().title());
    view! { <MapPage dynasty=dynasty/> }
}

/// `/:dynasty`: the dynasty comes from the route.
#[component]
pub fn DynastyMapPage() -> impl IntoView {
    let params = use_params_map();

    move || {
        let slug = params.with(|p| p.get("dynasty")).unwrap_or_default();
        match Dynasty::from_slug(&slug) {
            Some(dynasty) => view! { <MapPage dynasty=dynasty/> }.into_any(),
            None => view! { <p class="error">"未知朝代：" {slug}</p> }.into_any(),
        }
    }
}
