//! Bindings to the parts of Mapbox GL JS the map page uses.
//!
//! The SDK is loaded by a `<script>` tag in `index.html` and lives on the
//! global `mapboxgl` object.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mapboxgl)]
    #[derive(Debug, Clone)]
    pub type Map;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Map", catch)]
    pub fn new(options: &JsValue) -> Result<Map, JsValue>;

    #[wasm_bindgen(method)]
    pub fn on(this: &Map, event: &str, handler: &Closure<dyn FnMut(JsValue)>);

    #[wasm_bindgen(method, js_name = getZoom)]
    pub fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = setStyle, catch)]
    pub fn set_style(this: &Map, style: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = addControl)]
    pub fn add_control(this: &Map, control: &NavigationControl, position: &str);

    #[wasm_bindgen(method)]
    pub fn remove(this: &Map);

    #[wasm_bindgen(js_namespace = mapboxgl)]
    #[derive(Debug, Clone)]
    pub type NavigationControl;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "NavigationControl")]
    pub fn new(options: &JsValue) -> NavigationControl;

    #[wasm_bindgen(js_namespace = mapboxgl)]
    #[derive(Debug, Clone)]
    pub type Marker;

    #[wasm_bindgen(constructor, js_namespace = mapboxgl, js_class = "Marker")]
    pub fn new(options: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setLngLat)]
    pub fn set_lng_lat(this: &Marker, lng_lat: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = setOffset)]
    pub fn set_offset(this: &Marker, offset: &JsValue) -> Marker;

    #[wasm_bindgen(method, js_name = addTo)]
    pub fn add_to(this: &Marker, map: &Map) -> Marker;

    #[wasm_bindgen(method)]
    pub fn remove(this: &Marker) -> Marker;

    #[wasm_bindgen(method, js_name = getElement)]
    pub fn get_element(this: &Marker) -> HtmlElement;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationOptions {
    pub show_compass: bool,
    pub show_zoom: bool,
    pub visualize_pitch: bool,
}

#[derive(Serialize)]
pub struct MarkerOptions {
    pub anchor: &'static str,
    pub offset: [i32; 2],
}

/// Options objects go through JSON; the SDK only needs plain data.
pub fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let json = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&json)
}

fn global(name: &str) -> Option<JsValue> {
    js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// `false` when the SDK script has not loaded.
pub fn set_access_token(token: &str) -> bool {
    let Some(mapboxgl) = global("mapboxgl") else {
        return false;
    };
    js_sys::Reflect::set(
        &mapboxgl,
        &JsValue::from_str("accessToken"),
        &JsValue::from_str(token),
    )
    .unwrap_or(false)
}

/// Custom style URL the hosting page may define as `window.mapStyle`.
pub fn custom_style() -> Option<String> {
    global("mapStyle").and_then(|v| v.as_string())
}

/// Best-effort text of a thrown value or an `{error: Error}` event.
pub fn js_message(value: &JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    let field = |target: &JsValue, key: &str| {
        js_sys::Reflect::get(target, &JsValue::from_str(key))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())
    };
    if let Some(message) = field(value, "message").and_then(|m| m.as_string()) {
        return message;
    }
    field(value, "error")
        .and_then(|e| field(&e, "message"))
        .and_then(|m| m.as_string())
        .unwrap_or_else(|| "未知错误".to_string())
}
