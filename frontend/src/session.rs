use poem_types::geo::validate_coordinates;
use poem_types::session::{MarkerGate, ZoomThrottle};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, HtmlElement, console};

use crate::mapbox::{Map, Marker, MarkerOptions, to_js};
use crate::types::{DynastyConfig, LocationGroup, PageError};

/// Everything one map page owns, from first render to navigation away.
pub struct MapSession {
    config: &'static DynastyConfig,
    map: Option<Map>,
    gate: MarkerGate,
    throttle: ZoomThrottle,
    locations: Vec<LocationGroup>,
    markers: Vec<Marker>,
    // Kept alive for as long as the SDK / DOM may call them
    map_handlers: Vec<Closure<dyn FnMut(JsValue)>>,
    dom_handlers: Vec<Closure<dyn FnMut(Event)>>,
}

impl MapSession {
    pub fn new(config: &'static DynastyConfig) -> Self {
        Self {
            config,
            map: None,
            gate: MarkerGate::new(),
            throttle: ZoomThrottle::new(0.0),
            locations: Vec::new(),
            markers: Vec::new(),
            map_handlers: Vec::new(),
            dom_handlers: Vec::new(),
        }
    }

    pub fn set_locations(&mut self, locations: Vec<LocationGroup>) {
        self.locations = locations;
    }

    pub fn attach(&mut self, map: Map) {
        self.throttle = ZoomThrottle::new(map.get_zoom());
        self.map = Some(map);
    }

    pub fn map(&self) -> Option<Map> {
        self.map.clone()
    }

    pub fn gate_mut(&mut self) -> &mut MarkerGate {
        &mut self.gate
    }

    pub fn keep_handler(&mut self, handler: Closure<dyn FnMut(JsValue)>) {
        self.map_handlers.push(handler);
    }

    fn clear_markers(&mut self) {
        for marker in self.markers.drain(..) {
            marker.remove();
        }
        self.dom_handlers.clear();
    }

    /// Place one marker per location. `on_select` runs when a marker is
    /// clicked.
    pub fn add_markers<F>(&mut self, on_select: F) -> Result<usize, PageError>
    where
        F: Fn(LocationGroup) + Clone + 'static,
    {
        let Some(map) = self.map.clone() else {
            return Ok(0);
        };
        self.clear_markers();

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PageError::Markers("no document".to_string()))?;

        for location in &self.locations {
            let (coordinates, warning) = validate_coordinates(location.coordinates, &location.name);
            if let Some(w) = warning {
                console::warn_1(&w.to_string().into());
            }

            let (container, dot) = marker_element(&document, &location.name, self.config.show_labels)
                .map_err(PageError::markers)?;

            let offset = self
                .config
                .offset_profile
                .base_offset(&location.name, coordinates.lat());
            let options = to_js(&MarkerOptions {
                anchor: "center",
                offset: [0, offset],
            })
            .map_err(PageError::markers)?;
            js_sys::Reflect::set(&options, &JsValue::from_str("element"), &container)
                .map_err(PageError::markers)?;

            let marker = Marker::new(&options)
                .set_lng_lat(&to_js(&coordinates).map_err(PageError::markers)?)
                .add_to(&map);

            let group = location.clone();
            let select = on_select.clone();
            let on_click = Closure::<dyn FnMut(Event)>::new(move |_| select(group.clone()));
            dot.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
                .map_err(PageError::markers)?;

            let hovered = dot.clone();
            let on_enter = Closure::<dyn FnMut(Event)>::new(move |_| {
                set_style(&hovered, "z-index", "1000");
                set_style(&hovered, "opacity", "0.8");
            });
            let left = dot.clone();
            let on_leave = Closure::<dyn FnMut(Event)>::new(move |_| {
                set_style(&left, "z-index", "100");
                set_style(&left, "opacity", "1");
            });
            dot.add_event_listener_with_callback("mouseenter", on_enter.as_ref().unchecked_ref())
                .map_err(PageError::markers)?;
            dot.add_event_listener_with_callback("mouseleave", on_leave.as_ref().unchecked_ref())
                .map_err(PageError::markers)?;

            self.dom_handlers.extend([on_click, on_enter, on_leave]);
            self.markers.push(marker);
        }

        Ok(self.markers.len())
    }

    /// Rescale marker offsets for the current zoom. Without `force` this
    /// only happens once the zoom moved far enough since the last time.
    pub fn adjust_for_zoom(&mut self, force: bool) {
        let Some(map) = &self.map else {
            return;
        };
        if self.markers.is_empty() {
            return;
        }
        let zoom = map.get_zoom();
        if !self.throttle.should_adjust(zoom) && !force {
            return;
        }

        let profile = self.config.offset_profile;
        for (marker, location) in self.markers.iter().zip(&self.locations) {
            let offset = profile.offset_for(location, zoom);
            if let Ok(value) = to_js(&[0, offset]) {
                marker.set_offset(&value);
            }
        }
        console::debug_1(&format!("缩放调整: {zoom:.2}, {} 个标记点", self.markers.len()).into());
    }

    /// Remove everything this page put on the map.
    pub fn teardown(&mut self) {
        self.clear_markers();
        if let Some(map) = self.map.take() {
            map.remove();
        }
        self.map_handlers.clear();
        self.locations.clear();
        self.gate = MarkerGate::new();
    }
}

fn set_style(element: &HtmlElement, property: &str, value: &str) {
    if let Err(e) = element.style().set_property(property, value) {
        console::warn_2(&format!("样式设置失败: {property}").into(), &e);
    }
}

/// Marker DOM: a dot, wrapped with a name label when labels are on.
/// Returns `(marker element, clickable dot)`.
fn marker_element(
    document: &Document,
    name: &str,
    with_label: bool,
) -> Result<(HtmlElement, HtmlElement), JsValue> {
    let dot: HtmlElement = document.create_element("div")?.dyn_into()?;
    dot.set_class_name("poem-marker");
    dot.set_title(name);

    if !with_label {
        return Ok((dot.clone(), dot));
    }

    let container: HtmlElement = document.create_element("div")?.dyn_into()?;
    container.set_class_name("marker-container");
    let label: HtmlElement = document.create_element("div")?.dyn_into()?;
    label.set_class_name("location-label");
    label.set_text_content(Some(name));
    container.append_child(&dot)?;
    container.append_child(&label)?;
    Ok((container, dot))
}
