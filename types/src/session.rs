/// One-shot gate for marker creation.
///
/// Markers may only be created once the map has loaded and its style has
/// finished loading, and only once per page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerGate {
    map_ready: bool,
    style_loaded: bool,
    markers_added: bool,
}

impl MarkerGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the map `load` event. Returns `true` if markers should be
    /// created now.
    pub fn map_ready(&mut self) -> bool {
        self.map_ready = true;
        self.try_claim()
    }

    /// Record the `style.load` event. Returns `true` if markers should be
    /// created now.
    pub fn style_loaded(&mut self) -> bool {
        self.style_loaded = true;
        self.try_claim()
    }

    /// Marker creation failed; allow a later readiness event to try again.
    pub fn release(&mut self) {
        self.markers_added = false;
    }

    pub fn markers_added(&self) -> bool {
        self.markers_added
    }

    fn try_claim(&mut self) -> bool {
        if self.markers_added || !self.map_ready || !self.style_loaded {
            return false;
        }
        self.markers_added = true;
        true
    }
}

/// Zoom step that triggers an offset recomputation while zooming.
pub const ZOOM_ADJUST_STEP: f64 = 0.5;

/// Limits offset recomputation during a zoom gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomThrottle {
    last_zoom: f64,
}

impl ZoomThrottle {
    pub fn new(initial_zoom: f64) -> Self {
        Self {
            last_zoom: initial_zoom,
        }
    }

    /// `true` once the zoom has moved at least [`ZOOM_ADJUST_STEP`] since
    /// the last accepted value.
    pub fn should_adjust(&mut self, zoom: f64) -> bool {
        if (zoom - self.last_zoom).abs() >= ZOOM_ADJUST_STEP {
            self.last_zoom = zoom;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_needs_both_events() {
        let mut gate = MarkerGate::new();
        assert!(!gate.map_ready());
        assert!(gate.style_loaded());
        assert!(gate.markers_added());
    }

    #[test]
    fn test_gate_either_order() {
        let mut gate = MarkerGate::new();
        assert!(!gate.style_loaded());
        assert!(gate.map_ready());
    }

    #[test]
    fn test_gate_is_one_shot() {
        let mut gate = MarkerGate::new();
        gate.map_ready();
        assert!(gate.style_loaded());
        // Style reloads fire style.load again
        assert!(!gate.style_loaded());
        assert!(!gate.map_ready());
    }

    #[test]
    fn test_gate_release_after_failure() {
        let mut gate = MarkerGate::new();
        gate.map_ready();
        assert!(gate.style_loaded());
        gate.release();
        assert!(!gate.markers_added());
        assert!(gate.style_loaded());
    }

    #[test]
    fn test_zoom_throttle() {
        let mut throttle = ZoomThrottle::new(12.0);
        assert!(!throttle.should_adjust(12.3));
        assert!(throttle.should_adjust(12.5));
        assert!(!throttle.should_adjust(12.9));
        assert!(throttle.should_adjust(11.9));
    }
}
