use serde::Serialize;

use crate::LngLat;

// ── Map extent ───────────────────────────────────────────────────────────

/// South-west / north-east corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LngLat,
    pub north_east: LngLat,
}

impl Bounds {
    pub fn contains(&self, point: LngLat) -> bool {
        point.lng() >= self.south_west.lng()
            && point.lng() <= self.north_east.lng()
            && point.lat() >= self.south_west.lat()
            && point.lat() <= self.north_east.lat()
    }

    /// `[[sw_lng, sw_lat], [ne_lng, ne_lat]]`, the layout map SDKs expect.
    pub fn as_array(&self) -> [[f64; 2]; 2] {
        [
            [self.south_west.lng(), self.south_west.lat()],
            [self.north_east.lng(), self.north_east.lat()],
        ]
    }
}

/// Panning limit for the Nanjing map.
pub const NANJING_BOUNDS: Bounds = Bounds {
    south_west: LngLat(118.35, 31.14),
    north_east: LngLat(119.23, 32.37),
};

/// Coarse plausibility box; anything outside is probably a data error.
pub const PLAUSIBLE_REGION: Bounds = Bounds {
    south_west: LngLat(118.0, 31.0),
    north_east: LngLat(120.0, 33.0),
};

// ── Coordinate check ─────────────────────────────────────────────────────

/// A location whose coordinates fall outside the Nanjing area.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateWarning {
    pub location: String,
    pub coordinates: LngLat,
}

impl std::fmt::Display for CoordinateWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "坐标超出南京地区范围: {} [{}, {}]",
            self.location,
            self.coordinates.lng(),
            self.coordinates.lat()
        )
    }
}

/// Coordinates are returned untouched; the warning is advisory only.
pub fn validate_coordinates(
    coordinates: LngLat,
    location: &str,
) -> (LngLat, Option<CoordinateWarning>) {
    let warning = (!PLAUSIBLE_REGION.contains(coordinates)).then(|| CoordinateWarning {
        location: location.to_string(),
        coordinates,
    });
    (coordinates, warning)
}

// ── Map defaults ─────────────────────────────────────────────────────────

pub const DEFAULT_STYLE: &str = "mapbox://styles/mapbox/streets-v12";

/// Initial camera and limits for every dynasty page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapOptions {
    pub container: String,
    pub style: String,
    pub center: LngLat,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub max_bounds: [[f64; 2]; 2],
    pub attribution_control: bool,
    pub antialias: bool,
    pub fail_if_major_performance_caveat: bool,
    pub render_world_copies: bool,
}

impl MapOptions {
    pub fn nanjing(container: &str) -> Self {
        Self {
            container: container.to_string(),
            style: DEFAULT_STYLE.to_string(),
            center: LngLat(118.7969, 32.0587),
            zoom: 12.0,
            min_zoom: 10.0,
            max_zoom: 16.0,
            max_bounds: NANJING_BOUNDS.as_array(),
            attribution_control: false,
            antialias: true,
            fail_if_major_performance_caveat: false,
            render_world_copies: false,
        }
    }
}
