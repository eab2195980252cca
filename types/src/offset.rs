//! Vertical pixel nudges applied to markers.
//!
//! The numbers are hand-tuned against the rendered basemap and are kept
//! as tables, not derived.

use serde::{Deserialize, Serialize};

use crate::LocationGroup;

/// Which offset table a dynasty page uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffsetProfile {
    /// Named landmarks get their own offset, others go by latitude band.
    Landmark,
    /// Small ±1px latitude bands only.
    Subtle,
}

/// 新林浦 scales against the zoom instead of with it.
const REVERSED_LANDMARK: &str = "新林浦";

fn landmark_offset(name: &str) -> Option<i32> {
    match name {
        "方山" => Some(8),
        "新林浦" => Some(6),
        "灵谷寺" => Some(0),
        "鸡鸣寺" => Some(-4),
        "玄武湖" => Some(-6),
        "钟山" => Some(-8),
        "栖霞寺" => Some(-10),
        _ => None,
    }
}

/// JS `Math.round`: halves go towards +∞.
fn round_half_up(x: f64) -> i32 {
    (x + 0.5).floor() as i32
}

impl OffsetProfile {
    /// Offset at the initial zoom, before any zoom scaling.
    pub fn base_offset(&self, name: &str, lat: f64) -> i32 {
        match self {
            Self::Landmark => landmark_offset(name).unwrap_or(if lat < 32.0 {
                6
            } else if lat < 32.1 {
                -2
            } else {
                -8
            }),
            Self::Subtle => {
                if lat < 31.95 {
                    1
                } else if lat < 32.05 {
                    0
                } else {
                    -1
                }
            }
        }
    }

    pub fn zoom_factor(&self, name: &str, zoom: f64) -> f64 {
        match self {
            Self::Landmark if name == REVERSED_LANDMARK => {
                if zoom <= 11.0 {
                    0.8
                } else if zoom >= 15.0 {
                    1.3
                } else {
                    1.0
                }
            }
            Self::Landmark => {
                if zoom <= 11.0 {
                    1.5
                } else if zoom <= 13.0 {
                    1.2
                } else if zoom >= 15.0 {
                    0.8
                } else {
                    1.0
                }
            }
            Self::Subtle => {
                if zoom >= 14.0 {
                    0.9
                } else {
                    1.0
                }
            }
        }
    }

    pub fn offset_at_zoom(&self, name: &str, lat: f64, zoom: f64) -> i32 {
        let base = self.base_offset(name, lat) as f64;
        round_half_up(base * self.zoom_factor(name, zoom))
    }

    pub fn offset_for(&self, group: &LocationGroup, zoom: f64) -> i32 {
        self.offset_at_zoom(&group.name, group.coordinates.lat(), zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_table() {
        let p = OffsetProfile::Landmark;
        assert_eq!(p.base_offset("方山", 31.9), 8);
        assert_eq!(p.base_offset("栖霞寺", 32.15), -10);
        assert_eq!(p.base_offset("灵谷寺", 32.05), 0);
    }

    #[test]
    fn test_landmark_latitude_bands() {
        let p = OffsetProfile::Landmark;
        assert_eq!(p.base_offset("雨花台", 31.99), 6);
        assert_eq!(p.base_offset("朝天宫", 32.0), -2);
        assert_eq!(p.base_offset("幕府山", 32.1), -8);
    }

    #[test]
    fn test_subtle_bands() {
        let p = OffsetProfile::Subtle;
        assert_eq!(p.base_offset("方山", 31.9), 1);
        assert_eq!(p.base_offset("秦淮河", 31.95), 0);
        assert_eq!(p.base_offset("钟山", 32.05), -1);
    }

    #[test]
    fn test_landmark_zoom_scaling() {
        let p = OffsetProfile::Landmark;
        // -8 * 1.5
        assert_eq!(p.offset_at_zoom("钟山", 32.06, 11.0), -12);
        // -8 * 1.2 = -9.6
        assert_eq!(p.offset_at_zoom("钟山", 32.06, 12.0), -10);
        assert_eq!(p.offset_at_zoom("钟山", 32.06, 14.0), -8);
        // -8 * 0.8 = -6.4
        assert_eq!(p.offset_at_zoom("钟山", 32.06, 15.5), -6);
    }

    #[test]
    fn test_xinlinpu_reverse_factor() {
        let p = OffsetProfile::Landmark;
        // 6 * 0.8 = 4.8
        assert_eq!(p.offset_at_zoom("新林浦", 31.9, 10.5), 5);
        assert_eq!(p.offset_at_zoom("新林浦", 31.9, 12.0), 6);
        // 6 * 1.3 = 7.8
        assert_eq!(p.offset_at_zoom("新林浦", 31.9, 16.0), 8);
    }

    #[test]
    fn test_subtle_zoom_scaling() {
        let p = OffsetProfile::Subtle;
        assert_eq!(p.offset_at_zoom("x", 32.2, 10.0), -1);
        // -1 * 0.9 = -0.9
        assert_eq!(p.offset_at_zoom("x", 32.2, 14.5), -1);
        assert_eq!(p.offset_at_zoom("x", 31.9, 14.5), 1);
    }

    #[test]
    fn test_round_half_up_matches_js() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-0.4), 0);
    }
}
