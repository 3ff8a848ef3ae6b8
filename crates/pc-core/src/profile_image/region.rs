use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr, PickFirst};

/// Crop/zoom/orientation state captured from the crop widget.
///
/// `points` is `[x1, y1, x2, y2]` in source image pixels. The core treats the
/// value as opaque: it is stored and replayed, never interpreted. Points are
/// accepted either as numbers or as numeric strings.
///
/// 裁剪控件的区域配置（坐标、缩放、方向），核心逻辑仅存储与回放。
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde_as(as = "[PickFirst<(_, DisplayFromStr)>; 4]")]
    pub points: [u32; 4],
    pub zoom: f64,
    #[serde(default = "default_orientation")]
    pub orientation: u8,
}

fn default_orientation() -> u8 {
    1
}

impl RegionConfig {
    pub fn new(points: [u32; 4], zoom: f64, orientation: u8) -> Self {
        Self {
            points,
            zoom,
            orientation,
        }
    }

    pub fn width(&self) -> u32 {
        self.points[2].saturating_sub(self.points[0])
    }

    pub fn height(&self) -> u32 {
        self.points[3].saturating_sub(self.points[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_string_points_from_widget_output() {
        let raw = r#"{"points":["562","570","2847","2855"],"zoom":0.1313,"orientation":1}"#;
        let region: RegionConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(region.points, [562, 570, 2847, 2855]);
        assert_eq!(region.orientation, 1);
        assert_eq!(region.width(), 2285);
        assert_eq!(region.height(), 2285);
    }

    #[test]
    fn serializes_points_as_numbers() {
        let region = RegionConfig::new([0, 0, 10, 10], 1.0, 1);
        let value = serde_json::to_value(&region).unwrap();
        assert_eq!(value["points"], serde_json::json!([0, 0, 10, 10]));
    }

    #[test]
    fn missing_orientation_defaults_to_upright() {
        let region: RegionConfig =
            serde_json::from_str(r#"{"points":[0,0,10,10],"zoom":1.0}"#).unwrap();
        assert_eq!(region.orientation, 1);
    }

    #[test]
    fn inverted_points_have_zero_extent() {
        let region = RegionConfig::new([10, 10, 5, 5], 1.0, 1);
        assert_eq!(region.width(), 0);
        assert_eq!(region.height(), 0);
    }
}
