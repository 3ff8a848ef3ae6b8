//! Value types exchanged with the crop widget.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Handle to one live crop surface owned by a crop widget adapter.
///
/// 裁剪控件实例句柄。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WidgetHandle(pub u64);

impl std::fmt::Display for WidgetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "widget-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportShape {
    Circle,
    Square,
}

impl ViewportShape {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "circle" => Some(Self::Circle),
            "square" => Some(Self::Square),
            _ => None,
        }
    }
}

/// Visible crop window inside the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    #[serde(rename = "type")]
    pub shape: ViewportShape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Boundary {
    pub width: u32,
    pub height: u32,
}

/// Geometry the crop widget is initialized with.
///
/// 裁剪控件初始化参数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetOptions {
    pub viewport: Viewport,
    pub boundary: Boundary,
    #[serde(rename = "showZoomer")]
    pub show_zoomer: bool,
}

impl WidgetOptions {
    /// Fixed geometry for profile images: a circular 199×199 viewport inside
    /// a 200×200 boundary.
    pub fn profile_default() -> Self {
        Self {
            viewport: Viewport {
                width: 199,
                height: 199,
                shape: ViewportShape::Circle,
            },
            boundary: Boundary {
                width: 200,
                height: 200,
            },
            show_zoomer: true,
        }
    }
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self::profile_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageEncoding {
    Png,
    Jpeg,
}

impl ImageEncoding {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpeg" | "jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// Output requested from the crop widget when rendering the final image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub encoding: ImageEncoding,
    /// Mask the output to the inscribed circle.
    pub circle: bool,
}

impl Default for RenderRequest {
    fn default() -> Self {
        Self {
            encoding: ImageEncoding::Png,
            circle: false,
        }
    }
}

/// Base64 encoded image produced by the crop widget.
///
/// 裁剪控件输出的 base64 编码图片。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedImage {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub base64: String,
}

impl EncodedImage {
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.base64)
    }
}

/// Image bytes handed to the widget on bind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub mime_type: String,
    pub base64: String,
}

impl ImageSource {
    pub fn new(mime_type: impl Into<String>, base64: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64: base64.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, STANDARD.encode(bytes))
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.base64)
    }
}
