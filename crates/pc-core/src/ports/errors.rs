use thiserror::Error;

use crate::profile_image::WidgetHandle;

/// Failures reported by a crop widget adapter.
///
/// 裁剪控件适配器的错误。
#[derive(Debug, Error)]
pub enum CropWidgetError {
    #[error("unknown widget handle {0}")]
    UnknownHandle(WidgetHandle),

    #[error("{0} has no image bound")]
    NotBound(WidgetHandle),

    #[error("invalid image source: {0}")]
    InvalidSource(String),

    #[error("unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("invalid crop region: {0}")]
    InvalidRegion(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("widget registry unavailable")]
    Unavailable,
}
