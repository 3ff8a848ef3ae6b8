use async_trait::async_trait;

use super::errors::CropWidgetError;
use crate::profile_image::{
    EncodedImage, ImageSource, RegionConfig, RenderRequest, WidgetHandle, WidgetOptions,
};

/// Interactive crop surface (pan, zoom, crop-region selection).
///
/// Callers must [`destroy`](CropWidgetPort::destroy) a handle before creating
/// its replacement or abandoning the session; an adapter keeps every
/// undestroyed surface alive. Failures are returned, never retried.
///
/// 交互式裁剪控件端口。
#[async_trait]
pub trait CropWidgetPort: Send + Sync {
    /// Create one crop surface.
    ///
    /// 创建一个裁剪实例。
    fn initialize(&self, options: &WidgetOptions) -> Result<WidgetHandle, CropWidgetError>;

    /// Load image bytes into the surface, optionally replaying a prior region.
    ///
    /// 绑定图片，可选回放之前的区域配置。
    async fn bind(
        &self,
        handle: WidgetHandle,
        source: ImageSource,
        region: Option<RegionConfig>,
    ) -> Result<(), CropWidgetError>;

    /// Capture the current crop/zoom/orientation state.
    fn region_config(&self, handle: WidgetHandle) -> Result<RegionConfig, CropWidgetError>;

    /// Apply a user pan/zoom to the surface.
    fn set_region(&self, handle: WidgetHandle, region: RegionConfig)
        -> Result<(), CropWidgetError>;

    /// Rasterize the current selection into an encoded image.
    ///
    /// 将当前选区渲染为编码图片。
    async fn render_result(
        &self,
        handle: WidgetHandle,
        request: RenderRequest,
    ) -> Result<EncodedImage, CropWidgetError>;

    /// Release everything tied to the handle.
    fn destroy(&self, handle: WidgetHandle) -> Result<(), CropWidgetError>;
}
