//! Profile image domain models.

mod fields;
mod metadata;
mod region;
mod save_result;
mod widget;

pub use fields::{download_url, StoredImageFields, DEFAULT_DOWNLOAD_URL_TEMPLATE};
pub use metadata::ImageMetadata;
pub use region::RegionConfig;
pub use save_result::{ModalOutcome, SaveIntent, SaveResult};
pub use widget::{
    Boundary, EncodedImage, ImageEncoding, ImageSource, RenderRequest, Viewport, ViewportShape,
    WidgetHandle, WidgetOptions,
};
