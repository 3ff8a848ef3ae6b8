//! Port bundles injected into the use cases.

use std::sync::Arc;

use pc_core::ports::{CropWidgetPort, ImageRetrievalPort, LocalFilePort};

/// Collaborators of one upload/crop panel.
///
/// 上传裁剪面板的依赖（依赖注入）。
#[derive(Clone)]
pub struct PanelDeps {
    pub crop_widget: Arc<dyn CropWidgetPort>,
    pub retrieval: Arc<dyn ImageRetrievalPort>,
    pub local_files: Arc<dyn LocalFilePort>,
}

impl PanelDeps {
    pub fn new(
        crop_widget: Arc<dyn CropWidgetPort>,
        retrieval: Arc<dyn ImageRetrievalPort>,
        local_files: Arc<dyn LocalFilePort>,
    ) -> Self {
        Self {
            crop_widget,
            retrieval,
            local_files,
        }
    }
}
