use std::path::PathBuf;

use pc_core::{
    EncodedImage, ImageMetadata, ImageReference, ImageSource, RegionConfig, SaveResult,
    WidgetHandle,
};

/// Transient data of one editing session. The panel state (dirty flag,
/// busy phases) lives in the state machine; this holds the values.
///
/// 编辑会话数据。
#[derive(Debug, Default)]
pub struct EditSession {
    /// Stored image being edited, if the panel was opened on one.
    pub reference: Option<ImageReference>,
    /// Original (uncropped) bytes currently bound to the widget.
    pub image: Option<ImageSource>,
    pub metadata: Option<ImageMetadata>,
    /// Region replayed on the next stored-image mount.
    pub region: Option<RegionConfig>,
    /// Region waiting to be applied to the widget.
    pub pending_region: Option<RegionConfig>,
    pub widget: Option<WidgetHandle>,
    /// File chosen by the user, consumed by the read action.
    pub pending_file: Option<PathBuf>,
    /// Region captured before rendering together with the rendered crop.
    pub rendered: Option<(RegionConfig, EncodedImage)>,
    /// Result produced by the last save.
    pub emitted: Option<SaveResult>,
}

impl EditSession {
    pub fn new(
        reference: Option<ImageReference>,
        metadata: Option<ImageMetadata>,
        region: Option<RegionConfig>,
    ) -> Self {
        Self {
            reference,
            metadata,
            region,
            ..Self::default()
        }
    }

    pub fn clear_image(&mut self) {
        self.image = None;
        self.region = None;
        self.pending_region = None;
        self.rendered = None;
    }

    pub fn original_base64(&self) -> Option<String> {
        self.image.as_ref().map(|image| image.base64.clone())
    }
}
