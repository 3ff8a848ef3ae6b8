use serde::{Deserialize, Serialize};

use super::ImageMetadata;
use crate::ids::ImageReference;

/// Placeholder in the download endpoint template replaced by the reference id.
pub const DOWNLOAD_ID_PLACEHOLDER: &str = "{id}";

/// Download endpoint used when no template is configured.
pub const DEFAULT_DOWNLOAD_URL_TEMPLATE: &str = "/sfc/servlet.shepherd/document/download/{id}";

/// The two persisted fields a record carries for its profile image.
///
/// 记录上与头像相关的两个持久化字段。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImageFields {
    pub image_reference: Option<ImageReference>,
    /// JSON-encoded [`ImageMetadata`], stored verbatim.
    pub metadata_json: Option<String>,
}

impl StoredImageFields {
    pub fn has_image(&self) -> bool {
        self.image_reference.is_some()
    }

    /// Parsed metadata; malformed JSON reads as `None`.
    pub fn metadata(&self) -> Option<ImageMetadata> {
        ImageMetadata::parse_stored(self.metadata_json.as_deref())
    }

    pub fn image_src(&self, template: &str) -> Option<String> {
        self.image_reference
            .as_ref()
            .map(|reference| download_url(template, reference))
    }
}

/// Expand the download endpoint template for a reference.
///
/// Templates without a placeholder get the id appended.
pub fn download_url(template: &str, reference: &ImageReference) -> String {
    if template.contains(DOWNLOAD_ID_PLACEHOLDER) {
        template.replace(DOWNLOAD_ID_PLACEHOLDER, reference.as_str())
    } else {
        format!("{}{}", template, reference.as_str())
    }
}
