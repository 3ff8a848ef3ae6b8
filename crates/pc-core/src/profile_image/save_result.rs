use serde::{Deserialize, Serialize};

use super::{ImageMetadata, RegionConfig};

/// Payload emitted once per save by the upload/crop panel.
///
/// A `None` cropped image together with `Some` metadata means "remove the
/// existing image, nothing to re-crop". Use [`SaveResult::intent`] instead of
/// inspecting the null fields directly.
///
/// 上传裁剪面板每次保存时产生的结果。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResult {
    pub file_metadata: Option<ImageMetadata>,
    pub original_image_base64: Option<String>,
    pub region_config: Option<RegionConfig>,
    pub cropped_image_base64: Option<String>,
}

/// What a [`SaveResult`] asks the persistence layer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIntent {
    /// Store the cropped image.
    Replace,
    /// Clear the stored image.
    Remove,
}

impl SaveResult {
    /// Result of saving a rendered crop.
    pub fn cropped(
        file_metadata: Option<ImageMetadata>,
        original_image_base64: Option<String>,
        region_config: Option<RegionConfig>,
        cropped_image_base64: String,
    ) -> Self {
        Self {
            file_metadata,
            original_image_base64,
            region_config,
            cropped_image_base64: Some(cropped_image_base64),
        }
    }

    /// Result of saving after the image was deleted.
    pub fn removal(file_metadata: Option<ImageMetadata>) -> Self {
        Self {
            file_metadata,
            ..Self::default()
        }
    }

    pub fn intent(&self) -> SaveIntent {
        if self.cropped_image_base64.is_some() {
            SaveIntent::Replace
        } else {
            SaveIntent::Remove
        }
    }

    /// Metadata serialized the way the record field stores it.
    pub fn file_metadata_json(&self) -> serde_json::Result<Option<String>> {
        self.file_metadata
            .as_ref()
            .map(ImageMetadata::to_json)
            .transpose()
    }
}

/// Single resolution value of the upload modal.
///
/// `Cancelled` serializes as the literal string `"cancelled"`.
///
/// 上传弹窗的唯一结果：取消或保存结果。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ModalOutcomeRepr", try_from = "ModalOutcomeRepr")]
pub enum ModalOutcome {
    Cancelled,
    Saved(SaveResult),
}

impl ModalOutcome {
    pub const CANCELLED: &'static str = "cancelled";

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ModalOutcomeRepr {
    Signal(String),
    Saved(SaveResult),
}

impl From<ModalOutcome> for ModalOutcomeRepr {
    fn from(outcome: ModalOutcome) -> Self {
        match outcome {
            ModalOutcome::Cancelled => Self::Signal(ModalOutcome::CANCELLED.to_string()),
            ModalOutcome::Saved(result) => Self::Saved(result),
        }
    }
}

impl TryFrom<ModalOutcomeRepr> for ModalOutcome {
    type Error = String;

    fn try_from(repr: ModalOutcomeRepr) -> Result<Self, Self::Error> {
        match repr {
            ModalOutcomeRepr::Signal(signal) if signal == ModalOutcome::CANCELLED => {
                Ok(Self::Cancelled)
            }
            ModalOutcomeRepr::Signal(signal) => Err(format!("unknown modal signal: {signal}")),
            ModalOutcomeRepr::Saved(result) => Ok(Self::Saved(result)),
        }
    }
}
