use anyhow::Result;
use async_trait::async_trait;

use crate::ids::{ImageReference, RecordId};
use crate::profile_image::StoredImageFields;

/// Retrieval collaborator: raw bytes of a stored image.
///
/// 读取已存储图片的字节内容。
#[async_trait]
pub trait ImageRetrievalPort: Send + Sync {
    /// Returns the stored image bytes, base64 encoded.
    async fn fetch_image_bytes(&self, reference: &ImageReference) -> Result<String>;
}

/// Persistence collaborator: store or clear the image of a record.
///
/// Requirements:
/// - All-or-nothing per call (a failure leaves the record untouched)
/// - `base64_image = None` clears the stored image
///
/// 保存或清除记录的头像。
#[async_trait]
pub trait ImagePersistencePort: Send + Sync {
    async fn save_image(
        &self,
        record_id: &RecordId,
        base64_image: Option<&str>,
        file_metadata_json: Option<&str>,
    ) -> Result<()>;
}

/// Read access to the image fields stored on a record.
#[async_trait]
pub trait RecordFieldsPort: Send + Sync {
    async fn load_fields(&self, record_id: &RecordId) -> Result<StoredImageFields>;
}
