use serde::{Deserialize, Serialize};
use tracing::warn;

/// File facts describing an image independent of its bytes.
///
/// Persisted alongside the image reference so the UI can redisplay file
/// facts without re-fetching bytes. The JSON shape is
/// `{"name","size","type","lastModified"}`.
///
/// 描述图片文件的元数据（与字节内容无关）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageMetadata {
    pub name: String,
    /// Size in bytes.
    pub size: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "lastModified")]
    pub last_modified: i64,
}

impl ImageMetadata {
    pub fn new(
        name: impl Into<String>,
        size: u64,
        mime_type: impl Into<String>,
        last_modified: i64,
    ) -> Self {
        Self {
            name: name.into(),
            size,
            mime_type: mime_type.into(),
            last_modified,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse the stored metadata field.
    ///
    /// A missing, empty or malformed value yields `None`; malformed JSON is
    /// logged and never propagated.
    ///
    /// 解析存储的元数据字段，格式错误时返回 `None`。
    pub fn parse_stored(raw: Option<&str>) -> Option<Self> {
        let raw = raw?.trim();
        if raw.is_empty() || raw == "null" {
            return None;
        }

        match serde_json::from_str::<Self>(raw) {
            Ok(metadata) => Some(metadata),
            Err(err) => {
                warn!(error = %err, "stored image metadata is malformed, ignoring");
                None
            }
        }
    }
}
