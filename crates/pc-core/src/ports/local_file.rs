use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::profile_image::ImageMetadata;

/// A locally chosen file: its facts and its bytes.
///
/// 本地选择的文件（元数据与字节）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFile {
    pub metadata: ImageMetadata,
    pub bytes: Vec<u8>,
}

/// Local, non-network file reader.
#[async_trait]
pub trait LocalFilePort: Send + Sync {
    async fn read_file(&self, path: &Path) -> Result<LocalFile>;
}
