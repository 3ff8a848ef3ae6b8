use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::ImageFormat;
use tokio::fs;
use tracing::debug;

use pc_core::ports::{LocalFile, LocalFilePort};
use pc_core::ImageMetadata;

const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Reads a user-chosen file from local disk.
///
/// The mime type is derived from the file extension; the modification time
/// becomes `lastModified` in epoch milliseconds.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsLocalFileReader;

impl FsLocalFileReader {
    pub fn new() -> Self {
        Self
    }
}

fn mime_type_for(path: &Path) -> &'static str {
    ImageFormat::from_path(path)
        .map(|format| format.to_mime_type())
        .unwrap_or(UNKNOWN_MIME_TYPE)
}

#[async_trait]
impl LocalFilePort for FsLocalFileReader {
    async fn read_file(&self, path: &Path) -> Result<LocalFile> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("read file {}", path.display()))?;
        let file_meta = fs::metadata(path)
            .await
            .with_context(|| format!("stat file {}", path.display()))?;

        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let last_modified = file_meta
            .modified()
            .map(|time| DateTime::<Utc>::from(time).timestamp_millis())
            .unwrap_or(0);

        let metadata = ImageMetadata::new(
            name,
            bytes.len() as u64,
            mime_type_for(path),
            last_modified,
        );
        debug!(path = %path.display(), size = metadata.size, mime_type = %metadata.mime_type, "local file read");

        Ok(LocalFile { metadata, bytes })
    }
}
