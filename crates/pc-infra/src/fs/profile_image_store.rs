use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use pc_core::ports::{ImagePersistencePort, ImageRetrievalPort, RecordFieldsPort};
use pc_core::{ImageReference, RecordId, StoredImageFields};

const DOCUMENTS_DIR: &str = "documents";
const RECORDS_DIR: &str = "records";
const DOCUMENT_EXTENSION: &str = "bin";
const RECORD_EXTENSION: &str = "json";

/// Profile image store on the local filesystem.
///
/// Layout:
/// - `<root>/documents/<uuid>.bin`: image bytes
/// - `<root>/records/<record-id>.json`: the record's [`StoredImageFields`]
///
/// 文件系统上的头像存储。
pub struct FsProfileImageStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsProfileImageStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            write_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn document_path(&self, reference: &ImageReference) -> PathBuf {
        self.root
            .join(DOCUMENTS_DIR)
            .join(format!("{}.{}", reference.as_str(), DOCUMENT_EXTENSION))
    }

    fn record_path(&self, record_id: &RecordId) -> PathBuf {
        self.root
            .join(RECORDS_DIR)
            .join(format!("{}.{}", record_id.as_str(), RECORD_EXTENSION))
    }

    async fn read_record(&self, record_id: &RecordId) -> Result<StoredImageFields> {
        let path = self.record_path(record_id);
        let content = match fs::read(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoredImageFields::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("read record {}", path.display()));
            }
        };
        serde_json::from_slice(&content)
            .with_context(|| format!("parse record {}", path.display()))
    }

    /// Write the record through a temp file so readers never see a partial one.
    async fn write_record(&self, record_id: &RecordId, fields: &StoredImageFields) -> Result<()> {
        let path = self.record_path(record_id);
        let tmp = path.with_extension("json.tmp");
        fs::create_dir_all(self.root.join(RECORDS_DIR))
            .await
            .context("create records dir")?;

        let json = serde_json::to_vec_pretty(fields).context("serialize record")?;
        fs::write(&tmp, json)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("rename {} to {}", tmp.display(), path.display()))?;
        Ok(())
    }

    async fn write_document(&self, bytes: &[u8]) -> Result<ImageReference> {
        let reference = ImageReference::from(uuid::Uuid::new_v4().to_string());
        fs::create_dir_all(self.root.join(DOCUMENTS_DIR))
            .await
            .context("create documents dir")?;
        let path = self.document_path(&reference);
        fs::write(&path, bytes)
            .await
            .with_context(|| format!("write document {}", path.display()))?;
        Ok(reference)
    }

    async fn remove_document(&self, reference: &ImageReference) {
        let path = self.document_path(reference);
        if let Err(err) = fs::remove_file(&path).await {
            warn!(path = %path.display(), error = %err, "remove document failed");
        }
    }
}

fn validate_document_id(reference: &ImageReference) -> Result<()> {
    uuid::Uuid::parse_str(reference.as_str())
        .with_context(|| format!("invalid document id {:?}", reference.as_str()))?;
    Ok(())
}

fn validate_record_id(record_id: &RecordId) -> Result<()> {
    let id = record_id.as_str();
    let valid = !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\'])
        && !id.chars().any(char::is_control);
    anyhow::ensure!(valid, "invalid record id {:?}", id);
    Ok(())
}

#[async_trait]
impl ImageRetrievalPort for FsProfileImageStore {
    async fn fetch_image_bytes(&self, reference: &ImageReference) -> Result<String> {
        validate_document_id(reference)?;
        let path = self.document_path(reference);
        let bytes = fs::read(&path)
            .await
            .with_context(|| format!("read document {}", path.display()))?;
        debug!(reference = %reference, size = bytes.len(), "document read");
        Ok(STANDARD.encode(bytes))
    }
}

#[async_trait]
impl RecordFieldsPort for FsProfileImageStore {
    async fn load_fields(&self, record_id: &RecordId) -> Result<StoredImageFields> {
        validate_record_id(record_id)?;
        self.read_record(record_id).await
    }
}

#[async_trait]
impl ImagePersistencePort for FsProfileImageStore {
    /// Store a new document and point the record at it, or clear both
    /// fields when `base64_image` is `None`.
    ///
    /// The previous document is removed only after the record was rewritten.
    async fn save_image(
        &self,
        record_id: &RecordId,
        base64_image: Option<&str>,
        file_metadata_json: Option<&str>,
    ) -> Result<()> {
        validate_record_id(record_id)?;
        let bytes = base64_image
            .map(|encoded| STANDARD.decode(encoded))
            .transpose()
            .context("decode image payload")?;

        let _guard = self.write_lock.lock().await;
        let previous = self.read_record(record_id).await?;

        let (fields, written) = match bytes {
            Some(bytes) => {
                let reference = self.write_document(&bytes).await?;
                let fields = StoredImageFields {
                    image_reference: Some(reference.clone()),
                    metadata_json: file_metadata_json.map(str::to_string),
                };
                (fields, Some(reference))
            }
            None => (StoredImageFields::default(), None),
        };

        if let Err(err) = self.write_record(record_id, &fields).await {
            if let Some(reference) = &written {
                self.remove_document(reference).await;
            }
            return Err(err);
        }

        if let Some(old) = previous.image_reference {
            if written.as_ref() != Some(&old) && validate_document_id(&old).is_ok() {
                self.remove_document(&old).await;
            }
        }

        info!(
            record_id = %record_id,
            reference = ?fields.image_reference.as_ref().map(ImageReference::as_str),
            "record image fields saved"
        );
        Ok(())
    }
}
