//! Shared fakes for the pc-app integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use pc_app::PanelDeps;
use pc_core::ports::{
    CropWidgetError, CropWidgetPort, ImagePersistencePort, ImageRetrievalPort, LocalFile,
    LocalFilePort, RecordFieldsPort, RecordRefreshPort,
};
use pc_core::{
    EncodedImage, ImageMetadata, ImageReference, ImageSource, RecordId, RegionConfig,
    RenderRequest, StoredImageFields, WidgetHandle, WidgetOptions,
};

/// Bytes every fake render returns.
pub const CROPPED_BYTES: &[u8] = b"cropped";

#[derive(Default)]
struct Surface {
    source: Option<ImageSource>,
    region: Option<RegionConfig>,
}

/// Deterministic crop widget: tracks live handles and every bind.
#[derive(Default)]
pub struct FakeCropWidget {
    next_id: AtomicU64,
    surfaces: Mutex<HashMap<WidgetHandle, Surface>>,
    max_live: AtomicUsize,
    binds: Mutex<Vec<Option<RegionConfig>>>,
    pub fail_bind: AtomicBool,
    pub fail_render: AtomicBool,
    pub fail_set_region: AtomicBool,
}

impl FakeCropWidget {
    pub fn live_count(&self) -> usize {
        self.surfaces.lock().unwrap().len()
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    /// Region replayed on each bind, in call order.
    pub fn bind_regions(&self) -> Vec<Option<RegionConfig>> {
        self.binds.lock().unwrap().clone()
    }

    fn default_region() -> RegionConfig {
        RegionConfig::new([0, 0, 199, 199], 1.0, 1)
    }
}

#[async_trait]
impl CropWidgetPort for FakeCropWidget {
    fn initialize(&self, _options: &WidgetOptions) -> Result<WidgetHandle, CropWidgetError> {
        let handle = WidgetHandle(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut surfaces = self.surfaces.lock().unwrap();
        surfaces.insert(handle, Surface::default());
        self.max_live.fetch_max(surfaces.len(), Ordering::SeqCst);
        Ok(handle)
    }

    async fn bind(
        &self,
        handle: WidgetHandle,
        source: ImageSource,
        region: Option<RegionConfig>,
    ) -> Result<(), CropWidgetError> {
        self.binds.lock().unwrap().push(region.clone());
        let mut surfaces = self.surfaces.lock().unwrap();
        let surface = surfaces
            .get_mut(&handle)
            .ok_or(CropWidgetError::UnknownHandle(handle))?;
        if self.fail_bind.load(Ordering::SeqCst) {
            return Err(CropWidgetError::UnsupportedImage("fake decode failure".into()));
        }
        surface.source = Some(source);
        surface.region = Some(region.unwrap_or_else(Self::default_region));
        Ok(())
    }

    fn region_config(&self, handle: WidgetHandle) -> Result<RegionConfig, CropWidgetError> {
        let surfaces = self.surfaces.lock().unwrap();
        let surface = surfaces
            .get(&handle)
            .ok_or(CropWidgetError::UnknownHandle(handle))?;
        surface.region.clone().ok_or(CropWidgetError::NotBound(handle))
    }

    fn set_region(
        &self,
        handle: WidgetHandle,
        region: RegionConfig,
    ) -> Result<(), CropWidgetError> {
        let mut surfaces = self.surfaces.lock().unwrap();
        let surface = surfaces
            .get_mut(&handle)
            .ok_or(CropWidgetError::UnknownHandle(handle))?;
        if self.fail_set_region.load(Ordering::SeqCst) {
            return Err(CropWidgetError::InvalidRegion("fake region rejection".into()));
        }
        surface.region = Some(region);
        Ok(())
    }

    async fn render_result(
        &self,
        handle: WidgetHandle,
        request: RenderRequest,
    ) -> Result<EncodedImage, CropWidgetError> {
        if !self.surfaces.lock().unwrap().contains_key(&handle) {
            return Err(CropWidgetError::UnknownHandle(handle));
        }
        if self.fail_render.load(Ordering::SeqCst) {
            return Err(CropWidgetError::Render("fake render failure".into()));
        }
        Ok(EncodedImage::from_bytes(
            request.encoding.mime_type(),
            CROPPED_BYTES,
        ))
    }

    fn destroy(&self, handle: WidgetHandle) -> Result<(), CropWidgetError> {
        self.surfaces
            .lock()
            .unwrap()
            .remove(&handle)
            .map(|_| ())
            .ok_or(CropWidgetError::UnknownHandle(handle))
    }
}

/// Retrieval backed by a map of base64 payloads.
#[derive(Default)]
pub struct InMemoryRetrieval {
    images: Mutex<HashMap<ImageReference, String>>,
}

impl InMemoryRetrieval {
    pub fn with_image(reference: &str, bytes: &[u8]) -> Self {
        let retrieval = Self::default();
        retrieval.images.lock().unwrap().insert(
            ImageReference::from(reference),
            ImageSource::from_bytes("image/png", bytes).base64,
        );
        retrieval
    }
}

#[async_trait]
impl ImageRetrievalPort for InMemoryRetrieval {
    async fn fetch_image_bytes(&self, reference: &ImageReference) -> anyhow::Result<String> {
        self.images
            .lock()
            .unwrap()
            .get(reference)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("document {} not found", reference))
    }
}

/// Retrieval that blocks until released, to hold a dispatch open.
#[derive(Default)]
pub struct GatedRetrieval {
    pub entered: Notify,
    pub release: Notify,
}

#[async_trait]
impl ImageRetrievalPort for GatedRetrieval {
    async fn fetch_image_bytes(&self, _reference: &ImageReference) -> anyhow::Result<String> {
        self.entered.notify_one();
        self.release.notified().await;
        Ok(ImageSource::from_bytes("image/png", b"stored").base64)
    }
}

/// Local files keyed by path.
#[derive(Default)]
pub struct InMemoryLocalFiles {
    files: Mutex<HashMap<PathBuf, LocalFile>>,
}

impl InMemoryLocalFiles {
    pub fn with_file(path: &str, metadata: ImageMetadata, bytes: &[u8]) -> Self {
        let files = Self::default();
        files.add(path, metadata, bytes);
        files
    }

    pub fn add(&self, path: &str, metadata: ImageMetadata, bytes: &[u8]) {
        self.files.lock().unwrap().insert(
            PathBuf::from(path),
            LocalFile {
                metadata,
                bytes: bytes.to_vec(),
            },
        );
    }
}

#[async_trait]
impl LocalFilePort for InMemoryLocalFiles {
    async fn read_file(&self, path: &Path) -> anyhow::Result<LocalFile> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("file {} not readable", path.display()))
    }
}

/// Record fields plus persistence in one map, like the filesystem store.
#[derive(Default)]
pub struct InMemoryRecords {
    records: Mutex<HashMap<RecordId, StoredImageFields>>,
    saves: Mutex<Vec<(RecordId, Option<String>, Option<String>)>>,
    pub fail_save: AtomicBool,
}

impl InMemoryRecords {
    pub fn with_record(record_id: &str, fields: StoredImageFields) -> Self {
        let records = Self::default();
        records
            .records
            .lock()
            .unwrap()
            .insert(RecordId::from(record_id), fields);
        records
    }

    pub fn saves(&self) -> Vec<(RecordId, Option<String>, Option<String>)> {
        self.saves.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordFieldsPort for InMemoryRecords {
    async fn load_fields(&self, record_id: &RecordId) -> anyhow::Result<StoredImageFields> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(record_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ImagePersistencePort for InMemoryRecords {
    async fn save_image(
        &self,
        record_id: &RecordId,
        base64_image: Option<&str>,
        file_metadata_json: Option<&str>,
    ) -> anyhow::Result<()> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("storage offline"));
        }
        self.saves.lock().unwrap().push((
            record_id.clone(),
            base64_image.map(str::to_string),
            file_metadata_json.map(str::to_string),
        ));
        let fields = StoredImageFields {
            image_reference: base64_image.map(|_| ImageReference::new()),
            metadata_json: base64_image
                .and(file_metadata_json)
                .map(str::to_string),
        };
        self.records
            .lock()
            .unwrap()
            .insert(record_id.clone(), fields);
        Ok(())
    }
}

#[derive(Default)]
pub struct CountingRefresh {
    pub notified: AtomicUsize,
}

#[async_trait]
impl RecordRefreshPort for CountingRefresh {
    async fn notify_record_updated(&self, _record_id: &RecordId) -> anyhow::Result<()> {
        self.notified.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn photo_metadata() -> ImageMetadata {
    ImageMetadata::new("photo.jpg", 10, "image/jpeg", 1_700_000_000_000)
}

pub const PHOTO_BYTES: &[u8] = b"0123456789";

pub fn deps(
    widget: &Arc<FakeCropWidget>,
    retrieval: Arc<dyn ImageRetrievalPort>,
    files: Arc<dyn LocalFilePort>,
) -> PanelDeps {
    PanelDeps::new(widget.clone(), retrieval, files)
}
