//! Upload/crop panel orchestrator.
//!
//! This module coordinates the panel state machine, the crop widget and the
//! image loading collaborators.

use std::path::PathBuf;

use tokio::sync::Mutex;
use tracing::{debug, error, info, info_span, warn, Instrument};

use pc_core::panel::{
    Affordances, PanelAction, PanelEvent, PanelState, PanelStateMachine, PanelTransitionError,
};
use pc_core::ports::CropWidgetError;
use pc_core::{
    ImageMetadata, ImageReference, ImageSource, RegionConfig, RenderRequest, SaveResult,
    WidgetOptions,
};

use super::context::PanelContext;
use super::session::EditSession;
use crate::deps::PanelDeps;

/// Mime type assumed for stored bytes when no metadata is known.
const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Errors produced by the upload/crop panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    #[error("panel is busy with another action")]
    Busy,
    #[error(transparent)]
    Rejected(#[from] PanelTransitionError),
    #[error("no stored image reference to load")]
    MissingReference,
    #[error("no local file selected")]
    NoFileSelected,
    #[error("no image bytes to bind")]
    NoImage,
    #[error("no pending crop region")]
    NoRegion,
    #[error("no live crop widget")]
    NoWidget,
    #[error("fetch stored image failed: {0}")]
    Fetch(#[source] anyhow::Error),
    #[error("read local file failed: {0}")]
    ReadFile(#[source] anyhow::Error),
    #[error("crop widget failed: {0}")]
    Widget(#[source] CropWidgetError),
    #[error("render crop failed: {0}")]
    Render(#[source] CropWidgetError),
    #[error("save produced no result")]
    NoResult,
}

/// Initial parameters of a panel.
#[derive(Debug, Clone, Default)]
pub struct PanelInit {
    /// Stored image to edit, if any.
    pub reference: Option<ImageReference>,
    pub metadata: Option<ImageMetadata>,
    /// Region replayed when the stored image is bound.
    pub prior_region: Option<RegionConfig>,
    pub widget_options: WidgetOptions,
    pub render: RenderRequest,
}

/// Failed action together with the event that reports it to the state machine.
struct ActionFailure {
    error: PanelError,
    follow_up: Option<PanelEvent>,
}

impl ActionFailure {
    fn new(error: PanelError, follow_up: Option<PanelEvent>) -> Self {
        Self { error, follow_up }
    }
}

/// Owns one interactive editing session.
///
/// Every entry point runs under the context's dispatch lock. User actions are
/// rejected with [`PanelError::Busy`] while another one is in flight;
/// [`cancel`](Self::cancel) waits for it instead.
///
/// 上传裁剪面板：管理一次编辑会话。
pub struct UploadCropPanel {
    context: PanelContext,
    session: Mutex<EditSession>,
    deps: PanelDeps,
    options: WidgetOptions,
    render: RenderRequest,
    has_reference: bool,
}

impl UploadCropPanel {
    pub fn new(deps: PanelDeps, init: PanelInit) -> Self {
        let has_reference = init.reference.is_some();
        Self {
            context: PanelContext::default(),
            session: Mutex::new(EditSession::new(
                init.reference,
                init.metadata,
                init.prior_region,
            )),
            deps,
            options: init.widget_options,
            render: init.render,
            has_reference,
        }
    }

    /// Mount the panel: load the stored image when one was given.
    ///
    /// A failed fetch leaves the panel in `Loading`; a local file can still
    /// be chosen afterwards.
    pub async fn open(&self) -> Result<PanelState, PanelError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        self.run(PanelEvent::Open {
            has_reference: self.has_reference,
        })
        .await
    }

    /// Replace the session image with a local file.
    pub async fn choose_file(&self, path: impl Into<PathBuf>) -> Result<PanelState, PanelError> {
        let _dispatch_guard = self.try_dispatch_lock()?;
        self.session.lock().await.pending_file = Some(path.into());
        self.run(PanelEvent::ChooseFile).await
    }

    /// Apply a user pan/zoom to the live widget.
    pub async fn adjust_region(&self, region: RegionConfig) -> Result<PanelState, PanelError> {
        let _dispatch_guard = self.try_dispatch_lock()?;
        self.session.lock().await.pending_region = Some(region);
        self.run(PanelEvent::AdjustRegion).await
    }

    /// Drop the current image; a following save emits a removal.
    pub async fn delete(&self) -> Result<PanelState, PanelError> {
        let _dispatch_guard = self.try_dispatch_lock()?;
        self.run(PanelEvent::Delete).await
    }

    /// Render the final image (or the removal) and close the panel.
    ///
    /// On render failure the panel returns to its previous state and the
    /// save may be retried.
    pub async fn save(&self) -> Result<SaveResult, PanelError> {
        let _dispatch_guard = self.try_dispatch_lock()?;
        self.run(PanelEvent::Save).await?;
        self.session
            .lock()
            .await
            .emitted
            .take()
            .ok_or(PanelError::NoResult)
    }

    /// Close the panel, destroying any live widget. Idempotent.
    pub async fn cancel(&self) -> Result<PanelState, PanelError> {
        let _dispatch_guard = self.context.acquire_dispatch_lock().await;
        if self.context.get_state().await.is_closed() {
            return Ok(PanelState::Closed);
        }
        self.run(PanelEvent::Cancel).await
    }

    pub async fn state(&self) -> PanelState {
        self.context.get_state().await
    }

    pub async fn affordances(&self) -> Affordances {
        self.context.get_state().await.affordances()
    }

    pub async fn metadata(&self) -> Option<ImageMetadata> {
        self.session.lock().await.metadata.clone()
    }

    fn try_dispatch_lock(&self) -> Result<tokio::sync::MutexGuard<'_, ()>, PanelError> {
        self.context.try_acquire_dispatch_lock().ok_or_else(|| {
            warn!("panel action rejected, another action is in flight");
            PanelError::Busy
        })
    }

    /// Must be called while holding the dispatch lock.
    async fn run(&self, event: PanelEvent) -> Result<PanelState, PanelError> {
        let span = info_span!("usecase.upload_crop_panel.dispatch", event = ?event);
        self.dispatch(event).instrument(span).await
    }

    async fn dispatch(&self, event: PanelEvent) -> Result<PanelState, PanelError> {
        let mut current = self.context.get_state().await;
        let mut pending_events = vec![event];
        let mut failure: Option<PanelError> = None;

        while let Some(event) = pending_events.pop() {
            let from = current.clone();
            let event_name = format!("{:?}", event);
            let (next, actions) = PanelStateMachine::transition(current, event)?;
            info!(from = ?from, to = ?next, event = %event_name, "panel state transition");
            self.context.set_state(next.clone()).await;
            current = next;

            match self.execute_actions(actions).await {
                Ok(follow_up_events) => pending_events.extend(follow_up_events),
                Err(ActionFailure { error, follow_up }) => {
                    pending_events.extend(follow_up);
                    if failure.is_none() {
                        failure = Some(error);
                    }
                }
            }
        }

        match failure {
            Some(error) => Err(error),
            None => Ok(current),
        }
    }

    async fn execute_actions(
        &self,
        actions: Vec<PanelAction>,
    ) -> Result<Vec<PanelEvent>, ActionFailure> {
        let mut follow_up_events = Vec::new();
        let mut session = self.session.lock().await;

        for action in actions {
            debug!(?action, "panel executing action");
            match action {
                PanelAction::FetchStoredImage => {
                    let failed = |error| {
                        ActionFailure::new(error, Some(PanelEvent::StoredImageFetchFailed))
                    };
                    let reference = session
                        .reference
                        .clone()
                        .ok_or_else(|| failed(PanelError::MissingReference))?;

                    let base64 = self
                        .deps
                        .retrieval
                        .fetch_image_bytes(&reference)
                        .await
                        .map_err(|err| {
                            error!(
                                reference = %reference,
                                error = %err,
                                "fetch stored image failed, panel stays loading"
                            );
                            failed(PanelError::Fetch(err))
                        })?;

                    let mime_type = session
                        .metadata
                        .as_ref()
                        .map(|metadata| metadata.mime_type.clone())
                        .unwrap_or_else(|| FALLBACK_MIME_TYPE.to_string());
                    session.image = Some(ImageSource::new(mime_type, base64));
                    follow_up_events.push(PanelEvent::StoredImageFetched);
                }
                PanelAction::ReadLocalFile => {
                    let failed =
                        |error| ActionFailure::new(error, Some(PanelEvent::LocalFileReadFailed));
                    let path = session
                        .pending_file
                        .take()
                        .ok_or_else(|| failed(PanelError::NoFileSelected))?;

                    let file = self.deps.local_files.read_file(&path).await.map_err(|err| {
                        error!(path = %path.display(), error = %err, "read local file failed");
                        failed(PanelError::ReadFile(err))
                    })?;

                    info!(
                        name = %file.metadata.name,
                        size = file.metadata.size,
                        mime_type = %file.metadata.mime_type,
                        "local file loaded"
                    );
                    session.clear_image();
                    session.image = Some(ImageSource::from_bytes(
                        file.metadata.mime_type.clone(),
                        &file.bytes,
                    ));
                    session.metadata = Some(file.metadata);
                    follow_up_events.push(PanelEvent::LocalFileRead);
                }
                PanelAction::MountWidget { replay_region } => {
                    let failed =
                        |error| ActionFailure::new(error, Some(PanelEvent::WidgetMountFailed));
                    self.destroy_widget(&mut session);

                    let image = session
                        .image
                        .clone()
                        .ok_or_else(|| failed(PanelError::NoImage))?;
                    let region = if replay_region {
                        session.region.clone()
                    } else {
                        None
                    };

                    let handle = self.deps.crop_widget.initialize(&self.options).map_err(|err| {
                        error!(error = %err, "crop widget initialization failed");
                        failed(PanelError::Widget(err))
                    })?;
                    session.widget = Some(handle);

                    if let Err(err) = self.deps.crop_widget.bind(handle, image, region).await {
                        error!(handle = %handle, error = %err, "crop widget bind failed");
                        return Err(failed(PanelError::Widget(err)));
                    }
                    info!(handle = %handle, replay_region, "crop widget mounted");
                }
                PanelAction::ApplyRegion => {
                    let failed =
                        |error| ActionFailure::new(error, Some(PanelEvent::RegionRejected));
                    let handle = session
                        .widget
                        .ok_or_else(|| failed(PanelError::NoWidget))?;
                    let region = session
                        .pending_region
                        .take()
                        .ok_or_else(|| failed(PanelError::NoRegion))?;

                    self.deps
                        .crop_widget
                        .set_region(handle, region.clone())
                        .map_err(|err| {
                            warn!(handle = %handle, error = %err, "crop region rejected");
                            failed(PanelError::Widget(err))
                        })?;
                    session.region = Some(region);
                    follow_up_events.push(PanelEvent::RegionApplied);
                }
                PanelAction::DestroyWidget => {
                    self.destroy_widget(&mut session);
                }
                PanelAction::ClearImage => {
                    session.clear_image();
                }
                PanelAction::RenderCrop => {
                    let failed = |error| ActionFailure::new(error, Some(PanelEvent::RenderFailed));
                    let handle = session
                        .widget
                        .ok_or_else(|| failed(PanelError::NoWidget))?;

                    // Region is captured before rendering so it matches the output.
                    let region = self.deps.crop_widget.region_config(handle).map_err(|err| {
                        error!(handle = %handle, error = %err, "capture crop region failed");
                        failed(PanelError::Render(err))
                    })?;
                    let encoded = self
                        .deps
                        .crop_widget
                        .render_result(handle, self.render)
                        .await
                        .map_err(|err| {
                            error!(handle = %handle, error = %err, "render crop failed");
                            failed(PanelError::Render(err))
                        })?;

                    session.rendered = Some((region, encoded));
                    follow_up_events.push(PanelEvent::RenderSucceeded);
                }
                PanelAction::EmitCropped => {
                    let (region, encoded) = session
                        .rendered
                        .take()
                        .ok_or_else(|| ActionFailure::new(PanelError::NoResult, None))?;
                    let result = SaveResult::cropped(
                        session.metadata.clone(),
                        session.original_base64(),
                        Some(region),
                        encoded.base64,
                    );
                    session.emitted = Some(result);
                    info!("panel emitted cropped image");
                }
                PanelAction::EmitRemoval => {
                    session.emitted = Some(SaveResult::removal(session.metadata.clone()));
                    info!("panel emitted image removal");
                }
            }
        }

        Ok(follow_up_events)
    }

    fn destroy_widget(&self, session: &mut EditSession) {
        if let Some(handle) = session.widget.take() {
            match self.deps.crop_widget.destroy(handle) {
                Ok(()) => debug!(handle = %handle, "crop widget destroyed"),
                Err(err) => warn!(handle = %handle, error = %err, "crop widget destroy failed"),
            }
        }
    }
}

impl Drop for UploadCropPanel {
    fn drop(&mut self) {
        let session = self.session.get_mut();
        if let Some(handle) = session.widget.take() {
            if let Err(err) = self.deps.crop_widget.destroy(handle) {
                warn!(handle = %handle, error = %err, "crop widget destroy on unload failed");
            }
        }
    }
}
