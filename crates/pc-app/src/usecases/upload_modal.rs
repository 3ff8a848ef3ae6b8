//! Upload modal host: mounts one panel and resolves exactly once.

use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info, warn};

use pc_core::panel::PanelState;
use pc_core::{
    ImageMetadata, ImageReference, ModalOutcome, RegionConfig, RenderRequest, SaveResult,
    WidgetOptions,
};

use crate::deps::PanelDeps;
use crate::usecases::upload_crop_panel::{PanelError, PanelInit, UploadCropPanel};

/// Initial parameters handed to the modal by its opener.
#[derive(Debug, Clone, Default)]
pub struct ModalParams {
    pub label: String,
    pub reference: Option<ImageReference>,
    pub widget_options: WidgetOptions,
    pub metadata: Option<ImageMetadata>,
    pub prior_region: Option<RegionConfig>,
    pub render: RenderRequest,
}

#[derive(Debug, thiserror::Error)]
pub enum ModalError {
    #[error(transparent)]
    Panel(#[from] PanelError),
    #[error("modal already resolved")]
    AlreadyResolved,
}

/// Caller side of the modal: awaits the single outcome.
///
/// A host dropped without resolving reads as [`ModalOutcome::Cancelled`].
#[derive(Debug)]
pub struct ModalResolution(oneshot::Receiver<ModalOutcome>);

impl ModalResolution {
    pub async fn wait(self) -> ModalOutcome {
        match self.0.await {
            Ok(outcome) => outcome,
            Err(_) => {
                debug!("modal dropped without resolution, treating as cancelled");
                ModalOutcome::Cancelled
            }
        }
    }
}

/// Hosts one upload/crop panel.
///
/// 上传弹窗宿主：承载一个面板，结果只交付一次。
pub struct UploadModalHost {
    label: String,
    panel: UploadCropPanel,
    resolver: Mutex<Option<oneshot::Sender<ModalOutcome>>>,
}

impl UploadModalHost {
    pub fn new(params: ModalParams, deps: PanelDeps) -> (Self, ModalResolution) {
        let (tx, rx) = oneshot::channel();
        let panel = UploadCropPanel::new(
            deps,
            PanelInit {
                reference: params.reference,
                metadata: params.metadata,
                prior_region: params.prior_region,
                widget_options: params.widget_options,
                render: params.render,
            },
        );

        let host = Self {
            label: params.label,
            panel,
            resolver: Mutex::new(Some(tx)),
        };
        (host, ModalResolution(rx))
    }

    /// Mount the hosted panel.
    ///
    /// A failed load is returned but leaves the modal open: the panel stays
    /// stalled and still accepts a local file or a cancel.
    #[tracing::instrument(name = "usecase.upload_modal.mount", skip(self), fields(label = %self.label))]
    pub async fn mount(&self) -> Result<PanelState, ModalError> {
        Ok(self.panel.open().await?)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn panel(&self) -> &UploadCropPanel {
        &self.panel
    }

    /// Save through the panel and resolve with its result.
    ///
    /// A failed render keeps the modal open.
    pub async fn save(&self) -> Result<SaveResult, ModalError> {
        let result = self.panel.save().await?;
        self.resolve(ModalOutcome::Saved(result.clone())).await?;
        Ok(result)
    }

    /// Close the panel and resolve as cancelled.
    pub async fn cancel(&self) -> Result<(), ModalError> {
        self.panel.cancel().await?;
        self.resolve(ModalOutcome::Cancelled).await
    }

    async fn resolve(&self, outcome: ModalOutcome) -> Result<(), ModalError> {
        let sender = self
            .resolver
            .lock()
            .await
            .take()
            .ok_or(ModalError::AlreadyResolved)?;

        info!(cancelled = outcome.is_cancelled(), "upload modal resolved");
        if sender.send(outcome).is_err() {
            warn!("modal resolution has no listener");
        }
        Ok(())
    }
}
