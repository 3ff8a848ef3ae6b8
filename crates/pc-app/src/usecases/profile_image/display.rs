use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};

use pc_core::ports::RecordFieldsPort;
use pc_core::{
    AppConfig, ImageMetadata, ImageReference, ModalOutcome, RecordId, RenderRequest, SaveIntent,
    WidgetOptions,
};

use super::save_profile_image::{SaveProfileImage, SaveProfileImageError};
use crate::deps::PanelDeps;
use crate::usecases::upload_modal::{ModalParams, ModalResolution, UploadModalHost};

#[derive(Debug, thiserror::Error)]
pub enum ProfileImageError {
    #[error("load record image fields failed: {0}")]
    Fields(#[source] anyhow::Error),
    #[error(transparent)]
    Save(#[from] SaveProfileImageError),
}

/// Display settings taken from configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySettings {
    pub download_url_template: String,
    pub modal_label: String,
    pub widget_options: WidgetOptions,
    pub render: RenderRequest,
}

impl DisplaySettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            download_url_template: config.download_url_template_or_default().to_string(),
            modal_label: config.modal_label_or_default().to_string(),
            widget_options: config.widget,
            render: config.render,
        }
    }
}

/// What the record page shows for the profile image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageView {
    pub has_image: bool,
    /// Download URL of the stored image; `None` shows the placeholder.
    pub image_src: Option<String>,
    pub metadata: Option<ImageMetadata>,
    pub reference: Option<ImageReference>,
}

/// How an edit ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Cancelled,
    Saved(SaveIntent),
}

/// Clears the busy flag when dropped, whatever the save outcome.
struct BusyGuard(Arc<AtomicBool>);

impl BusyGuard {
    fn set(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(Arc::clone(flag))
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Profile image shown on a record page.
///
/// Reads the record's stored fields, opens the upload modal and persists
/// its result.
///
/// 记录页面上的头像展示：读取字段、打开上传弹窗并保存结果。
pub struct ProfileImageDisplay {
    record_id: RecordId,
    fields: Arc<dyn RecordFieldsPort>,
    save_profile_image: Arc<SaveProfileImage>,
    panel_deps: PanelDeps,
    settings: DisplaySettings,
    busy: Arc<AtomicBool>,
}

impl ProfileImageDisplay {
    pub fn new(
        record_id: RecordId,
        fields: Arc<dyn RecordFieldsPort>,
        save_profile_image: Arc<SaveProfileImage>,
        panel_deps: PanelDeps,
        settings: DisplaySettings,
    ) -> Self {
        Self {
            record_id,
            fields,
            save_profile_image,
            panel_deps,
            settings,
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    /// Spinner state: set while a result is being persisted.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    #[tracing::instrument(
        name = "usecase.profile_image_display.load_view",
        skip(self),
        fields(record_id = %self.record_id)
    )]
    pub async fn load_view(&self) -> Result<ProfileImageView, ProfileImageError> {
        let fields = self
            .fields
            .load_fields(&self.record_id)
            .await
            .map_err(ProfileImageError::Fields)?;

        Ok(ProfileImageView {
            has_image: fields.has_image(),
            image_src: fields.image_src(&self.settings.download_url_template),
            metadata: fields.metadata(),
            reference: fields.image_reference,
        })
    }

    /// Open the upload modal on the record's current image.
    ///
    /// A failed image load is logged; the modal stays open so a local file
    /// can still be chosen.
    pub async fn open_editor(
        &self,
    ) -> Result<(UploadModalHost, ModalResolution), ProfileImageError> {
        let view = self.load_view().await?;

        let (host, resolution) = UploadModalHost::new(
            ModalParams {
                label: self.settings.modal_label.clone(),
                reference: view.reference,
                widget_options: self.settings.widget_options,
                metadata: view.metadata,
                prior_region: None,
                render: self.settings.render,
            },
            self.panel_deps.clone(),
        );

        if let Err(err) = host.mount().await {
            warn!(record_id = %self.record_id, error = %err, "upload modal opened without stored image");
        }
        Ok((host, resolution))
    }

    /// Await the modal and persist a saved result.
    ///
    /// The busy flag is set for the duration of the save and cleared on every
    /// path.
    #[tracing::instrument(
        name = "usecase.profile_image_display.finish_edit",
        skip(self, resolution),
        fields(record_id = %self.record_id)
    )]
    pub async fn finish_edit(
        &self,
        resolution: ModalResolution,
    ) -> Result<EditOutcome, ProfileImageError> {
        let result = match resolution.wait().await {
            ModalOutcome::Cancelled => {
                info!("profile image edit cancelled");
                return Ok(EditOutcome::Cancelled);
            }
            ModalOutcome::Saved(result) => result,
        };

        let _busy = BusyGuard::set(&self.busy);
        let intent = self
            .save_profile_image
            .execute(&self.record_id, &result)
            .await
            .map_err(|err| {
                error!(error = %err, "persist profile image failed");
                err
            })?;

        Ok(EditOutcome::Saved(intent))
    }
}
