//! Business logic use cases
//!
//! ProfileImageDisplay
//!         ↓ open
//! UploadModalHost
//!         ↓ mount
//! UploadCropPanel  → CropWidgetPort
//!         ↑ SaveResult
//! ProfileImageDisplay → SaveProfileImage → persistence + record refresh

pub mod profile_image;
pub mod upload_crop_panel;
pub mod upload_modal;

pub use profile_image::{
    DisplaySettings, EditOutcome, ProfileImageDisplay, ProfileImageError, ProfileImageView, SaveProfileImage,
    SaveProfileImageError,
};
pub use upload_crop_panel::{PanelError, PanelInit, UploadCropPanel};
pub use upload_modal::{ModalError, ModalParams, ModalResolution, UploadModalHost};
