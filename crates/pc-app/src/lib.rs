//! ProfileCrop Application Orchestration Layer
//!
//! This crate contains the use cases that drive the capture → crop → encode →
//! persist workflow: the upload/crop panel, the modal host around it and the
//! profile image display that persists the result.

pub mod deps;
pub mod usecases;

pub use deps::PanelDeps;
pub use usecases::{
    DisplaySettings, EditOutcome, ModalError, ModalParams, ModalResolution, PanelError, PanelInit,
    ProfileImageDisplay, ProfileImageError, ProfileImageView, SaveProfileImage,
    SaveProfileImageError, UploadCropPanel, UploadModalHost,
};
