//! # pc-core
//!
//! Core domain models and business rules for the ProfileCrop workflow.
//!
//! This crate contains pure domain logic without any infrastructure dependencies:
//! image metadata, crop region configuration, the upload/crop panel state machine
//! and the ports implemented by the infrastructure layer.

pub mod config;
pub mod ids;
pub mod panel;
pub mod ports;
pub mod profile_image;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::{ImageReference, RecordId};
pub use panel::{Affordances, PanelAction, PanelEvent, PanelState, PanelStateMachine, ReadyState};
pub use profile_image::{
    EncodedImage, ImageEncoding, ImageMetadata, ImageSource, ModalOutcome, RegionConfig,
    RenderRequest, SaveIntent, SaveResult, StoredImageFields, ViewportShape, WidgetHandle,
    WidgetOptions,
};
