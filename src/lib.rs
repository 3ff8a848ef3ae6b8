//! ProfileCrop: upload, crop and persist a record's profile image.
//!
//! This crate only assembles the workspace crates:
//! - `pc-core`: domain types, panel state machine, ports
//! - `pc-app`: use cases (panel, modal host, display)
//! - `pc-infra`: adapters (crop widget, filesystem store, refresh bus)

pub mod bootstrap;

pub use bootstrap::{init_tracing_subscriber, load_config, wire_dependencies, ProfileCropRuntime};
