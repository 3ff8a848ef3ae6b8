//! # pc-infra
//!
//! Infrastructure adapters for the ProfileCrop ports: the `image` based crop
//! widget, the filesystem image store, the local file reader and the record
//! refresh broadcaster.

pub mod crop;
pub mod fs;
pub mod refresh;

pub use crop::ImageCropWidget;
pub use fs::{FsLocalFileReader, FsProfileImageStore};
pub use refresh::BroadcastRecordRefresh;
