//! Port interfaces for the application layer
//!
//! Ports define the contract between the use cases and infrastructure
//! implementations (Hexagonal Architecture). The crop widget, the image
//! store, the local file reader and the record refresh notifier are all
//! injected through these traits so they can be substituted in tests.

mod crop_widget;
pub mod errors;
mod image_store;
mod local_file;
mod record_refresh;

pub use crop_widget::CropWidgetPort;
pub use errors::CropWidgetError;
pub use image_store::{ImagePersistencePort, ImageRetrievalPort, RecordFieldsPort};
pub use local_file::{LocalFile, LocalFilePort};
pub use record_refresh::RecordRefreshPort;
