//! Upload/crop panel: one interactive editing session.

mod context;
mod orchestrator;
mod session;

pub use context::PanelContext;
pub use orchestrator::{PanelError, PanelInit, UploadCropPanel};
pub use session::EditSession;
