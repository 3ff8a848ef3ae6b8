//! ID type wrappers for type safety.

mod id_macro;

use id_macro::impl_id;
use serde::{Deserialize, Serialize};

/// Identifier of the parent record an image is attached to.
///
/// 图片所属记录的标识。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

/// Opaque identifier of a stored binary image (e.g. a document id).
///
/// 已存储图片的不透明标识（例如文档 id）。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl_id!(RecordId, ImageReference);
