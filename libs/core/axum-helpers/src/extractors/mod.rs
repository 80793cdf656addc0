//! Custom extractors that reject with [`AppError`](crate::errors::AppError)
//! so every failure renders as the standard JSON error body.

pub mod id_path;
pub mod preconditions;
pub mod validated_json;

pub use id_path::IdPath;
pub use preconditions::{IfMatch, IfNoneMatch};
pub use validated_json::{ValidatedJson, ValidatedQuery};
