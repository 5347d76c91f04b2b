//! Extractors that reject with [`AppError`](crate::errors::AppError), so malformed input
//! gets the same JSON error body as every other failure.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::{UuidPath, UuidPathPair};
pub use validated_json::ValidatedJson;
