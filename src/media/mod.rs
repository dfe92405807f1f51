//! Range-aware delivery of media files out of the content store.

pub mod handler;
pub mod path;
pub mod range;
pub mod store;

pub use handler::{
    CACHE_CONTROL, CHUNK_SIZE, MediaStream, StreamHandler, StreamResponse, content_type_for,
};
pub use path::{LogicalPath, PathError};
pub use range::ByteRange;
pub use store::{ContentStore, ResolvedFile};
