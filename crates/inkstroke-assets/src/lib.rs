//! Asset reading and one-shot background loading.
//!
//! Bytes come from a [`BytesReader`] (the filesystem or memory); decoding runs
//! on a [`TaskPool`] and the result is collected by polling an [`AssetTask`]
//! from the frame loop.

pub mod error;
pub mod io;
pub mod task;
pub mod task_pool;

pub use error::{AssetError, AssetResult};
pub use io::{BytesFuture, BytesReader, FileReader, MemoryReader};
pub use task::AssetTask;
pub use task_pool::TaskPool;
