//! Infrastructure adapters for Crudsmith.
//!
//! This crate implements the ports defined in `crudsmith-core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod archive;
pub mod filesystem;
pub mod observer;
pub mod renderer;

// Re-export commonly used adapters
pub use archive::ZipArchiver;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use observer::{RecordingObserver, TracingObserver};
pub use renderer::{JavaScriptRenderer, TypeScriptRenderer, renderer_for};
