//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `crudsmith-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: staging tree operations
//!   - `TemplateRenderer`: one dialect's source projections
//!   - `Archiver`: compresses a staging tree into one file
//!   - `PipelineObserver`: progress reporting
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{ArchiveSummary, Archiver, Filesystem, PipelineObserver, TemplateRenderer};

#[cfg(test)]
pub use output::{MockArchiver, MockFilesystem, MockPipelineObserver, MockTemplateRenderer};
