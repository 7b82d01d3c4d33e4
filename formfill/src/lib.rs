//! formfill - bulk document generation from spreadsheet rows
//!
//! This library fills form templates from tabular row data and writes the
//! resulting files to a destination directory. The heart of the crate is a
//! small, generic streaming engine: lazy sequences are pushed through
//! asynchronous stages with independent concurrency limits per stage, while
//! output order stays identical to input order.
//!
//! # High-Level API
//!
//! For most use cases, the [`run`] module provides the orchestration facade:
//!
//! ```ignore
//! use formfill::fill::TextTemplateFiller;
//! use formfill::run::{RunConfig, RunController, RunRequest};
//! use formfill::write::FsDirectoryWriter;
//!
//! let (controller, mut events) = RunController::new(
//!     TextTemplateFiller::new(),
//!     FsDirectoryWriter::new("out"),
//!     RunConfig::default(),
//! );
//!
//! let stats = controller.generate(RunRequest::new(template, rows)).await?;
//! ```

pub mod candidate;
pub mod fill;
pub mod logging;
pub mod pipeline;
pub mod run;
pub mod write;

/// Version of the formfill library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
