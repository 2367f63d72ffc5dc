//! Error types emitted by the waymark CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use waymark_core::{AcquireError, SearchError, SinkError};
use waymark_data::ProviderBuildError;

/// Errors emitted by the waymark CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A numeric option must be greater than zero.
    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected or read.
    #[error("failed to read {field} path {path:?}: {source}")]
    ReadSource {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The output directory could not be created or opened.
    #[error("failed to prepare output directory {path:?}: {source}")]
    OpenOutput {
        path: Utf8PathBuf,
        #[source]
        source: SinkError,
    },
    /// Constructing the HTTP search client failed.
    #[error("failed to build search client for {base_url:?}: {source}")]
    BuildClient {
        base_url: String,
        #[source]
        source: ProviderBuildError,
    },
    /// The search failed.
    #[error("search failed: {0}")]
    Search(#[source] SearchError),
    /// The batch acquisition aborted.
    #[error("acquisition aborted: {0}")]
    Acquire(#[source] AcquireError),
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
