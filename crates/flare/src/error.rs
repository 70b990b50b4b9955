//! # FLARE Error Types
//!
//! Invalid input never reaches here: it is corrected and logged where it
//! happens. These are the failures a caller can actually act on.

use std::path::PathBuf;

use flare_rendering::SurfaceError;
use thiserror::Error;

/// Errors surfaced by the FLARE orchestrator.
#[derive(Error, Debug)]
pub enum FlareError {
    /// Reading a configuration file failed.
    #[error("failed to read config {path}: {source}")]
    ConfigIo {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration text is not valid TOML for [`FlareConfig`](crate::FlareConfig).
    #[error("invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration could not be serialized.
    #[error("configuration serialization failed: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The render surface failed; the manager is now in fallback mode.
    #[error("render surface failed: {0}")]
    Surface(#[from] SurfaceError),
}

/// Result type for FLARE operations.
pub type FlareResult<T> = Result<T, FlareError>;
