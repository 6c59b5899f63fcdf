//! Error taxonomy for the EPOCH core.
//!
//! Construction-time errors (`InvalidSiteData`, `InvalidParamRange`)
//! propagate straight out to the caller. Per-scenario errors
//! (`InvalidTaskData`, `NumericFailure`) are caught locally by the worker
//! loop, recorded, and never abort the pool. `Io` is fatal for exhaustive
//! CSV logging but non-fatal for the core search itself.

use thiserror::Error;

/// The five error kinds produced anywhere in the core.
#[derive(Debug, Error)]
pub enum EpochError {
    /// Structural or length mismatch detected while validating `SiteData`.
    #[error("invalid site data at `{field}`: {message}")]
    InvalidSiteData { field: String, message: String },

    /// A scenario references an out-of-range index, an unreachable HP send
    /// temperature, or omits a component required by another choice.
    #[error("invalid task data at `{field}`: {message}")]
    InvalidTaskData { field: String, message: String },

    /// A parameter-grid axis specification is malformed.
    #[error("invalid parameter range for axis `{axis}`: {message}")]
    InvalidParamRange { axis: String, message: String },

    /// A metric computed to NaN or infinite where a finite value was required.
    #[error("numeric failure computing `{metric}`: produced {value}")]
    NumericFailure { metric: String, value: f64 },

    /// A CSV write failed.
    #[error("csv I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the core.
pub type EpochResult<T> = Result<T, EpochError>;
