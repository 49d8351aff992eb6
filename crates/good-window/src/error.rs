//! Error types for the chrome crate.

use thiserror::Error;

use crate::native::NativeWindowError;

/// Errors surfaced by the chrome layer.
///
/// Duplicate or re-entrant lifecycle calls, stale timers and a vetoed close
/// are not errors; they are silent no-ops.
#[derive(Error, Debug)]
pub enum ChromeError {
    /// The native window could not be created. No window instance exists.
    #[error("failed to create native window: {0}")]
    WindowCreation(#[from] NativeWindowError),

    /// A saved geometry blob was rejected; current geometry is untouched.
    #[error("invalid geometry blob: {0}")]
    InvalidGeometryBlob(#[from] GeometryBlobError),

    /// The chrome configuration could not be parsed.
    #[error("invalid chrome configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// The chrome configuration file could not be read.
    #[error("failed to read chrome configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a geometry blob could not be restored.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryBlobError {
    /// The blob does not have the fixed encoded length.
    #[error("expected {expected} bytes, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    /// A state flag byte is neither 0 nor 1.
    #[error("flag byte at offset {offset} has invalid value {value}")]
    InvalidFlag { offset: usize, value: u8 },

    /// The encoded size has a non-positive dimension.
    #[error("invalid size {width}x{height}")]
    InvalidSize { width: i32, height: i32 },
}

/// Result type for chrome operations.
pub type ChromeResult<T> = Result<T, ChromeError>;
