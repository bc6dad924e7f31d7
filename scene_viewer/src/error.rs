//! Error types for the scene viewer
//!
//! This module defines the error type shared by every subsystem:
//! GPU backend calls, resource loading, shader compilation and the
//! shader file watcher.

use std::fmt;

/// Result type for scene viewer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Scene viewer errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (GPU device, lock poisoning, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, shader, etc.)
    InvalidResource(String),

    /// Initialization failed (viewer, renderer, subsystems)
    InitializationFailed(String),

    /// A shader program failed to compile
    ShaderCompilation {
        /// Shader name as requested from the cache
        shader: String,
        /// Compiler output
        message: String,
    },

    /// Operation not valid in the current lifecycle state
    InvalidState(String),

    /// Filesystem watcher could not be set up
    Watch(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ShaderCompilation { shader, message } => {
                write!(f, "Shader compilation failed for '{}': {}", shader, message)
            }
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::Watch(msg) => write!(f, "File watch error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<notify::Error> for Error {
    fn from(error: notify::Error) -> Self {
        Error::Watch(error.to_string())
    }
}

/// Log an ERROR with file:line and build an `Error::BackendError` from the message.
///
/// ```ignore
/// return Err(viewer_err!("viewer::Scene", "node {:?} not found", key));
/// ```
#[macro_export]
macro_rules! viewer_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::log::dispatch_detailed(
            $crate::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!(),
        );
        $crate::error::Error::BackendError(message)
    }};
}

/// Early-return form of [`viewer_err!`].
#[macro_export]
macro_rules! viewer_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::viewer_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
