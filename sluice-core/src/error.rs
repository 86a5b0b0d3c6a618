// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Error types for the sluice stream operators.
//!
//! Errors travel in-band as [`StreamItem::Error`](crate::StreamItem::Error) and
//! terminate the stream that carries them.
//!
//! # Examples
//!
//! ```
//! use sluice_core::{Result, SluiceError};
//!
//! fn build_inner(id: u32) -> Result<u32> {
//!     if id == 0 {
//!         return Err(SluiceError::projection_error("id 0 has no inner stream"));
//!     }
//!     Ok(id)
//! }
//!
//! assert!(build_inner(0).is_err());
//! ```

/// Root error type for all sluice operations.
#[derive(Debug, thiserror::Error)]
pub enum SluiceError {
    /// Stream processing encountered an error.
    ///
    /// General error for failures signalled by a source or an inner stream.
    #[error("Stream processing error: {context}")]
    StreamProcessingError {
        /// Description of what went wrong
        context: String,
    },

    /// The projection function could not build an inner stream for an event.
    #[error("Projection error: {context}")]
    ProjectionError {
        /// Description of the failed projection
        context: String,
    },

    /// Custom error from user code.
    ///
    /// Wraps errors produced by user-provided functions and callbacks.
    #[error("User error: {0}")]
    UserError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SluiceError {
    /// Create a stream processing error with the given context
    pub fn stream_error(context: impl Into<String>) -> Self {
        Self::StreamProcessingError {
            context: context.into(),
        }
    }

    /// Create a projection error with the given context
    pub fn projection_error(context: impl Into<String>) -> Self {
        Self::ProjectionError {
            context: context.into(),
        }
    }

    /// Wrap a user error
    pub fn user_error(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::UserError(Box::new(error))
    }

    /// Returns `true` if the error was raised while building an inner stream.
    #[must_use]
    pub const fn is_projection_error(&self) -> bool {
        matches!(self, Self::ProjectionError { .. })
    }
}

/// Specialized Result type for sluice operations.
pub type Result<T> = std::result::Result<T, SluiceError>;

/// Extension trait for converting foreign errors into [`SluiceError`].
pub trait IntoSluiceError {
    /// Convert this error into a `SluiceError` with additional context
    fn into_sluice_error(self, context: &str) -> SluiceError;

    /// Convert this error into a `SluiceError` without additional context
    fn into_sluice(self) -> SluiceError
    where
        Self: Sized,
    {
        self.into_sluice_error("")
    }
}

impl<E: std::error::Error + Send + Sync + 'static> IntoSluiceError for E {
    fn into_sluice_error(self, context: &str) -> SluiceError {
        if context.is_empty() {
            SluiceError::user_error(self)
        } else {
            SluiceError::stream_error(format!("{context}: {self}"))
        }
    }
}

/// Helper trait for adding context to `Result`s.
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// # Errors
    /// Returns `Err(SluiceError)` if the underlying result is `Err`.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context to an error using a closure (lazy evaluation)
    ///
    /// # Errors
    /// Returns `Err(SluiceError)` if the underlying result is `Err`.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<SluiceError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.with_context(|| context.into())
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| match e.into() {
            SluiceError::UserError(inner) => SluiceError::StreamProcessingError {
                context: format!("{}: {inner}", f()),
            },
            other => other,
        })
    }
}

impl Clone for SluiceError {
    fn clone(&self) -> Self {
        match self {
            Self::StreamProcessingError { context } => Self::StreamProcessingError {
                context: context.clone(),
            },
            Self::ProjectionError { context } => Self::ProjectionError {
                context: context.clone(),
            },
            // Boxed user errors cannot be cloned, keep the message
            Self::UserError(e) => Self::StreamProcessingError {
                context: format!("User error: {e}"),
            },
        }
    }
}
