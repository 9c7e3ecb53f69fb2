//! # Parallax Common
//!
//! Shared error types, runtime settings, and logging configuration for the
//! scroll-driven parallax engine.
//!
//! ## Features
//!
//! - Unified error type with backtrace support
//! - Logging configuration and setup
//! - Runtime settings (sampling interval, resize debounce, class prefix)
//! - Result extension traits

use thiserror::Error;

pub mod logging;
pub mod settings;

pub use logging::{init_logging, LogConfig, LogFormat};
pub use settings::ParallaxSettings;

/// Unified error type for the parallax workspace.
#[derive(Error, Debug)]
pub enum ParallaxError {
    /// Segment or settings configuration errors.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A start/end/duration value could not be turned into pixels.
    #[error("Resolution error: {message}")]
    Resolution {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A property value pair could not be interpolated.
    #[error("Interpolation error: {message}")]
    Interpolation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Scroll broadcaster errors.
    #[error("Scroll error: {message}")]
    Scroll {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error (unexpected).
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        backtrace: Option<backtrace::Backtrace>,
    },
}

impl ParallaxError {
    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source.
    pub fn config_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a resolution error with source.
    pub fn resolution_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Resolution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an interpolation error with source.
    pub fn interpolation_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Interpolation {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a scroll error.
    pub fn scroll(message: impl Into<String>) -> Self {
        Self::Scroll {
            message: message.into(),
            source: None,
        }
    }

    /// Create an internal error with backtrace.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }

    /// Whether the condition may clear up on the next scroll or resize pass
    /// (e.g. an anchor element that has not been mounted yet).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ParallaxError::Resolution { .. } | ParallaxError::NotFound(_)
        )
    }

    /// Get the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            ParallaxError::Config { .. } => "config",
            ParallaxError::Resolution { .. } => "resolution",
            ParallaxError::Interpolation { .. } => "interpolation",
            ParallaxError::Scroll { .. } => "scroll",
            ParallaxError::Io(_) => "io",
            ParallaxError::Json(_) => "json",
            ParallaxError::NotFound(_) => "not_found",
            ParallaxError::InvalidArgument(_) => "invalid_argument",
            ParallaxError::Internal { .. } => "internal",
        }
    }
}

/// Result type alias for parallax operations.
pub type Result<T> = std::result::Result<T, ParallaxError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Convert to a different error type.
    fn map_err_to<E: Into<ParallaxError>>(self, f: impl FnOnce() -> E) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| ParallaxError::Internal {
            message: format!("{}: {}", message.into(), e),
            backtrace: Some(backtrace::Backtrace::new()),
        })
    }

    fn map_err_to<E2: Into<ParallaxError>>(self, f: impl FnOnce() -> E2) -> Result<T> {
        self.map_err(|_| f().into())
    }
}

/// Extension trait for Option.
pub trait OptionExt<T> {
    /// Convert None to a NotFound error.
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self, resource: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| ParallaxError::NotFound(resource.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(ParallaxError::config("test").category(), "config");
        assert_eq!(ParallaxError::scroll("test").category(), "scroll");
        assert_eq!(
            ParallaxError::NotFound("#hero".into()).category(),
            "not_found"
        );
    }

    #[test]
    fn test_transient() {
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(ParallaxError::resolution_with_source("anchor", missing).is_transient());
        assert!(ParallaxError::NotFound(".card".into()).is_transient());
        assert!(!ParallaxError::config("bad easing").is_transient());
        assert!(!ParallaxError::internal("oops").is_transient());
    }

    #[test]
    fn test_json_error_converts() {
        let err: ParallaxError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert_eq!(err.category(), "json");
    }

    #[test]
    fn test_option_ext() {
        let some: Option<i32> = Some(42);
        assert_eq!(some.ok_or_not_found("test").unwrap(), 42);

        let none: Option<i32> = None;
        assert!(matches!(
            none.ok_or_not_found("test"),
            Err(ParallaxError::NotFound(_))
        ));
    }

    #[test]
    fn test_result_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        let err = res.context("reading segments").unwrap_err();
        assert!(err.to_string().contains("reading segments: disk"));
    }
}
