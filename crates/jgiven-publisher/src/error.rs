//! Error types for publishing JGiven reports.
//!
//! Generation never recovers locally. Failures keep their kind on the way out:
//! I/O failures stay [`PublishError::Io`], interruptions stay
//! [`PublishError::Interrupted`], and anything else raised by a generator is
//! wrapped in [`PublishError::Runtime`] with the original as its source.

use std::path::PathBuf;

use jgiven_generator::GeneratorError;

/// A specialized `Result` type for publisher operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Errors that can occur while staging results or generating reports.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    // ========================================================================
    // Build-time failures
    // ========================================================================
    /// Copying results or assets, or writing a report, failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The build was cancelled while the step was running.
    #[error("JGiven report generation was interrupted")]
    Interrupted,

    /// A report generator failed for any reason other than I/O or interruption.
    #[error("JGiven report generation failed: {source}")]
    Runtime {
        /// The original failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ========================================================================
    // Configuration errors
    // ========================================================================
    /// Invalid JSON in the configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your jgiven.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    /// The results pattern is not a valid glob.
    #[error("Invalid results pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why the pattern was rejected.
        message: String,
    },

    /// A report type tag did not name a known report variant.
    #[error("Unsupported report format '{0}'")]
    UnsupportedFormat(String),
}

impl PublishError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `InvalidPattern` error.
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Wraps an arbitrary failure as a `Runtime` error.
    #[must_use]
    pub fn runtime(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Runtime {
            source: source.into(),
        }
    }

    /// Returns `true` if the step stopped because the build was cancelled.
    #[must_use]
    pub const fn is_interruption(&self) -> bool {
        matches!(self, Self::Interrupted)
    }

    /// Returns `true` if this error comes from the configuration rather than the build.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParseError { .. }
                | Self::ConfigValidationError { .. }
                | Self::InvalidPattern { .. }
                | Self::UnsupportedFormat(_)
        )
    }
}

impl From<GeneratorError> for PublishError {
    fn from(err: GeneratorError) -> Self {
        match err {
            GeneratorError::Io(e) => Self::Io(e),
            GeneratorError::Interrupted => Self::Interrupted,
            other => Self::runtime(other),
        }
    }
}
