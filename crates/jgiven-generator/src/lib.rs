//! JGiven Report Generator Boundary
//!
//! This crate models the external JGiven report generators as seen from the
//! publisher: the closed set of output formats, the configuration object a
//! generator consumes, and the [`ReportGenerator`] trait that renders a report.
//!
//! The rendering itself happens outside this process. [`CommandGenerator`]
//! invokes the JGiven report tool on the JVM; other implementations can be
//! substituted through [`GeneratorFactory`].
//!
//! # Example
//!
//! ```rust
//! use jgiven_generator::{Format, FormatOptions, GeneratorConfig, HtmlOptions};
//!
//! let config = GeneratorConfig::new(FormatOptions::Html(HtmlOptions {
//!     title: Some("Nightly".to_string()),
//!     ..Default::default()
//! }))
//! .with_source_dir("build/jgiven-reports/json")
//! .with_target_dir("build/jgiven-reports/html")
//! .with_exclude_empty_scenarios(true);
//!
//! assert_eq!(config.format(), Format::Html);
//! ```

mod command;
mod config;

pub use command::{CommandGenerator, CommandGeneratorFactory, GeneratorSettings};
pub use config::{FormatOptions, GeneratorConfig, HtmlOptions};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors raised by a report generator.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Reading the sources or writing the report failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The generator was stopped before it finished.
    #[error("report generation was interrupted")]
    Interrupted,

    /// The generator ran but reported a failure.
    #[error("{format} report generator failed: {message}")]
    Failed {
        /// Format of the failing generator.
        format: Format,
        /// Description of the failure.
        message: String,
    },

    /// A format name did not match any known format.
    #[error("unknown report format '{0}': expected one of 'html', 'text', 'asciidoc'")]
    UnknownFormat(String),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;

// ============================================================================
// Format
// ============================================================================

/// Output formats supported by the JGiven report generators.
///
/// The legacy `HTML5` name is accepted when parsing and resolves to [`Format::Html`];
/// both names have always been rendered by the same generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Interactive HTML report.
    Html,
    /// Plain text report.
    Text,
    /// AsciiDoc report.
    AsciiDoc,
}

impl Format {
    /// All formats in their canonical order.
    pub const ALL: [Self; 3] = [Self::Html, Self::Text, Self::AsciiDoc];

    /// Upper-case format name, e.g. `HTML`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Text => "TEXT",
            Self::AsciiDoc => "ASCIIDOC",
        }
    }

    /// Directory name used for reports of this format: the lower-cased format name.
    #[must_use]
    pub const fn directory_name(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "text",
            Self::AsciiDoc => "asciidoc",
        }
    }

    /// Value passed to the report tool's `--format` option.
    #[must_use]
    pub const fn tool_name(self) -> &'static str {
        match self {
            Self::Html => "html5",
            Self::Text => "text",
            Self::AsciiDoc => "asciidoc",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = GeneratorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" | "html5" => Ok(Self::Html),
            "text" | "plaintext" => Ok(Self::Text),
            "asciidoc" => Ok(Self::AsciiDoc),
            _ => Err(GeneratorError::UnknownFormat(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for Format {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for Format {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.directory_name())
    }
}

// ============================================================================
// Generator traits
// ============================================================================

/// Renders one report from staged JSON results.
pub trait ReportGenerator: Send {
    /// The format this generator produces.
    fn format(&self) -> Format;

    /// Renders the report described by `config`.
    ///
    /// Reads scenarios from `config.source_dir` and writes the report below
    /// `config.target_dir`, overwriting anything already there.
    fn generate(&self, config: &GeneratorConfig) -> Result<()>;
}

/// Selects the generator implementation for a format.
///
/// The mapping is total: every [`Format`] has a generator.
pub trait GeneratorFactory: Send + Sync {
    /// Creates the generator for `format`.
    fn create(&self, format: Format) -> Box<dyn ReportGenerator>;
}
