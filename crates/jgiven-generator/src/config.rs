//! Configuration objects consumed by the report generators.

use std::path::PathBuf;

use crate::Format;

/// HTML-specific generator options.
///
/// `None` leaves the generator's built-in default in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Local path of a stylesheet appended to the generated report.
    pub custom_css: Option<PathBuf>,
    /// Local path of a script appended to the generated report.
    pub custom_js: Option<PathBuf>,
    /// Report title.
    pub title: Option<String>,
}

/// Per-format options. The variant determines the generator that consumes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatOptions {
    /// Options for the HTML generator.
    Html(HtmlOptions),
    /// The plain text generator has no options.
    Text,
    /// The AsciiDoc generator has no options.
    AsciiDoc,
}

impl FormatOptions {
    /// Default options for `format`.
    #[must_use]
    pub fn defaults(format: Format) -> Self {
        match format {
            Format::Html => Self::Html(HtmlOptions::default()),
            Format::Text => Self::Text,
            Format::AsciiDoc => Self::AsciiDoc,
        }
    }

    /// The format these options belong to.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Html(_) => Format::Html,
            Self::Text => Format::Text,
            Self::AsciiDoc => Format::AsciiDoc,
        }
    }
}

/// Everything a generator needs to render one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory containing the JSON scenario files.
    pub source_dir: PathBuf,
    /// Directory the report is written to.
    pub target_dir: PathBuf,
    /// Omit scenarios without steps from the report.
    pub exclude_empty_scenarios: bool,
    /// Format-specific options.
    pub options: FormatOptions,
}

impl GeneratorConfig {
    /// Creates a configuration with empty source and target directories.
    #[must_use]
    pub const fn new(options: FormatOptions) -> Self {
        Self {
            source_dir: PathBuf::new(),
            target_dir: PathBuf::new(),
            exclude_empty_scenarios: false,
            options,
        }
    }

    /// Sets the source directory.
    #[must_use]
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.source_dir = dir.into();
        self
    }

    /// Sets the target directory.
    #[must_use]
    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_dir = dir.into();
        self
    }

    /// Sets whether empty scenarios are excluded.
    #[must_use]
    pub const fn with_exclude_empty_scenarios(mut self, exclude: bool) -> Self {
        self.exclude_empty_scenarios = exclude;
        self
    }

    /// The format this configuration targets.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.options.format()
    }

    /// HTML options, if this is an HTML configuration.
    #[must_use]
    pub const fn html_options(&self) -> Option<&HtmlOptions> {
        match &self.options {
            FormatOptions::Html(options) => Some(options),
            FormatOptions::Text | FormatOptions::AsciiDoc => None,
        }
    }
}
