//! Loading the job configuration.
//!
//! The configuration is a JSON document with the step settings at the top
//! level, nested report blocks, and an optional `generator` block describing
//! how to launch the JGiven report tool:
//!
//! ```json
//! {
//!   "jgivenResults": "**/json/*.json",
//!   "excludeEmptyScenarios": true,
//!   "reportConfigs": [
//!     { "type": "html", "customCssFile": "ci/jgiven.css", "title": "Acceptance Tests" },
//!     { "type": "text" }
//!   ],
//!   "generator": { "classpath": ["lib/*"] }
//! }
//! ```
//!
//! Report type tags written by older versions are rewritten before the
//! document is deserialized, see [`LEGACY_TYPE_ALIASES`].

use std::path::Path;

use jgiven_generator::GeneratorSettings;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PublishError, Result};
use crate::locator::ResultLocator;
use crate::step::JgivenReportGenerator;

/// The default config file name.
pub const CONFIG_FILE_NAME: &str = "jgiven.json";

/// Legacy report type tags and the tags that replace them.
pub const LEGACY_TYPE_ALIASES: &[(&str, &str)] = &[
    (
        "org.jenkinsci.plugins.jgiven.JgivenReportGenerator$Html5ReportConfig",
        "html",
    ),
    (
        "org.jenkinsci.plugins.jgiven.JgivenReportGenerator$HtmlReportConfig",
        "html",
    ),
    (
        "org.jenkinsci.plugins.jgiven.JgivenReportGenerator$TextReportConfig",
        "text",
    ),
    (
        "org.jenkinsci.plugins.jgiven.JgivenReportGenerator$AsciiDocReportConfig",
        "asciidoc",
    ),
    ("Html5ReportConfig", "html"),
    ("HtmlReportConfig", "html"),
    ("TextReportConfig", "text"),
    ("AsciiDocReportConfig", "asciidoc"),
    ("html5", "html"),
];

/// Tags accepted after alias resolution.
const KNOWN_TYPES: &[&str] = &["html", "text", "asciidoc"];

/// Complete configuration of a publishing run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Build step settings.
    #[serde(flatten)]
    pub step: JgivenReportGenerator,

    /// How to launch the JGiven report tool.
    #[serde(default)]
    pub generator: GeneratorSettings,
}

impl Config {
    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::ConfigParseError` if the file cannot be read,
    /// is not valid JSON, or names an unknown report type.
    /// Returns `PublishError::ConfigValidationError` or
    /// `PublishError::InvalidPattern` if the values are invalid.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(PublishError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config = Self::from_json(&contents).map_err(|e| match e {
            PublishError::ConfigParseError { message, .. } => PublishError::config_parse(path, message),
            other => other,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a configuration document, resolving legacy type tags.
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut document: Value = serde_json::from_str(contents)
            .map_err(|e| PublishError::config_parse("<inline>", e.to_string()))?;

        resolve_legacy_types(&mut document)?;

        serde_json::from_value(document)
            .map_err(|e| PublishError::config_parse("<inline>", e.to_string()))
    }

    /// Validates the configuration values.
    ///
    /// - `jgivenResults` must be a valid glob
    /// - `generator.java` and `generator.mainClass` must not be blank
    pub fn validate(&self) -> Result<()> {
        ResultLocator::new(self.step.jgiven_results())?;

        if self.generator.java.trim().is_empty() {
            return Err(PublishError::config_validation(
                "generator.java must not be empty",
                "Set generator.java to the java executable, e.g. \"java\"",
            ));
        }

        if self.generator.main_class.trim().is_empty() {
            return Err(PublishError::config_validation(
                "generator.mainClass must not be empty",
                "Remove generator.mainClass to use the JGiven report tool",
            ));
        }

        Ok(())
    }
}

/// Rewrites legacy `type` tags of the report blocks to their current names.
///
/// # Errors
///
/// Returns `PublishError::UnsupportedFormat` for a tag that is neither
/// current nor a known alias.
pub fn resolve_legacy_types(document: &mut Value) -> Result<()> {
    let Some(configs) = document
        .get_mut("reportConfigs")
        .and_then(Value::as_array_mut)
    else {
        return Ok(());
    };

    for config in configs {
        let Some(tag) = config.get("type").and_then(Value::as_str) else {
            continue;
        };
        let resolved = resolve_type(tag)?;
        if resolved != tag {
            tracing::debug!(legacy = tag, current = resolved, "Resolved legacy report type");
        }
        config["type"] = Value::String(resolved.to_string());
    }

    Ok(())
}

fn resolve_type(tag: &str) -> Result<&'static str> {
    if let Some((_, current)) = LEGACY_TYPE_ALIASES.iter().find(|(legacy, _)| *legacy == tag) {
        return Ok(*current);
    }

    let lower = tag.to_lowercase();
    KNOWN_TYPES
        .iter()
        .find(|known| **known == lower)
        .copied()
        .or_else(|| {
            LEGACY_TYPE_ALIASES
                .iter()
                .find(|(legacy, _)| legacy.to_lowercase() == lower)
                .map(|(_, current)| *current)
        })
        .ok_or_else(|| PublishError::UnsupportedFormat(tag.to_string()))
}
