//! Report configuration variants.
//!
//! Each [`ReportConfig`] selects one output format and carries that format's
//! options. The format is fixed by the variant and decides both the output
//! directory and the generator that renders the report.

use std::path::Path;

use jgiven_generator::{Format, FormatOptions, GeneratorConfig, HtmlOptions};
use serde::{Deserialize, Serialize};
use tempfile::TempPath;

use crate::error::Result;
use crate::workspace::Workspace;

/// Options of the HTML report. Blank values keep the generator defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HtmlReportConfig {
    /// Workspace-relative path of a custom stylesheet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_css_file: Option<String>,

    /// Workspace-relative path of a custom script.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_js_file: Option<String>,

    /// Report title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl HtmlReportConfig {
    /// Sets the custom stylesheet.
    #[must_use]
    pub fn with_custom_css_file(mut self, path: impl Into<String>) -> Self {
        self.custom_css_file = Some(path.into());
        self
    }

    /// Sets the custom script.
    #[must_use]
    pub fn with_custom_js_file(mut self, path: impl Into<String>) -> Self {
        self.custom_js_file = Some(path.into());
        self
    }

    /// Sets the report title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn prepare(&self, workspace: &dyn Workspace) -> Result<PreparedReport> {
        let mut options = HtmlOptions::default();
        let mut assets = Vec::new();

        if let Some(css) = non_blank(self.custom_css_file.as_deref()) {
            let local = copy_to_local(workspace, css)?;
            options.custom_css = Some(local.to_path_buf());
            assets.push(local);
        }
        if let Some(js) = non_blank(self.custom_js_file.as_deref()) {
            let local = copy_to_local(workspace, js)?;
            options.custom_js = Some(local.to_path_buf());
            assets.push(local);
        }
        if let Some(title) = non_blank(self.title.as_deref()) {
            options.title = Some(title.to_string());
        }

        Ok(PreparedReport {
            config: GeneratorConfig::new(FormatOptions::Html(options)),
            assets,
        })
    }
}

/// One configured report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportConfig {
    /// Interactive HTML report.
    Html(HtmlReportConfig),
    /// Plain text report.
    Text,
    /// AsciiDoc report.
    AsciiDoc,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::Html(HtmlReportConfig::default())
    }
}

impl From<Format> for ReportConfig {
    fn from(format: Format) -> Self {
        match format {
            Format::Html => Self::Html(HtmlReportConfig::default()),
            Format::Text => Self::Text,
            Format::AsciiDoc => Self::AsciiDoc,
        }
    }
}

impl ReportConfig {
    /// The output format of this report.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Html(_) => Format::Html,
            Self::Text => Format::Text,
            Self::AsciiDoc => Format::AsciiDoc,
        }
    }

    /// Directory below the report root that receives this report.
    #[must_use]
    pub const fn report_directory(&self) -> &'static str {
        self.format().directory_name()
    }

    /// Link target of the report, relative to the report root.
    #[must_use]
    pub fn report_url(&self) -> String {
        match self {
            Self::Html(_) => format!("{}/index.html", self.report_directory()),
            Self::Text | Self::AsciiDoc => self.report_directory().to_string(),
        }
    }

    /// Human-readable name of the report.
    #[must_use]
    pub const fn report_name(&self) -> &'static str {
        match self {
            Self::Html(_) => "HTML Report",
            Self::Text => "Text Report",
            Self::AsciiDoc => "AsciiDoc Report",
        }
    }

    /// Builds the generator configuration for this report.
    ///
    /// Workspace files referenced by the options are copied to local
    /// temporary files first; the returned [`PreparedReport`] owns them.
    /// Source and target directories are left for the caller to fill in.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Io` if a referenced workspace file cannot be copied.
    pub fn generator_config(&self, workspace: &dyn Workspace) -> Result<PreparedReport> {
        match self {
            Self::Html(html) => html.prepare(workspace),
            Self::Text | Self::AsciiDoc => Ok(PreparedReport {
                config: GeneratorConfig::new(FormatOptions::defaults(self.format())),
                assets: Vec::new(),
            }),
        }
    }
}

/// A generator configuration together with the local files it refers to.
///
/// The temporary files are removed when this value is dropped.
#[derive(Debug)]
pub struct PreparedReport {
    /// The configuration handed to the generator.
    pub config: GeneratorConfig,
    assets: Vec<TempPath>,
}

impl PreparedReport {
    /// Local copies of workspace files referenced by the configuration.
    pub fn assets(&self) -> impl Iterator<Item = &Path> {
        self.assets.iter().map(|p| &**p)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn copy_to_local(workspace: &dyn Workspace, relative: &str) -> Result<TempPath> {
    let local = tempfile::Builder::new()
        .prefix("jgiven-asset")
        .tempfile()?
        .into_temp_path();
    workspace.copy_file(relative, &local)?;
    tracing::debug!(file = relative, local = %local.display(), "Copied workspace file for generator");
    Ok(local)
}
