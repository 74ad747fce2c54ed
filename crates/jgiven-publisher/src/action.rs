//! The build action exposing generated reports.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::report_config::ReportConfig;
use crate::step::REPORTS_DIR;

/// Attached to a build after its reports were generated.
///
/// Holds links resolved when the reports were generated, so they stay
/// correct even if the job configuration changes later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportAction {
    /// Directory owned by the build.
    pub build_root: PathBuf,
    /// When the reports were generated.
    pub generated_at: DateTime<Utc>,
    /// One link per generated report, in configuration order.
    pub reports: Vec<ReportLink>,
}

/// A link to one generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportLink {
    /// Human-readable report name.
    pub name: String,
    /// Report directory below the report root.
    pub directory: String,
    /// Link target relative to the report root.
    pub url: String,
}

impl From<&ReportConfig> for ReportLink {
    fn from(config: &ReportConfig) -> Self {
        Self {
            name: config.report_name().to_string(),
            directory: config.report_directory().to_string(),
            url: config.report_url(),
        }
    }
}

impl ReportAction {
    /// Label shown for this action.
    pub const DISPLAY_NAME: &'static str = "JGiven Reports";

    /// Creates an action for the build in `build_root`.
    #[must_use]
    pub fn new(build_root: impl Into<PathBuf>, report_configs: &[ReportConfig]) -> Self {
        Self {
            build_root: build_root.into(),
            generated_at: Utc::now(),
            reports: report_configs.iter().map(ReportLink::from).collect(),
        }
    }

    /// Root directory of the build's reports.
    #[must_use]
    pub fn report_root(&self) -> PathBuf {
        self.build_root.join(REPORTS_DIR)
    }

    /// Links to every report, in configuration order.
    #[must_use]
    pub fn links(&self) -> &[ReportLink] {
        &self.reports
    }

    /// Local path of a link target.
    #[must_use]
    pub fn path_of(&self, link: &ReportLink) -> PathBuf {
        self.report_root().join(&link.url)
    }
}
