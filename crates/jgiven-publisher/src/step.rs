//! The JGiven report build step.
//!
//! After a build has written JGiven JSON results, the step copies them into
//! `<build-root>/jgiven-reports/json` and renders each configured report into
//! `<build-root>/jgiven-reports/<format>`. When no result file matches, nothing
//! is generated and the build continues normally.

use serde::{Deserialize, Serialize};

use crate::action::ReportAction;
use crate::build::{BuildContext, BuildStep, StepOutcome};
use crate::error::Result;
use crate::locator::{results_pattern_or_default, DEFAULT_RESULTS_PATTERN};
use crate::orchestrator::ReportOrchestrator;
use crate::report_config::ReportConfig;

/// Directory below the build root holding all reports.
pub const REPORTS_DIR: &str = "jgiven-reports";

/// Directory below the report root holding the staged JSON results.
pub const STAGED_RESULTS_DIR: &str = "json";

/// Build step configuration: which results to pick up and which reports to generate.
///
/// Always holds at least one report configuration; an empty list becomes a
/// single HTML report with default options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StepRecord", into = "StepRecord")]
pub struct JgivenReportGenerator {
    report_configs: Vec<ReportConfig>,
    jgiven_results: String,
    exclude_empty_scenarios: bool,
}

impl Default for JgivenReportGenerator {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl JgivenReportGenerator {
    /// Display name of the step.
    pub const DISPLAY_NAME: &'static str = "Publish JGiven reports";

    /// Creates a step generating `report_configs`, in order.
    #[must_use]
    pub fn new(report_configs: Vec<ReportConfig>) -> Self {
        let report_configs = if report_configs.is_empty() {
            vec![ReportConfig::default()]
        } else {
            report_configs
        };

        Self {
            report_configs,
            jgiven_results: DEFAULT_RESULTS_PATTERN.to_string(),
            exclude_empty_scenarios: false,
        }
    }

    /// Sets the results glob. A blank pattern selects `**/json/*.json`.
    #[must_use]
    pub fn with_jgiven_results(mut self, pattern: &str) -> Self {
        self.jgiven_results = results_pattern_or_default(Some(pattern));
        self
    }

    /// Sets whether scenarios without steps are left out of every report.
    #[must_use]
    pub const fn with_exclude_empty_scenarios(mut self, exclude: bool) -> Self {
        self.exclude_empty_scenarios = exclude;
        self
    }

    /// Report configurations, in generation order.
    pub fn report_configs(&self) -> &[ReportConfig] {
        &self.report_configs
    }

    /// Glob selecting the result files in the workspace.
    pub fn jgiven_results(&self) -> &str {
        &self.jgiven_results
    }

    /// Whether scenarios without steps are left out.
    pub const fn exclude_empty_scenarios(&self) -> bool {
        self.exclude_empty_scenarios
    }

    /// Replaces the report configurations. An empty list selects the default HTML report.
    pub fn set_report_configs(&mut self, report_configs: Vec<ReportConfig>) {
        *self = Self {
            jgiven_results: std::mem::take(&mut self.jgiven_results),
            exclude_empty_scenarios: self.exclude_empty_scenarios,
            ..Self::new(report_configs)
        };
    }

    /// Stages the results and generates the reports for one build.
    ///
    /// # Errors
    ///
    /// Returns the first staging or generation failure. No action is
    /// attached to the build in that case.
    pub fn perform(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome> {
        ctx.log().line("Generating JGiven reports...");

        let report_root = ctx.build_root().join(REPORTS_DIR);
        let staged_dir = report_root.join(STAGED_RESULTS_DIR);

        ctx.cancellation().check()?;
        let result_files = ctx
            .workspace()
            .copy_matching(&self.jgiven_results, &staged_dir)?;

        if result_files == 0 {
            tracing::info!(pattern = %self.jgiven_results, "No JGiven results matched");
            ctx.log().line("No JGiven reports found.");
            return Ok(StepOutcome::NoResults);
        }

        ctx.log()
            .line(&format!("Found {result_files} JGiven result files."));

        ReportOrchestrator::new(ctx.generators(), self.exclude_empty_scenarios).run(
            ctx,
            &report_root,
            &staged_dir,
            &self.report_configs,
        )?;

        let action = ReportAction::new(ctx.build_root(), &self.report_configs);
        ctx.add_action(action);

        Ok(StepOutcome::Published {
            result_files,
            reports: self.report_configs.len(),
        })
    }
}

impl BuildStep for JgivenReportGenerator {
    fn display_name(&self) -> &'static str {
        Self::DISPLAY_NAME
    }

    fn execute(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome> {
        self.perform(ctx)
    }
}

/// Persisted form of the step configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StepRecord {
    #[serde(default)]
    report_configs: Vec<ReportConfig>,
    #[serde(default)]
    jgiven_results: Option<String>,
    #[serde(default)]
    exclude_empty_scenarios: bool,
}

impl From<StepRecord> for JgivenReportGenerator {
    fn from(record: StepRecord) -> Self {
        Self::new(record.report_configs)
            .with_jgiven_results(record.jgiven_results.as_deref().unwrap_or_default())
            .with_exclude_empty_scenarios(record.exclude_empty_scenarios)
    }
}

impl From<JgivenReportGenerator> for StepRecord {
    fn from(step: JgivenReportGenerator) -> Self {
        Self {
            report_configs: step.report_configs,
            jgiven_results: Some(step.jgiven_results),
            exclude_empty_scenarios: step.exclude_empty_scenarios,
        }
    }
}
