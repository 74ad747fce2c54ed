//! Runs the configured report generators over staged results.
//!
//! Reports are generated one after another in configuration order. The first
//! failure stops the run and is returned unchanged in kind: a partial report
//! set is never presented as a result.

use std::path::Path;

use jgiven_generator::GeneratorFactory;

use crate::build::BuildContext;
use crate::error::{PublishError, Result};
use crate::report_config::{PreparedReport, ReportConfig};
use crate::workspace::Workspace;

/// Generates one report per configuration.
pub struct ReportOrchestrator<'a> {
    generators: &'a dyn GeneratorFactory,
    exclude_empty_scenarios: bool,
}

impl<'a> ReportOrchestrator<'a> {
    /// Creates an orchestrator. `exclude_empty_scenarios` applies to every report.
    pub fn new(generators: &'a dyn GeneratorFactory, exclude_empty_scenarios: bool) -> Self {
        Self {
            generators,
            exclude_empty_scenarios,
        }
    }

    /// Builds the complete generator configuration for `config`.
    ///
    /// The source is `staged_dir`, the target is the report's directory below
    /// `report_root`.
    pub fn configure(
        &self,
        config: &ReportConfig,
        report_root: &Path,
        staged_dir: &Path,
        workspace: &dyn Workspace,
    ) -> Result<PreparedReport> {
        let mut prepared = config.generator_config(workspace)?;
        prepared.config.source_dir = staged_dir.to_path_buf();
        prepared.config.target_dir = report_root.join(config.report_directory());
        prepared.config.exclude_empty_scenarios = self.exclude_empty_scenarios;
        Ok(prepared)
    }

    /// Generates every report in `configs`, in order.
    ///
    /// # Errors
    ///
    /// Stops at the first failing report. I/O failures are returned as
    /// `PublishError::Io`, cancellation as `PublishError::Interrupted`, and any
    /// other generator failure as `PublishError::Runtime`.
    pub fn run(
        &self,
        ctx: &mut BuildContext<'_>,
        report_root: &Path,
        staged_dir: &Path,
        configs: &[ReportConfig],
    ) -> Result<()> {
        let workspace = ctx.workspace();

        for config in configs {
            ctx.cancellation().check()?;
            ctx.log()
                .line(&format!("Generating {}...", config.report_name()));

            let generator = self.generators.create(config.format());
            let prepared = self.configure(config, report_root, staged_dir, workspace)?;

            tracing::debug!(
                format = %config.format(),
                target_dir = %prepared.config.target_dir.display(),
                exclude_empty_scenarios = self.exclude_empty_scenarios,
                "Invoking report generator"
            );
            if let Err(e) = generator.generate(&prepared.config) {
                // A generator stopped by the host's cancellation may still report a plain failure.
                if ctx.cancellation().is_cancelled() {
                    tracing::debug!(error = %e, "Report generator failed after cancellation");
                    return Err(PublishError::Interrupted);
                }
                return Err(e.into());
            }
        }

        Ok(())
    }
}

impl std::fmt::Debug for ReportOrchestrator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportOrchestrator")
            .field("exclude_empty_scenarios", &self.exclude_empty_scenarios)
            .finish_non_exhaustive()
    }
}
