//! JGiven Report Publisher
//!
//! Picks up the JSON results a build wrote, stages them per build, and runs
//! the JGiven report generators to produce HTML, plain text and AsciiDoc reports.

pub mod action;
pub mod build;
pub mod config;
pub mod error;
pub mod locator;
pub mod orchestrator;
pub mod report_config;
pub mod step;
pub mod validation;
pub mod workspace;

pub use action::{ReportAction, ReportLink};
pub use build::{BuildContext, BuildLog, BuildStep, CancellationToken, StepOutcome};
pub use config::{Config, CONFIG_FILE_NAME, LEGACY_TYPE_ALIASES};
pub use error::{PublishError, Result};
pub use locator::{ResultLocator, DEFAULT_RESULTS_PATTERN};
pub use orchestrator::ReportOrchestrator;
pub use report_config::{HtmlReportConfig, PreparedReport, ReportConfig};
pub use step::{JgivenReportGenerator, REPORTS_DIR, STAGED_RESULTS_DIR};
pub use validation::{validate_custom_file, validate_results_pattern, FormValidation};
pub use workspace::{LocalWorkspace, Workspace};
