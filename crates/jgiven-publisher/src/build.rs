//! The contract between a build host and a build step.
//!
//! A host runs a [`BuildStep`] with a [`BuildContext`] describing one build:
//! where the build keeps its files, how to reach the workspace, where log
//! output goes, and whether the build has been cancelled. Steps attach
//! [`ReportAction`]s to the context for the host to display.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use jgiven_generator::GeneratorFactory;

use crate::action::ReportAction;
use crate::error::{PublishError, Result};
use crate::workspace::Workspace;

/// Shared flag the host sets to cancel a running build.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// Creates a token that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Fails with `PublishError::Interrupted` if cancellation was requested.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(PublishError::Interrupted)
        } else {
            Ok(())
        }
    }
}

/// The build log: advisory progress lines shown to the user.
pub struct BuildLog<'a> {
    sink: &'a mut (dyn Write + Send),
}

impl<'a> BuildLog<'a> {
    /// Creates a log writing to `sink`.
    pub fn new(sink: &'a mut (dyn Write + Send)) -> Self {
        Self { sink }
    }

    /// Writes one line. Log failures never fail the build.
    pub fn line(&mut self, message: &str) {
        tracing::info!("{message}");
        if let Err(e) = writeln!(self.sink, "{message}") {
            tracing::warn!(error = %e, "Failed to write build log");
        }
    }
}

impl std::fmt::Debug for BuildLog<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildLog").finish_non_exhaustive()
    }
}

/// Everything a build step needs from the host for one build.
pub struct BuildContext<'a> {
    build_root: PathBuf,
    workspace: &'a dyn Workspace,
    generators: &'a dyn GeneratorFactory,
    log: BuildLog<'a>,
    cancellation: CancellationToken,
    actions: Vec<ReportAction>,
}

impl<'a> BuildContext<'a> {
    /// Creates a context for the build whose files live in `build_root`.
    pub fn new(
        build_root: impl Into<PathBuf>,
        workspace: &'a dyn Workspace,
        generators: &'a dyn GeneratorFactory,
        log: BuildLog<'a>,
    ) -> Self {
        Self {
            build_root: build_root.into(),
            workspace,
            generators,
            log,
            cancellation: CancellationToken::new(),
            actions: Vec::new(),
        }
    }

    /// Uses `token` to observe cancellation of this build.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Directory owned by this build.
    pub fn build_root(&self) -> &Path {
        &self.build_root
    }

    /// The build workspace.
    pub fn workspace(&self) -> &'a dyn Workspace {
        self.workspace
    }

    /// Generator implementations available to this build.
    pub fn generators(&self) -> &'a dyn GeneratorFactory {
        self.generators
    }

    /// The build log.
    pub fn log(&mut self) -> &mut BuildLog<'a> {
        &mut self.log
    }

    /// The cancellation token of this build.
    pub const fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    /// Attaches an action to the build.
    pub fn add_action(&mut self, action: ReportAction) {
        self.actions.push(action);
    }

    /// Consumes the context, returning the attached actions.
    pub fn into_actions(self) -> Vec<ReportAction> {
        self.actions
    }
}

impl std::fmt::Debug for BuildContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("build_root", &self.build_root)
            .field("workspace", &self.workspace.location())
            .field("cancelled", &self.cancellation.is_cancelled())
            .field("actions", &self.actions.len())
            .finish_non_exhaustive()
    }
}

/// What a step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No result files matched; nothing was generated.
    NoResults,
    /// Reports were generated.
    Published {
        /// Number of result files staged.
        result_files: usize,
        /// Number of reports generated.
        reports: usize,
    },
}

/// A step a build host can run.
pub trait BuildStep {
    /// Name shown by the host.
    fn display_name(&self) -> &'static str;

    /// Runs the step for one build.
    fn execute(&self, ctx: &mut BuildContext<'_>) -> Result<StepOutcome>;
}
