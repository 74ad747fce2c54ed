//! JGiven Report CLI
//!
//! Runs the JGiven report step for one build from the command line.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jgiven_generator::{CommandGeneratorFactory, Format};
use jgiven_publisher::{
    validate_custom_file, validate_results_pattern, BuildContext, BuildLog, BuildStep,
    CancellationToken, Config, FormValidation, LocalWorkspace, PublishError, ReportAction,
    ReportConfig, StepOutcome, CONFIG_FILE_NAME,
};
use tracing_subscriber::EnvFilter;

/// Exit code for a build stopped by Ctrl+C.
const EXIT_INTERRUPTED: u8 = 130;

/// JGiven Report - publish JGiven reports for a build
///
/// Copies the JGiven JSON results of a build into the build's report
/// directory and renders HTML, plain text or AsciiDoc reports from them.
#[derive(Parser, Debug)]
#[command(name = "jgiven-report")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Build workspace containing the JGiven results (default: current directory)
    #[arg(short, long, value_name = "DIR", global = true)]
    workspace: Option<PathBuf>,

    /// Directory owned by the build; reports go to <DIR>/jgiven-reports (default: the workspace)
    #[arg(short, long, value_name = "DIR", global = true)]
    build_root: Option<PathBuf>,

    /// Path to configuration file (default: jgiven.json in the workspace)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Glob selecting the result files, relative to the workspace
    #[arg(long, value_name = "GLOB", global = true)]
    results: Option<String>,

    /// Report to generate; repeat for several (replaces the configured reports)
    #[arg(long = "report", value_name = "FORMAT", global = true)]
    reports: Vec<Format>,

    /// Leave scenarios without steps out of every report
    #[arg(long, global = true)]
    exclude_empty_scenarios: bool,

    /// Print the published report links as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Stage results and generate reports (default)
    Publish,
    /// Check the configuration against the workspace without generating anything
    Check,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(workspace = ?args.workspace, build_root = ?args.build_root, "Arguments");

    let result = match args.command.unwrap_or(Command::Publish) {
        Command::Publish => publish(&args).await,
        Command::Check => check(&args),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

/// Loads the configuration and applies command line overrides.
fn load_config(args: &Args, workspace: &Path) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path)?
        }
        None => Config::load_from_file(&workspace.join(CONFIG_FILE_NAME))?,
    };

    if let Some(results) = &args.results {
        config.step = config.step.with_jgiven_results(results);
    }
    if !args.reports.is_empty() {
        let reports = args.reports.iter().copied().map(ReportConfig::from).collect();
        config.step.set_report_configs(reports);
    }
    if args.exclude_empty_scenarios {
        config.step = config.step.with_exclude_empty_scenarios(true);
    }

    config.validate()?;
    Ok(config)
}

fn resolve_workspace(args: &Args) -> anyhow::Result<PathBuf> {
    match &args.workspace {
        Some(dir) => Ok(dir.clone()),
        None => Ok(std::env::current_dir()?),
    }
}

/// Runs the report step and reports the outcome.
async fn publish(args: &Args) -> anyhow::Result<ExitCode> {
    let workspace_dir = resolve_workspace(args)?;
    let build_root = args.build_root.clone().unwrap_or_else(|| workspace_dir.clone());
    let config = load_config(args, &workspace_dir)?;
    let json = args.json;

    // With --json, stdout carries nothing but the link document.
    if !json {
        print_config(&config, &workspace_dir, &build_root);
    }

    let token = CancellationToken::new();
    let step_token = token.clone();
    let mut handle = tokio::task::spawn_blocking(move || {
        let mut log: Box<dyn Write + Send> = if json {
            Box::new(std::io::stderr())
        } else {
            Box::new(std::io::stdout())
        };
        run_step(&config, &workspace_dir, &build_root, step_token, &mut *log)
    });

    let joined = tokio::select! {
        joined = &mut handle => joined,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl+C, cancelling report generation");
            token.cancel();
            handle.await
        }
    };

    match joined? {
        Ok((outcome, actions)) => {
            print_outcome(outcome, &actions, json, &mut std::io::stdout())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_interruption() => {
            eprintln!("Aborted: {e}");
            Ok(ExitCode::from(EXIT_INTERRUPTED))
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::from(1))
        }
    }
}

/// Runs the step against the local workspace, writing the build log to `log`.
fn run_step(
    config: &Config,
    workspace_dir: &Path,
    build_root: &Path,
    token: CancellationToken,
    log: &mut (dyn Write + Send),
) -> Result<(StepOutcome, Vec<ReportAction>), PublishError> {
    let workspace = LocalWorkspace::new(workspace_dir);
    let generators = CommandGeneratorFactory::new(config.generator.clone());

    let mut ctx = BuildContext::new(build_root, &workspace, &generators, BuildLog::new(log))
        .with_cancellation(token);

    tracing::info!(step = config.step.display_name(), "Running build step");
    let outcome = config.step.execute(&mut ctx)?;
    Ok((outcome, ctx.into_actions()))
}

/// Validates the configuration against the workspace.
fn check(args: &Args) -> anyhow::Result<ExitCode> {
    let workspace_dir = resolve_workspace(args)?;
    let config = load_config(args, &workspace_dir)?;

    let mut checks = vec![(
        "jgivenResults".to_string(),
        validate_results_pattern(Some(workspace_dir.as_path()), config.step.jgiven_results()),
    )];

    for (index, report) in config.step.report_configs().iter().enumerate() {
        if let ReportConfig::Html(html) = report {
            if let Some(css) = &html.custom_css_file {
                checks.push((
                    format!("reportConfigs[{index}].customCssFile"),
                    validate_custom_file(Some(workspace_dir.as_path()), css),
                ));
            }
            if let Some(js) = &html.custom_js_file {
                checks.push((
                    format!("reportConfigs[{index}].customJsFile"),
                    validate_custom_file(Some(workspace_dir.as_path()), js),
                ));
            }
        }
    }

    let mut failed = false;
    for (field, result) in &checks {
        println!("  {field}: {result}");
        failed |= result.is_error();
    }

    if failed {
        Ok(ExitCode::from(1))
    } else {
        if checks.iter().all(|(_, r)| *r == FormValidation::Ok) {
            println!("Configuration OK");
        }
        Ok(ExitCode::SUCCESS)
    }
}

/// Prints the loaded configuration.
fn print_config(config: &Config, workspace: &Path, build_root: &Path) {
    println!("Configuration loaded:");
    println!("  Workspace: {}", workspace.display());
    println!("  Build root: {}", build_root.display());
    println!("  Results: {}", config.step.jgiven_results());
    println!(
        "  Reports: {}",
        config
            .step
            .report_configs()
            .iter()
            .map(ReportConfig::report_name)
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Exclude empty scenarios: {}",
        config.step.exclude_empty_scenarios()
    );
    println!();
}

/// Writes what the step produced to `out`.
fn print_outcome(
    outcome: StepOutcome,
    actions: &[ReportAction],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    if json {
        let links: Vec<_> = actions.iter().flat_map(ReportAction::links).collect();
        writeln!(out, "{}", serde_json::to_string_pretty(&links)?)?;
        return Ok(());
    }

    match outcome {
        StepOutcome::NoResults => {
            writeln!(out)?;
            writeln!(out, "No reports generated.")?;
        }
        StepOutcome::Published {
            result_files,
            reports,
        } => {
            writeln!(out)?;
            writeln!(
                out,
                "{}: generated {reports} report(s) from {result_files} result file(s):",
                ReportAction::DISPLAY_NAME
            )?;
            for action in actions {
                for link in action.links() {
                    writeln!(out, "  {}: {}", link.name, action.path_of(link).display())?;
                }
            }
        }
    }

    Ok(())
}
