//! End-to-end tests for publishing JGiven reports.
//!
//! The JGiven report tool is replaced by a recording generator that writes a
//! small deterministic report and remembers every configuration it received.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use jgiven_generator::{
    Format, GeneratorConfig, GeneratorError, GeneratorFactory, ReportGenerator,
};
use jgiven_publisher::{
    BuildContext, BuildLog, BuildStep, HtmlReportConfig, JgivenReportGenerator, LocalWorkspace,
    PublishError, ReportAction, ReportConfig, StepOutcome, REPORTS_DIR, STAGED_RESULTS_DIR,
};

/// What the recording generator saw for one report.
#[derive(Debug, Clone)]
struct Invocation {
    config: GeneratorConfig,
    custom_css: Option<String>,
}

#[derive(Default, Clone)]
struct RecordingGeneratorFactory {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    fail_on: Option<Format>,
}

impl RecordingGeneratorFactory {
    fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().expect("poisoned").clone()
    }
}

struct RecordingGenerator {
    format: Format,
    factory: RecordingGeneratorFactory,
}

impl ReportGenerator for RecordingGenerator {
    fn format(&self) -> Format {
        self.format
    }

    fn generate(&self, config: &GeneratorConfig) -> jgiven_generator::Result<()> {
        // Temporary assets only live while the generator runs.
        let custom_css = config
            .html_options()
            .and_then(|html| html.custom_css.as_ref())
            .map(std::fs::read_to_string)
            .transpose()?;

        self.factory
            .invocations
            .lock()
            .expect("poisoned")
            .push(Invocation {
                config: config.clone(),
                custom_css,
            });

        if self.factory.fail_on == Some(self.format) {
            return Err(GeneratorError::Failed {
                format: self.format,
                message: "renderer crashed".to_string(),
            });
        }

        let mut sources: Vec<String> = walk(&config.source_dir)
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        sources.sort();

        std::fs::create_dir_all(&config.target_dir)?;
        let entry = match self.format {
            Format::Html => "index.html",
            Format::Text => "report.txt",
            Format::AsciiDoc => "index.asciidoc",
        };
        std::fs::write(
            config.target_dir.join(entry),
            format!("{}\n{}\n", self.format, sources.join("\n")),
        )?;
        Ok(())
    }
}

impl GeneratorFactory for RecordingGeneratorFactory {
    fn create(&self, format: Format) -> Box<dyn ReportGenerator> {
        Box::new(RecordingGenerator {
            format,
            factory: self.clone(),
        })
    }
}

/// Lists files below `dir`, relative to it.
fn walk(dir: &Path) -> Vec<PathBuf> {
    fn visit(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                visit(root, &path, out);
            } else if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }

    let mut out = Vec::new();
    visit(dir, dir, &mut out);
    out.sort();
    out
}

fn write_result(workspace: &Path, relative: &str) {
    let path = workspace.join(relative);
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
    std::fs::write(
        path,
        r#"{"className": "com.example.CheckoutTest", "scenarios": []}"#,
    )
    .expect("write result");
}

struct Run {
    result: Result<StepOutcome, PublishError>,
    actions: Vec<ReportAction>,
    log: String,
}

fn run(step: &JgivenReportGenerator, workspace: &Path, build_root: &Path, factory: &RecordingGeneratorFactory) -> Run {
    let workspace = LocalWorkspace::new(workspace);
    let mut out: Vec<u8> = Vec::new();

    let (result, actions) = {
        let mut ctx = BuildContext::new(build_root, &workspace, factory, BuildLog::new(&mut out));
        let result = step.execute(&mut ctx);
        (result, ctx.into_actions())
    };

    Run {
        result,
        actions,
        log: String::from_utf8(out).expect("utf-8 log"),
    }
}

/// Two result files and an HTML plus a text report.
#[test]
fn test_two_results_html_and_text() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "a/json/result1.json");
    write_result(workspace.path(), "b/json/result2.json");

    let factory = RecordingGeneratorFactory::default();
    let step = JgivenReportGenerator::new(vec![ReportConfig::default(), ReportConfig::Text])
        .with_jgiven_results("**/json/*.json");

    let run = run(&step, workspace.path(), build.path(), &factory);

    assert_eq!(
        run.result.expect("step succeeds"),
        StepOutcome::Published {
            result_files: 2,
            reports: 2
        }
    );

    let report_root = build.path().join(REPORTS_DIR);
    let staged = walk(&report_root.join(STAGED_RESULTS_DIR));
    assert_eq!(
        staged,
        vec![
            PathBuf::from("a/json/result1.json"),
            PathBuf::from("b/json/result2.json")
        ]
    );
    assert!(report_root.join("html/index.html").is_file());
    assert!(report_root.join("text/report.txt").is_file());

    assert_eq!(run.actions.len(), 1);
    let urls: Vec<&str> = run.actions[0]
        .links()
        .iter()
        .map(|l| l.url.as_str())
        .collect();
    assert_eq!(urls, vec!["html/index.html", "text"]);

    assert!(run.log.contains("Generating JGiven reports..."));
    assert!(run.log.contains("Found 2 JGiven result files."));
    assert!(run.log.contains("Generating HTML Report..."));
    assert!(run.log.contains("Generating Text Report..."));
}

/// Zero matching files: nothing generated, no action, the step succeeds.
#[test]
fn test_no_results() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "reports/other.json");

    let factory = RecordingGeneratorFactory::default();
    let step = JgivenReportGenerator::new(vec![ReportConfig::default(), ReportConfig::Text]);

    let run = run(&step, workspace.path(), build.path(), &factory);

    assert_eq!(run.result.expect("step succeeds"), StepOutcome::NoResults);
    assert!(run.actions.is_empty());
    assert!(factory.invocations().is_empty());
    assert!(!build.path().join(REPORTS_DIR).join("html").exists());
    assert!(!build.path().join(REPORTS_DIR).join("text").exists());
    assert!(run.log.contains("No JGiven reports found."));
}

/// Each configured report gets its own directory and the staged sources.
#[test]
fn test_generator_configs_point_at_staged_results() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "json/r.json");

    let factory = RecordingGeneratorFactory::default();
    let step = JgivenReportGenerator::new(vec![
        ReportConfig::AsciiDoc,
        ReportConfig::Text,
        ReportConfig::default(),
    ]);

    let run = run(&step, workspace.path(), build.path(), &factory);
    run.result.expect("step succeeds");

    let report_root = build.path().join(REPORTS_DIR);
    let invocations = factory.invocations();
    let targets: Vec<PathBuf> = invocations.iter().map(|i| i.config.target_dir.clone()).collect();
    assert_eq!(
        targets,
        vec![
            report_root.join("asciidoc"),
            report_root.join("text"),
            report_root.join("html"),
        ]
    );
    assert!(invocations
        .iter()
        .all(|i| i.config.source_dir == report_root.join(STAGED_RESULTS_DIR)));
}

#[test]
fn test_exclude_empty_scenarios_forwarded_to_every_report() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "json/r.json");

    let factory = RecordingGeneratorFactory::default();
    let step = JgivenReportGenerator::new(vec![
        ReportConfig::default(),
        ReportConfig::Text,
        ReportConfig::AsciiDoc,
    ])
    .with_exclude_empty_scenarios(true);

    run(&step, workspace.path(), build.path(), &factory)
        .result
        .expect("step succeeds");

    let invocations = factory.invocations();
    assert_eq!(invocations.len(), 3);
    assert!(invocations.iter().all(|i| i.config.exclude_empty_scenarios));
}

#[test]
fn test_rerun_overwrites_with_identical_output() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "module/json/r1.json");
    write_result(workspace.path(), "module/json/r2.json");

    let factory = RecordingGeneratorFactory::default();
    let step = JgivenReportGenerator::new(vec![ReportConfig::default(), ReportConfig::Text]);
    let report_root = build.path().join(REPORTS_DIR);

    run(&step, workspace.path(), build.path(), &factory)
        .result
        .expect("first run");
    let first_html = std::fs::read_to_string(report_root.join("html/index.html")).expect("html");
    let first_text = std::fs::read_to_string(report_root.join("text/report.txt")).expect("text");

    let second = run(&step, workspace.path(), build.path(), &factory);
    assert_eq!(
        second.result.expect("second run"),
        StepOutcome::Published {
            result_files: 2,
            reports: 2
        }
    );

    assert_eq!(
        std::fs::read_to_string(report_root.join("html/index.html")).expect("html"),
        first_html
    );
    assert_eq!(
        std::fs::read_to_string(report_root.join("text/report.txt")).expect("text"),
        first_text
    );
    assert_eq!(walk(&report_root.join(STAGED_RESULTS_DIR)).len(), 2);
}

#[test]
fn test_html_custom_css_is_resolved_to_readable_local_file() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "json/r.json");
    std::fs::create_dir_all(workspace.path().join("ci")).expect("ci dir");
    std::fs::write(workspace.path().join("ci/report.css"), ".scenario { color: teal; }")
        .expect("css");

    let factory = RecordingGeneratorFactory::default();
    let html = HtmlReportConfig::default()
        .with_custom_css_file("ci/report.css")
        .with_title("Checkout Acceptance");
    let step = JgivenReportGenerator::new(vec![ReportConfig::Html(html)]);

    run(&step, workspace.path(), build.path(), &factory)
        .result
        .expect("step succeeds");

    let invocations = factory.invocations();
    let html = invocations[0].config.html_options().expect("html options");
    let css_path = html.custom_css.as_ref().expect("css override");
    assert!(!css_path.as_os_str().is_empty());
    assert_ne!(css_path, &workspace.path().join("ci/report.css"));
    assert_eq!(
        invocations[0].custom_css.as_deref(),
        Some(".scenario { color: teal; }")
    );
    assert!(html.custom_js.is_none());
    assert_eq!(html.title.as_deref(), Some("Checkout Acceptance"));
}

#[test]
fn test_missing_custom_css_fails_step() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "json/r.json");

    let factory = RecordingGeneratorFactory::default();
    let html = HtmlReportConfig::default().with_custom_css_file("ci/missing.css");
    let step = JgivenReportGenerator::new(vec![ReportConfig::Html(html), ReportConfig::Text]);

    let run = run(&step, workspace.path(), build.path(), &factory);

    assert!(matches!(run.result, Err(PublishError::Io(_))));
    assert!(run.actions.is_empty());
    assert!(factory.invocations().is_empty());
    assert!(!build.path().join(REPORTS_DIR).join("html").exists());
    assert!(!build.path().join(REPORTS_DIR).join("text").exists());
}

#[test]
fn test_generator_failure_aborts_remaining_reports() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "json/r.json");

    let factory = RecordingGeneratorFactory {
        fail_on: Some(Format::Html),
        ..Default::default()
    };
    let step = JgivenReportGenerator::new(vec![
        ReportConfig::Text,
        ReportConfig::default(),
        ReportConfig::AsciiDoc,
    ]);

    let run = run(&step, workspace.path(), build.path(), &factory);

    let err = run.result.expect_err("step fails");
    assert!(matches!(err, PublishError::Runtime { .. }));
    assert!(err.to_string().contains("renderer crashed"));
    assert!(run.actions.is_empty());

    let formats: Vec<Format> = factory
        .invocations()
        .iter()
        .map(|i| i.config.format())
        .collect();
    assert_eq!(formats, vec![Format::Text, Format::Html]);
    assert!(!build.path().join(REPORTS_DIR).join("asciidoc").exists());
}

#[test]
fn test_default_step_generates_single_html_report() {
    let workspace = tempfile::tempdir().expect("workspace");
    let build = tempfile::tempdir().expect("build root");
    write_result(workspace.path(), "target/jgiven-reports/json/r.json");

    let factory = RecordingGeneratorFactory::default();
    let step = JgivenReportGenerator::default();
    assert_eq!(step.report_configs(), &[ReportConfig::default()]);

    run(&step, workspace.path(), build.path(), &factory)
        .result
        .expect("step succeeds");

    let invocations = factory.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].config.format(), Format::Html);
    assert_eq!(
        invocations[0].config.html_options(),
        Some(&jgiven_generator::HtmlOptions::default())
    );
}
