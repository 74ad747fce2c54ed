//! Integration tests for loading job configurations from disk.

use std::path::Path;

use jgiven_generator::{Format, GeneratorSettings};
use jgiven_publisher::{
    Config, HtmlReportConfig, PublishError, ReportConfig, CONFIG_FILE_NAME,
    DEFAULT_RESULTS_PATTERN,
};

fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join(CONFIG_FILE_NAME);
    std::fs::write(&path, contents).expect("write config");
    path
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::load_from_file(&dir.path().join(CONFIG_FILE_NAME)).expect("defaults");

    assert_eq!(config.step.jgiven_results(), DEFAULT_RESULTS_PATTERN);
    assert_eq!(config.step.report_configs(), &[ReportConfig::default()]);
    assert!(!config.step.exclude_empty_scenarios());
    assert_eq!(config.generator, GeneratorSettings::default());
}

#[test]
fn test_full_document() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"{
            "jgivenResults": "target/jgiven-reports/json/*.json",
            "excludeEmptyScenarios": true,
            "reportConfigs": [
                {"type": "html", "customCssFile": "ci/a.css", "customJsFile": "ci/a.js", "title": "Shop"},
                {"type": "text"},
                {"type": "asciidoc"}
            ],
            "generator": {
                "java": "/opt/jdk/bin/java",
                "classpath": ["lib/jgiven-html5-report.jar", "lib/jgiven-core.jar"],
                "jvmArgs": ["-Xmx512m"]
            }
        }"#,
    );

    let config = Config::load_from_file(&path).expect("valid config");

    assert_eq!(config.step.jgiven_results(), "target/jgiven-reports/json/*.json");
    assert!(config.step.exclude_empty_scenarios());
    let formats: Vec<Format> = config
        .step
        .report_configs()
        .iter()
        .map(ReportConfig::format)
        .collect();
    assert_eq!(formats, vec![Format::Html, Format::Text, Format::AsciiDoc]);
    assert_eq!(
        config.step.report_configs()[0],
        ReportConfig::Html(
            HtmlReportConfig::default()
                .with_custom_css_file("ci/a.css")
                .with_custom_js_file("ci/a.js")
                .with_title("Shop")
        )
    );
    assert_eq!(config.generator.java, "/opt/jdk/bin/java");
    assert_eq!(config.generator.classpath.len(), 2);
    assert_eq!(config.generator.jvm_args, vec!["-Xmx512m"]);
    assert_eq!(
        config.generator.main_class,
        GeneratorSettings::default().main_class
    );
}

#[test]
fn test_legacy_report_types_load_as_current_types() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(
        dir.path(),
        r#"{"reportConfigs": [
            {"type": "org.jenkinsci.plugins.jgiven.JgivenReportGenerator$Html5ReportConfig", "customCssFile": "x.css"},
            {"type": "org.jenkinsci.plugins.jgiven.JgivenReportGenerator$AsciiDocReportConfig"}
        ]}"#,
    );

    let config = Config::load_from_file(&path).expect("legacy config");

    assert_eq!(
        config.step.report_configs(),
        &[
            ReportConfig::Html(HtmlReportConfig::default().with_custom_css_file("x.css")),
            ReportConfig::AsciiDoc,
        ]
    );
}

#[test]
fn test_empty_report_list_falls_back_to_html() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"{"reportConfigs": []}"#);

    let config = Config::load_from_file(&path).expect("config");
    assert_eq!(config.step.report_configs(), &[ReportConfig::default()]);
}

#[test]
fn test_blank_results_pattern_uses_default() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"{"jgivenResults": "   "}"#);

    let config = Config::load_from_file(&path).expect("config");
    assert_eq!(config.step.jgiven_results(), DEFAULT_RESULTS_PATTERN);
}

#[test]
fn test_unsupported_report_type_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"{"reportConfigs": [{"type": "pdf"}]}"#);

    let err = Config::load_from_file(&path).expect_err("pdf is not supported");
    assert!(matches!(err, PublishError::UnsupportedFormat(ref t) if t == "pdf"));
}

#[test]
fn test_blank_main_class_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_config(dir.path(), r#"{"generator": {"mainClass": ""}}"#);

    let err = Config::load_from_file(&path).expect_err("blank main class");
    assert!(err.is_config_error(), "got {err:?}");
    assert!(err.to_string().contains("generator.mainClass"));
}

#[test]
fn test_saved_config_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config {
        step: jgiven_publisher::JgivenReportGenerator::new(vec![
            ReportConfig::Html(HtmlReportConfig::default().with_title("Nightly")),
            ReportConfig::Text,
        ])
        .with_jgiven_results("build/**/*.json"),
        ..Default::default()
    };
    let path = write_config(
        dir.path(),
        &serde_json::to_string_pretty(&config).expect("serialize"),
    );

    assert_eq!(Config::load_from_file(&path).expect("reload"), config);
}
