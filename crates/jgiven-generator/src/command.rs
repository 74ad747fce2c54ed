//! Report generation through the JGiven report tool.
//!
//! [`CommandGenerator`] runs the tool's main class on a JVM, one process per
//! report:
//!
//! ```text
//! java [jvmArgs] -cp <classpath> com.tngtech.jgiven.report.ReportGenerator \
//!     --format=html5 --sourceDir=<dir> --targetDir=<dir> \
//!     --exclude-empty-scenarios=false [--customcss=<file>] [--customjs=<file>] [--title=<title>]
//! ```

use std::ffi::OsString;
use std::process::{Command, Output};

use serde::{Deserialize, Serialize};

use crate::{
    Format, FormatOptions, GeneratorConfig, GeneratorError, GeneratorFactory, ReportGenerator,
    Result,
};

/// Maximum number of stderr characters kept in a failure message.
const MAX_STDERR_LENGTH: usize = 2000;

/// Exit codes of a JVM that ran its shutdown hooks after SIGINT or SIGTERM.
const INTERRUPTED_EXIT_CODES: [i32; 2] = [130, 143];

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

fn default_java() -> String {
    "java".to_string()
}

fn default_main_class() -> String {
    "com.tngtech.jgiven.report.ReportGenerator".to_string()
}

/// How to launch the JGiven report tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    /// Java executable.
    #[serde(default = "default_java")]
    pub java: String,

    /// Classpath entries containing the JGiven report jars.
    #[serde(default)]
    pub classpath: Vec<String>,

    /// Main class of the report tool.
    #[serde(default = "default_main_class")]
    pub main_class: String,

    /// Extra arguments passed to the JVM before the classpath.
    #[serde(default)]
    pub jvm_args: Vec<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            java: default_java(),
            classpath: Vec::new(),
            main_class: default_main_class(),
            jvm_args: Vec::new(),
        }
    }
}

/// Generator backed by an external JGiven report tool process.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    format: Format,
    settings: GeneratorSettings,
}

impl CommandGenerator {
    /// Creates a generator for `format`.
    #[must_use]
    pub const fn new(format: Format, settings: GeneratorSettings) -> Self {
        Self { format, settings }
    }

    /// Arguments passed to the java executable for `config`.
    #[must_use]
    pub fn arguments(&self, config: &GeneratorConfig) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.settings.jvm_args.iter().map(OsString::from).collect();

        if !self.settings.classpath.is_empty() {
            args.push("-cp".into());
            args.push(self.settings.classpath.join(CLASSPATH_SEPARATOR).into());
        }
        args.push(self.settings.main_class.clone().into());

        args.push(format!("--format={}", self.format.tool_name()).into());
        args.push(option_arg("--sourceDir=", config.source_dir.as_os_str()));
        args.push(option_arg("--targetDir=", config.target_dir.as_os_str()));
        args.push(format!("--exclude-empty-scenarios={}", config.exclude_empty_scenarios).into());

        if let FormatOptions::Html(html) = &config.options {
            if let Some(css) = &html.custom_css {
                args.push(option_arg("--customcss=", css.as_os_str()));
            }
            if let Some(js) = &html.custom_js {
                args.push(option_arg("--customjs=", js.as_os_str()));
            }
            if let Some(title) = &html.title {
                args.push(format!("--title={title}").into());
            }
        }

        args
    }

    fn command(&self, config: &GeneratorConfig) -> Command {
        let mut command = Command::new(&self.settings.java);
        command.args(self.arguments(config));
        command
    }

    fn check_output(&self, output: &Output) -> Result<()> {
        if output.status.success() {
            return Ok(());
        }

        // No exit code means the process was killed by a signal.
        let Some(code) = output.status.code() else {
            return Err(GeneratorError::Interrupted);
        };
        if INTERRUPTED_EXIT_CODES.contains(&code) {
            return Err(GeneratorError::Interrupted);
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        let tail: String = if stderr.chars().count() > MAX_STDERR_LENGTH {
            let skip = stderr.chars().count() - MAX_STDERR_LENGTH;
            stderr.chars().skip(skip).collect()
        } else {
            stderr.to_string()
        };

        Err(GeneratorError::Failed {
            format: self.format,
            message: format!("exit code {code}: {tail}"),
        })
    }
}

fn option_arg(prefix: &str, value: &std::ffi::OsStr) -> OsString {
    let mut arg = OsString::from(prefix);
    arg.push(value);
    arg
}

impl ReportGenerator for CommandGenerator {
    fn format(&self) -> Format {
        self.format
    }

    fn generate(&self, config: &GeneratorConfig) -> Result<()> {
        if config.format() != self.format {
            return Err(GeneratorError::Failed {
                format: self.format,
                message: format!("received a {} configuration", config.format()),
            });
        }

        std::fs::create_dir_all(&config.target_dir)?;

        tracing::debug!(
            format = %self.format,
            java = %self.settings.java,
            target_dir = %config.target_dir.display(),
            "Running JGiven report tool"
        );

        let output = self.command(config).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::Interrupted {
                GeneratorError::Interrupted
            } else {
                GeneratorError::Io(e)
            }
        })?;

        self.check_output(&output)
    }
}

/// Creates [`CommandGenerator`]s sharing one set of [`GeneratorSettings`].
#[derive(Debug, Clone, Default)]
pub struct CommandGeneratorFactory {
    settings: GeneratorSettings,
}

impl CommandGeneratorFactory {
    /// Creates a factory using `settings` for every generator.
    #[must_use]
    pub const fn new(settings: GeneratorSettings) -> Self {
        Self { settings }
    }
}

impl GeneratorFactory for CommandGeneratorFactory {
    fn create(&self, format: Format) -> Box<dyn ReportGenerator> {
        Box::new(CommandGenerator::new(format, self.settings.clone()))
    }
}
