//! Configuration-time checks for user-entered values.
//!
//! These checks give feedback while a job is being configured. They are
//! advisory: generation never runs them, and a pattern matching nothing at
//! build time simply yields no reports.

use std::path::Path;

use crate::locator::{results_pattern_or_default, ResultLocator};

/// Outcome of checking one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormValidation {
    /// The value is fine.
    Ok,
    /// The value is usable but probably not what was intended.
    Warning(String),
    /// The value cannot be used.
    Error(String),
}

impl FormValidation {
    /// Returns `true` for [`FormValidation::Error`].
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl std::fmt::Display for FormValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::Warning(msg) => write!(f, "warning: {msg}"),
            Self::Error(msg) => write!(f, "error: {msg}"),
        }
    }
}

/// Checks the results pattern against a workspace, if one is available.
///
/// A blank value is checked as the default pattern.
pub fn validate_results_pattern(workspace: Option<&Path>, value: &str) -> FormValidation {
    let pattern = results_pattern_or_default(Some(value));
    let locator = match ResultLocator::new(&pattern) {
        Ok(locator) => locator,
        Err(e) => return FormValidation::Error(e.to_string()),
    };

    let Some(root) = workspace else {
        return FormValidation::Ok;
    };

    match locator.find(root, None) {
        Ok(files) if files.is_empty() => FormValidation::Warning(format!(
            "'{pattern}' doesn't match anything in {}",
            root.display()
        )),
        Ok(_) => FormValidation::Ok,
        Err(e) => FormValidation::Warning(format!("could not scan {}: {e}", root.display())),
    }
}

/// Checks that a custom stylesheet or script exists.
///
/// Relative paths are resolved against `workspace` when given. A blank value
/// means "no custom file" and is always fine.
pub fn validate_custom_file(workspace: Option<&Path>, value: &str) -> FormValidation {
    let value = value.trim();
    if value.is_empty() {
        return FormValidation::Ok;
    }

    let path = workspace.map_or_else(|| Path::new(value).to_path_buf(), |root| root.join(value));
    if path.is_file() {
        FormValidation::Ok
    } else {
        FormValidation::Error("Custom file does not exist".to_string())
    }
}
