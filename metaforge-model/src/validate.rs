//! Semantic validation of a parsed meta-model.
//!
//! Validation never mutates the model. Issues are collected rather than
//! returned as errors so the caller decides what is fatal; the generation
//! pipeline aborts on any error-severity issue before writing output.

use std::collections::HashSet;

use crate::model::MetaModel;

/// Severity of a validation issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    /// The model cannot be generated from.
    Error,
    /// Suspicious but generatable.
    Warning,
}

/// A single validation finding.
#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: IssueSeverity,
    pub message: String,
    /// Model location (e.g. a qualified class name), if one applies.
    pub location: Option<String>,
}

impl Issue {
    fn error(message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            severity: IssueSeverity::Error,
            message: message.into(),
            location,
        }
    }

    fn warning(message: impl Into<String>, location: Option<String>) -> Self {
        Self {
            severity: IssueSeverity::Warning,
            message: message.into(),
            location,
        }
    }
}

/// Validate a model, returning all findings in model order.
pub fn validate(model: &MetaModel) -> Vec<Issue> {
    let mut issues = Vec::new();

    if model.classes.is_empty() {
        issues.push(Issue::warning("model contains no classes", None));
    }

    let mut seen = HashSet::new();
    for class in &model.classes {
        let qualified = class.qualified_name();

        if class.name.is_empty() {
            issues.push(Issue::error("class has no name", Some(qualified.clone())));
            continue;
        }

        // Script execution records are keyed by qualified name, so a
        // duplicate would silently share per-class initialization.
        if !seen.insert(qualified.clone()) {
            issues.push(Issue::error(
                format!("duplicate class '{qualified}'"),
                Some(qualified.clone()),
            ));
        }

        if class.stereotypes.is_empty() {
            issues.push(Issue::warning(
                format!("class '{}' has no stereotypes and will be skipped", class.name),
                Some(qualified.clone()),
            ));
        }

        let mut attr_names = HashSet::new();
        for attr in &class.attributes {
            if attr.name.is_empty() {
                issues.push(Issue::error(
                    format!("attribute of class '{}' has no name", class.name),
                    Some(qualified.clone()),
                ));
            } else if !attr_names.insert(attr.name.as_str()) {
                issues.push(Issue::warning(
                    format!("duplicate attribute '{}' on class '{}'", attr.name, class.name),
                    Some(qualified.clone()),
                ));
            }
        }
    }

    issues
}
