//! # Failure: the error half of an `Outcome`
//!
//! A `Failure` is only built by the factories on [`crate::Outcome`], which keep
//! the kind, message and field map consistent with each other.

use crate::kind::{FailureKind, OutcomeCategory};
use indexmap::IndexMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Field name -> messages, iterated in insertion order.
pub type FieldFailures = IndexMap<String, Vec<String>>;

/// Shared empty map handed out by every outcome without validation errors.
pub(crate) static NO_FIELD_FAILURES: LazyLock<FieldFailures> = LazyLock::new(FieldFailures::new);

pub const VALIDATION_HEADER: &str = "One or more validation errors occurred.";

/// Prefix for each message line under a field name.
pub const MESSAGE_BULLET: &str = "  - ";

/// Renders the error message of a validation failure.
///
/// ```text
/// One or more validation errors occurred.
/// Email
///   - required
///   - bad format
/// ```
///
/// Identical maps always render identically.
pub fn format_validation_message(failures: &FieldFailures) -> String {
    let mut lines = Vec::with_capacity(1 + failures.len() * 2);
    lines.push(VALIDATION_HEADER.to_string());
    for (field, messages) in failures {
        lines.push(field.clone());
        lines.extend(messages.iter().map(|msg| format!("{MESSAGE_BULLET}{msg}")));
    }
    lines.join("\n")
}

/// A classified failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct Failure {
    kind: FailureKind,
    category: OutcomeCategory,
    message: String,
    field_failures: FieldFailures,
}

impl Failure {
    /// # Panics
    ///
    /// Contract violation if `kind` is `None` or `message` is empty.
    #[track_caller]
    pub(crate) fn new(
        kind: FailureKind,
        category: OutcomeCategory,
        message: String,
        field_failures: FieldFailures,
    ) -> Self {
        assert!(
            kind != FailureKind::None,
            "contract violation: a failure cannot be classified as FailureKind::None"
        );
        assert!(
            !message.is_empty(),
            "contract violation: a failure requires a non-empty message"
        );
        Self {
            kind,
            category,
            message,
            field_failures,
        }
    }

    pub(crate) fn validation(field_failures: FieldFailures) -> Self {
        let message = format_validation_message(&field_failures);
        Self::new(
            FailureKind::Validation,
            OutcomeCategory::GeneralError,
            message,
            field_failures,
        )
    }

    pub(crate) fn with_category(mut self, category: OutcomeCategory) -> Self {
        self.category = category;
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn category(&self) -> OutcomeCategory {
        self.category
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Non-empty only for `Validation` failures built from field errors.
    pub fn field_failures(&self) -> &FieldFailures {
        &self.field_failures
    }

    pub fn is_cancellation(&self) -> bool {
        self.kind == FailureKind::OperationCanceled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lists_fields_then_bullets() {
        let mut failures = FieldFailures::new();
        failures.insert(
            "Email".to_string(),
            vec!["required".to_string(), "bad format".to_string()],
        );
        failures.insert("Age".to_string(), vec!["too small".to_string()]);

        let message = format_validation_message(&failures);
        let lines: Vec<&str> = message.lines().collect();
        assert_eq!(
            lines,
            vec![
                VALIDATION_HEADER,
                "Email",
                "  - required",
                "  - bad format",
                "Age",
                "  - too small",
            ]
        );
    }

    #[test]
    fn test_format_empty_map_is_header_only() {
        assert_eq!(
            format_validation_message(&FieldFailures::new()),
            VALIDATION_HEADER
        );
    }

    #[test]
    #[should_panic(expected = "contract violation")]
    fn test_empty_message_is_contract_violation() {
        let _ = Failure::new(
            FailureKind::GeneralError,
            OutcomeCategory::GeneralError,
            String::new(),
            FieldFailures::new(),
        );
    }

    #[test]
    #[should_panic(expected = "FailureKind::None")]
    fn test_none_kind_is_contract_violation() {
        let _ = Failure::new(
            FailureKind::None,
            OutcomeCategory::GeneralError,
            "x".to_string(),
            FieldFailures::new(),
        );
    }
}
