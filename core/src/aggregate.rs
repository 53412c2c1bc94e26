//! # Aggregation: Combine
//!
//! Merges many outcomes into one. Only failures contribute:
//!
//! * `Validation` failures contribute each of their fields under the field name.
//! * Every other kind contributes its message under the kind name
//!   (`"Security"`, `"NotFound"`, ...).
//!
//! Messages are concatenated in input order without deduplication. Any
//! contribution turns the aggregate into one multi-field validation failure,
//! so callers read every error from a single field map.

use crate::failure::{Failure, FieldFailures};
use crate::kind::FailureKind;
use crate::outcome::{Outcome, State};

pub const NO_OUTCOMES_MESSAGE: &str = "No outcomes to combine.";

#[derive(Debug, Default)]
struct Grouping {
    labels: FieldFailures,
    failures: usize,
}

impl Grouping {
    fn absorb(&mut self, failure: &Failure) {
        self.failures += 1;
        let fields = failure.field_failures();
        if failure.kind() == FailureKind::Validation && !fields.is_empty() {
            for (field, messages) in fields {
                self.labels
                    .entry(field.clone())
                    .or_default()
                    .extend(messages.iter().cloned());
            }
        } else {
            self.labels
                .entry(failure.kind().name().to_string())
                .or_default()
                .push(failure.message().to_string());
        }
    }
}

/// Combines outcomes of any payload type into a payload-free outcome.
///
/// An empty input is a success.
pub fn combine<'a, T, I>(outcomes: I) -> Outcome<()>
where
    T: 'a,
    I: IntoIterator<Item = &'a Outcome<T>>,
{
    let mut grouping = Grouping::default();
    let mut total = 0usize;
    for outcome in outcomes {
        total += 1;
        if let State::Failure(failure) = &outcome.state {
            grouping.absorb(failure);
        }
    }

    tracing::debug!(total, failures = grouping.failures, "combined outcomes");
    if grouping.labels.is_empty() {
        Outcome::success()
    } else {
        Outcome::validation(grouping.labels)
    }
}

/// Combines payload-bearing outcomes.
///
/// Without failures the first success (in input order) supplies payload and
/// category. An empty input is a failure.
pub fn combine_values<T, I>(outcomes: I) -> Outcome<T>
where
    I: IntoIterator<Item = Outcome<T>>,
{
    let mut grouping = Grouping::default();
    let mut first = None;
    let mut total = 0usize;
    for outcome in outcomes {
        total += 1;
        match outcome.state {
            State::Success { value, category } => {
                if first.is_none() {
                    first = Some((value, category));
                }
            }
            State::Failure(failure) => grouping.absorb(&failure),
        }
    }

    tracing::debug!(total, failures = grouping.failures, "combined outcomes");
    if !grouping.labels.is_empty() {
        return Outcome::validation(grouping.labels);
    }
    match first {
        Some((value, category)) => Outcome::success_value_with(value, category),
        None => Outcome::failure(NO_OUTCOMES_MESSAGE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::OutcomeCategory;

    fn owned(pairs: &[(&str, &[&str])]) -> FieldFailures {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.iter().map(|m| m.to_string()).collect()))
            .collect()
    }

    #[test]
    fn test_combine_groups_fields_in_input_order() {
        let outcomes: Vec<Outcome> = vec![
            Outcome::success(),
            Outcome::field_failure("A", "x"),
            Outcome::field_failure("A", "y"),
            Outcome::field_failure("B", "z"),
        ];
        let combined = combine(&outcomes);
        assert_eq!(combined.failure_kind(), FailureKind::Validation);
        assert_eq!(
            *combined.field_failures(),
            owned(&[("A", &["x", "y"]), ("B", &["z"])])
        );
    }

    #[test]
    fn test_combine_labels_other_kinds_by_name() {
        let outcomes: Vec<Outcome<i32>> = vec![
            Outcome::security("denied"),
            Outcome::failure("boom"),
            Outcome::not_found("missing"),
            Outcome::failure("bang"),
        ];
        let combined = combine(&outcomes);
        assert_eq!(combined.failure_kind(), FailureKind::Validation);
        assert_eq!(combined.category(), OutcomeCategory::GeneralError);
        assert_eq!(
            *combined.field_failures(),
            owned(&[
                ("GeneralError", &["boom", "bang"]),
                ("NotFound", &["missing"]),
                ("Security", &["denied"]),
            ])
        );
        let labels: Vec<&String> = combined.field_failures().keys().collect();
        assert_eq!(labels, vec!["Security", "GeneralError", "NotFound"]);
    }

    #[test]
    fn test_combine_does_not_deduplicate() {
        let outcomes: Vec<Outcome> =
            vec![Outcome::field_failure("A", "x"), Outcome::field_failure("A", "x")];
        assert_eq!(combine(&outcomes).field_failures()["A"], vec!["x", "x"]);
    }

    #[test]
    fn test_combine_all_success_or_empty() {
        let outcomes: Vec<Outcome> = vec![Outcome::success(), Outcome::success()];
        assert!(combine(&outcomes).is_success());
        assert!(combine::<(), _>(&[]).is_success());
    }

    #[test]
    fn test_combine_values_first_success_wins() {
        let combined = combine_values(vec![
            Outcome::success_value_with(1, OutcomeCategory::Information),
            Outcome::success_value(2),
        ]);
        assert_eq!(combined.try_get_value(), Some(&1));
        assert_eq!(combined.category(), OutcomeCategory::Information);
    }

    #[test]
    fn test_combine_values_empty_is_failure() {
        let combined = combine_values(Vec::<Outcome<u8>>::new());
        assert!(combined.is_failure());
        assert_eq!(combined.error_message(), NO_OUTCOMES_MESSAGE);
    }

    #[test]
    fn test_combine_values_failure_beats_success() {
        let combined = combine_values(vec![
            Outcome::success_value(1),
            Outcome::cancelled("stopped"),
        ]);
        assert_eq!(combined.failure_kind(), FailureKind::Validation);
        assert_eq!(
            combined.field_failures()["OperationCanceled"],
            vec!["stopped"]
        );
    }

    #[test]
    fn test_fieldless_validation_groups_under_kind() {
        let outcomes: Vec<Outcome> = vec![Outcome::failure_with(
            "schema mismatch",
            OutcomeCategory::GeneralError,
            FailureKind::Validation,
        )];
        let combined = combine(&outcomes);
        assert_eq!(combined.field_failures()["Validation"], vec!["schema mismatch"]);
    }
}
