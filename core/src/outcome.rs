//! # Outcome: Success or Classified Failure
//!
//! `Outcome` represents "Failure as Data".
//! Expected business failures never travel as panics or `Err` chains of
//! unrelated error types; they are values carrying a [`FailureKind`], an
//! [`OutcomeCategory`], a message and, for validation, per-field messages.
//!
//! `Outcome<()>` is the payload-free form. Instances are immutable and are only
//! produced by the named factories below; every transform returns a new value.

use crate::failure::{Failure, FieldFailures, NO_FIELD_FAILURES};
use crate::kind::{FailureKind, OutcomeCategory};
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum State<T> {
    Success { value: T, category: OutcomeCategory },
    Failure(Failure),
}

/// The result of an operation: a payload plus severity, or a classified failure.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an Outcome may be a failure that should be inspected"]
pub struct Outcome<T = ()> {
    pub(crate) state: State<T>,
}

impl Outcome<()> {
    /// Plain success.
    pub fn success() -> Self {
        Self::success_value(())
    }

    /// Success with an informational or advisory category.
    pub fn success_with(category: OutcomeCategory) -> Self {
        Self::success_value_with((), category)
    }
}

impl<T> Outcome<T> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn success_value(value: T) -> Self {
        Self::success_value_with(value, OutcomeCategory::Success)
    }

    pub fn success_value_with(value: T, category: OutcomeCategory) -> Self {
        Self {
            state: State::Success { value, category },
        }
    }

    /// Wraps a raw value as success. Use [`Outcome::lift`] when the value may
    /// already be outcome-shaped.
    pub fn wrap(value: T) -> Self {
        Self::success_value(value)
    }

    /// Generic failure: `GeneralError` kind and category.
    ///
    /// # Panics
    ///
    /// Contract violation if `message` is empty.
    #[track_caller]
    pub fn failure(message: impl Into<String>) -> Self {
        Self::failure_with(
            message,
            OutcomeCategory::GeneralError,
            FailureKind::GeneralError,
        )
    }

    /// # Panics
    ///
    /// Contract violation if `message` is empty or `kind` is `None`.
    #[track_caller]
    pub fn failure_with(
        message: impl Into<String>,
        category: OutcomeCategory,
        kind: FailureKind,
    ) -> Self {
        Failure::new(kind, category, message.into(), FieldFailures::new()).into()
    }

    /// Single-field validation failure.
    ///
    /// # Panics
    ///
    /// Contract violation if `field` or `message` is empty.
    #[track_caller]
    pub fn field_failure(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        assert!(
            !field.is_empty(),
            "contract violation: a field failure requires a field name"
        );
        assert!(
            !message.is_empty(),
            "contract violation: a field failure requires a message"
        );
        let mut failures = FieldFailures::new();
        failures.insert(field, vec![message]);
        Self::validation(failures)
    }

    /// Multi-field validation failure; the map is kept verbatim.
    pub fn validation(failures: FieldFailures) -> Self {
        Failure::validation(failures).into()
    }

    /// Security failure (authentication or authorization) built from its cause.
    ///
    /// # Panics
    ///
    /// Contract violation if the cause renders to an empty message.
    #[track_caller]
    pub fn security(cause: impl Display) -> Self {
        Self::failure_with(
            cause.to_string(),
            OutcomeCategory::GeneralError,
            FailureKind::Security,
        )
    }

    /// Cancellation. Classified `Warning`: the work is incomplete, not broken.
    ///
    /// # Panics
    ///
    /// Contract violation if the cause renders to an empty message.
    #[track_caller]
    pub fn cancelled(cause: impl Display) -> Self {
        Self::failure_with(
            cause.to_string(),
            OutcomeCategory::Warning,
            FailureKind::OperationCanceled,
        )
    }

    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::failure_with(
            message,
            OutcomeCategory::GeneralError,
            FailureKind::NotFound,
        )
    }

    #[track_caller]
    pub fn server_error(message: impl Into<String>) -> Self {
        Self::failure_with(
            message,
            OutcomeCategory::GeneralError,
            FailureKind::ServerError,
        )
    }

    /// Converts anything outcome-shaped without double wrapping.
    pub fn lift<O>(source: O) -> Self
    where
        O: IntoOutcome<Value = T>,
    {
        source.into_outcome()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_success(&self) -> bool {
        matches!(self.state, State::Success { .. })
    }

    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub fn failure_kind(&self) -> FailureKind {
        match &self.state {
            State::Success { .. } => FailureKind::None,
            State::Failure(failure) => failure.kind(),
        }
    }

    pub fn category(&self) -> OutcomeCategory {
        match &self.state {
            State::Success { category, .. } => *category,
            State::Failure(failure) => failure.category(),
        }
    }

    /// Empty for successes.
    pub fn error_message(&self) -> &str {
        match &self.state {
            State::Success { .. } => "",
            State::Failure(failure) => failure.message(),
        }
    }

    pub fn field_failures(&self) -> &FieldFailures {
        match &self.state {
            State::Success { .. } => &*NO_FIELD_FAILURES,
            State::Failure(failure) => failure.field_failures(),
        }
    }

    pub fn is_cancellation(&self) -> bool {
        self.failure_kind() == FailureKind::OperationCanceled
    }

    /// The payload, if successful.
    pub fn try_get_value(&self) -> Option<&T> {
        match &self.state {
            State::Success { value, .. } => Some(value),
            State::Failure(_) => None,
        }
    }

    pub fn value(self) -> Option<T> {
        self.into_result().ok()
    }

    pub fn failure_ref(&self) -> Option<&Failure> {
        match &self.state {
            State::Success { .. } => None,
            State::Failure(failure) => Some(failure),
        }
    }

    pub fn as_result(&self) -> Result<&T, &Failure> {
        match &self.state {
            State::Success { value, .. } => Ok(value),
            State::Failure(failure) => Err(failure),
        }
    }

    pub fn into_result(self) -> Result<T, Failure> {
        match self.state {
            State::Success { value, .. } => Ok(value),
            State::Failure(failure) => Err(failure),
        }
    }

    // ------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------

    /// Drops the payload, keeping classification, message and field map.
    pub fn downgrade(self) -> Outcome<()> {
        self.map(|_| ())
    }

    /// Re-types a failure; a success is handed back as `Err(value, category)`.
    pub(crate) fn retype<U>(self) -> Result<Outcome<U>, (T, OutcomeCategory)> {
        match self.state {
            State::Success { value, category } => Err((value, category)),
            State::Failure(failure) => Ok(failure.into()),
        }
    }

    /// Transforms the payload, preserving the category.
    pub fn map<U, F>(self, op: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        match self.retype() {
            Ok(failed) => failed,
            Err((value, category)) => Outcome::success_value_with(op(value), category),
        }
    }

    /// Chains a step that itself yields an outcome. Failures short-circuit.
    pub fn and_then<U, F>(self, op: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Outcome<U>,
    {
        match self.retype() {
            Ok(failed) => failed,
            Err((value, _)) => op(value),
        }
    }
}

impl<T> From<Failure> for Outcome<T> {
    fn from(failure: Failure) -> Self {
        Self {
            state: State::Failure(failure),
        }
    }
}

/// Capability of being viewed as an `Outcome`.
///
/// Generic code that may receive either a raw value or something already
/// outcome-shaped goes through this trait instead of wrapping blindly.
pub trait IntoOutcome {
    type Value;

    fn into_outcome(self) -> Outcome<Self::Value>;
}

impl<T> IntoOutcome for Outcome<T> {
    type Value = T;

    fn into_outcome(self) -> Outcome<T> {
        self
    }
}

impl<T, E> IntoOutcome for Result<T, E>
where
    E: Into<Failure>,
{
    type Value = T;

    fn into_outcome(self) -> Outcome<T> {
        match self {
            Ok(value) => Outcome::success_value(value),
            Err(err) => Outcome::from(err.into()),
        }
    }
}
