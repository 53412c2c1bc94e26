//! # Dispatch: Match and Switch
//!
//! * `match_*` folds an outcome into a value; exactly one handler runs.
//! * `switch_*` runs a side effect and returns nothing.
//!
//! The two-arm forms treat every failure alike. The five-arm forms split by
//! [`FailureKind`]; `NotFound` and `ServerError` go to the general error arm.
//!
//! Cancellation is routine control flow: `switch` skips it unless the caller
//! opts in, and `switch_kind` only reports it when a handler is supplied.

use crate::failure::{Failure, FieldFailures};
use crate::kind::FailureKind;
use crate::outcome::{Outcome, State};

/// Which five-arm handler a failure belongs to.
pub(crate) enum Arm<'a> {
    Error(&'a str),
    Security(&'a str),
    Validation(&'a FieldFailures),
    Cancelled(&'a str),
}

pub(crate) fn arm_for(failure: &Failure) -> Arm<'_> {
    match failure.kind() {
        FailureKind::GeneralError | FailureKind::NotFound | FailureKind::ServerError => {
            Arm::Error(failure.message())
        }
        FailureKind::Security => Arm::Security(failure.message()),
        FailureKind::Validation => Arm::Validation(failure.field_failures()),
        FailureKind::OperationCanceled => Arm::Cancelled(failure.message()),
        FailureKind::None => {
            unreachable!("failure outcome classified as FailureKind::None")
        }
    }
}

impl<T> Outcome<T> {
    /// Binary fold: payload on success, error message otherwise.
    pub fn match_with<R, S, F>(self, on_success: S, on_failure: F) -> R
    where
        S: FnOnce(T) -> R,
        F: FnOnce(&str) -> R,
    {
        match self.state {
            State::Success { value, .. } => on_success(value),
            State::Failure(failure) => on_failure(failure.message()),
        }
    }

    /// Exhaustive fold by failure kind. `on_validation` receives the field map.
    pub fn match_kind<R, S, E, Sec, V, C>(
        self,
        on_success: S,
        on_error: E,
        on_security: Sec,
        on_validation: V,
        on_cancelled: C,
    ) -> R
    where
        S: FnOnce(T) -> R,
        E: FnOnce(&str) -> R,
        Sec: FnOnce(&str) -> R,
        V: FnOnce(&FieldFailures) -> R,
        C: FnOnce(&str) -> R,
    {
        match self.state {
            State::Success { value, .. } => on_success(value),
            State::Failure(failure) => match arm_for(&failure) {
                Arm::Error(message) => on_error(message),
                Arm::Security(message) => on_security(message),
                Arm::Validation(failures) => on_validation(failures),
                Arm::Cancelled(message) => on_cancelled(message),
            },
        }
    }

    /// Side-effect form of [`Outcome::match_with`]. Cancellations are skipped.
    pub fn switch<S, F>(&self, on_success: S, on_failure: F)
    where
        S: FnOnce(&T),
        F: FnOnce(&str),
    {
        self.switch_with(on_success, on_failure, false);
    }

    /// Like [`Outcome::switch`], reporting cancellations to `on_failure` when
    /// `include_cancelled` is set.
    pub fn switch_with<S, F>(&self, on_success: S, on_failure: F, include_cancelled: bool)
    where
        S: FnOnce(&T),
        F: FnOnce(&str),
    {
        match &self.state {
            State::Success { value, .. } => on_success(value),
            State::Failure(failure) if failure.is_cancellation() && !include_cancelled => {
                tracing::debug!(reason = failure.message(), "switch skipped cancellation");
            }
            State::Failure(failure) => on_failure(failure.message()),
        }
    }

    /// Side-effect form of [`Outcome::match_kind`]; without `on_cancelled`
    /// a cancellation runs nothing.
    pub fn switch_kind<S, E, Sec, V, C>(
        &self,
        on_success: S,
        on_error: E,
        on_security: Sec,
        on_validation: V,
        on_cancelled: Option<C>,
    ) where
        S: FnOnce(&T),
        E: FnOnce(&str),
        Sec: FnOnce(&str),
        V: FnOnce(&FieldFailures),
        C: FnOnce(&str),
    {
        match &self.state {
            State::Success { value, .. } => on_success(value),
            State::Failure(failure) => match arm_for(failure) {
                Arm::Error(message) => on_error(message),
                Arm::Security(message) => on_security(message),
                Arm::Validation(failures) => on_validation(failures),
                Arm::Cancelled(message) => match on_cancelled {
                    Some(handler) => handler(message),
                    None => tracing::debug!(reason = message, "switch_kind skipped cancellation"),
                },
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn label<T>(outcome: Outcome<T>) -> String
    where
        T: std::fmt::Debug,
    {
        outcome.match_kind(
            |v| format!("success:{v:?}"),
            |m| format!("error:{m}"),
            |m| format!("security:{m}"),
            |f| format!("validation:{}", f.keys().cloned().collect::<Vec<_>>().join(",")),
            |m| format!("cancelled:{m}"),
        )
    }

    #[test]
    fn test_match_with_binary() {
        let ok = Outcome::success_value(2).match_with(|v| v * 10, |_| -1);
        assert_eq!(ok, 20);

        let failed: Outcome<i32> = Outcome::security("nope");
        assert_eq!(failed.match_with(|v| v.to_string(), |m| m.to_string()), "nope");
    }

    #[test]
    fn test_match_kind_routes_each_kind() {
        assert_eq!(label(Outcome::success_value(1)), "success:1");
        assert_eq!(label(Outcome::<i32>::failure("a")), "error:a");
        assert_eq!(label(Outcome::<i32>::not_found("b")), "error:b");
        assert_eq!(label(Outcome::<i32>::server_error("c")), "error:c");
        assert_eq!(label(Outcome::<i32>::security("d")), "security:d");
        assert_eq!(label(Outcome::<i32>::field_failure("X", "e")), "validation:X");
        assert_eq!(label(Outcome::<i32>::cancelled("f")), "cancelled:f");
    }

    #[test]
    fn test_switch_skips_cancellation_by_default() {
        let calls = RefCell::new(Vec::new());
        let cancelled: Outcome = Outcome::cancelled("stop");

        cancelled.switch(|_| calls.borrow_mut().push("ok"), |_| calls.borrow_mut().push("fail"));
        assert!(calls.borrow().is_empty());

        cancelled.switch_with(
            |_| calls.borrow_mut().push("ok"),
            |_| calls.borrow_mut().push("fail"),
            true,
        );
        assert_eq!(*calls.borrow(), vec!["fail"]);
    }

    #[test]
    fn test_switch_reports_other_failures() {
        let seen = RefCell::new(String::new());
        let failed: Outcome = Outcome::failure("broken");
        failed.switch(|_| {}, |m| seen.borrow_mut().push_str(m));
        assert_eq!(*seen.borrow(), "broken");
    }

    #[test]
    fn test_switch_kind_optional_cancel_handler() {
        let calls = RefCell::new(Vec::new());
        let cancelled: Outcome = Outcome::cancelled("stop");

        cancelled.switch_kind(
            |_| calls.borrow_mut().push("ok"),
            |_| calls.borrow_mut().push("error"),
            |_| calls.borrow_mut().push("security"),
            |_| calls.borrow_mut().push("validation"),
            None::<fn(&str)>,
        );
        assert!(calls.borrow().is_empty());

        cancelled.switch_kind(
            |_| calls.borrow_mut().push("ok"),
            |_| calls.borrow_mut().push("error"),
            |_| calls.borrow_mut().push("security"),
            |_| calls.borrow_mut().push("validation"),
            Some(|_: &str| calls.borrow_mut().push("cancelled")),
        );
        assert_eq!(*calls.borrow(), vec!["cancelled"]);
    }

    #[test]
    fn test_switch_kind_validation_gets_field_map() {
        let fields = RefCell::new(Vec::new());
        let invalid: Outcome<u8> = Outcome::field_failure("Zip", "invalid");
        invalid.switch_kind(
            |_| {},
            |_| {},
            |_| {},
            |f| fields.borrow_mut().extend(f.keys().cloned()),
            None::<fn(&str)>,
        );
        assert_eq!(*fields.borrow(), vec!["Zip".to_string()]);
    }
}
