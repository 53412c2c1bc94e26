//! Field rule builder.
//!
//! Collects `field -> messages` and hands the map to
//! [`Outcome::validation`]. The builder is an owned value; share results, not
//! builders.

use crate::failure::FieldFailures;
use crate::outcome::Outcome;

#[derive(Debug, Clone, Default)]
pub struct FieldRules {
    failures: FieldFailures,
}

impl FieldRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` against `field` unconditionally.
    pub fn add(
        &mut self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.failures
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Records `message` when `ok` is false.
    pub fn check(
        &mut self,
        field: impl Into<String>,
        ok: bool,
        message: impl Into<String>,
    ) -> &mut Self {
        if !ok {
            self.add(field, message);
        }
        self
    }

    /// Records `message` when `value` is blank.
    pub fn require(
        &mut self,
        field: impl Into<String>,
        value: &str,
        message: impl Into<String>,
    ) -> &mut Self {
        self.check(field, !value.trim().is_empty(), message)
    }

    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failures(&self) -> &FieldFailures {
        &self.failures
    }

    pub fn finish(self) -> Outcome<()> {
        self.finish_with(())
    }

    /// Success carrying `value`, or the collected validation failure.
    pub fn finish_with<T>(self, value: T) -> Outcome<T> {
        if self.failures.is_empty() {
            Outcome::success_value(value)
        } else {
            Outcome::validation(self.failures)
        }
    }
}
