//! # Failure Taxonomy
//!
//! Two closed, orthogonal classifications:
//!
//! * [`FailureKind`] answers *why* an outcome failed.
//! * [`OutcomeCategory`] answers *how severe* it is.
//!
//! A success may still carry `Information` or `Warning`; a cancellation is a
//! failure of kind `OperationCanceled` with category `Warning`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Rejected textual or numeric representation of a taxonomy enum.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaxonomyError {
    #[error("unknown {enum_name} name: {value:?}")]
    UnknownName {
        enum_name: &'static str,
        value: String,
    },
    #[error("{enum_name} ordinal out of range: {value}")]
    OrdinalOutOfRange { enum_name: &'static str, value: i64 },
}

/// Why an outcome failed.
///
/// `None` is only valid for successful outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum FailureKind {
    #[default]
    None,
    GeneralError,
    Security,
    Validation,
    OperationCanceled,
    NotFound,
    ServerError,
}

impl FailureKind {
    pub const ALL: [FailureKind; 7] = [
        FailureKind::None,
        FailureKind::GeneralError,
        FailureKind::Security,
        FailureKind::Validation,
        FailureKind::OperationCanceled,
        FailureKind::NotFound,
        FailureKind::ServerError,
    ];

    /// Stable name used as aggregation label and on the wire.
    pub const fn name(self) -> &'static str {
        match self {
            FailureKind::None => "None",
            FailureKind::GeneralError => "GeneralError",
            FailureKind::Security => "Security",
            FailureKind::Validation => "Validation",
            FailureKind::OperationCanceled => "OperationCanceled",
            FailureKind::NotFound => "NotFound",
            FailureKind::ServerError => "ServerError",
        }
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: i64) -> Result<Self, TaxonomyError> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(TaxonomyError::OrdinalOutOfRange {
                enum_name: "FailureKind",
                value,
            })
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FailureKind {
    type Err = TaxonomyError;

    /// Case-insensitive name lookup.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TaxonomyError::UnknownName {
                enum_name: "FailureKind",
                value: s.to_string(),
            })
    }
}

/// Severity label, ordered `Success < Information < Warning < GeneralError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum OutcomeCategory {
    #[default]
    Success,
    Information,
    Warning,
    GeneralError,
}

impl OutcomeCategory {
    pub const ALL: [OutcomeCategory; 4] = [
        OutcomeCategory::Success,
        OutcomeCategory::Information,
        OutcomeCategory::Warning,
        OutcomeCategory::GeneralError,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            OutcomeCategory::Success => "Success",
            OutcomeCategory::Information => "Information",
            OutcomeCategory::Warning => "Warning",
            OutcomeCategory::GeneralError => "GeneralError",
        }
    }

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(value: i64) -> Result<Self, TaxonomyError> {
        usize::try_from(value)
            .ok()
            .and_then(|idx| Self::ALL.get(idx).copied())
            .ok_or(TaxonomyError::OrdinalOutOfRange {
                enum_name: "OutcomeCategory",
                value,
            })
    }
}

impl fmt::Display for OutcomeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OutcomeCategory {
    type Err = TaxonomyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TaxonomyError::UnknownName {
                enum_name: "OutcomeCategory",
                value: s.to_string(),
            })
    }
}

// Both enums serialize by name and accept a name (any casing) or an ordinal.
macro_rules! tolerant_serde {
    ($ty:ident, $expecting:literal) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                struct TolerantVisitor;

                impl Visitor<'_> for TolerantVisitor {
                    type Value = $ty;

                    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                        f.write_str($expecting)
                    }

                    fn visit_str<E: de::Error>(self, v: &str) -> Result<$ty, E> {
                        v.parse().map_err(E::custom)
                    }

                    fn visit_i64<E: de::Error>(self, v: i64) -> Result<$ty, E> {
                        $ty::from_ordinal(v).map_err(E::custom)
                    }

                    fn visit_u64<E: de::Error>(self, v: u64) -> Result<$ty, E> {
                        let v = i64::try_from(v).unwrap_or(i64::MAX);
                        $ty::from_ordinal(v).map_err(E::custom)
                    }
                }

                deserializer.deserialize_any(TolerantVisitor)
            }
        }
    };
}

tolerant_serde!(FailureKind, "a FailureKind name or ordinal");
tolerant_serde!(OutcomeCategory, "an OutcomeCategory name or ordinal");
