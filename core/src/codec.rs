//! # Wire Codec
//!
//! Fixed JSON object shape, written in this property order:
//!
//! ```json
//! { "value": 42, "error": "", "failures": {}, "failureType": "None", "resultType": "Success" }
//! ```
//!
//! `value` only appears for successes whose payload is not JSON `null`, so a
//! payload-free `Outcome<()>` never carries it.
//!
//! Reading is tolerant: property order and casing are free, and both enums
//! accept a name (any casing) or an ordinal. Decoding goes back through the
//! same factory an equivalent value was built with.

use crate::failure::FieldFailures;
use crate::kind::{FailureKind, OutcomeCategory};
use crate::outcome::{Outcome, State};
use serde::de::{self, DeserializeOwned, IgnoredAny, MapAccess, Visitor};
use serde::ser::{self, SerializeMap};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

pub const MISSING_VALUE_MESSAGE: &str = "Missing value for a successful outcome.";

pub const FIELD_VALUE: &str = "value";
pub const FIELD_ERROR: &str = "error";
pub const FIELD_FAILURES: &str = "failures";
pub const FIELD_FAILURE_TYPE: &str = "failureType";
pub const FIELD_RESULT_TYPE: &str = "resultType";

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("invalid outcome JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// How the writer renders `failureType` and `resultType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumFormat {
    #[default]
    Name,
    Ordinal,
}

/// Writer settings. Reading ignores them and accepts every form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CodecOptions {
    pub enum_format: EnumFormat,
    /// Leave out `failures` when the map is empty.
    pub omit_empty_failures: bool,
}

/// Encoder/decoder bound to a set of [`CodecOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeCodec {
    options: CodecOptions,
}

impl OutcomeCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CodecOptions {
        self.options
    }

    pub fn encode<T: Serialize>(
        &self,
        outcome: &Outcome<T>,
    ) -> Result<serde_json::Value, CodecError> {
        Ok(serde_json::to_value(self.wire(outcome))?)
    }

    pub fn encode_to_string<T: Serialize>(
        &self,
        outcome: &Outcome<T>,
    ) -> Result<String, CodecError> {
        Ok(serde_json::to_string(&self.wire(outcome))?)
    }

    pub fn decode<T: DeserializeOwned>(
        &self,
        json: serde_json::Value,
    ) -> Result<Outcome<T>, CodecError> {
        Ok(serde_json::from_value(json)?)
    }

    pub fn decode_str<T: DeserializeOwned>(&self, json: &str) -> Result<Outcome<T>, CodecError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serializable view of `outcome` using these options.
    pub fn wire<'a, T>(&self, outcome: &'a Outcome<T>) -> Wire<'a, T> {
        Wire {
            outcome,
            options: self.options,
        }
    }
}

pub fn encode<T: Serialize>(outcome: &Outcome<T>) -> Result<serde_json::Value, CodecError> {
    OutcomeCodec::default().encode(outcome)
}

pub fn decode<T: DeserializeOwned>(json: serde_json::Value) -> Result<Outcome<T>, CodecError> {
    OutcomeCodec::default().decode(json)
}

pub fn to_json_string<T: Serialize>(outcome: &Outcome<T>) -> Result<String, CodecError> {
    OutcomeCodec::default().encode_to_string(outcome)
}

pub fn from_json_str<T: DeserializeOwned>(json: &str) -> Result<Outcome<T>, CodecError> {
    OutcomeCodec::default().decode_str(json)
}

/// An outcome paired with writer options.
pub struct Wire<'a, T> {
    outcome: &'a Outcome<T>,
    options: CodecOptions,
}

impl<T: Serialize> Serialize for Wire<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let outcome = self.outcome;
        let mut map = serializer.serialize_map(None)?;

        if let Some(value) = outcome.try_get_value() {
            let payload = serde_json::to_value(value).map_err(ser::Error::custom)?;
            if !payload.is_null() {
                map.serialize_entry(FIELD_VALUE, &payload)?;
            }
        }
        map.serialize_entry(FIELD_ERROR, outcome.error_message())?;
        if !(self.options.omit_empty_failures && outcome.field_failures().is_empty()) {
            map.serialize_entry(FIELD_FAILURES, outcome.field_failures())?;
        }
        match self.options.enum_format {
            EnumFormat::Name => {
                map.serialize_entry(FIELD_FAILURE_TYPE, &outcome.failure_kind())?;
                map.serialize_entry(FIELD_RESULT_TYPE, &outcome.category())?;
            }
            EnumFormat::Ordinal => {
                map.serialize_entry(FIELD_FAILURE_TYPE, &outcome.failure_kind().ordinal())?;
                map.serialize_entry(FIELD_RESULT_TYPE, &outcome.category().ordinal())?;
            }
        }
        map.end()
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        OutcomeCodec::default().wire(self).serialize(serializer)
    }
}

/// Properties gathered before reconstruction.
#[derive(Default)]
struct WireParts {
    value: Option<serde_json::Value>,
    error: Option<String>,
    failures: Option<FieldFailures>,
    kind: Option<FailureKind>,
    category: Option<OutcomeCategory>,
}

fn set_once<T, E: de::Error>(
    slot: &mut Option<T>,
    seen: &mut bool,
    name: &'static str,
    value: T,
) -> Result<(), E> {
    if std::mem::replace(seen, true) {
        return Err(E::duplicate_field(name));
    }
    *slot = Some(value);
    Ok(())
}

impl WireParts {
    fn rebuild<T: DeserializeOwned>(self) -> Result<Outcome<T>, serde_json::Error> {
        let message = self.error.unwrap_or_default();
        if message.is_empty() {
            let category = self.category.unwrap_or(OutcomeCategory::Success);
            let missing = matches!(self.value, None | Some(serde_json::Value::Null));
            return match T::deserialize(self.value.unwrap_or(serde_json::Value::Null)) {
                Ok(value) => Ok(Outcome::success_value_with(value, category)),
                Err(err) if missing => {
                    tracing::warn!(error = %err, "decoded success carries no value");
                    Ok(Outcome::failure(MISSING_VALUE_MESSAGE))
                }
                Err(err) => Err(err),
            };
        }

        let failures = self.failures.unwrap_or_default();
        let outcome = match self.kind.unwrap_or(FailureKind::GeneralError) {
            FailureKind::Validation if !failures.is_empty() => Outcome::validation(failures),
            FailureKind::Security => Outcome::security(message),
            FailureKind::OperationCanceled => Outcome::cancelled(message),
            FailureKind::None => Outcome::failure_with(
                message,
                self.category.unwrap_or(OutcomeCategory::GeneralError),
                FailureKind::GeneralError,
            ),
            kind => Outcome::failure_with(
                message,
                self.category.unwrap_or(OutcomeCategory::GeneralError),
                kind,
            ),
        };
        Ok(match self.category {
            Some(category) => recategorize(outcome, category),
            None => outcome,
        })
    }
}

fn recategorize<T>(outcome: Outcome<T>, category: OutcomeCategory) -> Outcome<T> {
    match outcome.state {
        State::Failure(failure) => failure.with_category(category).into(),
        state => Outcome { state },
    }
}

struct OutcomeVisitor<T>(PhantomData<fn() -> T>);

impl<'de, T: DeserializeOwned> Visitor<'de> for OutcomeVisitor<T> {
    type Value = Outcome<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an outcome object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut parts = WireParts::default();
        let mut seen = [false; 5];

        while let Some(key) = map.next_key::<String>()? {
            match key.to_ascii_lowercase().as_str() {
                "value" => {
                    let value = map.next_value()?;
                    set_once::<_, A::Error>(&mut parts.value, &mut seen[0], FIELD_VALUE, value)?;
                }
                "error" => {
                    let error: Option<String> = map.next_value()?;
                    if let Some(error) = error {
                        set_once::<_, A::Error>(
                            &mut parts.error,
                            &mut seen[1],
                            FIELD_ERROR,
                            error,
                        )?;
                    }
                }
                "failures" => {
                    let failures: Option<FieldFailures> = map.next_value()?;
                    if let Some(failures) = failures {
                        set_once::<_, A::Error>(
                            &mut parts.failures,
                            &mut seen[2],
                            FIELD_FAILURES,
                            failures,
                        )?;
                    }
                }
                "failuretype" => {
                    let kind = map.next_value()?;
                    set_once::<_, A::Error>(
                        &mut parts.kind,
                        &mut seen[3],
                        FIELD_FAILURE_TYPE,
                        kind,
                    )?;
                }
                "resulttype" => {
                    let category = map.next_value()?;
                    set_once::<_, A::Error>(
                        &mut parts.category,
                        &mut seen[4],
                        FIELD_RESULT_TYPE,
                        category,
                    )?;
                }
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }

        parts.rebuild().map_err(de::Error::custom)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Outcome<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OutcomeVisitor(PhantomData))
    }
}
