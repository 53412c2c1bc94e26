//! Verdict Core - classified outcomes.
//!
//! * [`kind`]: the failure taxonomy (`FailureKind`, `OutcomeCategory`)
//! * [`outcome`]: the `Outcome` value and its factories
//! * [`dispatch`]: match/switch, two-arm and five-arm
//! * [`aggregate`]: combining many outcomes into one
//! * [`compose`]: async bind, map, dispatch and combine
//! * [`codec`]: the JSON wire format
//!
//! **IMPORTANT**: This layer is protocol-agnostic - no HTTP types.

pub mod aggregate;
pub mod codec;
pub mod compose;
pub mod config;
pub mod dispatch;
pub mod failure;
pub mod kind;
pub mod outcome;
pub mod request;
pub mod telemetry;
pub mod validation;

pub use aggregate::{combine, combine_values};
pub use codec::{CodecError, CodecOptions, EnumFormat, OutcomeCodec};
pub use compose::{OutcomeFutureExt, combine_async, combine_values_async};
pub use config::{ConfigError, TelemetryConfig, VerdictConfig};
pub use failure::{Failure, FieldFailures, format_validation_message};
pub use kind::{FailureKind, OutcomeCategory};
pub use outcome::{IntoOutcome, Outcome};
pub use request::{ApiRequest, Command, Query, RequestHandler};
pub use telemetry::Traced;
pub use validation::FieldRules;

pub mod prelude {
    pub use crate::aggregate::{combine, combine_values};
    pub use crate::compose::{OutcomeFutureExt, combine_async, combine_values_async};
    pub use crate::failure::{Failure, FieldFailures};
    pub use crate::kind::{FailureKind, OutcomeCategory};
    pub use crate::outcome::{IntoOutcome, Outcome};
    pub use crate::request::{ApiRequest, Command, Query, RequestHandler};
    pub use crate::validation::FieldRules;
}
