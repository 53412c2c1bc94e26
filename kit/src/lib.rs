//! Verdict facade crate.
//!
//! Re-exports the core outcome type and, with the `http` feature, the HTTP
//! status mapping, behind a single dependency.

pub use verdict_core as core;
#[cfg(feature = "http")]
pub use verdict_http as http;

pub use verdict_core::{
    ApiRequest, CodecError, CodecOptions, Command, FailureKind, FieldFailures, FieldRules,
    Outcome, OutcomeCategory, OutcomeCodec, Query, RequestHandler, VerdictConfig, combine,
    combine_async, combine_values, combine_values_async,
};
pub use verdict_core::telemetry::{Traced, init_tracing};
#[cfg(feature = "http")]
pub use verdict_http::{HttpOutcomeError, into_response, outcome_from_response, status_for};

pub mod prelude {
    pub use verdict_core::prelude::*;
    #[cfg(feature = "http")]
    pub use verdict_http::prelude::*;
}
