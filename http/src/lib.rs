//! HTTP adapter for Verdict outcomes.
//!
//! Client side: turn a status code and body into an [`Outcome`].
//! Server side: pick a status for an [`Outcome`] and render it with the
//! wire body.
//!
//! | status            | kind                 |
//! |-------------------|----------------------|
//! | 2xx               | none (success)       |
//! | 401, 403          | `Security`           |
//! | 404               | `NotFound`           |
//! | 499               | `OperationCanceled`  |
//! | other 4xx         | `GeneralError`       |
//! | 5xx               | `ServerError`        |
//! | 1xx, 3xx          | `GeneralError`       |

use http::header::CONTENT_TYPE;
use http::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use verdict_core::codec::{CodecError, FIELD_ERROR, FIELD_FAILURE_TYPE, OutcomeCodec};
use verdict_core::{FailureKind, Outcome};

/// Non-standard code used by proxies when the client went away.
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

#[derive(Error, Debug)]
pub enum HttpOutcomeError {
    #[error("failed to encode outcome body: {0}")]
    Codec(#[from] CodecError),
    #[error("failed to build response: {0}")]
    Http(#[from] http::Error),
}

/// Kind a response with this status represents, `None` for 2xx.
pub fn kind_for_status(status: StatusCode) -> Option<FailureKind> {
    if status.is_success() {
        return None;
    }
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => FailureKind::Security,
        StatusCode::NOT_FOUND => FailureKind::NotFound,
        s if s.as_u16() == CLIENT_CLOSED_REQUEST => FailureKind::OperationCanceled,
        s if s.is_server_error() => FailureKind::ServerError,
        _ => FailureKind::GeneralError,
    };
    Some(kind)
}

/// Payload-free outcome for a status. An empty body falls back to the
/// canonical reason phrase so failures always carry a message.
pub fn outcome_from_status(status: StatusCode, body: &str) -> Outcome {
    match kind_for_status(status) {
        None => Outcome::success(),
        Some(kind) => failure_for(kind, status, body),
    }
}

/// Decodes a full response.
///
/// A 2xx body is either a wire envelope (an object with an `error` or
/// `failureType` key, any casing) or the bare JSON payload; an empty body
/// reads as `null`. Anything else becomes a `GeneralError`. Error bodies that
/// are themselves a wire-format failure (for example a validation response
/// from another Verdict service) are decoded as such, so field failures
/// survive the hop.
pub fn outcome_from_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Outcome<T> {
    let Some(kind) = kind_for_status(status) else {
        return success_from_body(status, body);
    };

    if let Ok(remote) = serde_json::from_slice::<Outcome>(body) {
        if let Err(failure) = remote.into_result() {
            tracing::debug!(%status, kind = %failure.kind(), "decoded remote failure");
            return failure.into();
        }
    }

    let text = String::from_utf8_lossy(body);
    failure_for(kind, status, text.trim())
}

fn success_from_body<T: DeserializeOwned>(status: StatusCode, body: &[u8]) -> Outcome<T> {
    if is_envelope(body) {
        return match serde_json::from_slice::<Outcome<T>>(body) {
            Ok(outcome) => outcome,
            Err(err) => invalid_payload(status, &err),
        };
    }

    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        serde_json::from_value::<T>(Value::Null)
    } else {
        serde_json::from_slice::<T>(body)
    };
    match parsed {
        Ok(value) => Outcome::success_value(value),
        Err(err) => invalid_payload(status, &err),
    }
}

fn is_envelope(body: &[u8]) -> bool {
    serde_json::from_slice::<Map<String, Value>>(body).is_ok_and(|object| {
        object.keys().any(|key| {
            key.eq_ignore_ascii_case(FIELD_ERROR) || key.eq_ignore_ascii_case(FIELD_FAILURE_TYPE)
        })
    })
}

fn invalid_payload<T>(status: StatusCode, err: &serde_json::Error) -> Outcome<T> {
    tracing::warn!(%status, error = %err, "response payload did not parse");
    Outcome::failure(format!("Invalid response payload: {err}"))
}

/// Convenience over [`outcome_from_response`] for an `http::Response`.
pub fn from_http_response<T, B>(response: &Response<B>) -> Outcome<T>
where
    T: DeserializeOwned,
    B: AsRef<[u8]>,
{
    outcome_from_response(response.status(), response.body().as_ref())
}

/// Status a server should answer with for this outcome.
pub fn status_for<T>(outcome: &Outcome<T>) -> StatusCode {
    match outcome.failure_kind() {
        FailureKind::None => StatusCode::OK,
        FailureKind::Validation => StatusCode::BAD_REQUEST,
        FailureKind::Security => StatusCode::FORBIDDEN,
        FailureKind::NotFound => StatusCode::NOT_FOUND,
        FailureKind::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        FailureKind::OperationCanceled => {
            StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
        }
        FailureKind::GeneralError => StatusCode::BAD_REQUEST,
    }
}

/// JSON response carrying the wire format of `outcome`.
pub fn into_response<T: Serialize>(
    outcome: &Outcome<T>,
) -> Result<Response<String>, HttpOutcomeError> {
    into_response_with(&OutcomeCodec::default(), outcome)
}

pub fn into_response_with<T: Serialize>(
    codec: &OutcomeCodec,
    outcome: &Outcome<T>,
) -> Result<Response<String>, HttpOutcomeError> {
    let body = codec.encode_to_string(outcome)?;
    let response = Response::builder()
        .status(status_for(outcome))
        .header(CONTENT_TYPE, "application/json")
        .body(body)?;
    Ok(response)
}

fn failure_for<T>(kind: FailureKind, status: StatusCode, body: &str) -> Outcome<T> {
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    } else {
        body.to_string()
    };

    match kind {
        FailureKind::Security => Outcome::security(message),
        FailureKind::NotFound => Outcome::not_found(message),
        FailureKind::ServerError => Outcome::server_error(message),
        FailureKind::OperationCanceled => Outcome::cancelled(message),
        _ => Outcome::failure(message),
    }
}

pub mod prelude {
    pub use crate::{
        from_http_response, into_response, kind_for_status, outcome_from_response,
        outcome_from_status, status_for,
    };
}
