//! # Telemetry: Observability for Outcomes
//!
//! [`Traced`] decorates any outcome-producing future with a span and logs how
//! it resolved. [`init_tracing`] installs a stdout subscriber for binaries and
//! tests.

use crate::config::TelemetryConfig;
use crate::kind::{FailureKind, OutcomeCategory};
use crate::outcome::Outcome;
use std::future::Future;
use thiserror::Error;
use tracing::{Instrument, info_span};
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("failed to install tracing subscriber: {0}")]
    Install(String),
}

/// Installs a `tracing-subscriber` fmt subscriber.
///
/// `RUST_LOG` wins over `config.filter` when set.
pub fn init_tracing(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| TelemetryError::Install(err.to_string()))
}

/// Logs a resolved outcome: info on success, warn on cancellation, error otherwise.
pub fn record<T>(name: &str, outcome: &Outcome<T>) {
    let kind = outcome.failure_kind();
    let category = outcome.category();
    match kind {
        FailureKind::None if category >= OutcomeCategory::Warning => {
            tracing::warn!(step = name, %category, "Outcome succeeded with warning");
        }
        FailureKind::None => {
            tracing::info!(step = name, %category, "Outcome succeeded");
        }
        FailureKind::OperationCanceled => {
            tracing::warn!(step = name, reason = outcome.error_message(), "Outcome cancelled");
        }
        _ => {
            tracing::error!(
                step = name,
                %kind,
                %category,
                reason = outcome.error_message(),
                fields = outcome.field_failures().len(),
                "Outcome failed"
            );
        }
    }
}

/// A wrapper that adds a span and a resolution log to an outcome future.
pub struct Traced<F> {
    inner: F,
    name: String,
}

impl<F> Traced<F> {
    pub fn new(inner: F, name: &str) -> Self {
        Self {
            inner,
            name: name.to_string(),
        }
    }

    pub async fn run<T>(self) -> Outcome<T>
    where
        F: Future<Output = Outcome<T>>,
    {
        let Traced { inner, name } = self;
        let span = info_span!("Outcome", verdict.step = %name);

        async move {
            let start = std::time::Instant::now();
            let outcome = inner.await;
            tracing::debug!(duration = ?start.elapsed(), "step resolved");
            record(&name, &outcome);
            outcome
        }
        .instrument(span)
        .await
    }
}
