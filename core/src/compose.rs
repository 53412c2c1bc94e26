//! Async composition over `Outcome`.
//!
//! This is the async counterpart of the dispatch and aggregation layers, plus
//! monadic chaining:
//!
//! * `then_async` (bind): short-circuits on failure, the next step decides the
//!   new payload type and category.
//! * `map_async` (functor): transforms the payload only, keeping the category.
//!
//! Failures crossing a payload type change keep kind, category, message and
//! field map untouched. Only the selected handler is ever awaited.

use crate::aggregate::{combine, combine_values};
use crate::dispatch::{Arm, arm_for};
use crate::failure::FieldFailures;
use crate::outcome::{Outcome, State};
use futures_util::future::join_all;
use std::future::Future;

impl<T> Outcome<T> {
    /// Monadic bind. `next` never runs for a failure.
    pub async fn then_async<U, F, Fut>(self, next: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        match self.retype() {
            Ok(failed) => {
                tracing::debug!(kind = %failed.failure_kind(), "then_async short-circuited");
                failed
            }
            Err((value, _)) => next(value).await,
        }
    }

    /// Payload transform. The result keeps this outcome's category.
    pub async fn map_async<U, F, Fut>(self, transform: F) -> Outcome<U>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        match self.retype() {
            Ok(failed) => {
                tracing::debug!(kind = %failed.failure_kind(), "map_async short-circuited");
                failed
            }
            Err((value, category)) => {
                Outcome::success_value_with(transform(value).await, category)
            }
        }
    }

    pub async fn match_with_async<R, S, SFut, F, FFut>(self, on_success: S, on_failure: F) -> R
    where
        S: FnOnce(T) -> SFut,
        SFut: Future<Output = R>,
        F: FnOnce(String) -> FFut,
        FFut: Future<Output = R>,
    {
        match self.into_result() {
            Ok(value) => on_success(value).await,
            Err(failure) => on_failure(failure.message().to_string()).await,
        }
    }

    pub async fn match_kind_async<R, S, SFut, E, EFut, Sec, SecFut, V, VFut, C, CFut>(
        self,
        on_success: S,
        on_error: E,
        on_security: Sec,
        on_validation: V,
        on_cancelled: C,
    ) -> R
    where
        S: FnOnce(T) -> SFut,
        SFut: Future<Output = R>,
        E: FnOnce(String) -> EFut,
        EFut: Future<Output = R>,
        Sec: FnOnce(String) -> SecFut,
        SecFut: Future<Output = R>,
        V: FnOnce(FieldFailures) -> VFut,
        VFut: Future<Output = R>,
        C: FnOnce(String) -> CFut,
        CFut: Future<Output = R>,
    {
        let failure = match self.state {
            State::Success { value, .. } => return on_success(value).await,
            State::Failure(failure) => failure,
        };
        match arm_for(&failure) {
            Arm::Error(message) => on_error(message.to_string()).await,
            Arm::Security(message) => on_security(message.to_string()).await,
            Arm::Validation(failures) => on_validation(failures.clone()).await,
            Arm::Cancelled(message) => on_cancelled(message.to_string()).await,
        }
    }

    /// Async [`Outcome::switch`]: cancellations are skipped.
    pub async fn switch_async<S, SFut, F, FFut>(self, on_success: S, on_failure: F)
    where
        S: FnOnce(T) -> SFut,
        SFut: Future<Output = ()>,
        F: FnOnce(String) -> FFut,
        FFut: Future<Output = ()>,
    {
        self.switch_with_async(on_success, on_failure, false).await;
    }

    pub async fn switch_with_async<S, SFut, F, FFut>(
        self,
        on_success: S,
        on_failure: F,
        include_cancelled: bool,
    ) where
        S: FnOnce(T) -> SFut,
        SFut: Future<Output = ()>,
        F: FnOnce(String) -> FFut,
        FFut: Future<Output = ()>,
    {
        match self.into_result() {
            Ok(value) => on_success(value).await,
            Err(failure) if failure.is_cancellation() && !include_cancelled => {
                tracing::debug!(reason = failure.message(), "switch_async skipped cancellation");
            }
            Err(failure) => on_failure(failure.message().to_string()).await,
        }
    }

    pub async fn switch_kind_async<S, SFut, E, EFut, Sec, SecFut, V, VFut, C, CFut>(
        self,
        on_success: S,
        on_error: E,
        on_security: Sec,
        on_validation: V,
        on_cancelled: Option<C>,
    ) where
        S: FnOnce(T) -> SFut,
        SFut: Future<Output = ()>,
        E: FnOnce(String) -> EFut,
        EFut: Future<Output = ()>,
        Sec: FnOnce(String) -> SecFut,
        SecFut: Future<Output = ()>,
        V: FnOnce(FieldFailures) -> VFut,
        VFut: Future<Output = ()>,
        C: FnOnce(String) -> CFut,
        CFut: Future<Output = ()>,
    {
        let failure = match self.state {
            State::Success { value, .. } => return on_success(value).await,
            State::Failure(failure) => failure,
        };
        match arm_for(&failure) {
            Arm::Error(message) => on_error(message.to_string()).await,
            Arm::Security(message) => on_security(message.to_string()).await,
            Arm::Validation(failures) => on_validation(failures.clone()).await,
            Arm::Cancelled(message) => match on_cancelled {
                Some(handler) => handler(message.to_string()).await,
                None => tracing::debug!(reason = message, "switch_kind_async skipped cancellation"),
            },
        }
    }
}

/// Awaits every task concurrently, then combines sequentially (see [`combine`]).
pub async fn combine_async<T, I>(tasks: I) -> Outcome<()>
where
    I: IntoIterator,
    I::Item: Future<Output = Outcome<T>>,
{
    let resolved = join_all(tasks).await;
    combine(&resolved)
}

/// Awaits every task concurrently, then applies [`combine_values`].
pub async fn combine_values_async<T, I>(tasks: I) -> Outcome<T>
where
    I: IntoIterator,
    I::Item: Future<Output = Outcome<T>>,
{
    combine_values(join_all(tasks).await)
}

/// Chaining directly on a pending outcome, without awaiting each step.
///
/// ```rust,ignore
/// let total = load_order(id)
///     .then_async(|order| price(order))
///     .map_async(|price| async move { price * 2 })
///     .await;
/// ```
pub trait OutcomeFutureExt<T>: Future<Output = Outcome<T>> + Sized {
    fn then_async<U, F, Fut>(self, next: F) -> impl Future<Output = Outcome<U>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Outcome<U>>,
    {
        async move { self.await.then_async(next).await }
    }

    fn map_async<U, F, Fut>(self, transform: F) -> impl Future<Output = Outcome<U>>
    where
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = U>,
    {
        async move { self.await.map_async(transform).await }
    }
}

impl<T, Fut> OutcomeFutureExt<T> for Fut where Fut: Future<Output = Outcome<T>> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{FailureKind, OutcomeCategory};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_then_async_short_circuits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let failed: Outcome<i32> = Outcome::failure("boom");

        let next: Outcome<String> = failed
            .then_async(|v| async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Outcome::success_value(v.to_string())
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(next.error_message(), "boom");
        assert_eq!(next.failure_kind(), FailureKind::GeneralError);
    }

    #[tokio::test]
    async fn test_then_async_returns_next_unwrapped() {
        let next = Outcome::success_value(3)
            .then_async(|v| async move {
                Outcome::success_value_with(v + 1, OutcomeCategory::Information)
            })
            .await;
        assert_eq!(next.try_get_value(), Some(&4));
        assert_eq!(next.category(), OutcomeCategory::Information);
    }

    #[tokio::test]
    async fn test_map_async_keeps_category() {
        let mapped = Outcome::success_value_with(5, OutcomeCategory::Warning)
            .map_async(|x| async move { x * 2 })
            .await;
        assert_eq!(mapped.try_get_value(), Some(&10));
        assert_eq!(mapped.category(), OutcomeCategory::Warning);
    }

    #[tokio::test]
    async fn test_map_async_keeps_validation_failure() {
        let invalid: Outcome<i32> = Outcome::field_failure("Qty", "negative");
        let mapped = invalid.map_async(|x| async move { x as u64 }).await;
        assert_eq!(mapped.failure_kind(), FailureKind::Validation);
        assert_eq!(mapped.field_failures()["Qty"], vec!["negative"]);
    }

    #[tokio::test]
    async fn test_match_kind_async_runs_single_branch() {
        let label = Outcome::<u8>::security("expired")
            .match_kind_async(
                |_| async { "success".to_string() },
                |m| async move { format!("error:{m}") },
                |m| async move { format!("security:{m}") },
                |_| async { "validation".to_string() },
                |_| async { "cancelled".to_string() },
            )
            .await;
        assert_eq!(label, "security:expired");
    }

    #[tokio::test]
    async fn test_switch_async_skips_cancellation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (a, b) = (calls.clone(), calls.clone());
        Outcome::<()>::cancelled("stop")
            .switch_async(
                |_| async move {
                    a.fetch_add(1, Ordering::SeqCst);
                },
                |_| async move {
                    b.fetch_add(1, Ordering::SeqCst);
                },
            )
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let c = calls.clone();
        Outcome::<()>::cancelled("stop")
            .switch_kind_async(
                |_| async {},
                |_| async {},
                |_| async {},
                |_| async {},
                Some(|_| async move {
                    c.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_combine_async_waits_for_all() {
        let slow = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Outcome::<()>::field_failure("A", "late")
        };
        let fast = async { Outcome::<()>::field_failure("A", "early") };
        let tasks: Vec<std::pin::Pin<Box<dyn Future<Output = Outcome> + Send>>> =
            vec![Box::pin(slow), Box::pin(fast)];

        let combined = combine_async(tasks).await;
        // Input order, not completion order.
        assert_eq!(combined.field_failures()["A"], vec!["late", "early"]);
    }

    #[tokio::test]
    async fn test_combine_values_async_first_success() {
        let tasks = (1..=3).map(|n| async move { Outcome::success_value(n) });
        let combined = combine_values_async(tasks).await;
        assert_eq!(combined.try_get_value(), Some(&1));
    }

    #[tokio::test]
    async fn test_future_ext_chains_pending_outcomes() {
        async fn load(id: u32) -> Outcome<u32> {
            if id == 0 {
                Outcome::not_found("no order 0")
            } else {
                Outcome::success_value(id * 100)
            }
        }

        let priced = load(2)
            .then_async(|cents| async move { Outcome::success_value(cents + 1) })
            .map_async(|cents| async move { format!("{cents}c") })
            .await;
        assert_eq!(priced.try_get_value().map(String::as_str), Some("201c"));

        let missing = load(0)
            .map_async(|cents| async move { cents + 1 })
            .await;
        assert_eq!(missing.failure_kind(), FailureKind::NotFound);
    }
}
