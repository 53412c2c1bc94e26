//! Request contracts (CQRS).
//!
//! A request names its API endpoint and its response type; a handler turns it
//! into an [`Outcome`]. Commands change state, queries only read it.

use crate::outcome::Outcome;
use async_trait::async_trait;

/// A request addressed to an API endpoint.
pub trait ApiRequest: Send + Sync {
    /// Payload of a successful response.
    type Response: Send;

    /// Endpoint path, e.g. `"/api/orders/42"`.
    fn endpoint(&self) -> String;
}

/// A state-changing request.
pub trait Command: ApiRequest {}

/// A read-only request.
pub trait Query: ApiRequest {}

/// Handles one request type.
#[async_trait]
pub trait RequestHandler<R>: Send + Sync
where
    R: ApiRequest + 'static,
{
    async fn handle(&self, request: R) -> Outcome<R::Response>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::FailureKind;
    use std::collections::HashMap;

    struct GetOrder {
        id: u32,
    }

    impl ApiRequest for GetOrder {
        type Response = String;

        fn endpoint(&self) -> String {
            format!("/api/orders/{}", self.id)
        }
    }

    impl Query for GetOrder {}

    struct OrderBook {
        orders: HashMap<u32, String>,
    }

    #[async_trait]
    impl RequestHandler<GetOrder> for OrderBook {
        async fn handle(&self, request: GetOrder) -> Outcome<String> {
            match self.orders.get(&request.id) {
                Some(order) => Outcome::success_value(order.clone()),
                None => Outcome::not_found(format!("no order at {}", request.endpoint())),
            }
        }
    }

    #[tokio::test]
    async fn test_handler_returns_outcome() {
        let book = OrderBook {
            orders: HashMap::from([(1, "espresso".to_string())]),
        };

        let found = book.handle(GetOrder { id: 1 }).await;
        assert_eq!(found.try_get_value().map(String::as_str), Some("espresso"));

        let missing = book.handle(GetOrder { id: 9 }).await;
        assert_eq!(missing.failure_kind(), FailureKind::NotFound);
        assert_eq!(missing.error_message(), "no order at /api/orders/9");
    }
}
