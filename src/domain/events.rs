//! Domain events, published to NATS when a broker is configured.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::order_status::OrderStatus;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderCreated {
        order_id: Uuid,
        user_id: Uuid,
        amount: Decimal,
        status: OrderStatus,
    },
    OrderStatusChanged {
        order_id: Uuid,
        from: OrderStatus,
        to: OrderStatus,
    },
    OrderCancelled {
        order_id: Uuid,
        user_id: Uuid,
    },
    ProductSold {
        product_id: Uuid,
        quantity: i32,
    },
}

impl DomainEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::OrderCreated { .. } => "printcraft.orders.created",
            Self::OrderStatusChanged { .. } => "printcraft.orders.status",
            Self::OrderCancelled { .. } => "printcraft.orders.cancelled",
            Self::ProductSold { .. } => "printcraft.products.sold",
        }
    }
}

/// Fire-and-forget publish; a missing broker or serialization failure
/// never fails the request.
pub async fn publish(nats: &Option<async_nats::Client>, event: DomainEvent) {
    let Some(client) = nats else { return };
    let payload = match serde_json::to_vec(&event) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize domain event");
            return;
        }
    };
    if let Err(e) = client.publish(event.subject(), payload.into()).await {
        tracing::warn!(error = %e, subject = event.subject(), "failed to publish domain event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_subjects() {
        let e = DomainEvent::OrderCancelled {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        };
        assert_eq!(e.subject(), "printcraft.orders.cancelled");
    }

    #[test]
    fn test_event_serializes_with_wire_status() {
        let e = DomainEvent::OrderCreated {
            order_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Decimal::new(260, 0),
            status: OrderStatus::Confirmed,
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["kind"], "order_created");
        assert_eq!(json["status"], "Confirmed");
    }
}
