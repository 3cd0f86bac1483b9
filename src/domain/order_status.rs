//! Order status vocabulary and cancellation guards.
//!
//! The status set is intentionally wide and unconstrained: any status
//! may follow any other through the generic update operation. The only
//! enforced rules are the two cancellation guards in [`can_cancel`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Draft,
    #[serde(rename = "Payment Pending")]
    PaymentPending,
    #[serde(rename = "Payment Confirmed")]
    PaymentConfirmed,
    #[serde(rename = "Order Confirmed")]
    OrderConfirmed,
    #[serde(rename = "Print Ready")]
    PrintReady,
    Shipped,
    Delivered,
    Processing,
    #[serde(rename = "Refund request")]
    RefundRequest,
    Confirmed,
    #[serde(rename = "Return Requested")]
    ReturnRequested,
    Cancelled,
    CancelledRequest,
    #[serde(rename = "Refund Success")]
    RefundSuccess,
    Placed,
    #[default]
    #[serde(rename = "Not Processed")]
    NotProcessed,
    Pending,
    Scheduled,
    Unshipped,
    #[serde(rename = "Transferred to delivery partner")]
    TransferredToDeliveryPartner,
    Received,
    #[serde(rename = "Cancel request")]
    CancelRequest,
    #[serde(rename = "Out for Delivery")]
    OutForDelivery,
    Shipping,
    #[serde(rename = "Processing Refund")]
    ProcessingRefund,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 25] = [
        Self::Draft,
        Self::PaymentPending,
        Self::PaymentConfirmed,
        Self::OrderConfirmed,
        Self::PrintReady,
        Self::Shipped,
        Self::Delivered,
        Self::Processing,
        Self::RefundRequest,
        Self::Confirmed,
        Self::ReturnRequested,
        Self::Cancelled,
        Self::CancelledRequest,
        Self::RefundSuccess,
        Self::Placed,
        Self::NotProcessed,
        Self::Pending,
        Self::Scheduled,
        Self::Unshipped,
        Self::TransferredToDeliveryPartner,
        Self::Received,
        Self::CancelRequest,
        Self::OutForDelivery,
        Self::Shipping,
        Self::ProcessingRefund,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::PaymentPending => "Payment Pending",
            Self::PaymentConfirmed => "Payment Confirmed",
            Self::OrderConfirmed => "Order Confirmed",
            Self::PrintReady => "Print Ready",
            Self::Shipped => "Shipped",
            Self::Delivered => "Delivered",
            Self::Processing => "Processing",
            Self::RefundRequest => "Refund request",
            Self::Confirmed => "Confirmed",
            Self::ReturnRequested => "Return Requested",
            Self::Cancelled => "Cancelled",
            Self::CancelledRequest => "CancelledRequest",
            Self::RefundSuccess => "Refund Success",
            Self::Placed => "Placed",
            Self::NotProcessed => "Not Processed",
            Self::Pending => "Pending",
            Self::Scheduled => "Scheduled",
            Self::Unshipped => "Unshipped",
            Self::TransferredToDeliveryPartner => "Transferred to delivery partner",
            Self::Received => "Received",
            Self::CancelRequest => "Cancel request",
            Self::OutForDelivery => "Out for Delivery",
            Self::Shipping => "Shipping",
            Self::ProcessingRefund => "Processing Refund",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// Why a cancellation request was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelRefusal {
    /// Shipment has progressed too far (`Delivered` or `Shipped`).
    TooLate(OrderStatus),
    AlreadyCancelled,
}

impl fmt::Display for CancelRefusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLate(s) => write!(f, "Order cannot be cancelled once {s}"),
            Self::AlreadyCancelled => write!(f, "Order is already cancelled"),
        }
    }
}

/// The two guards on cancellation. Everything else is permitted.
pub fn can_cancel(status: OrderStatus, is_cancelled: bool) -> Result<(), CancelRefusal> {
    if is_cancelled {
        return Err(CancelRefusal::AlreadyCancelled);
    }
    match status {
        OrderStatus::Delivered | OrderStatus::Shipped => Err(CancelRefusal::TooLate(status)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!("Teleported".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_cancel_guards() {
        assert!(can_cancel(OrderStatus::Confirmed, false).is_ok());
        assert!(can_cancel(OrderStatus::PrintReady, false).is_ok());
        assert_eq!(
            can_cancel(OrderStatus::Shipped, false),
            Err(CancelRefusal::TooLate(OrderStatus::Shipped))
        );
        assert_eq!(
            can_cancel(OrderStatus::Delivered, false),
            Err(CancelRefusal::TooLate(OrderStatus::Delivered))
        );
        assert_eq!(
            can_cancel(OrderStatus::Pending, true),
            Err(CancelRefusal::AlreadyCancelled)
        );
    }

    #[test]
    fn test_serde_uses_wire_names() {
        let json = serde_json::to_string(&OrderStatus::TransferredToDeliveryPartner).unwrap();
        assert_eq!(json, "\"Transferred to delivery partner\"");
        let parsed: OrderStatus = serde_json::from_str("\"Out for Delivery\"").unwrap();
        assert_eq!(parsed, OrderStatus::OutForDelivery);
    }
}
