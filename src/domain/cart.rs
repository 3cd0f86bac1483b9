//! Cart line-item arithmetic, independent of persistence.
//!
//! The mutation command is a single tagged union; the source system had
//! grown two competing conventions (relative increment/decrement and
//! absolute set-with-variation) and this keeps exactly one shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One mutation against a cart line item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum CartAction {
    Increment,
    Decrement,
    Set { quantity: i32 },
}

/// A line item as the cart manager sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct Line {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: Decimal,
}

impl Line {
    pub fn total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Outcome of applying a [`CartAction`] to an existing line item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    Quantity(i32),
    /// Quantity reached zero; the line item must be removed.
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartCommandError {
    #[error("Quantity must be positive")]
    NonPositiveQuantity,
    #[error("Product not found in cart")]
    MissingLineItem,
}

/// Apply an action to a line item that already holds `current` units.
pub fn apply(current: i32, action: CartAction) -> Result<Applied, CartCommandError> {
    match action {
        CartAction::Increment => Ok(Applied::Quantity(current + 1)),
        CartAction::Decrement => {
            if current <= 1 {
                Ok(Applied::Remove)
            } else {
                Ok(Applied::Quantity(current - 1))
            }
        }
        CartAction::Set { quantity } => {
            if quantity < 0 {
                Err(CartCommandError::NonPositiveQuantity)
            } else if quantity == 0 {
                Ok(Applied::Remove)
            } else {
                Ok(Applied::Quantity(quantity))
            }
        }
    }
}

/// Initial quantity when the product is new to the cart.
pub fn initial_quantity(action: CartAction) -> Result<i32, CartCommandError> {
    match action {
        CartAction::Increment => Ok(1),
        // Nothing to decrement; the handler maps this to NotFound.
        CartAction::Decrement => Err(CartCommandError::MissingLineItem),
        CartAction::Set { quantity } if quantity > 0 => Ok(quantity),
        CartAction::Set { .. } => Err(CartCommandError::NonPositiveQuantity),
    }
}

/// sum of unit_price * quantity over the live line items.
pub fn subtotal(lines: &[Line]) -> Decimal {
    lines.iter().map(Line::total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(qty: i32, price: i64) -> Line {
        Line {
            product_id: Uuid::new_v4(),
            quantity: qty,
            unit_price: Decimal::new(price, 0),
        }
    }

    #[test]
    fn test_increment_and_decrement() {
        assert_eq!(apply(2, CartAction::Increment).unwrap(), Applied::Quantity(3));
        assert_eq!(apply(2, CartAction::Decrement).unwrap(), Applied::Quantity(1));
        assert_eq!(apply(1, CartAction::Decrement).unwrap(), Applied::Remove);
    }

    #[test]
    fn test_set_quantity() {
        assert_eq!(apply(5, CartAction::Set { quantity: 3 }).unwrap(), Applied::Quantity(3));
        assert_eq!(apply(5, CartAction::Set { quantity: 0 }).unwrap(), Applied::Remove);
        assert!(apply(5, CartAction::Set { quantity: -1 }).is_err());
    }

    #[test]
    fn test_initial_quantity() {
        assert_eq!(initial_quantity(CartAction::Increment).unwrap(), 1);
        assert_eq!(initial_quantity(CartAction::Set { quantity: 4 }).unwrap(), 4);
    }

    #[test]
    fn test_initial_quantity_errors_are_distinct() {
        // Decrement on an absent line item is a missing-item case, not
        // a bad quantity; the handlers render them as 404 and 400.
        assert_eq!(
            initial_quantity(CartAction::Decrement),
            Err(CartCommandError::MissingLineItem)
        );
        assert_eq!(
            initial_quantity(CartAction::Set { quantity: 0 }),
            Err(CartCommandError::NonPositiveQuantity)
        );
        assert_eq!(
            initial_quantity(CartAction::Set { quantity: -2 }),
            Err(CartCommandError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_subtotal() {
        let lines = [line(2, 100), line(1, 50)];
        assert_eq!(subtotal(&lines), Decimal::new(250, 0));
    }

    #[test]
    fn test_action_wire_format() {
        let inc: CartAction = serde_json::from_str(r#"{"op":"increment"}"#).unwrap();
        assert_eq!(inc, CartAction::Increment);
        let set: CartAction = serde_json::from_str(r#"{"op":"set","quantity":3}"#).unwrap();
        assert_eq!(set, CartAction::Set { quantity: 3 });
        assert!(serde_json::from_str::<CartAction>(r#"{"op":"zap"}"#).is_err());
    }
}
