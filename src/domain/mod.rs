//! Core domain logic: cart arithmetic, order status machine, events.

pub mod cart;
pub mod events;
pub mod order_status;

pub use cart::{Applied, CartAction};
pub use order_status::{can_cancel, CancelRefusal, OrderStatus};
