//! Persistence row types and request/response shapes.

pub mod address;
pub mod cart;
pub mod category;
pub mod coupon;
pub mod order;
pub mod product;
pub mod staff;
pub mod user;
