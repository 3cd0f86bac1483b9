//! PrintCraft Commerce
//!
//! Storefront backend for a custom print shop: products with paper,
//! colour and quantity variations, per-user carts, orders with a
//! status trail, PDF invoices and server-side template rendering.

pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
