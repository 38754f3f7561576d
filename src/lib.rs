//! Storefront backend: product catalog, per-user cart, and the order/payment
//! lifecycle (cash on delivery or hosted card checkout).

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod store;
pub mod web;
