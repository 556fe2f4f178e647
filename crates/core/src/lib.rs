//! Wellnest Core - Shared domain types and rules.
//!
//! This crate provides the types and pure business rules used across all
//! Wellnest components:
//! - `storefront` - Public-facing shop (cart, orders, events, coupons, addresses)
//! - `admin` - Internal administration console (catalog ordering, order status)
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and rules - no I/O, no database access,
//! no HTTP clients. Every rule that decides whether a write is allowed
//! (coupon validity windows, order status transitions, rank list validation,
//! permission checks) lives here so it can be tested without a database.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money, statuses, order numbers and domain rules
//! - [`error`] - The error taxonomy shared by both HTTP surfaces

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod types;

pub use error::ErrorKind;
pub use types::*;
