//! Core types for Wellnest.
//!
//! Type-safe wrappers for domain concepts plus the pure rules that decide
//! whether a write is allowed.

pub mod cart;
pub mod coupon;
pub mod email;
pub mod id;
pub mod order;
pub mod order_number;
pub mod permission;
pub mod price;
pub mod rank;
pub mod status;

pub use cart::{MAX_LINE_QUANTITY, normalize_add_quantity};
pub use coupon::{CouponRejection, ValidityWindow, normalize_code};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{OrderItem, OrderItemError, PricedItem, merge_items, order_total};
pub use order_number::{OrderNumber, OrderNumberError};
pub use permission::{MissingScope, PermissionScope, PermissionSet};
pub use price::Price;
pub use rank::{RankAssignment, RankError, RankList, validate_members};
pub use status::*;
