//! Domain models for the storefront.

pub mod address;
pub mod cart;
pub mod coupon;
pub mod event;
pub mod order;
pub mod session;

pub use address::{Address, NewAddress};
pub use cart::CartLine;
pub use coupon::{Coupon, CouponGrant, Redemption};
pub use event::{Event, Registrant, Registration};
pub use order::{NewOrder, Order, OrderDetail, OrderLine, ShippingSnapshot};
pub use session::{CurrentUser, keys as session_keys};
