//! Domain models for admin.

pub mod admin_user;
pub mod catalog;
pub mod order;
pub mod session;

pub use admin_user::AdminUser;
pub use catalog::{PromotionProduct, RankedCollection};
pub use order::AdminOrder;
pub use session::CurrentAdmin;
pub use session::keys as session_keys;
