//! Session-related types.
//!
//! Identity placed in the session by the external login flow.

use serde::{Deserialize, Serialize};

use wellnest_core::{Email, UserId};

/// Session-stored owner identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Owner's database ID.
    pub id: UserId,
    /// Owner's email address.
    pub email: Email,
    /// Display name, used to prefill event registrations.
    pub name: String,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in owner.
    pub const CURRENT_USER: &str = "current_user";
}
