//! Admin user domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use wellnest_core::{AdminRole, AdminUserId, Email, PermissionSet};

/// An admin account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    pub id: AdminUserId,
    pub email: Email,
    pub name: String,
    pub role: AdminRole,
    /// Effective scopes: the explicit set if one is stored, else the role default.
    pub scopes: PermissionSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
