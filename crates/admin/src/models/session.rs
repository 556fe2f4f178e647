//! Session-related types for admin authentication.
//!
//! The sign-in flow lives outside this service; it stores a
//! [`CurrentAdmin`] (with the admin's resolved scopes) in the session.

use serde::{Deserialize, Serialize};

use wellnest_core::{AdminRole, AdminUserId, Email, MissingScope, PermissionScope, PermissionSet};

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's database ID.
    pub id: AdminUserId,
    /// Admin's email address.
    pub email: Email,
    /// Admin's display name.
    pub name: String,
    /// Admin's role.
    pub role: AdminRole,
    /// Scopes resolved at sign-in.
    pub scopes: PermissionSet,
}

impl CurrentAdmin {
    /// Check that this admin holds `scope`.
    ///
    /// # Errors
    ///
    /// Returns `MissingScope` otherwise.
    pub fn require(&self, scope: PermissionScope) -> Result<(), MissingScope> {
        self.scopes.require(scope).inspect_err(|_| {
            tracing::warn!(admin_id = %self.id, scope = %scope, "permission denied");
        })
    }
}

/// Session keys for admin authentication data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn operator() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminUserId::new(4),
            email: Email::parse("ops@wellnest.health").unwrap(),
            name: "Ops".to_owned(),
            role: AdminRole::Operator,
            scopes: PermissionSet::for_role(AdminRole::Operator),
        }
    }

    #[test]
    fn test_operator_scopes() {
        let admin = operator();
        assert!(admin.require(PermissionScope::Orders).is_ok());
        assert_eq!(
            admin.require(PermissionScope::Catalog),
            Err(MissingScope(PermissionScope::Catalog))
        );
    }

    #[test]
    fn test_session_roundtrip_keeps_scopes() {
        let json = serde_json::to_value(operator()).unwrap();
        assert_eq!(json["scopes"], serde_json::json!(["orders"]));
        let back: CurrentAdmin = serde_json::from_value(json).unwrap();
        assert!(back.scopes.contains(PermissionScope::Orders));
    }
}
