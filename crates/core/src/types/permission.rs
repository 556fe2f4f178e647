//! Admin permission scopes.
//!
//! Authorization is a membership check of a fixed scope against the set
//! held by the signed-in admin. Roles only provide a default set; an admin
//! row can carry a narrower or wider explicit set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AdminRole;

/// A capability an admin may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionScope {
    /// Subscription plans and banners.
    Catalog,
    /// Promotions and their product lists.
    Promotions,
    /// Order status changes.
    Orders,
    Events,
    Coupons,
    /// Creating and editing other admin accounts.
    AdminUsers,
}

impl PermissionScope {
    pub const ALL: [Self; 6] = [
        Self::Catalog,
        Self::Promotions,
        Self::Orders,
        Self::Events,
        Self::Coupons,
        Self::AdminUsers,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Catalog => "catalog",
            Self::Promotions => "promotions",
            Self::Orders => "orders",
            Self::Events => "events",
            Self::Coupons => "coupons",
            Self::AdminUsers => "admin_users",
        }
    }
}

impl std::fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermissionScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("invalid permission scope: {s}"))
    }
}

/// Authorization failure: the admin lacks `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("missing permission scope '{0}'")]
pub struct MissingScope(pub PermissionScope);

/// The scopes held by an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<PermissionScope>);

impl PermissionSet {
    #[must_use]
    pub fn all() -> Self {
        Self(PermissionScope::ALL.into_iter().collect())
    }

    /// Default scopes granted by `role`.
    #[must_use]
    pub fn for_role(role: AdminRole) -> Self {
        match role {
            AdminRole::SuperAdmin => Self::all(),
            AdminRole::Admin => [
                PermissionScope::Catalog,
                PermissionScope::Promotions,
                PermissionScope::Orders,
                PermissionScope::Events,
                PermissionScope::Coupons,
            ]
            .into_iter()
            .collect(),
            AdminRole::Operator => std::iter::once(PermissionScope::Orders).collect(),
        }
    }

    #[must_use]
    pub fn contains(&self, scope: PermissionScope) -> bool {
        self.0.contains(&scope)
    }

    /// # Errors
    ///
    /// Returns `MissingScope` if `scope` is not in the set.
    pub fn require(&self, scope: PermissionScope) -> Result<(), MissingScope> {
        if self.contains(scope) {
            Ok(())
        } else {
            Err(MissingScope(scope))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = PermissionScope> + '_ {
        self.0.iter().copied()
    }

    /// Scope names, for storage in a `TEXT[]` column.
    #[must_use]
    pub fn to_names(&self) -> Vec<String> {
        self.iter().map(|s| s.as_str().to_owned()).collect()
    }

    /// Parse scope names read from storage.
    ///
    /// # Errors
    ///
    /// Returns the first unknown name.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        names
            .iter()
            .map(|n| n.as_ref().parse::<PermissionScope>())
            .collect()
    }
}

impl FromIterator<PermissionScope> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionScope>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
