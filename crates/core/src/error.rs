//! Error taxonomy shared by the storefront and admin surfaces.
//!
//! Each binary has its own `AppError`, but every variant resolves to one of
//! these kinds. The kind is serialized into error responses so clients can
//! tell "registration closed" apart from "bad request" without parsing
//! messages.

use serde::{Deserialize, Serialize};

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No owner or admin identity on the request.
    Unauthenticated,
    /// Admin identity present but missing the required permission scope.
    Forbidden,
    /// Referenced entity is absent (or not visible to the caller).
    NotFound,
    /// Malformed or missing required input.
    ValidationFailed,
    /// Event registration over its capacity.
    CapacityExceeded,
    /// Coupon is inactive or outside its validity window.
    WindowInvalid,
    /// State conflict, e.g. consuming an already-used grant.
    Conflict,
    /// Unexpected persistence or infrastructure failure.
    Internal,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    ///
    /// Capacity and window failures are client errors (400); they are
    /// distinguished from plain validation failures by the kind itself.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::ValidationFailed | Self::CapacityExceeded | Self::WindowInvalid => 400,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }

    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::ValidationFailed => "validation_failed",
            Self::CapacityExceeded => "capacity_exceeded",
            Self::WindowInvalid => "window_invalid",
            Self::Conflict => "conflict",
            Self::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorKind::Unauthenticated.status_code(), 401);
        assert_eq!(ErrorKind::Forbidden.status_code(), 403);
        assert_eq!(ErrorKind::NotFound.status_code(), 404);
        assert_eq!(ErrorKind::ValidationFailed.status_code(), 400);
        assert_eq!(ErrorKind::CapacityExceeded.status_code(), 400);
        assert_eq!(ErrorKind::WindowInvalid.status_code(), 400);
        assert_eq!(ErrorKind::Conflict.status_code(), 409);
        assert_eq!(ErrorKind::Internal.status_code(), 500);
    }

    #[test]
    fn test_serialized_name_matches_as_str() {
        for kind in [
            ErrorKind::Unauthenticated,
            ErrorKind::Forbidden,
            ErrorKind::NotFound,
            ErrorKind::ValidationFailed,
            ErrorKind::CapacityExceeded,
            ErrorKind::WindowInvalid,
            ErrorKind::Conflict,
            ErrorKind::Internal,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
