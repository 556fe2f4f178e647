//! Coupon redemption rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalize a coupon code for storage and lookup.
///
/// ```
/// use wellnest_core::normalize_code;
/// assert_eq!(normalize_code("  welcome10 "), "WELCOME10");
/// ```
#[must_use]
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Inclusive validity window of a coupon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidityWindow {
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

/// Why a coupon cannot be redeemed right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CouponRejection {
    #[error("coupon is not active")]
    Inactive,
    #[error("coupon is not valid yet")]
    NotYetValid,
    #[error("coupon has expired")]
    Expired,
}

impl ValidityWindow {
    /// Whether `now` falls inside the window, both ends included.
    #[must_use]
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        self.valid_from <= now && now <= self.valid_to
    }

    /// Check that a coupon with this window can be redeemed at `now`.
    ///
    /// # Errors
    ///
    /// Returns the reason the coupon is rejected.
    pub fn check_redeemable(&self, is_active: bool, now: DateTime<Utc>) -> Result<(), CouponRejection> {
        if !is_active {
            return Err(CouponRejection::Inactive);
        }
        if now < self.valid_from {
            return Err(CouponRejection::NotYetValid);
        }
        if now > self.valid_to {
            return Err(CouponRejection::Expired);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn january_2026() -> ValidityWindow {
        ValidityWindow {
            valid_from: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            valid_to: Utc.with_ymd_and_hms(2026, 1, 31, 23, 59, 59).unwrap(),
        }
    }

    #[test]
    fn test_inside_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(january_2026().check_redeemable(true, now), Ok(()));
    }

    #[test]
    fn test_after_window() {
        let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        assert_eq!(
            january_2026().check_redeemable(true, now),
            Err(CouponRejection::Expired)
        );
    }

    #[test]
    fn test_before_window() {
        let now = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(
            january_2026().check_redeemable(true, now),
            Err(CouponRejection::NotYetValid)
        );
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let window = january_2026();
        assert!(window.contains(window.valid_from));
        assert!(window.contains(window.valid_to));
    }

    #[test]
    fn test_inactive_rejected_inside_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(
            january_2026().check_redeemable(false, now),
            Err(CouponRejection::Inactive)
        );
    }

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code("spring-sale"), "SPRING-SALE");
        assert_eq!(normalize_code("\tVIP\n"), "VIP");
    }
}
