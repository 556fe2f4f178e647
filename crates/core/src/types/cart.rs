//! Cart quantity rules.

/// Largest quantity a single cart or order line may carry.
pub const MAX_LINE_QUANTITY: i32 = 9_999;

/// Quantity used for an add-to-cart request.
///
/// A missing, zero or negative quantity adds one unit; values above
/// [`MAX_LINE_QUANTITY`] are clamped.
#[must_use]
pub fn normalize_add_quantity(requested: Option<i64>) -> i32 {
    match requested {
        Some(q) if q > 0 => i32::try_from(q)
            .unwrap_or(MAX_LINE_QUANTITY)
            .min(MAX_LINE_QUANTITY),
        _ => 1,
    }
}
