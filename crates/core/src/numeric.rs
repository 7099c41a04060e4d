//! Fixed-point limits of the price and distance columns.

use rust_decimal::Decimal;

/// Decimal places stored for prices and distances.
pub const SCALE: u32 = 2;

/// Total digits of a price column.
pub const PRICE_PRECISION: u32 = 12;

/// Total digits of a distance column.
pub const DISTANCE_PRECISION: u32 = 10;

/// Exclusive upper bound of a `NUMERIC(precision, 2)` column.
pub(crate) const fn upper_bound(precision: u32) -> u64 {
    10_u64.pow(precision - SCALE)
}

/// Whether `value` is stored unrounded in a `NUMERIC(precision, 2)` column.
pub(crate) fn fits(value: Decimal, precision: u32) -> bool {
    let normalized = value.normalize();
    normalized.scale() <= SCALE && normalized.abs() < Decimal::from(upper_bound(precision))
}
