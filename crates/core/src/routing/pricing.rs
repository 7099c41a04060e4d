//! Distance, duration and price arithmetic in `Decimal`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_MINUTE: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

fn round_half_up(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

/// Metres to kilometres, two decimals. `None` for negative or non-finite
/// input.
#[must_use]
pub fn distance_km(meters: f64) -> Option<Decimal> {
    let meters = Decimal::from_f64_retain(meters)?;
    if meters.is_sign_negative() {
        return None;
    }
    Some(round_half_up(meters / Decimal::ONE_THOUSAND, 2))
}

/// Seconds to whole minutes. `None` for negative or non-finite input.
#[must_use]
pub fn duration_minutes(seconds: f64) -> Option<i64> {
    let seconds = Decimal::from_f64_retain(seconds)?;
    if seconds.is_sign_negative() {
        return None;
    }
    round_half_up(seconds / SECONDS_PER_MINUTE, 0).to_i64()
}

/// `base + km * unit_rate`, two decimals.
#[must_use]
pub fn listing_price(base: Decimal, km: Decimal, unit_rate: Decimal) -> Decimal {
    round_half_up(base + km * unit_rate, 2)
}
