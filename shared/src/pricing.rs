//! Order pricing rules
//!
//! Money is fixed-point and stored with two decimal places. Both the
//! server and the browser preview use these functions, so a basket total
//! shown before submission matches the persisted order.

use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places for stored currency amounts
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(10,2)` column holds
pub const MAX_MONEY: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, MONEY_SCALE);

/// Round a currency amount to storage precision (half away from zero).
/// The result always carries two decimal places, so `10` becomes `10.00`.
pub fn round_money(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Keep an amount only if it fits in a stored money column
pub fn storable(amount: Decimal) -> Option<Decimal> {
    (amount.abs() <= MAX_MONEY).then_some(amount)
}

/// Total for one order line, or `None` when it exceeds `MAX_MONEY`
pub fn line_total(unit_price: Decimal, quantity: i32) -> Option<Decimal> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .map(round_money)
        .and_then(storable)
}

/// Sum of line totals, or `None` when the sum exceeds `MAX_MONEY`
pub fn sum_money<I>(amounts: I) -> Option<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, amount| acc.checked_add(amount))
        .and_then(storable)
}

/// Total for a set of `(unit_price, quantity)` lines
pub fn order_total<I>(lines: I) -> Option<Decimal>
where
    I: IntoIterator<Item = (Decimal, i32)>,
{
    lines
        .into_iter()
        .map(|(unit_price, quantity)| line_total(unit_price, quantity))
        .collect::<Option<Vec<_>>>()
        .and_then(sum_money)
}
