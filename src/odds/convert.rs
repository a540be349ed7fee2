//! Conversion between fractional and decimal odds.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::OddsError;

use super::types::{DecimalOdds, FractionalOdds};

/// Largest scale a `Decimal` can carry.
const MAX_SCALE: u32 = 28;

/// Convert fractional odds to decimal odds: `1 + numerator/denominator`.
///
/// The result must be exact. A fraction terminates only when its reduced
/// denominator has no prime factors besides 2 and 5; anything else (thirds,
/// sevenths, ...) is rejected with [`OddsError::NotRepresentable`] rather
/// than rounded, as is a result needing more than 28 fractional digits or
/// more than 96 bits of mantissa.
/// The result is normalized, so `10/1` gives `11` and `1/2` gives `1.5`.
pub fn to_decimal(odds: FractionalOdds) -> Result<DecimalOdds, OddsError> {
    let not_representable = || OddsError::NotRepresentable {
        numerator: odds.numerator(),
        denominator: odds.denominator(),
    };

    let divisor = gcd(odds.numerator(), odds.denominator());
    let numerator = u128::from(odds.numerator() / divisor);
    let denominator = odds.denominator() / divisor;

    let scale = terminating_scale(denominator).ok_or_else(not_representable)?;
    if scale > MAX_SCALE {
        return Err(not_representable());
    }

    // 10^scale is a multiple of the reduced denominator, so this is integral.
    let unit = 10u128.pow(scale);
    let mantissa = numerator
        .checked_mul(unit / u128::from(denominator))
        .and_then(|quotient| quotient.checked_add(unit))
        .and_then(|mantissa| i128::try_from(mantissa).ok())
        .ok_or_else(not_representable)?;

    let decimal = Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|_| not_representable())?
        .normalize();

    DecimalOdds::new(decimal)
}

/// Digits after the point in `1/denominator`, or `None` if it never terminates.
fn terminating_scale(mut denominator: u32) -> Option<u32> {
    let mut twos = 0;
    while denominator % 2 == 0 {
        denominator /= 2;
        twos += 1;
    }
    let mut fives = 0;
    while denominator % 5 == 0 {
        denominator /= 5;
        fives += 1;
    }
    (denominator == 1).then_some(twos.max(fives))
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Known decimal odds and their fractional equivalents.
static LEGACY_TABLE: Lazy<HashMap<Decimal, FractionalOdds>> = Lazy::new(|| {
    HashMap::from([
        (dec!(11.0), FractionalOdds::from_parts(10, 1)),
        (dec!(2.0), FractionalOdds::from_parts(1, 1)),
        (dec!(4.0), FractionalOdds::from_parts(3, 1)),
        (dec!(2.75), FractionalOdds::from_parts(7, 4)),
        (dec!(3.0), FractionalOdds::from_parts(2, 1)),
        (dec!(18.0), FractionalOdds::from_parts(17, 1)),
    ])
});

/// Look up the fractional form of a decimal in the fixed legacy table.
///
/// This is not a general inverse of [`to_decimal`]: anything outside the six
/// tabulated values yields `None`, which points at a gap in the table.
/// Lookup is by value (`11` and `11.0` both hit).
pub fn legacy_fractional(decimal: Decimal) -> Option<FractionalOdds> {
    LEGACY_TABLE.get(&decimal).copied()
}
