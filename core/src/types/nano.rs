use num_bigint::BigUint;
use num_traits::Zero;

use super::NanoParseError;

pub const NANO_DECIMALS: usize = 9;
pub const NANOS_PER_TON: u64 = 1_000_000_000;

/// Converts a decimal TON amount (e.g. `"0.02"`) into nanotons.
///
/// The conversion is exact: amounts with more than 9 fractional digits are rejected
/// instead of being rounded.
pub fn to_nano(amount: &str) -> Result<BigUint, NanoParseError> {
    let trimmed = amount.trim();
    let (int_part, frac_part) = match trimmed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (trimmed, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(NanoParseError::new(amount, "Empty amount"));
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return Err(NanoParseError::new(amount, "Only decimal digits are allowed"));
    }
    if frac_part.len() > NANO_DECIMALS {
        return Err(NanoParseError::new(
            amount,
            format!("At most {} fractional digits are allowed", NANO_DECIMALS),
        ));
    }

    let digits = format!(
        "{}{}{}",
        int_part,
        frac_part,
        "0".repeat(NANO_DECIMALS - frac_part.len())
    );
    BigUint::parse_bytes(digits.as_bytes(), 10)
        .ok_or_else(|| NanoParseError::new(amount, "Can't parse digits"))
}

/// Formats nanotons as a decimal TON amount without trailing zeros.
pub fn from_nano(nanos: &BigUint) -> String {
    let ton = BigUint::from(NANOS_PER_TON);
    let int_part = nanos / &ton;
    let frac_part = nanos % &ton;
    if frac_part.is_zero() {
        int_part.to_string()
    } else {
        let frac = format!("{:0>width$}", frac_part.to_string(), width = NANO_DECIMALS);
        format!("{}.{}", int_part, frac.trim_end_matches('0'))
    }
}
