use crate::error::PaymentError;
use crate::payment::types::Currency;

/// Chapa rejects anything below one unit of currency
pub const MINIMUM_AMOUNT: f64 = 1.0;

/// Reject amounts below [`MINIMUM_AMOUNT`] and round the rest to cents.
pub fn validate_and_format_amount(amount: f64) -> Result<f64, PaymentError> {
    validate_and_format_amount_in(amount, Currency::default())
}

pub fn validate_and_format_amount_in(amount: f64, currency: Currency) -> Result<f64, PaymentError> {
    if !amount.is_finite() || amount < MINIMUM_AMOUNT {
        return Err(PaymentError::InvalidAmount {
            amount,
            minimum: MINIMUM_AMOUNT,
            currency: currency.code().to_string(),
        });
    }
    Ok(round_to_cents(amount))
}

/// Round half away from zero at two decimals.
///
/// Works on the shortest decimal representation of `amount`, so `10.005`
/// rounds up even though its binary value sits just below the midpoint.
pub fn round_to_cents(amount: f64) -> f64 {
    if !amount.is_finite() {
        return amount;
    }

    let repr = amount.abs().to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    // Past u128 range f64 has no cent precision left to round
    let Some(whole_cents) = whole.parse::<u128>().ok().and_then(|w| w.checked_mul(100)) else {
        return amount;
    };

    let digits = fraction.as_bytes();
    let digit = |i: usize| digits.get(i).map_or(0, |d| u128::from(d - b'0'));

    let mut cents = whole_cents + digit(0) * 10 + digit(1);
    if digit(2) >= 5 {
        cents += 1;
    }

    (cents as f64 / 100.0).copysign(amount)
}
