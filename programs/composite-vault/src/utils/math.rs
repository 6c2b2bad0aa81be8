use anchor_lang::prelude::*;

use crate::errors::ErrorCode;

/// Computes `value * numerator / denominator` with a u128 intermediate,
/// rounding down. Overflow of the final u64 result is an error, never
/// wrapped.
pub fn mul_div(value: u64, numerator: u64, denominator: u64) -> Result<u64> {
    require!(denominator > 0, ErrorCode::MathOverflow);

    let product = (value as u128)
        .checked_mul(numerator as u128)
        .ok_or_else(|| error!(ErrorCode::MathOverflow))?;

    let result = product / (denominator as u128);

    u64::try_from(result).map_err(|_| error!(ErrorCode::MathOverflow))
}

/// Basis-point fraction of `amount`, rounding down.
pub fn bps_of(amount: u64, bps: u64) -> Result<u64> {
    mul_div(amount, bps, crate::constants::MAX_BPS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mul_div_rounds_down() {
        assert_eq!(mul_div(100, 3, 2).unwrap(), 150);
        assert_eq!(mul_div(100, 1, 3).unwrap(), 33);
    }

    #[test]
    fn mul_div_handles_wide_products() {
        assert_eq!(mul_div(u64::MAX, 2, 4).unwrap(), u64::MAX / 2);
    }

    #[test]
    fn mul_div_rejects_zero_denominator() {
        assert!(mul_div(1, 1, 0).is_err());
    }

    #[test]
    fn mul_div_rejects_overflowing_result() {
        assert!(mul_div(u64::MAX, 3, 2).is_err());
    }

    #[test]
    fn bps_fraction() {
        assert_eq!(bps_of(1000, 100).unwrap(), 10);
        assert_eq!(bps_of(1000, 10_000).unwrap(), 1000);
        assert_eq!(bps_of(1000, 0).unwrap(), 0);
    }
}
