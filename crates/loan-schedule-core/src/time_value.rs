use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal::RoundingStrategy;

use crate::error::LoanScheduleError;
use crate::types::{Money, Rate};
use crate::LoanScheduleResult;

/// Decimal places every stored money figure is quantized to.
pub const MONEY_DP: u32 = 2;

/// Quantize a money amount to cents using banker's rounding
/// (round half to even).
pub fn round_money(amount: Money) -> Money {
    amount.round_dp_with_strategy(MONEY_DP, RoundingStrategy::MidpointNearestEven)
}

/// Constant payment that amortises `principal` over `nper` periods at
/// `rate` per period (French method).
///
/// Returned as a positive amount: `principal * r / (1 - (1 + r)^-n)`, or
/// straight-line `principal / n` when the rate is zero.
pub fn annuity_payment(principal: Money, rate: Rate, nper: u32) -> LoanScheduleResult<Money> {
    if nper == 0 {
        return Err(LoanScheduleError::invalid_terms(
            "number_of_periods",
            "Number of periods must be > 0",
        ));
    }
    if rate < Decimal::ZERO {
        return Err(LoanScheduleError::invalid_terms(
            "period_rate",
            "Period rate cannot be negative",
        ));
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    // (1 + r)^n computed once; 1 - (1 + r)^-n == (f - 1) / f
    let factor = (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| {
            LoanScheduleError::invalid_terms(
                "period_rate",
                format!("Compounding factor overflows over {nper} periods"),
            )
        })?;
    let annuity_factor = factor - Decimal::ONE;

    if annuity_factor.is_zero() {
        return Err(LoanScheduleError::invalid_terms(
            "period_rate",
            "Period rate too small to compound; annuity factor is zero",
        ));
    }

    // f / (f - 1) stays near 1 however large f grows
    factor
        .checked_div(annuity_factor)
        .and_then(|ratio| principal.checked_mul(rate)?.checked_mul(ratio))
        .ok_or_else(|| {
            LoanScheduleError::invalid_terms(
                "period_rate",
                format!("Payment for {principal} over {nper} periods is out of range"),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_annuity_payment_basic() {
        // 1000 at 1% per month over 12 months ≈ 88.85
        let result = annuity_payment(dec!(1000), dec!(0.01), 12).unwrap();
        assert_eq!(round_money(result), dec!(88.85));
    }

    #[test]
    fn test_annuity_payment_two_percent() {
        // 100k at 2% per period over 12 periods
        let result = annuity_payment(dec!(100000), dec!(0.02), 12).unwrap();
        assert_eq!(round_money(result), dec!(9455.96));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let result = annuity_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(result, dec!(100));
    }

    #[test]
    fn test_annuity_payment_zero_periods() {
        assert!(annuity_payment(dec!(1000), dec!(0.01), 0).is_err());
    }

    #[test]
    fn test_annuity_payment_negative_rate() {
        assert!(annuity_payment(dec!(1000), dec!(-0.01), 12).is_err());
    }

    #[test]
    fn test_annuity_payment_large_factor_stays_in_range() {
        // 2^80 would overflow principal * rate * factor taken left to right
        let result = annuity_payment(dec!(1000000), Decimal::ONE, 80).unwrap();
        assert_eq!(round_money(result), dec!(1000000.00));
    }

    #[test]
    fn test_annuity_payment_overflow_is_an_error() {
        let result = annuity_payment(Decimal::MAX, dec!(2), 12);
        assert!(matches!(result, Err(LoanScheduleError::InvalidTerms { .. })));

        // (1 + 1)^100 does not fit in a Decimal
        let result = annuity_payment(dec!(1000), Decimal::ONE, 100);
        assert!(matches!(result, Err(LoanScheduleError::InvalidTerms { .. })));
    }

    #[test]
    fn test_round_money_bankers() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.34));
        assert_eq!(round_money(dec!(2.355)), dec!(2.36));
        assert_eq!(round_money(dec!(2.3451)), dec!(2.35));
    }
}
