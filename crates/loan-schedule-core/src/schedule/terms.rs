use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoanScheduleError;
use crate::types::{Money, Rate};
use crate::LoanScheduleResult;

/// Unit the nominal rate is quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum RatePeriod {
    Annual,
    Monthly,
}

/// How often installments fall due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PaymentFrequency {
    Monthly,
    /// Two periods per month, due every 15 days
    Biweekly,
    /// Four periods per month, due every 7 days
    Weekly,
}

impl PaymentFrequency {
    /// Periods per month. Weekly is the 4-per-month approximation.
    pub fn periods_per_month(self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 1,
            PaymentFrequency::Biweekly => 2,
            PaymentFrequency::Weekly => 4,
        }
    }

    pub fn periods_per_year(self) -> u32 {
        self.periods_per_month() * 12
    }

    /// Fixed day offset between due dates; `None` for calendar months.
    pub fn day_offset(self) -> Option<u64> {
        match self {
            PaymentFrequency::Monthly => None,
            PaymentFrequency::Biweekly => Some(15),
            PaymentFrequency::Weekly => Some(7),
        }
    }
}

impl FromStr for RatePeriod {
    type Err = LoanScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "annual" | "anual" => Ok(RatePeriod::Annual),
            "monthly" | "mensual" => Ok(RatePeriod::Monthly),
            other => Err(LoanScheduleError::invalid_terms(
                "rate_period",
                format!("unrecognised rate period '{other}' (expected annual or monthly)"),
            )),
        }
    }
}

impl FromStr for PaymentFrequency {
    type Err = LoanScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "mensual" => Ok(PaymentFrequency::Monthly),
            "biweekly" | "quincenal" => Ok(PaymentFrequency::Biweekly),
            "weekly" | "semanal" => Ok(PaymentFrequency::Weekly),
            other => Err(LoanScheduleError::invalid_terms(
                "payment_frequency",
                format!("unrecognised payment frequency '{other}' (expected monthly, biweekly or weekly)"),
            )),
        }
    }
}

impl TryFrom<String> for RatePeriod {
    type Error = LoanScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for PaymentFrequency {
    type Error = LoanScheduleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for RatePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RatePeriod::Annual => "annual",
            RatePeriod::Monthly => "monthly",
        })
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentFrequency::Monthly => "monthly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Weekly => "weekly",
        })
    }
}

/// Terms of a loan as captured at origination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Percentage, e.g. 24.00 for 24%
    pub nominal_rate: Decimal,
    pub rate_period: RatePeriod,
    /// Term in months
    pub term_length: i32,
    pub payment_frequency: PaymentFrequency,
    pub disbursement_date: NaiveDate,
    #[serde(default)]
    pub grace_days: u32,
    /// Fraction of the outstanding installment charged per overdue day
    #[serde(default)]
    pub daily_penalty_rate: Rate,
}

impl LoanTerms {
    /// Reject terms no schedule can be built from.
    pub fn validate(&self) -> LoanScheduleResult<()> {
        if self.principal <= Decimal::ZERO {
            return Err(LoanScheduleError::invalid_terms(
                "principal",
                "Principal must be positive",
            ));
        }
        if self.nominal_rate < Decimal::ZERO {
            return Err(LoanScheduleError::invalid_terms(
                "nominal_rate",
                "Nominal rate cannot be negative",
            ));
        }
        if self.term_length <= 0 {
            return Err(LoanScheduleError::invalid_terms(
                "term_length",
                "Term must be at least 1 month",
            ));
        }
        if self.daily_penalty_rate < Decimal::ZERO {
            return Err(LoanScheduleError::invalid_terms(
                "daily_penalty_rate",
                "Daily penalty rate cannot be negative",
            ));
        }
        Ok(())
    }

    /// Nominal rate normalised to a per-month decimal fraction.
    pub fn monthly_rate(&self) -> Rate {
        let rate = self.nominal_rate / dec!(100);
        match self.rate_period {
            RatePeriod::Annual => rate / dec!(12),
            RatePeriod::Monthly => rate,
        }
    }

    /// Rate applicable to one payment period.
    pub fn period_rate(&self) -> Rate {
        self.monthly_rate() / Decimal::from(self.payment_frequency.periods_per_month())
    }

    pub fn number_of_periods(&self) -> LoanScheduleResult<u32> {
        let months = u32::try_from(self.term_length).map_err(|_| {
            LoanScheduleError::invalid_terms("term_length", "Term must be at least 1 month")
        })?;
        match months.checked_mul(self.payment_frequency.periods_per_month()) {
            Some(n) if n > 0 => Ok(n),
            Some(_) => Err(LoanScheduleError::invalid_terms(
                "term_length",
                "Schedule would have no periods",
            )),
            None => Err(LoanScheduleError::invalid_terms(
                "term_length",
                "Number of periods overflows",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> LoanTerms {
        LoanTerms {
            principal: dec!(100000),
            nominal_rate: dec!(24.00),
            rate_period: RatePeriod::Annual,
            term_length: 12,
            payment_frequency: PaymentFrequency::Monthly,
            disbursement_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            grace_days: 5,
            daily_penalty_rate: dec!(0.001),
        }
    }

    #[test]
    fn test_period_rate_annual_monthly() {
        assert_eq!(terms().period_rate(), dec!(0.02));
        assert_eq!(terms().number_of_periods().unwrap(), 12);
    }

    #[test]
    fn test_period_rate_monthly_quote_not_annualised() {
        let mut t = terms();
        t.rate_period = RatePeriod::Monthly;
        t.nominal_rate = dec!(3);
        assert_eq!(t.monthly_rate(), dec!(0.03));
        assert_eq!(t.period_rate(), dec!(0.03));
    }

    #[test]
    fn test_period_rate_biweekly_and_weekly() {
        let mut t = terms();
        t.payment_frequency = PaymentFrequency::Biweekly;
        assert_eq!(t.period_rate(), dec!(0.01));
        assert_eq!(t.number_of_periods().unwrap(), 24);

        t.payment_frequency = PaymentFrequency::Weekly;
        assert_eq!(t.period_rate(), dec!(0.005));
        assert_eq!(t.number_of_periods().unwrap(), 48);
        assert_eq!(t.payment_frequency.periods_per_year(), 48);
    }

    #[test]
    fn test_validate_rejects_bad_terms() {
        let mut t = terms();
        t.term_length = 0;
        assert!(matches!(
            t.validate(),
            Err(LoanScheduleError::InvalidTerms { ref field, .. }) if field == "term_length"
        ));

        let mut t = terms();
        t.principal = dec!(-1);
        assert!(t.validate().is_err());

        let mut t = terms();
        t.nominal_rate = dec!(-0.5);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_unknown_frequency_is_rejected() {
        let err = "fortnightly".parse::<PaymentFrequency>().unwrap_err();
        assert!(matches!(err, LoanScheduleError::InvalidTerms { .. }));
        assert!("yearly".parse::<RatePeriod>().is_err());
    }

    #[test]
    fn test_legacy_codes_parse() {
        assert_eq!("quincenal".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Biweekly);
        assert_eq!("Semanal".parse::<PaymentFrequency>().unwrap(), PaymentFrequency::Weekly);
        assert_eq!("anual".parse::<RatePeriod>().unwrap(), RatePeriod::Annual);
    }

    #[test]
    fn test_deserialize_rejects_unknown_frequency() {
        let json = r#"{
            "principal": "1000",
            "nominal_rate": "12",
            "rate_period": "annual",
            "term_length": 6,
            "payment_frequency": "daily",
            "disbursement_date": "2024-01-01"
        }"#;
        let err = serde_json::from_str::<LoanTerms>(json).unwrap_err();
        assert!(err.to_string().contains("payment_frequency"));
    }

    #[test]
    fn test_serialize_round_trips_enum_names() {
        let json = serde_json::to_value(terms()).unwrap();
        assert_eq!(json["rate_period"], "annual");
        assert_eq!(json["payment_frequency"], "monthly");
        let back: LoanTerms = serde_json::from_value(json).unwrap();
        assert_eq!(back, terms());
    }
}
