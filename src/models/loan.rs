//! Loan application input

use std::fmt;

use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

/// Number of model inputs
pub const FEATURE_COUNT: usize = 10;

/// Model input columns, in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    CreditUtilizationRatio,
    DebtToIncomeRatio,
    MonthlyIncome,
    BorrowerAge,
    OpenLoansCount,
    RealEstateLoansCount,
    Times30To59DaysLate,
    Times60To89DaysLate,
    Times90DaysLate,
    NumberOfDependents,
}

impl Feature {
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::CreditUtilizationRatio,
        Feature::DebtToIncomeRatio,
        Feature::MonthlyIncome,
        Feature::BorrowerAge,
        Feature::OpenLoansCount,
        Feature::RealEstateLoansCount,
        Feature::Times30To59DaysLate,
        Feature::Times60To89DaysLate,
        Feature::Times90DaysLate,
        Feature::NumberOfDependents,
    ];

    /// Column name as used in the bundle and on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreditUtilizationRatio => "Credit_Utilization_Ratio",
            Self::DebtToIncomeRatio => "Debt_to_Income_Ratio",
            Self::MonthlyIncome => "Monthly_Income",
            Self::BorrowerAge => "Borrower_Age",
            Self::OpenLoansCount => "Open_Loans_Count",
            Self::RealEstateLoansCount => "RealEstate_Loans_Count",
            Self::Times30To59DaysLate => "Times_30_59DaysLate",
            Self::Times60To89DaysLate => "Times_60_89DaysLate",
            Self::Times90DaysLate => "Times_90DaysLate",
            Self::NumberOfDependents => "Number_of_Dependents",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Resolve a `LoanInput` struct field name
    fn from_field(field: &str) -> Option<Self> {
        let feature = match field {
            "credit_utilization_ratio" => Self::CreditUtilizationRatio,
            "debt_to_income_ratio" => Self::DebtToIncomeRatio,
            "monthly_income" => Self::MonthlyIncome,
            "borrower_age" => Self::BorrowerAge,
            "open_loans_count" => Self::OpenLoansCount,
            "real_estate_loans_count" => Self::RealEstateLoansCount,
            "times_30_59_days_late" => Self::Times30To59DaysLate,
            "times_60_89_days_late" => Self::Times60To89DaysLate,
            "times_90_days_late" => Self::Times90DaysLate,
            "number_of_dependents" => Self::NumberOfDependents,
            _ => return None,
        };
        Some(feature)
    }

    pub fn is_integer(&self) -> bool {
        !matches!(
            self,
            Self::CreditUtilizationRatio | Self::DebtToIncomeRatio | Self::MonthlyIncome
        )
    }
}

/// Borrower profile submitted for scoring
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct LoanInput {
    #[serde(rename = "Credit_Utilization_Ratio")]
    #[validate(range(min = 0.0))]
    pub credit_utilization_ratio: f64,

    #[serde(rename = "Debt_to_Income_Ratio")]
    #[validate(range(min = 0.0))]
    pub debt_to_income_ratio: f64,

    #[serde(rename = "Monthly_Income")]
    #[validate(range(min = 0.0))]
    pub monthly_income: f64,

    #[serde(rename = "Borrower_Age", deserialize_with = "whole_number")]
    #[validate(range(min = 18, max = 120))]
    pub borrower_age: i64,

    #[serde(rename = "Open_Loans_Count", deserialize_with = "whole_number")]
    #[validate(range(min = 0))]
    pub open_loans_count: i64,

    #[serde(rename = "RealEstate_Loans_Count", deserialize_with = "whole_number")]
    #[validate(range(min = 0))]
    pub real_estate_loans_count: i64,

    #[serde(rename = "Times_30_59DaysLate", deserialize_with = "whole_number")]
    #[validate(range(min = 0))]
    pub times_30_59_days_late: i64,

    #[serde(rename = "Times_60_89DaysLate", deserialize_with = "whole_number")]
    #[validate(range(min = 0))]
    pub times_60_89_days_late: i64,

    #[serde(rename = "Times_90DaysLate", deserialize_with = "whole_number")]
    #[validate(range(min = 0))]
    pub times_90_days_late: i64,

    #[serde(rename = "Number_of_Dependents", deserialize_with = "whole_number")]
    #[validate(range(min = 0, max = 20))]
    pub number_of_dependents: i64,
}

/// Integer field that also takes whole-valued floats such as `35.0`
fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumber;

    impl<'de> Visitor<'de> for WholeNumber {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a whole number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
            i64::try_from(v).map_err(|_| E::invalid_value(Unexpected::Unsigned(v), &self))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63
            if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 {
                Ok(v as i64)
            } else {
                Err(E::invalid_value(Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumber)
}

/// Dashboard form defaults
impl Default for LoanInput {
    fn default() -> Self {
        Self {
            credit_utilization_ratio: 0.25,
            debt_to_income_ratio: 0.35,
            monthly_income: 2500.0,
            borrower_age: 35,
            open_loans_count: 6,
            real_estate_loans_count: 1,
            times_30_59_days_late: 0,
            times_60_89_days_late: 0,
            times_90_days_late: 0,
            number_of_dependents: 1,
        }
    }
}

/// Rejected input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("{0}")]
    OutOfRange(String),

    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
}

impl LoanInput {
    pub fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::CreditUtilizationRatio => self.credit_utilization_ratio,
            Feature::DebtToIncomeRatio => self.debt_to_income_ratio,
            Feature::MonthlyIncome => self.monthly_income,
            Feature::BorrowerAge => self.borrower_age as f64,
            Feature::OpenLoansCount => self.open_loans_count as f64,
            Feature::RealEstateLoansCount => self.real_estate_loans_count as f64,
            Feature::Times30To59DaysLate => self.times_30_59_days_late as f64,
            Feature::Times60To89DaysLate => self.times_60_89_days_late as f64,
            Feature::Times90DaysLate => self.times_90_days_late as f64,
            Feature::NumberOfDependents => self.number_of_dependents as f64,
        }
    }

    /// Set a feature from its numeric value. Integer columns truncate.
    pub fn set(&mut self, feature: Feature, value: f64) {
        match feature {
            Feature::CreditUtilizationRatio => self.credit_utilization_ratio = value,
            Feature::DebtToIncomeRatio => self.debt_to_income_ratio = value,
            Feature::MonthlyIncome => self.monthly_income = value,
            Feature::BorrowerAge => self.borrower_age = value as i64,
            Feature::OpenLoansCount => self.open_loans_count = value as i64,
            Feature::RealEstateLoansCount => self.real_estate_loans_count = value as i64,
            Feature::Times30To59DaysLate => self.times_30_59_days_late = value as i64,
            Feature::Times60To89DaysLate => self.times_60_89_days_late = value as i64,
            Feature::Times90DaysLate => self.times_90_days_late = value as i64,
            Feature::NumberOfDependents => self.number_of_dependents = value as i64,
        }
    }

    /// Range and finiteness checks. NaN slips through range validation,
    /// so finiteness is checked first.
    pub fn check(&self) -> Result<(), InputError> {
        for feature in Feature::ALL.into_iter().filter(|f| !f.is_integer()) {
            if !self.value(feature).is_finite() {
                return Err(InputError::NotFinite(feature.name()));
            }
        }

        self.validate()
            .map_err(|errors| InputError::OutOfRange(describe_violations(&errors)))
    }
}

fn describe_violations(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let field = field.to_string();
            let name = Feature::from_name(&field)
                .or_else(|| Feature::from_field(&field))
                .map(|f| f.name().to_string())
                .unwrap_or(field);

            let rules: Vec<String> = errs
                .iter()
                .map(|e| match (e.params.get("min"), e.params.get("max")) {
                    (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
                    (Some(min), None) => format!("must be >= {}", min),
                    (None, Some(max)) => format!("must be <= {}", max),
                    (None, None) => format!("failed '{}'", e.code),
                })
                .collect();

            format!("{} {}", name, rules.join(", "))
        })
        .collect();

    parts.sort();
    format!("Validation failed: {}", parts.join("; "))
}
