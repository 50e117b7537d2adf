//! Dashboard form fields

use std::collections::HashMap;

use crate::models::{Feature, LoanInput};

/// Widget definition for one input
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub feature: Feature,
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    pub step: f64,
    /// Layout column (0..3)
    pub column: usize,
}

impl FieldSpec {
    const fn new(
        feature: Feature,
        label: &'static str,
        (min, max): (f64, f64),
        default: f64,
        step: f64,
        column: usize,
    ) -> Self {
        Self { feature, label, min, max, default, step, column }
    }

    pub fn name(&self) -> &'static str {
        self.feature.name()
    }

    pub fn default_text(&self) -> String {
        format_number(self.default)
    }

    /// Parse and bounds-check a submitted value
    pub fn parse(&self, raw: Option<&str>) -> Result<f64, String> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(format!("{} is required", self.label));
        }

        let value = if self.feature.is_integer() {
            raw.parse::<i64>()
                .map(|v| v as f64)
                .map_err(|_| format!("{} must be a whole number", self.label))?
        } else {
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("{} must be a number", self.label))?
        };

        if value < self.min || value > self.max {
            return Err(format!(
                "{} must be between {} and {}",
                self.label,
                format_number(self.min),
                format_number(self.max)
            ));
        }

        Ok(value)
    }
}

pub const FIELDS: [FieldSpec; 10] = [
    FieldSpec::new(Feature::BorrowerAge, "Borrower Age (years)", (18.0, 100.0), 35.0, 1.0, 0),
    FieldSpec::new(Feature::OpenLoansCount, "Open Loans / Credit Lines", (0.0, 60.0), 6.0, 1.0, 0),
    FieldSpec::new(Feature::RealEstateLoansCount, "Real Estate Loans / Mortgages", (0.0, 30.0), 1.0, 1.0, 0),
    FieldSpec::new(Feature::NumberOfDependents, "Number of Dependents", (0.0, 15.0), 1.0, 1.0, 0),
    FieldSpec::new(Feature::MonthlyIncome, "Monthly Income (GBP)", (0.0, 50000.0), 2500.0, 50.0, 1),
    FieldSpec::new(Feature::DebtToIncomeRatio, "Debt-to-Income Ratio", (0.0, 10000.0), 0.35, 0.01, 1),
    FieldSpec::new(Feature::CreditUtilizationRatio, "Credit Utilization Ratio", (0.0, 10000.0), 0.25, 0.01, 1),
    FieldSpec::new(Feature::Times30To59DaysLate, "Times 30–59 Days Late (2 yrs)", (0.0, 100.0), 0.0, 1.0, 2),
    FieldSpec::new(Feature::Times60To89DaysLate, "Times 60–89 Days Late (2 yrs)", (0.0, 100.0), 0.0, 1.0, 2),
    FieldSpec::new(Feature::Times90DaysLate, "Times 90+ Days Late (2 yrs)", (0.0, 100.0), 0.0, 1.0, 2),
];

/// Raw values shown in the form, keyed by field name
pub type FormValues = HashMap<String, String>;

pub fn default_values() -> FormValues {
    FIELDS
        .iter()
        .map(|f| (f.name().to_string(), f.default_text()))
        .collect()
}

/// Build a `LoanInput` from a submitted form, collecting every field error
pub fn parse_form(values: &FormValues) -> Result<LoanInput, Vec<String>> {
    let mut input = LoanInput::default();
    let mut errors = Vec::new();

    for field in &FIELDS {
        match field.parse(values.get(field.name()).map(String::as_str)) {
            Ok(value) => input.set(field.feature, value),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(input)
    } else {
        Err(errors)
    }
}

fn format_number(value: f64) -> String {
    value.to_string()
}
