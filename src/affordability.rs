//! Rent affordability against estimated take-home pay.
//!
//! Net income uses a simplified single-filer model: the standard deduction,
//! one blended federal rate picked by taxable-income tier, and flat payroll
//! tax (Social Security + Medicare). Rent is affordable when it takes at most
//! 45% of monthly take-home pay.

use serde::Serialize;

/// Single filer standard deduction (2024/25)
pub const STANDARD_DEDUCTION: f64 = 14_600.0;
/// Taxable income above which the upper blended rate applies
pub const UPPER_TIER_FLOOR: f64 = 100_525.0;
/// Taxable income above which the middle blended rate applies
pub const MIDDLE_TIER_FLOOR: f64 = 47_150.0;
pub const UPPER_TIER_RATE: f64 = 0.22;
/// Blend of the 12% and 22% brackets
pub const MIDDLE_TIER_RATE: f64 = 0.18;
/// Blend of the 10% and 12% brackets
pub const LOWER_TIER_RATE: f64 = 0.11;
/// Social Security + Medicare
pub const PAYROLL_TAX_RATE: f64 = 0.0765;
/// Maximum share of take-home pay rent may take, in percent
pub const AFFORDABLE_PERCENT: f64 = 45.0;
/// Gross-income multiple landlords typically ask for (the 30% rule)
pub const RENT_TO_INCOME_MULTIPLE: f64 = 3.33;

/// Verdict for one salary / rent pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AffordabilityResult {
    pub is_affordable: bool,
    /// Rent as a share of monthly take-home pay, unrounded
    pub percent_of_income: f64,
    pub monthly_net: f64,
}

impl AffordabilityResult {
    /// Percentage rounded to one decimal, e.g. "35.3"
    pub fn percent_display(&self) -> String {
        format!("{:.1}", self.percent_of_income)
    }
}

/// Parse a salary as typed by a user ("65,000", "$72000.50").
///
/// Returns `None` for anything that is not a positive finite number.
pub fn parse_salary(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('$').unwrap_or(raw).trim_start();
    let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

/// Parse a monthly rent in whole dollars ("1,500", "$1500").
pub fn parse_rent(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let raw = raw.strip_prefix('$').unwrap_or(raw).trim_start();
    let cleaned: String = raw.chars().filter(|&c| c != ',').collect();
    cleaned.parse().ok().filter(|&rent: &u32| rent > 0)
}

/// Taxable income after the standard deduction, never negative
pub fn taxable_income(annual_salary: f64) -> f64 {
    (annual_salary - STANDARD_DEDUCTION).max(0.0)
}

/// Blended federal rate for a taxable income. Tier floors are exclusive.
pub fn federal_rate(taxable: f64) -> f64 {
    if taxable > UPPER_TIER_FLOOR {
        UPPER_TIER_RATE
    } else if taxable > MIDDLE_TIER_FLOOR {
        MIDDLE_TIER_RATE
    } else {
        LOWER_TIER_RATE
    }
}

/// Estimated annual take-home pay
pub fn annual_net(annual_salary: f64) -> f64 {
    let taxable = taxable_income(annual_salary);
    let federal_tax = taxable * federal_rate(taxable);
    let payroll_tax = annual_salary * PAYROLL_TAX_RATE;
    annual_salary - federal_tax - payroll_tax
}

pub fn monthly_net(annual_salary: f64) -> f64 {
    annual_net(annual_salary) / 12.0
}

/// Evaluate a salary against a monthly rent.
///
/// `None` means the inputs are incomplete: no rent resolved, no usable
/// salary, or a zero rent. Nothing is substituted for a missing input.
pub fn evaluate(
    annual_salary: Option<f64>,
    monthly_rent: Option<u32>,
) -> Option<AffordabilityResult> {
    let salary = annual_salary.filter(|s| s.is_finite() && *s > 0.0)?;
    let rent = monthly_rent.filter(|r| *r > 0)?;

    let monthly_net = monthly_net(salary);
    let percent_of_income = f64::from(rent) / monthly_net * 100.0;

    Some(AffordabilityResult {
        is_affordable: percent_of_income <= AFFORDABLE_PERCENT,
        percent_of_income,
        monthly_net,
    })
}

/// Evaluate straight from the salary text a user typed
pub fn evaluate_input(salary: &str, monthly_rent: Option<u32>) -> Option<AffordabilityResult> {
    evaluate(parse_salary(salary), monthly_rent)
}

/// Annual gross salary typically needed to be approved for `rent`
pub fn recommended_salary(rent: u32) -> u64 {
    (f64::from(rent) * RENT_TO_INCOME_MULTIPLE * 12.0).round() as u64
}
