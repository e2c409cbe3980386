//! Calculator session state.
//!
//! Mirrors what a visitor sees on a page: a zip box, a salary box, a
//! location header, an optional rent banner and a result panel. Every input
//! change recomputes the view from scratch.

use crate::affordability::{self, AffordabilityResult};
use crate::zipcode::{self, ZipIndex, ZipLookup};

pub const ENTER_ZIP_LABEL: &str = "Enter Zip Code";
pub const NOT_FOUND_LABEL: &str = "LOCATION NOT FOUND";
pub const ENTER_SALARY_HINT: &str = "Enter salary to see result";
pub const ENTER_DETAILS_HINT: &str = "Enter details to calculate";

/// Optional pre-fill, e.g. from a city page
#[derive(Debug, Clone, Default)]
pub struct CalculatorInit {
    pub zip: Option<String>,
    pub rent: Option<u32>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Unselected,
    Named(String),
    NotFound,
}

#[derive(Debug, Clone)]
pub struct Calculator {
    zip: String,
    salary: String,
    location: Location,
    rent: Option<u32>,
}

/// Everything needed to render the calculator
#[derive(Debug, Clone, PartialEq)]
pub struct CalculatorView {
    pub location_label: String,
    pub zip: String,
    pub salary: String,
    /// Rent banner; `None` hides it
    pub rent: Option<u32>,
    pub salary_enabled: bool,
    pub result: Option<AffordabilityResult>,
    /// Shown in the result panel while `result` is `None`
    pub placeholder: &'static str,
}

impl Calculator {
    pub fn new(init: CalculatorInit) -> Self {
        let location = match init.name {
            Some(name) if !name.trim().is_empty() => Location::Named(name),
            _ => Location::Unselected,
        };
        Self {
            zip: init
                .zip
                .map(|z| zipcode::normalize_zip_input(&z).to_string())
                .unwrap_or_default(),
            salary: String::new(),
            location,
            rent: init.rent.filter(|r| *r > 0),
        }
    }

    /// Apply a new zip input.
    ///
    /// Partial input and an unloaded index leave the resolved location as it
    /// was; only a complete zip or clearing the box changes it.
    pub fn set_zip(&mut self, index: Option<&ZipIndex>, input: &str) {
        self.zip = zipcode::normalize_zip_input(input).to_string();

        match zipcode::lookup(index, &self.zip) {
            ZipLookup::Found(record) => {
                self.location = Location::Named(record.city);
                self.rent = Some(record.rent);
            }
            ZipLookup::NotFound => {
                self.location = Location::NotFound;
                self.rent = None;
            }
            ZipLookup::Empty => {
                self.location = Location::Unselected;
                self.rent = None;
            }
            ZipLookup::Incomplete | ZipLookup::NotReady => {}
        }
    }

    pub fn set_salary(&mut self, input: &str) {
        self.salary = input.trim().to_string();
    }

    pub fn rent(&self) -> Option<u32> {
        self.rent
    }

    pub fn result(&self) -> Option<AffordabilityResult> {
        affordability::evaluate_input(&self.salary, self.rent)
    }

    pub fn view(&self) -> CalculatorView {
        let location_label = match &self.location {
            Location::Unselected => ENTER_ZIP_LABEL.to_string(),
            Location::Named(name) => name.to_uppercase(),
            Location::NotFound => NOT_FOUND_LABEL.to_string(),
        };
        let placeholder = if self.rent.is_some() {
            ENTER_SALARY_HINT
        } else {
            ENTER_DETAILS_HINT
        };
        CalculatorView {
            location_label,
            zip: self.zip.clone(),
            salary: self.salary.clone(),
            rent: self.rent,
            salary_enabled: self.rent.is_some(),
            result: self.result(),
            placeholder,
        }
    }
}
