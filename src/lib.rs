pub mod affordability;
pub mod calculator;
pub mod dataset;
pub mod geo;
pub mod pages;
pub mod server;
pub mod types;
pub mod zipcode;

pub use affordability::{AffordabilityResult, evaluate, parse_salary};
pub use calculator::{Calculator, CalculatorInit, CalculatorView};
pub use dataset::{DataConfig, RentData};
pub use geo::StateIndex;
pub use types::{CityData, CityListing, LocationRecord, ZipEntry};
pub use zipcode::{ZipIndex, ZipLookup, lookup};
