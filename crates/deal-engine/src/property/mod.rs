//! Subject property and comparable sale records supplied by upstream collaborators.

mod validation;

pub use validation::ValidationError;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Subject property handed to the valuation chain and the criteria engine.
///
/// Only `square_feet` is mandatory for valuation; every other attribute is optional and
/// the consuming component decides whether a missing value degrades or fails its result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip_code: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub square_feet: Option<f64>,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub lot_size: Option<f64>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub asking_price: Option<f64>,
    #[serde(default)]
    pub cap_rate: Option<f64>,
    #[serde(default)]
    pub cash_flow: Option<f64>,
    #[serde(default)]
    pub roi: Option<f64>,
    #[serde(default)]
    pub cash_on_cash: Option<f64>,
    #[serde(default)]
    pub ltv: Option<f64>,
    #[serde(default)]
    pub equity_percentage: Option<f64>,
    #[serde(default)]
    pub repair_cost: Option<f64>,
    #[serde(default)]
    pub arv: Option<f64>,
    #[serde(default)]
    pub days_on_market: Option<u32>,
    #[serde(default)]
    pub price_reduction_pct: Option<f64>,
    #[serde(default)]
    pub is_distressed: Option<bool>,
    #[serde(default)]
    pub is_foreclosure: Option<bool>,
    #[serde(default)]
    pub is_off_market: Option<bool>,
    #[serde(default)]
    pub features: Vec<String>,
}

impl Property {
    /// Listing price used by price-based criteria, falling back to the current value.
    pub fn price(&self) -> Option<f64> {
        self.asking_price.or(self.current_value)
    }

    /// Age in whole years relative to `as_of_year`, when the build year is known.
    pub fn age_in(&self, as_of_year: i32) -> Option<i32> {
        self.year_built.map(|year| (as_of_year - year).max(0))
    }

    /// Square footage after validation, for callers that require one.
    pub fn require_square_feet(&self) -> Result<f64, ValidationError> {
        validation::positive_square_feet(self.square_feet)
    }
}

/// A recently sold property used as a pricing reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparableSale {
    pub address: String,
    pub sale_price: f64,
    #[serde(default)]
    pub sale_date: Option<NaiveDate>,
    pub square_feet: f64,
    #[serde(default)]
    pub bedrooms: Option<u32>,
    #[serde(default)]
    pub bathrooms: Option<f64>,
    #[serde(default)]
    pub year_built: Option<i32>,
    #[serde(default)]
    pub property_type: Option<String>,
}

impl ComparableSale {
    /// Days between the sale and `as_of`; negative for sales dated after `as_of`.
    pub fn days_old(&self, as_of: NaiveDate) -> Option<i64> {
        self.sale_date.map(|date| (as_of - date).num_days())
    }
}

pub(crate) use validation::{
    validate_comparables, validate_condition_score, validate_rate, validate_subject,
};
