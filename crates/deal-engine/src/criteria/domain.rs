use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn default_weight() -> f64 {
    1.0
}

/// Independent rule grouping inside a criteria set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    Geographic,
    Financial,
    Property,
    Market,
    Custom,
}

impl Facet {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Geographic,
            Self::Financial,
            Self::Property,
            Self::Market,
            Self::Custom,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Geographic => "geographic",
            Self::Financial => "financial",
            Self::Property => "property",
            Self::Market => "market",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comparison a rule applies between a property field and its configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleOperator {
    Equals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Between,
    In,
    NotIn,
    Contains,
}

impl RuleOperator {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::GreaterThan => "greater_than",
            Self::LessThan => "less_than",
            Self::GreaterEqual => "greater_equal",
            Self::LessEqual => "less_equal",
            Self::Between => "between",
            Self::In => "in",
            Self::NotIn => "not_in",
            Self::Contains => "contains",
        }
    }
}

impl fmt::Display for RuleOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleOperator {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let operator = match value.trim().to_ascii_lowercase().as_str() {
            "equals" | "eq" | "==" => Self::Equals,
            "greater_than" | "gt" | ">" => Self::GreaterThan,
            "less_than" | "lt" | "<" => Self::LessThan,
            "greater_equal" | "gte" | ">=" => Self::GreaterEqual,
            "less_equal" | "lte" | "<=" => Self::LessEqual,
            "between" => Self::Between,
            "in" => Self::In,
            "not_in" => Self::NotIn,
            "contains" => Self::Contains,
            _ => return Err(()),
        };
        Ok(operator)
    }
}

/// Configured comparison value. Lists back `between`, `in`, and `not_in`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CriterionValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<CriterionValue>),
}

impl CriterionValue {
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::List(_) => "list",
        }
    }
}

impl From<f64> for CriterionValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for CriterionValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for CriterionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl<T: Into<CriterionValue>> From<Vec<T>> for CriterionValue {
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}

/// Declarative rule as it arrives from a criteria store; validated when compiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriteriaRule {
    #[serde(default)]
    pub id: Option<String>,
    pub field: String,
    pub operator: String,
    pub value: CriterionValue,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

impl CriteriaRule {
    pub fn new(field: &str, operator: RuleOperator, value: impl Into<CriterionValue>) -> Self {
        Self {
            id: None,
            field: field.to_string(),
            operator: operator.as_str().to_string(),
            value: value.into(),
            weight: default_weight(),
            required: false,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Numeric bound; either side may be open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeCriterion {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

impl RangeCriterion {
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            weight: default_weight(),
            required: false,
        }
    }

    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
            weight: default_weight(),
            required: false,
        }
    }

    pub fn at_most(max: f64) -> Self {
        Self {
            min: None,
            max: Some(max),
            weight: default_weight(),
            required: false,
        }
    }

    pub fn weighted(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Allow or deny list of text values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetCriterion {
    pub values: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

impl SetCriterion {
    pub fn of(values: &[&str]) -> Self {
        Self {
            values: values.iter().map(|value| value.to_string()).collect(),
            weight: default_weight(),
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Great-circle distance filter around a point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusCriterion {
    pub latitude: f64,
    pub longitude: f64,
    pub max_miles: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

/// Expected value of a boolean market flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagCriterion {
    pub expected: bool,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

impl FlagCriterion {
    pub fn expect(expected: bool) -> Self {
        Self {
            expected,
            weight: default_weight(),
            required: false,
        }
    }
}

/// Feature names a property must have (one rule each) or must not have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCriterion {
    pub features: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeographicCriteria {
    pub states: Option<SetCriterion>,
    pub excluded_states: Option<SetCriterion>,
    pub cities: Option<SetCriterion>,
    pub excluded_cities: Option<SetCriterion>,
    pub zip_codes: Option<SetCriterion>,
    pub excluded_zip_codes: Option<SetCriterion>,
    pub radius: Option<RadiusCriterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialCriteria {
    pub price: Option<RangeCriterion>,
    pub cap_rate: Option<RangeCriterion>,
    pub cash_flow: Option<RangeCriterion>,
    pub roi: Option<RangeCriterion>,
    pub cash_on_cash: Option<RangeCriterion>,
    pub ltv: Option<RangeCriterion>,
    pub equity_percentage: Option<RangeCriterion>,
    pub repair_cost: Option<RangeCriterion>,
    pub arv: Option<RangeCriterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyCriteria {
    pub bedrooms: Option<RangeCriterion>,
    pub bathrooms: Option<RangeCriterion>,
    pub square_feet: Option<RangeCriterion>,
    pub lot_size: Option<RangeCriterion>,
    pub year_built: Option<RangeCriterion>,
    pub property_types: Option<SetCriterion>,
    pub required_features: Option<FeatureCriterion>,
    pub excluded_features: Option<FeatureCriterion>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketCriteria {
    pub days_on_market: Option<RangeCriterion>,
    pub price_reduction_pct: Option<RangeCriterion>,
    pub distressed: Option<FlagCriterion>,
    pub foreclosure: Option<FlagCriterion>,
    pub off_market: Option<FlagCriterion>,
}

/// Relative weight of each facet in the overall score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetWeights {
    pub geographic: f64,
    pub financial: f64,
    pub property: f64,
    pub market: f64,
    pub custom: f64,
}

impl Default for FacetWeights {
    fn default() -> Self {
        Self {
            geographic: 1.0,
            financial: 1.0,
            property: 1.0,
            market: 1.0,
            custom: 1.0,
        }
    }
}

impl FacetWeights {
    pub fn weight(&self, facet: Facet) -> f64 {
        match facet {
            Facet::Geographic => self.geographic,
            Facet::Financial => self.financial,
            Facet::Property => self.property,
            Facet::Market => self.market,
            Facet::Custom => self.custom,
        }
    }
}

/// Investor buy box: declarative facets plus free-form custom rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentCriteria {
    pub name: Option<String>,
    pub geographic: GeographicCriteria,
    pub financial: FinancialCriteria,
    pub property: PropertyCriteria,
    pub market: MarketCriteria,
    pub custom_rules: Vec<CriteriaRule>,
    pub facet_weights: FacetWeights,
}
