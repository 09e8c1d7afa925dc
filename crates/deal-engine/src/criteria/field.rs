use crate::property::Property;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Shape of the data a property field holds, used to validate operators against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Text,
    Flag,
    List,
}

impl FieldKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Number => "numeric",
            Self::Text => "text",
            Self::Flag => "boolean",
            Self::List => "list",
        }
    }
}

/// Property attribute a rule may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyField {
    Address,
    City,
    State,
    ZipCode,
    PropertyType,
    Latitude,
    Longitude,
    Price,
    CurrentValue,
    CapRate,
    CashFlow,
    Roi,
    CashOnCash,
    Ltv,
    EquityPercentage,
    RepairCost,
    Arv,
    Bedrooms,
    Bathrooms,
    SquareFeet,
    LotSize,
    YearBuilt,
    DaysOnMarket,
    PriceReductionPct,
    IsDistressed,
    IsForeclosure,
    IsOffMarket,
    Features,
}

const ALL_FIELDS: [PropertyField; 28] = [
    PropertyField::Address,
    PropertyField::City,
    PropertyField::State,
    PropertyField::ZipCode,
    PropertyField::PropertyType,
    PropertyField::Latitude,
    PropertyField::Longitude,
    PropertyField::Price,
    PropertyField::CurrentValue,
    PropertyField::CapRate,
    PropertyField::CashFlow,
    PropertyField::Roi,
    PropertyField::CashOnCash,
    PropertyField::Ltv,
    PropertyField::EquityPercentage,
    PropertyField::RepairCost,
    PropertyField::Arv,
    PropertyField::Bedrooms,
    PropertyField::Bathrooms,
    PropertyField::SquareFeet,
    PropertyField::LotSize,
    PropertyField::YearBuilt,
    PropertyField::DaysOnMarket,
    PropertyField::PriceReductionPct,
    PropertyField::IsDistressed,
    PropertyField::IsForeclosure,
    PropertyField::IsOffMarket,
    PropertyField::Features,
];

impl PropertyField {
    pub const fn all() -> [Self; 28] {
        ALL_FIELDS
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Address => "address",
            Self::City => "city",
            Self::State => "state",
            Self::ZipCode => "zip_code",
            Self::PropertyType => "property_type",
            Self::Latitude => "latitude",
            Self::Longitude => "longitude",
            Self::Price => "price",
            Self::CurrentValue => "current_value",
            Self::CapRate => "cap_rate",
            Self::CashFlow => "cash_flow",
            Self::Roi => "roi",
            Self::CashOnCash => "cash_on_cash",
            Self::Ltv => "ltv",
            Self::EquityPercentage => "equity_percentage",
            Self::RepairCost => "repair_cost",
            Self::Arv => "arv",
            Self::Bedrooms => "bedrooms",
            Self::Bathrooms => "bathrooms",
            Self::SquareFeet => "square_feet",
            Self::LotSize => "lot_size",
            Self::YearBuilt => "year_built",
            Self::DaysOnMarket => "days_on_market",
            Self::PriceReductionPct => "price_reduction_pct",
            Self::IsDistressed => "is_distressed",
            Self::IsForeclosure => "is_foreclosure",
            Self::IsOffMarket => "is_off_market",
            Self::Features => "features",
        }
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            Self::Address | Self::City | Self::State | Self::ZipCode | Self::PropertyType => {
                FieldKind::Text
            }
            Self::IsDistressed | Self::IsForeclosure | Self::IsOffMarket => FieldKind::Flag,
            Self::Features => FieldKind::List,
            _ => FieldKind::Number,
        }
    }

    /// Reads the field from `property`; `None` means the value is unknown.
    pub fn resolve(self, property: &Property) -> Option<FieldValue<'_>> {
        match self {
            Self::Address => text_value(&property.address),
            Self::City => text_value(&property.city),
            Self::State => text_value(&property.state),
            Self::ZipCode => text_value(&property.zip_code),
            Self::PropertyType => text_value(&property.property_type),
            Self::Latitude => number_value(property.latitude),
            Self::Longitude => number_value(property.longitude),
            Self::Price => number_value(property.price()),
            Self::CurrentValue => number_value(property.current_value),
            Self::CapRate => number_value(property.cap_rate),
            Self::CashFlow => number_value(property.cash_flow),
            Self::Roi => number_value(property.roi),
            Self::CashOnCash => number_value(property.cash_on_cash),
            Self::Ltv => number_value(property.ltv),
            Self::EquityPercentage => number_value(property.equity_percentage),
            Self::RepairCost => number_value(property.repair_cost),
            Self::Arv => number_value(property.arv),
            Self::Bedrooms => number_value(property.bedrooms.map(f64::from)),
            Self::Bathrooms => number_value(property.bathrooms),
            Self::SquareFeet => number_value(property.square_feet),
            Self::LotSize => number_value(property.lot_size),
            Self::YearBuilt => number_value(property.year_built.map(f64::from)),
            Self::DaysOnMarket => number_value(property.days_on_market.map(f64::from)),
            Self::PriceReductionPct => number_value(property.price_reduction_pct),
            Self::IsDistressed => property.is_distressed.map(FieldValue::Flag),
            Self::IsForeclosure => property.is_foreclosure.map(FieldValue::Flag),
            Self::IsOffMarket => property.is_off_market.map(FieldValue::Flag),
            Self::Features => {
                if property.features.is_empty() {
                    None
                } else {
                    Some(FieldValue::List(&property.features))
                }
            }
        }
    }
}

fn text_value(value: &Option<String>) -> Option<FieldValue<'_>> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(FieldValue::Text)
}

fn number_value(value: Option<f64>) -> Option<FieldValue<'static>> {
    value.filter(|n| n.is_finite()).map(FieldValue::Number)
}

impl fmt::Display for PropertyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PropertyField {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let normalized = match normalized.as_str() {
            "zip" | "zipcode" => "zip_code",
            "asking_price" | "list_price" => "price",
            "sqft" => "square_feet",
            "equity_pct" => "equity_percentage",
            other => other,
        };

        ALL_FIELDS
            .iter()
            .copied()
            .find(|field| field.name() == normalized)
            .ok_or(())
    }
}

/// A resolved, non-null property value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Number(f64),
    Text(&'a str),
    Flag(bool),
    List(&'a [String]),
}
