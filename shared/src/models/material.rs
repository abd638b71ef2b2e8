//! Material Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Stock-keeping unit of measure
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Unit {
    #[default]
    #[serde(rename = "un")]
    Unit,
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "m2")]
    SquareMeter,
    #[serde(rename = "m3")]
    CubicMeter,
    #[serde(rename = "kg")]
    Kilogram,
}

impl Unit {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unit => "un",
            Self::Meter => "m",
            Self::SquareMeter => "m²",
            Self::CubicMeter => "m³",
            Self::Kilogram => "kg",
        }
    }
}

/// Inventory material entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    pub unit: Unit,
    /// Stock on hand, clamped non-negative on every adjustment
    pub qty: f64,
    /// Reorder threshold; stock at or below it is "low"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_qty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Refreshed on every mutation, including quantity adjustment
    pub updated_at: Timestamp,
}

impl Material {
    /// Low-stock predicate: `min_qty` is set and `qty <= min_qty`
    pub fn is_low_stock(&self) -> bool {
        self.min_qty.is_some_and(|min| self.qty <= min)
    }
}

/// Create material payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialCreate {
    pub name: String,
    pub sku: Option<String>,
    #[serde(default)]
    pub unit: Unit,
    /// Initial stock; defaults to zero
    #[serde(default)]
    pub qty: Option<f64>,
    pub min_qty: Option<f64>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// Update material payload (partial patch, `None` = leave unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub unit: Option<Unit>,
    pub qty: Option<f64>,
    pub min_qty: Option<f64>,
    pub cost: Option<f64>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub notes: Option<String>,
}
