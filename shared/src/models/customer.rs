//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity
///
/// Referenced by `WorkOrder::customer_id` (weak reference: relation plus
/// lookup, never lifecycle control).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// Tax/company document number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Create customer payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerCreate {
    pub name: String,
    pub doc: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Update customer payload (partial patch, `None` = leave unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerUpdate {
    pub name: Option<String>,
    pub doc: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}
