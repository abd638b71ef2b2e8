//! Technician Model

use serde::{Deserialize, Serialize};

/// Field technician entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Ordered skill tags, no duplicates within one technician
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skills: Vec<String>,
}

/// Create technician payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicianCreate {
    pub name: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Update technician payload (partial patch, `None` = leave unchanged)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TechnicianUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub skills: Option<Vec<String>>,
}
