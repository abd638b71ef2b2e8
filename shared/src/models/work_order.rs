//! Work Order Model

use crate::types::Timestamp;
use serde::{Deserialize, Serialize};

/// Work order lifecycle status.
///
/// Any status can follow any status; there is no enforced transition table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum WorkOrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl WorkOrderStatus {
    /// All statuses in kanban column order
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Default display label (overridable via `Settings::labels`)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Work order priority tier
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Work order (service ticket) entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Customer reference (must resolve at creation time)
    pub customer_id: String,
    /// Technician reference; absent = unassigned (never an empty string)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technician_id: Option<String>,
    pub status: WorkOrderStatus,
    pub priority: Priority,
    /// Set at creation, immutable afterwards
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Timestamp>,
}

/// Create work order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderCreate {
    pub title: String,
    pub description: Option<String>,
    pub customer_id: String,
    pub technician_id: Option<String>,
    #[serde(default)]
    pub status: WorkOrderStatus,
    #[serde(default)]
    pub priority: Priority,
    pub due_date: Option<Timestamp>,
}

/// Update work order payload (partial patch; `created_at` is not patchable)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<Priority>,
    pub due_date: Option<Timestamp>,
}
