//! Derived view engine
//!
//! Pure, side-effect-free projections over the entity store's collections.
//! Nothing here mutates state; every function is deterministic for its
//! inputs and cheap enough to re-run on each render.

mod filter;
mod inventory;
mod kanban;
mod rollup;

pub use filter::{MaterialFilter, OrderFilter, filter_materials, filter_orders};
pub use inventory::{StockValuation, low_stock, valuation};
pub use kanban::{KanbanBoard, kanban_board};
pub use rollup::{RollupBy, RollupRow, rollup};

use shared::models::{WorkOrder, WorkOrderStatus};
use shared::types::Timestamp;

/// Placeholder for an unresolved or absent reference in display output
pub const UNRESOLVED: &str = "—";

/// Overdue: due date in the past and still open
/// (neither Completed nor Cancelled)
pub fn is_overdue(order: &WorkOrder, now: Timestamp) -> bool {
    match order.due_date {
        Some(due) => {
            due < now
                && order.status != WorkOrderStatus::Completed
                && order.status != WorkOrderStatus::Cancelled
        }
        None => false,
    }
}
