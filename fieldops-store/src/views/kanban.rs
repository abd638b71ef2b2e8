//! Kanban bucketing

use shared::models::{Settings, WorkOrder, WorkOrderStatus};

/// Work orders partitioned into the four status columns.
///
/// Membership always equals `order.status`; every input order lands in
/// exactly one column.
#[derive(Debug, Clone, Default)]
pub struct KanbanBoard {
    pending: Vec<WorkOrder>,
    in_progress: Vec<WorkOrder>,
    completed: Vec<WorkOrder>,
    cancelled: Vec<WorkOrder>,
}

impl KanbanBoard {
    pub fn column(&self, status: WorkOrderStatus) -> &[WorkOrder] {
        match status {
            WorkOrderStatus::Pending => &self.pending,
            WorkOrderStatus::InProgress => &self.in_progress,
            WorkOrderStatus::Completed => &self.completed,
            WorkOrderStatus::Cancelled => &self.cancelled,
        }
    }

    fn column_mut(&mut self, status: WorkOrderStatus) -> &mut Vec<WorkOrder> {
        match status {
            WorkOrderStatus::Pending => &mut self.pending,
            WorkOrderStatus::InProgress => &mut self.in_progress,
            WorkOrderStatus::Completed => &mut self.completed,
            WorkOrderStatus::Cancelled => &mut self.cancelled,
        }
    }

    /// Whether a column sits above its configured WIP limit.
    /// Display-only, mirroring the settings semantics; nothing blocks moves.
    pub fn over_wip_limit(&self, status: WorkOrderStatus, settings: &Settings) -> bool {
        match settings.kanban.wip.get(&status).copied().flatten() {
            Some(limit) => self.column(status).len() > limit as usize,
            None => false,
        }
    }
}

/// Partition orders into status columns.
///
/// Within a column: due date ascending with undated orders last, ties
/// broken by creation time descending (most recently created first).
pub fn kanban_board(orders: &[WorkOrder]) -> KanbanBoard {
    let mut board = KanbanBoard::default();
    for order in orders {
        board.column_mut(order.status).push(order.clone());
    }
    for status in WorkOrderStatus::ALL {
        board.column_mut(status).sort_by(|a, b| {
            let a_due = a.due_date.unwrap_or(i64::MAX);
            let b_due = b.due_date.unwrap_or(i64::MAX);
            a_due.cmp(&b_due).then(b.created_at.cmp(&a.created_at))
        });
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_fixtures::order_with_dates;

    #[test]
    fn bucketing_is_a_partition_keyed_by_status() {
        let orders = vec![
            order_with_dates("a", WorkOrderStatus::Pending, 1, None),
            order_with_dates("b", WorkOrderStatus::Completed, 2, None),
            order_with_dates("c", WorkOrderStatus::Pending, 3, None),
            order_with_dates("d", WorkOrderStatus::Cancelled, 4, None),
        ];
        let board = kanban_board(&orders);

        let total: usize = WorkOrderStatus::ALL
            .iter()
            .map(|s| board.column(*s).len())
            .sum();
        assert_eq!(total, orders.len());
        for status in WorkOrderStatus::ALL {
            for order in board.column(status) {
                assert_eq!(order.status, status);
            }
        }
        assert_eq!(board.column(WorkOrderStatus::Pending).len(), 2);
        assert_eq!(board.column(WorkOrderStatus::InProgress).len(), 0);
    }

    #[test]
    fn column_sorts_due_asc_undated_last_created_desc_ties() {
        let orders = vec![
            order_with_dates("undated_old", WorkOrderStatus::Pending, 10, None),
            order_with_dates("due_late", WorkOrderStatus::Pending, 20, Some(5_000)),
            order_with_dates("due_soon", WorkOrderStatus::Pending, 30, Some(1_000)),
            order_with_dates("undated_new", WorkOrderStatus::Pending, 40, None),
            order_with_dates("tie_newer", WorkOrderStatus::Pending, 50, Some(1_000)),
        ];
        let board = kanban_board(&orders);
        let ids: Vec<&str> = board
            .column(WorkOrderStatus::Pending)
            .iter()
            .map(|o| o.id.as_str())
            .collect();
        assert_eq!(
            ids,
            vec!["tie_newer", "due_soon", "due_late", "undated_new", "undated_old"]
        );
    }

    #[test]
    fn wip_limit_is_flagged_only_when_exceeded() {
        let settings = Settings::default(); // InProgress limit = 10
        let under: Vec<_> = (0..10)
            .map(|i| order_with_dates(&format!("o{i}"), WorkOrderStatus::InProgress, i, None))
            .collect();
        let board = kanban_board(&under);
        assert!(!board.over_wip_limit(WorkOrderStatus::InProgress, &settings));

        let over: Vec<_> = (0..11)
            .map(|i| order_with_dates(&format!("o{i}"), WorkOrderStatus::InProgress, i, None))
            .collect();
        let board = kanban_board(&over);
        assert!(board.over_wip_limit(WorkOrderStatus::InProgress, &settings));
        // Pending has no limit configured
        assert!(!board.over_wip_limit(WorkOrderStatus::Pending, &settings));
    }
}
