//! Per-technician / per-customer rollups for the reports page

use super::UNRESOLVED;
use shared::models::{Customer, Technician, WorkOrder, WorkOrderStatus};
use std::collections::{BTreeMap, HashMap};

/// Grouping axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupBy {
    Technician,
    Customer,
}

/// One report row: a resolved display name, a count per status, and a total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollupRow {
    pub name: String,
    pub by_status: BTreeMap<WorkOrderStatus, usize>,
    pub total: usize,
}

impl RollupRow {
    fn new(name: String) -> Self {
        Self {
            name,
            by_status: WorkOrderStatus::ALL.iter().map(|s| (*s, 0)).collect(),
            total: 0,
        }
    }

    pub fn count(&self, status: WorkOrderStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Group orders by resolved display name ("—" for an unresolved or absent
/// reference) and count per status. Rows come back ordered by total
/// descending; ties keep first-appearance order.
pub fn rollup(
    orders: &[WorkOrder],
    customers: &[Customer],
    technicians: &[Technician],
    by: RollupBy,
) -> Vec<RollupRow> {
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let technician_names: HashMap<&str, &str> = technicians
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    let mut rows: Vec<RollupRow> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for order in orders {
        let name = match by {
            RollupBy::Technician => order
                .technician_id
                .as_deref()
                .and_then(|id| technician_names.get(id).copied())
                .unwrap_or(UNRESOLVED),
            RollupBy::Customer => customer_names
                .get(order.customer_id.as_str())
                .copied()
                .unwrap_or(UNRESOLVED),
        };
        let i = *index.entry(name.to_string()).or_insert_with(|| {
            rows.push(RollupRow::new(name.to_string()));
            rows.len() - 1
        });
        rows[i].total += 1;
        *rows[i].by_status.entry(order.status).or_insert(0) += 1;
    }

    // stable sort keeps first-appearance order among equal totals
    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::test_fixtures::order;

    fn named_customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            doc: None,
            phone: None,
            address: None,
        }
    }

    fn named_technician(id: &str, name: &str) -> Technician {
        Technician {
            id: id.to_string(),
            name: name.to_string(),
            phone: None,
            skills: vec![],
        }
    }

    #[test]
    fn groups_by_technician_with_placeholder_for_unassigned() {
        let technicians = vec![named_technician("t1", "Joao")];
        let mut a = order("a", WorkOrderStatus::Pending);
        a.technician_id = Some("t1".to_string());
        let mut b = order("b", WorkOrderStatus::Completed);
        b.technician_id = Some("t1".to_string());
        let unassigned = order("c", WorkOrderStatus::Pending);
        let ghost = {
            // technician deleted out from under the order
            let mut o = order("d", WorkOrderStatus::Pending);
            o.technician_id = Some("gone".to_string());
            o
        };

        let rows = rollup(
            &[a, b, unassigned, ghost],
            &[],
            &technicians,
            RollupBy::Technician,
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Joao");
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[0].count(WorkOrderStatus::Pending), 1);
        assert_eq!(rows[0].count(WorkOrderStatus::Completed), 1);
        assert_eq!(rows[1].name, UNRESOLVED);
        assert_eq!(rows[1].total, 2);
    }

    #[test]
    fn orders_rows_by_total_descending() {
        let customers = vec![
            named_customer("c1", "ACME"),
            named_customer("c2", "Solaris"),
        ];
        let mut orders_in = Vec::new();
        for i in 0..3 {
            let mut o = order(&format!("a{i}"), WorkOrderStatus::Pending);
            o.customer_id = "c2".to_string();
            orders_in.push(o);
        }
        let mut single = order("b", WorkOrderStatus::Pending);
        single.customer_id = "c1".to_string();
        orders_in.push(single);

        let rows = rollup(&orders_in, &customers, &[], RollupBy::Customer);
        assert_eq!(rows[0].name, "Solaris");
        assert_eq!(rows[0].total, 3);
        assert_eq!(rows[1].name, "ACME");
        assert_eq!(rows[1].total, 1);
    }

    #[test]
    fn totals_equal_sum_of_status_counts() {
        let mut orders_in = Vec::new();
        for (i, status) in [
            WorkOrderStatus::Pending,
            WorkOrderStatus::InProgress,
            WorkOrderStatus::Completed,
            WorkOrderStatus::Pending,
        ]
        .into_iter()
        .enumerate()
        {
            orders_in.push(order(&format!("o{i}"), status));
        }
        let rows = rollup(&orders_in, &[], &[], RollupBy::Technician);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        let sum: usize = WorkOrderStatus::ALL.iter().map(|s| row.count(*s)).sum();
        assert_eq!(sum, row.total);
        assert_eq!(row.total, 4);
    }
}
