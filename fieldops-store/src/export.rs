//! CSV export formatter
//!
//! Serializes flat records to delimited text for download: header row from
//! column labels, one row per record, RFC-4180-style quoting (a field
//! containing the delimiter, a quote, or a line break is quoted, internal
//! quotes doubled). Null/absent values render as empty strings.
//!
//! Also hosts the row/column builders for the four named report exports.

use crate::views::{RollupRow, UNRESOLVED};
use chrono::{Local, TimeZone};
use serde_json::{Map, Value};
use shared::models::{Customer, Material, Settings, Technician, WorkOrder, WorkOrderStatus};
use shared::types::Timestamp;
use std::collections::HashMap;

pub const ORDERS_CSV: &str = "orders_filtered.csv";
pub const ORDERS_BY_TECHNICIAN_CSV: &str = "orders_by_technician.csv";
pub const ORDERS_BY_CUSTOMER_CSV: &str = "orders_by_customer.csv";
pub const LOW_STOCK_CSV: &str = "materials_low_stock.csv";

/// Flat record: field name to scalar JSON value
pub type Row = Map<String, Value>;

/// Column selector: record key plus header label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub key: String,
    pub label: String,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Render records as CSV. With `columns = None` the columns are derived
/// from the first record's keys (in map order, i.e. sorted), labels equal
/// to keys. Empty input with no explicit columns renders as the empty
/// string.
pub fn to_csv(rows: &[Row], columns: Option<&[Column]>) -> String {
    let derived: Vec<Column>;
    let cols: &[Column] = match columns {
        Some(cols) => cols,
        None => match rows.first() {
            Some(first) => {
                derived = first.keys().map(|k| Column::new(k.clone(), k.clone())).collect();
                &derived
            }
            None => return String::new(),
        },
    };

    let mut out = String::new();
    let header: Vec<String> = cols.iter().map(|c| escape_csv(&c.label)).collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for row in rows {
        let fields: Vec<String> = cols
            .iter()
            .map(|c| escape_csv(&value_to_string(row.get(&c.key))))
            .collect();
        out.push_str(&fields.join(","));
        out.push('\n');
    }
    out
}

fn value_to_string(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        // composite values fall back to their JSON text
        Some(other) => other.to_string(),
    }
}

fn escape_csv(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn format_datetime(ms: Timestamp) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn format_date(ms: Timestamp) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map(|t| t.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

// ========== Report exports ==========

pub fn orders_columns() -> Vec<Column> {
    vec![
        Column::new("id", "ID"),
        Column::new("title", "Title"),
        Column::new("description", "Description"),
        Column::new("customer", "Customer"),
        Column::new("technician", "Technician"),
        Column::new("status", "Status"),
        Column::new("priority", "Priority"),
        Column::new("created_at", "Created"),
        Column::new("due_date", "Due"),
    ]
}

/// Filtered-orders export rows, with references resolved to display names
/// ("—" when unresolved) and labels honoring settings overrides
pub fn orders_rows(
    orders: &[WorkOrder],
    customers: &[Customer],
    technicians: &[Technician],
    settings: &Settings,
) -> Vec<Row> {
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let technician_names: HashMap<&str, &str> = technicians
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    orders
        .iter()
        .map(|o| {
            let customer = customer_names
                .get(o.customer_id.as_str())
                .copied()
                .unwrap_or(UNRESOLVED);
            let technician = o
                .technician_id
                .as_deref()
                .and_then(|id| technician_names.get(id).copied())
                .unwrap_or(UNRESOLVED);
            let mut row = Row::new();
            row.insert("id".into(), Value::from(o.id.clone()));
            row.insert("title".into(), Value::from(o.title.clone()));
            row.insert(
                "description".into(),
                Value::from(o.description.clone().unwrap_or_default()),
            );
            row.insert("customer".into(), Value::from(customer));
            row.insert("technician".into(), Value::from(technician));
            row.insert("status".into(), Value::from(settings.status_label(o.status)));
            row.insert(
                "priority".into(),
                Value::from(settings.priority_label(o.priority)),
            );
            row.insert("created_at".into(), Value::from(format_datetime(o.created_at)));
            row.insert(
                "due_date".into(),
                Value::from(o.due_date.map(format_date).unwrap_or_default()),
            );
            row
        })
        .collect()
}

/// Columns for a rollup export; `group_label` is "Technician" or "Customer"
pub fn rollup_columns(group_label: &str, settings: &Settings) -> Vec<Column> {
    let mut cols = vec![
        Column::new("name", group_label),
        Column::new("total", "Total"),
    ];
    for status in WorkOrderStatus::ALL {
        cols.push(Column::new(
            status_key(status),
            settings.status_label(status),
        ));
    }
    cols
}

pub fn rollup_rows(rows: &[RollupRow]) -> Vec<Row> {
    rows.iter()
        .map(|r| {
            let mut row = Row::new();
            row.insert("name".into(), Value::from(r.name.clone()));
            row.insert("total".into(), Value::from(r.total));
            for status in WorkOrderStatus::ALL {
                row.insert(status_key(status).into(), Value::from(r.count(status)));
            }
            row
        })
        .collect()
}

fn status_key(status: WorkOrderStatus) -> &'static str {
    match status {
        WorkOrderStatus::Pending => "pending",
        WorkOrderStatus::InProgress => "in_progress",
        WorkOrderStatus::Completed => "completed",
        WorkOrderStatus::Cancelled => "cancelled",
    }
}

pub fn low_stock_columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name"),
        Column::new("sku", "SKU"),
        Column::new("qty", "Qty"),
        Column::new("min_qty", "Min"),
        Column::new("unit", "Unit"),
        Column::new("location", "Location"),
        Column::new("updated_at", "Updated"),
    ]
}

pub fn low_stock_rows(materials: &[Material]) -> Vec<Row> {
    materials
        .iter()
        .map(|m| {
            let mut row = Row::new();
            row.insert("name".into(), Value::from(m.name.clone()));
            row.insert("sku".into(), Value::from(m.sku.clone().unwrap_or_default()));
            row.insert("qty".into(), Value::from(m.qty));
            row.insert(
                "min_qty".into(),
                m.min_qty.map(Value::from).unwrap_or(Value::Null),
            );
            row.insert("unit".into(), Value::from(m.unit.label()));
            row.insert(
                "location".into(),
                Value::from(m.location.clone().unwrap_or_default()),
            );
            row.insert("updated_at".into(), Value::from(format_datetime(m.updated_at)));
            row
        })
        .collect()
}
