//! Text/attribute filtering for work orders and materials

use chrono::{Duration, Local, NaiveDate, NaiveTime, TimeZone};
use shared::models::{Customer, Material, Priority, Technician, WorkOrder, WorkOrderStatus};
use shared::types::Timestamp;
use std::collections::HashMap;

/// Work order filter. Every set field must match (conjunction); unset
/// fields do not constrain.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    /// Case-insensitive substring over title + description + resolved
    /// customer name + resolved technician name
    pub query: Option<String>,
    pub technician_id: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<WorkOrderStatus>,
    pub priority: Option<Priority>,
    /// Inclusive from local midnight of this date (over `created_at`)
    pub start_date: Option<NaiveDate>,
    /// Inclusive through local 23:59:59 of this date (over `created_at`)
    pub end_date: Option<NaiveDate>,
}

/// Material filter: free text over name + sku + location + notes
#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    pub query: Option<String>,
}

/// Local-midnight lower bound in Unix millis
fn day_start_millis(date: NaiveDate) -> Option<Timestamp> {
    day_start_millis_in(&Local, date)
}

/// Local end-of-day (23:59:59) upper bound in Unix millis
fn day_end_millis(date: NaiveDate) -> Option<Timestamp> {
    day_end_millis_in(&Local, date)
}

fn day_start_millis_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<Timestamp> {
    let midnight = date.and_time(NaiveTime::MIN);
    if let Some(t) = tz.from_local_datetime(&midnight).earliest() {
        return Some(t.timestamp_millis());
    }
    // midnight swallowed by a DST spring-forward (some zones jump
    // 00:00 -> 01:00); the day starts at the first minute that exists
    (1..24 * 60).find_map(|m| {
        tz.from_local_datetime(&(midnight + Duration::minutes(m)))
            .earliest()
            .map(|t| t.timestamp_millis())
    })
}

fn day_end_millis_in<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<Timestamp> {
    let end = date.and_hms_opt(23, 59, 59)?;
    if let Some(t) = tz.from_local_datetime(&end).latest() {
        return Some(t.timestamp_millis());
    }
    // symmetric case for a fall-forward gap ending the day
    (1..24 * 60).find_map(|m| {
        tz.from_local_datetime(&(end - Duration::minutes(m)))
            .latest()
            .map(|t| t.timestamp_millis())
    })
}

fn normalized_query(query: &Option<String>) -> Option<String> {
    query
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

/// Filter work orders by the conjunction of all set fields
pub fn filter_orders(
    orders: &[WorkOrder],
    customers: &[Customer],
    technicians: &[Technician],
    filter: &OrderFilter,
) -> Vec<WorkOrder> {
    let customer_names: HashMap<&str, &str> = customers
        .iter()
        .map(|c| (c.id.as_str(), c.name.as_str()))
        .collect();
    let technician_names: HashMap<&str, &str> = technicians
        .iter()
        .map(|t| (t.id.as_str(), t.name.as_str()))
        .collect();

    let term = normalized_query(&filter.query);
    let start = filter.start_date.and_then(day_start_millis);
    let end = filter.end_date.and_then(day_end_millis);

    orders
        .iter()
        .filter(|o| {
            if let Some(start) = start
                && o.created_at < start
            {
                return false;
            }
            if let Some(end) = end
                && o.created_at > end
            {
                return false;
            }
            if let Some(tech) = &filter.technician_id
                && o.technician_id.as_deref() != Some(tech.as_str())
            {
                return false;
            }
            if let Some(cust) = &filter.customer_id
                && o.customer_id != *cust
            {
                return false;
            }
            if let Some(status) = filter.status
                && o.status != status
            {
                return false;
            }
            if let Some(priority) = filter.priority
                && o.priority != priority
            {
                return false;
            }
            if let Some(term) = &term {
                let customer = customer_names.get(o.customer_id.as_str()).unwrap_or(&"");
                let technician = o
                    .technician_id
                    .as_deref()
                    .and_then(|id| technician_names.get(id).copied())
                    .unwrap_or("");
                let haystack = format!(
                    "{} {} {} {}",
                    o.title,
                    o.description.as_deref().unwrap_or(""),
                    customer,
                    technician
                )
                .to_lowercase();
                if !haystack.contains(term.as_str()) {
                    return false;
                }
            }
            true
        })
        .cloned()
        .collect()
}

/// Filter materials by free text
pub fn filter_materials(materials: &[Material], filter: &MaterialFilter) -> Vec<Material> {
    let Some(term) = normalized_query(&filter.query) else {
        return materials.to_vec();
    };
    materials
        .iter()
        .filter(|m| {
            let haystack = format!(
                "{} {} {} {}",
                m.name,
                m.sku.as_deref().unwrap_or(""),
                m.location.as_deref().unwrap_or(""),
                m.notes.as_deref().unwrap_or("")
            )
            .to_lowercase();
            haystack.contains(term.as_str())
        })
        .cloned()
        .collect()
}
