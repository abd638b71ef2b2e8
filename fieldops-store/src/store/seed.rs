//! Demo seed data
//!
//! Written exactly once per storage location, on the first run (see the
//! first-run flag in the parent module). Content is fixed; ids and
//! timestamps are generated at seed time.

use super::Collections;
use shared::models::{
    Customer, Material, Priority, Technician, Unit, WorkOrder, WorkOrderStatus,
};
use shared::util::{now_millis, uid};

const DAY_MS: i64 = 86_400_000;

pub(super) fn demo_collections() -> Collections {
    let customers = vec![
        Customer {
            id: uid(),
            name: "ACME Telecom".to_string(),
            doc: Some("12.345.678/0001-90".to_string()),
            phone: Some("(11) 3333-0000".to_string()),
            address: Some("Av. Paulista, 1000 - SP".to_string()),
        },
        Customer {
            id: uid(),
            name: "Solaris Residences".to_string(),
            doc: None,
            phone: Some("(11) 99999-1234".to_string()),
            address: Some("Rua das Flores, 321 - SP".to_string()),
        },
    ];

    let technicians = vec![
        Technician {
            id: uid(),
            name: "Joao Pereira".to_string(),
            phone: Some("(11) 98888-1111".to_string()),
            skills: vec!["Fiber".to_string(), "OLT".to_string(), "Network".to_string()],
        },
        Technician {
            id: uid(),
            name: "Maria Souza".to_string(),
            phone: Some("(11) 97777-2222".to_string()),
            skills: vec!["Radio".to_string(), "Backbone".to_string()],
        },
    ];

    let now = now_millis();
    let orders = vec![
        WorkOrder {
            id: uid(),
            title: "FTTH install - Suite 205".to_string(),
            description: Some("Drop run + fusion splice + signal test".to_string()),
            customer_id: customers[0].id.clone(),
            technician_id: Some(technicians[0].id.clone()),
            status: WorkOrderStatus::Pending,
            priority: Priority::High,
            created_at: now,
            due_date: Some(now + DAY_MS),
        },
        WorkOrder {
            id: uid(),
            title: "Radio maintenance - Tower A".to_string(),
            description: Some("Realignment and PoE swap".to_string()),
            customer_id: customers[1].id.clone(),
            technician_id: Some(technicians[1].id.clone()),
            status: WorkOrderStatus::InProgress,
            priority: Priority::Medium,
            created_at: now,
            due_date: None,
        },
    ];

    let materials = vec![
        Material {
            id: uid(),
            name: "Drop cable 1FO".to_string(),
            sku: Some("DRP-1FO".to_string()),
            unit: Unit::Meter,
            qty: 500.0,
            min_qty: Some(200.0),
            cost: Some(0.9),
            price: Some(1.9),
            location: Some("Shelf A1".to_string()),
            notes: None,
            updated_at: now,
        },
        Material {
            id: uid(),
            name: "SC/APC connector".to_string(),
            sku: Some("SC-APC".to_string()),
            unit: Unit::Unit,
            qty: 150.0,
            min_qty: Some(100.0),
            cost: Some(2.2),
            price: Some(5.0),
            location: Some("Drawer B2".to_string()),
            notes: None,
            updated_at: now,
        },
        Material {
            id: uid(),
            name: "ONU ZTE ZXHN F660".to_string(),
            sku: Some("ONU-F660".to_string()),
            unit: Unit::Unit,
            qty: 12.0,
            min_qty: Some(10.0),
            cost: Some(120.0),
            price: Some(220.0),
            location: Some("Box C3".to_string()),
            notes: None,
            updated_at: now,
        },
    ];

    Collections {
        customers,
        technicians,
        orders,
        materials,
    }
}
