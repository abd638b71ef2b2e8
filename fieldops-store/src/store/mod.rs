//! Entity store
//!
//! Owns the four persisted collections (customers, technicians, work orders,
//! materials). Each mutator builds the next version of a collection, commits
//! it to the [`KvStore`] and only then swaps it into the in-memory cache, so
//! memory and disk never diverge and callers never observe a half-applied
//! write. Observers are notified after the commit.
//!
//! Referential rules:
//! - a work order's customer must resolve at creation time;
//! - removing a technician clears `technician_id` on every referencing
//!   order, both arrays committed in one transaction;
//! - a customer referenced by any order cannot be removed.

mod seed;

use crate::storage::{KvStore, StorageError};
use parking_lot::RwLock;
use shared::models::{
    BackupData, Customer, CustomerCreate, CustomerUpdate, Material, MaterialCreate, MaterialUpdate,
    Technician, TechnicianCreate, TechnicianUpdate, WorkOrder, WorkOrderCreate, WorkOrderStatus,
    WorkOrderUpdate,
};
use shared::util::{now_millis, uid};
use thiserror::Error;

pub(crate) const CUSTOMERS_KEY: &str = "customers";
pub(crate) const TECHNICIANS_KEY: &str = "technicians";
pub(crate) const ORDERS_KEY: &str = "orders";
pub(crate) const MATERIALS_KEY: &str = "materials";

/// First-run marker. Seeding keys off this flag being absent, not off the
/// collections being empty, so a user-driven "reset all data" does not
/// resurrect the demo dataset on the next load. Public so embedders can
/// pre-stamp a fresh storage location and opt out of the demo dataset.
pub const INITIALIZED_KEY: &str = "initialized";

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("unknown customer: {0}")]
    UnknownCustomer(String),

    #[error("customer {0} is still referenced by work orders")]
    CustomerInUse(String),

    #[error("invalid backup payload: {0}")]
    InvalidBackup(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The four persisted collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Customers,
    Technicians,
    Orders,
    Materials,
}

/// Change notification delivered to subscribers after a committed mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreEvent {
    pub collection: Collection,
}

type Observer = Box<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Debug, Default, Clone)]
struct Collections {
    customers: Vec<Customer>,
    technicians: Vec<Technician>,
    orders: Vec<WorkOrder>,
    materials: Vec<Material>,
}

/// Entity store over an injected [`KvStore`]
pub struct EntityStore {
    kv: KvStore,
    state: RwLock<Collections>,
    observers: RwLock<Vec<Observer>>,
}

impl EntityStore {
    /// Load the collections from storage, seeding demo data on first run.
    ///
    /// Seeding happens only when the first-run flag is absent AND none of
    /// the collection keys has ever been written. A pre-flag database with
    /// data just gets the flag stamped.
    pub fn open(kv: KvStore) -> StoreResult<Self> {
        let state = Collections {
            customers: kv.get(CUSTOMERS_KEY)?.unwrap_or_default(),
            technicians: kv.get(TECHNICIANS_KEY)?.unwrap_or_default(),
            orders: kv.get(ORDERS_KEY)?.unwrap_or_default(),
            materials: kv.get(MATERIALS_KEY)?.unwrap_or_default(),
        };

        let store = Self {
            kv,
            state: RwLock::new(state),
            observers: RwLock::new(Vec::new()),
        };

        if !store.kv.contains(INITIALIZED_KEY)? {
            let fresh = !store.kv.contains(CUSTOMERS_KEY)?
                && !store.kv.contains(TECHNICIANS_KEY)?
                && !store.kv.contains(ORDERS_KEY)?
                && !store.kv.contains(MATERIALS_KEY)?;
            if fresh {
                store.seed()?;
            } else {
                store.kv.set(INITIALIZED_KEY, &true)?;
            }
        }

        Ok(store)
    }

    fn seed(&self) -> StoreResult<()> {
        let seeded = seed::demo_collections();
        let entries = [
            (CUSTOMERS_KEY, to_bytes(&seeded.customers)?),
            (TECHNICIANS_KEY, to_bytes(&seeded.technicians)?),
            (ORDERS_KEY, to_bytes(&seeded.orders)?),
            (MATERIALS_KEY, to_bytes(&seeded.materials)?),
            (INITIALIZED_KEY, to_bytes(&true)?),
        ];
        self.kv.set_many(&entries)?;
        *self.state.write() = seeded;
        tracing::debug!("seeded demo collections on first run");
        Ok(())
    }

    /// Register a change observer. Callbacks run synchronously after each
    /// committed mutation, on the mutating thread.
    pub fn subscribe(&self, observer: impl Fn(&StoreEvent) + Send + Sync + 'static) {
        self.observers.write().push(Box::new(observer));
    }

    fn notify(&self, collection: Collection) {
        let event = StoreEvent { collection };
        for observer in self.observers.read().iter() {
            observer(&event);
        }
    }

    // ========== Snapshots ==========

    pub fn customers(&self) -> Vec<Customer> {
        self.state.read().customers.clone()
    }

    pub fn technicians(&self) -> Vec<Technician> {
        self.state.read().technicians.clone()
    }

    pub fn orders(&self) -> Vec<WorkOrder> {
        self.state.read().orders.clone()
    }

    pub fn materials(&self) -> Vec<Material> {
        self.state.read().materials.clone()
    }

    // ========== Customers ==========

    pub fn add_customer(&self, create: CustomerCreate) -> StoreResult<Customer> {
        let name = required_name(&create.name, "customer name")?;
        let customer = Customer {
            id: uid(),
            name,
            doc: create.doc,
            phone: create.phone,
            address: create.address,
        };
        {
            let mut state = self.state.write();
            let mut next = state.customers.clone();
            next.push(customer.clone());
            self.kv.set(CUSTOMERS_KEY, &next)?;
            state.customers = next;
        }
        self.notify(Collection::Customers);
        Ok(customer)
    }

    pub fn update_customer(&self, id: &str, patch: CustomerUpdate) -> StoreResult<Option<Customer>> {
        let updated = {
            let mut state = self.state.write();
            let mut next = state.customers.clone();
            let Some(customer) = next.iter_mut().find(|c| c.id == id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name {
                customer.name = required_name(&name, "customer name")?;
            }
            merge(&mut customer.doc, patch.doc);
            merge(&mut customer.phone, patch.phone);
            merge(&mut customer.address, patch.address);
            let updated = customer.clone();
            self.kv.set(CUSTOMERS_KEY, &next)?;
            state.customers = next;
            updated
        };
        self.notify(Collection::Customers);
        Ok(Some(updated))
    }

    /// Remove a customer. Refused while any work order still references it,
    /// so order rows never hold a dangling customer id.
    pub fn remove_customer(&self, id: &str) -> StoreResult<bool> {
        let removed = {
            let mut state = self.state.write();
            if state.orders.iter().any(|o| o.customer_id == id) {
                return Err(StoreError::CustomerInUse(id.to_string()));
            }
            if !state.customers.iter().any(|c| c.id == id) {
                return Ok(false);
            }
            let next: Vec<Customer> = state
                .customers
                .iter()
                .filter(|c| c.id != id)
                .cloned()
                .collect();
            self.kv.set(CUSTOMERS_KEY, &next)?;
            state.customers = next;
            true
        };
        self.notify(Collection::Customers);
        Ok(removed)
    }

    // ========== Technicians ==========

    pub fn add_technician(&self, create: TechnicianCreate) -> StoreResult<Technician> {
        let name = required_name(&create.name, "technician name")?;
        let technician = Technician {
            id: uid(),
            name,
            phone: create.phone,
            skills: dedup_skills(create.skills),
        };
        {
            let mut state = self.state.write();
            let mut next = state.technicians.clone();
            next.push(technician.clone());
            self.kv.set(TECHNICIANS_KEY, &next)?;
            state.technicians = next;
        }
        self.notify(Collection::Technicians);
        Ok(technician)
    }

    pub fn update_technician(
        &self,
        id: &str,
        patch: TechnicianUpdate,
    ) -> StoreResult<Option<Technician>> {
        let updated = {
            let mut state = self.state.write();
            let mut next = state.technicians.clone();
            let Some(technician) = next.iter_mut().find(|t| t.id == id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name {
                technician.name = required_name(&name, "technician name")?;
            }
            merge(&mut technician.phone, patch.phone);
            if let Some(skills) = patch.skills {
                technician.skills = dedup_skills(skills);
            }
            let updated = technician.clone();
            self.kv.set(TECHNICIANS_KEY, &next)?;
            state.technicians = next;
            updated
        };
        self.notify(Collection::Technicians);
        Ok(Some(updated))
    }

    /// Remove a technician and clear `technician_id` on every work order
    /// that referenced it. Both arrays land in one storage transaction;
    /// observers see the two changes together, never one without the other.
    pub fn remove_technician(&self, id: &str) -> StoreResult<bool> {
        let removed = {
            let mut state = self.state.write();
            if !state.technicians.iter().any(|t| t.id == id) {
                return Ok(false);
            }
            let next_technicians: Vec<Technician> = state
                .technicians
                .iter()
                .filter(|t| t.id != id)
                .cloned()
                .collect();
            let next_orders: Vec<WorkOrder> = state
                .orders
                .iter()
                .cloned()
                .map(|mut o| {
                    if o.technician_id.as_deref() == Some(id) {
                        o.technician_id = None;
                    }
                    o
                })
                .collect();
            let entries = [
                (TECHNICIANS_KEY, to_bytes(&next_technicians)?),
                (ORDERS_KEY, to_bytes(&next_orders)?),
            ];
            self.kv.set_many(&entries)?;
            state.technicians = next_technicians;
            state.orders = next_orders;
            true
        };
        self.notify(Collection::Technicians);
        self.notify(Collection::Orders);
        Ok(removed)
    }

    // ========== Work orders ==========

    /// Create a work order. `customer_id` must resolve at creation time;
    /// a technician reference is the caller's contract and not checked.
    pub fn add_order(&self, create: WorkOrderCreate) -> StoreResult<WorkOrder> {
        let title = required_name(&create.title, "work order title")?;
        let order = {
            let mut state = self.state.write();
            if !state.customers.iter().any(|c| c.id == create.customer_id) {
                return Err(StoreError::UnknownCustomer(create.customer_id));
            }
            let order = WorkOrder {
                id: uid(),
                title,
                description: create.description,
                customer_id: create.customer_id,
                technician_id: create.technician_id,
                status: create.status,
                priority: create.priority,
                created_at: now_millis(),
                due_date: create.due_date,
            };
            let mut next = state.orders.clone();
            // newest first, matching how the board and tables consume them
            next.insert(0, order.clone());
            self.kv.set(ORDERS_KEY, &next)?;
            state.orders = next;
            order
        };
        self.notify(Collection::Orders);
        Ok(order)
    }

    pub fn update_order(&self, id: &str, patch: WorkOrderUpdate) -> StoreResult<Option<WorkOrder>> {
        let updated = {
            let mut state = self.state.write();
            let mut next = state.orders.clone();
            let Some(order) = next.iter_mut().find(|o| o.id == id) else {
                return Ok(None);
            };
            if let Some(title) = patch.title {
                order.title = required_name(&title, "work order title")?;
            }
            merge(&mut order.description, patch.description);
            if let Some(customer_id) = patch.customer_id {
                order.customer_id = customer_id;
            }
            if let Some(status) = patch.status {
                order.status = status;
            }
            if let Some(priority) = patch.priority {
                order.priority = priority;
            }
            merge(&mut order.due_date, patch.due_date);
            let updated = order.clone();
            self.kv.set(ORDERS_KEY, &next)?;
            state.orders = next;
            updated
        };
        self.notify(Collection::Orders);
        Ok(Some(updated))
    }

    /// Set the status only. Any status may follow any status; there is no
    /// transition table.
    pub fn update_order_status(
        &self,
        id: &str,
        status: WorkOrderStatus,
    ) -> StoreResult<Option<WorkOrder>> {
        self.update_order(
            id,
            WorkOrderUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
    }

    /// Set or clear the technician reference. `None` means unassigned.
    pub fn assign_technician(
        &self,
        id: &str,
        technician_id: Option<String>,
    ) -> StoreResult<Option<WorkOrder>> {
        let updated = {
            let mut state = self.state.write();
            let mut next = state.orders.clone();
            let Some(order) = next.iter_mut().find(|o| o.id == id) else {
                return Ok(None);
            };
            order.technician_id = technician_id;
            let updated = order.clone();
            self.kv.set(ORDERS_KEY, &next)?;
            state.orders = next;
            updated
        };
        self.notify(Collection::Orders);
        Ok(Some(updated))
    }

    pub fn remove_order(&self, id: &str) -> StoreResult<bool> {
        let removed = {
            let mut state = self.state.write();
            if !state.orders.iter().any(|o| o.id == id) {
                return Ok(false);
            }
            let next: Vec<WorkOrder> = state
                .orders
                .iter()
                .filter(|o| o.id != id)
                .cloned()
                .collect();
            self.kv.set(ORDERS_KEY, &next)?;
            state.orders = next;
            true
        };
        self.notify(Collection::Orders);
        Ok(removed)
    }

    // ========== Materials ==========

    pub fn add_material(&self, create: MaterialCreate) -> StoreResult<Material> {
        let name = required_name(&create.name, "material name")?;
        let material = Material {
            id: uid(),
            name,
            sku: create.sku,
            unit: create.unit,
            qty: create.qty.unwrap_or(0.0).max(0.0),
            min_qty: create.min_qty,
            cost: create.cost,
            price: create.price,
            location: create.location,
            notes: create.notes,
            updated_at: now_millis(),
        };
        {
            let mut state = self.state.write();
            let mut next = state.materials.clone();
            next.push(material.clone());
            self.kv.set(MATERIALS_KEY, &next)?;
            state.materials = next;
        }
        self.notify(Collection::Materials);
        Ok(material)
    }

    pub fn update_material(&self, id: &str, patch: MaterialUpdate) -> StoreResult<Option<Material>> {
        let updated = {
            let mut state = self.state.write();
            let mut next = state.materials.clone();
            let Some(material) = next.iter_mut().find(|m| m.id == id) else {
                return Ok(None);
            };
            if let Some(name) = patch.name {
                material.name = required_name(&name, "material name")?;
            }
            merge(&mut material.sku, patch.sku);
            if let Some(unit) = patch.unit {
                material.unit = unit;
            }
            if let Some(qty) = patch.qty {
                material.qty = qty.max(0.0);
            }
            merge(&mut material.min_qty, patch.min_qty);
            merge(&mut material.cost, patch.cost);
            merge(&mut material.price, patch.price);
            merge(&mut material.location, patch.location);
            merge(&mut material.notes, patch.notes);
            material.updated_at = now_millis();
            let updated = material.clone();
            self.kv.set(MATERIALS_KEY, &next)?;
            state.materials = next;
            updated
        };
        self.notify(Collection::Materials);
        Ok(Some(updated))
    }

    pub fn remove_material(&self, id: &str) -> StoreResult<bool> {
        let removed = {
            let mut state = self.state.write();
            if !state.materials.iter().any(|m| m.id == id) {
                return Ok(false);
            }
            let next: Vec<Material> = state
                .materials
                .iter()
                .filter(|m| m.id != id)
                .cloned()
                .collect();
            self.kv.set(MATERIALS_KEY, &next)?;
            state.materials = next;
            true
        };
        self.notify(Collection::Materials);
        Ok(removed)
    }

    /// Adjust stock by `delta` (negative = stock-out). The result is clamped
    /// to zero, never rejected; `updated_at` is refreshed either way.
    /// A zero delta is a legal no-op adjustment.
    pub fn adjust_material_qty(&self, id: &str, delta: f64) -> StoreResult<Option<Material>> {
        let updated = {
            let mut state = self.state.write();
            let mut next = state.materials.clone();
            let Some(material) = next.iter_mut().find(|m| m.id == id) else {
                return Ok(None);
            };
            material.qty = (material.qty + delta).max(0.0);
            material.updated_at = now_millis();
            let updated = material.clone();
            self.kv.set(MATERIALS_KEY, &next)?;
            state.materials = next;
            updated
        };
        self.notify(Collection::Materials);
        Ok(Some(updated))
    }

    // ========== Backup restore ==========

    /// Replace every collection present in `data`, in one transaction.
    /// Absent collections stay untouched (partial backups are legal).
    pub fn replace_collections(&self, data: &BackupData) -> StoreResult<()> {
        let mut changed: Vec<Collection> = Vec::new();
        {
            let mut state = self.state.write();
            let mut entries: Vec<(&str, Vec<u8>)> = Vec::new();
            if let Some(customers) = &data.customers {
                entries.push((CUSTOMERS_KEY, to_bytes(customers)?));
                changed.push(Collection::Customers);
            }
            if let Some(technicians) = &data.technicians {
                entries.push((TECHNICIANS_KEY, to_bytes(technicians)?));
                changed.push(Collection::Technicians);
            }
            if let Some(orders) = &data.orders {
                entries.push((ORDERS_KEY, to_bytes(orders)?));
                changed.push(Collection::Orders);
            }
            if let Some(materials) = &data.materials {
                entries.push((MATERIALS_KEY, to_bytes(materials)?));
                changed.push(Collection::Materials);
            }
            if entries.is_empty() {
                return Ok(());
            }
            self.kv.set_many(&entries)?;
            if let Some(customers) = &data.customers {
                state.customers = customers.clone();
            }
            if let Some(technicians) = &data.technicians {
                state.technicians = technicians.clone();
            }
            if let Some(orders) = &data.orders {
                state.orders = orders.clone();
            }
            if let Some(materials) = &data.materials {
                state.materials = materials.clone();
            }
        }
        for collection in changed {
            self.notify(collection);
        }
        Ok(())
    }
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("EntityStore")
            .field("customers", &state.customers.len())
            .field("technicians", &state.technicians.len())
            .field("orders", &state.orders.len())
            .field("materials", &state.materials.len())
            .finish()
    }
}

fn to_bytes<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, StorageError> {
    Ok(serde_json::to_vec(value)?)
}

/// Presence check for required text fields; trims surrounding whitespace
fn required_name(raw: &str, what: &str) -> StoreResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(StoreError::Validation(format!("{what} is required")));
    }
    Ok(trimmed.to_string())
}

/// Patch-merge: `None` leaves the current value unchanged
fn merge<T>(current: &mut Option<T>, patch: Option<T>) {
    if let Some(value) = patch {
        *current = Some(value);
    }
}

/// First-occurrence-wins dedup, preserving the given order
fn dedup_skills(skills: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    skills
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
