use async_trait::async_trait;
use carwash_csr_api::profile::{AddressUpdate, CustomerProfileUpdate};
use carwash_csr_api::{ApiError, ApiResult};
use chrono::Utc;
use heapless::String as HeaplessString;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::models::customer::{AddressModel, CustomerModel, PurchaseModel};
use crate::models::request::{CsrRequestModel, CsrRequestStatus, RequestHistoryEntryModel};
use crate::models::subscription::{
    BillingInfoModel, CarWashLocationModel, PaymentMethodModel, SubscriptionStatus, VehicleModel,
    VehicleSubscriptionModel,
};
use crate::repository::customers::CustomerRepository;
use crate::repository::locations::LocationRepository;
use crate::repository::purchases::PurchaseRepository;
use crate::repository::requests::RequestRepository;
use crate::repository::subscriptions::{NewSubscription, NewVehicle, SubscriptionRepository};
use crate::service::subscription_lifecycle;
use crate::store::seed;

/// Bounded-string conversion for values arriving from the outside.
/// Overflow here is caller input, not a fixture bug.
fn bounded<const N: usize>(s: &str) -> ApiResult<HeaplessString<N>> {
    HeaplessString::try_from(s)
        .map_err(|_| ApiError::ValidationError(format!("value too long for field: {s}")))
}

fn vehicle_number(id: &str) -> Option<u64> {
    id.strip_prefix("veh-").and_then(|n| n.parse().ok())
}

struct MemoryState {
    customers: Vec<CustomerModel>,
    requests: Vec<CsrRequestModel>,
    subscriptions: Vec<VehicleSubscriptionModel>,
    locations: Vec<CarWashLocationModel>,
    purchases: Vec<PurchaseModel>,
    /// Next `veh-N` to hand out. Never reused, even after removals.
    next_vehicle_number: u64,
}

/// In-memory store backing local development and tests. Implements every
/// repository trait over a single lock so multi-record writes stay atomic.
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new(
        customers: Vec<CustomerModel>,
        requests: Vec<CsrRequestModel>,
        subscriptions: Vec<VehicleSubscriptionModel>,
        locations: Vec<CarWashLocationModel>,
        purchases: Vec<PurchaseModel>,
    ) -> Self {
        let next_vehicle_number = subscriptions
            .iter()
            .flat_map(|s| s.vehicles.iter())
            .filter_map(|v| vehicle_number(v.id.as_str()))
            .max()
            .map_or(1, |n| n + 1);

        Self {
            state: RwLock::new(MemoryState {
                customers,
                requests,
                subscriptions,
                locations,
                purchases,
                next_vehicle_number,
            }),
        }
    }

    /// A store pre-loaded with the development fixtures.
    pub fn seeded() -> ApiResult<Self> {
        Ok(Self::new(
            seed::seed_customers()?,
            seed::seed_requests()?,
            seed::seed_subscriptions()?,
            seed::seed_locations()?,
            seed::seed_purchases()?,
        ))
    }
}

impl MemoryState {
    fn subscription_mut(
        &mut self,
        id: &str,
        expected_version: i64,
    ) -> ApiResult<Option<&mut VehicleSubscriptionModel>> {
        let Some(sub) = self.subscriptions.iter_mut().find(|s| s.id.as_str() == id) else {
            return Ok(None);
        };
        if sub.version != expected_version {
            return Err(ApiError::Conflict(format!(
                "Subscription {id} was modified concurrently"
            )));
        }
        Ok(Some(sub))
    }
}

#[async_trait]
impl RequestRepository for MemoryStore {
    async fn get_all_requests(&self) -> ApiResult<Vec<CsrRequestModel>> {
        let state = self.state.read();
        let mut requests = state.requests.clone();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn get_request_by_id(&self, id: &str) -> ApiResult<Option<CsrRequestModel>> {
        let state = self.state.read();
        Ok(state.requests.iter().find(|r| r.id.as_str() == id).cloned())
    }

    async fn get_requests_by_status(
        &self,
        status: CsrRequestStatus,
    ) -> ApiResult<Vec<CsrRequestModel>> {
        let state = self.state.read();
        let mut requests: Vec<_> = state
            .requests
            .iter()
            .filter(|r| r.status == status)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn get_requests_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<CsrRequestModel>> {
        let state = self.state.read();
        let mut requests: Vec<_> = state
            .requests
            .iter()
            .filter(|r| r.customer_id.as_str() == customer_id)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn update_request(
        &self,
        request: &CsrRequestModel,
    ) -> ApiResult<Option<CsrRequestModel>> {
        let mut state = self.state.write();
        let Some(stored) = state
            .requests
            .iter_mut()
            .find(|r| r.id == request.id)
        else {
            return Ok(None);
        };
        if stored.version != request.version {
            return Err(ApiError::Conflict(format!(
                "Request {} was modified concurrently",
                request.id
            )));
        }
        let mut updated = request.clone();
        updated.version += 1;
        *stored = updated.clone();
        Ok(Some(updated))
    }

    async fn append_history_entry(
        &self,
        request_id: &str,
        entry: RequestHistoryEntryModel,
        expected_version: i64,
    ) -> ApiResult<CsrRequestModel> {
        let mut state = self.state.write();
        let stored = state
            .requests
            .iter_mut()
            .find(|r| r.id.as_str() == request_id)
            .ok_or_else(|| ApiError::NotFound(format!("Request not found: {request_id}")))?;
        if stored.version != expected_version {
            return Err(ApiError::Conflict(format!(
                "Request {request_id} was modified concurrently"
            )));
        }
        stored.status = entry.status;
        stored.updated_at = entry.timestamp;
        stored.history.insert(0, entry);
        stored.version += 1;
        tracing::debug!(request_id, "history entry appended");
        Ok(stored.clone())
    }
}

#[async_trait]
impl CustomerRepository for MemoryStore {
    async fn get_all_customers(&self) -> ApiResult<Vec<CustomerModel>> {
        Ok(self.state.read().customers.clone())
    }

    async fn get_customer_by_id(&self, id: &str) -> ApiResult<Option<CustomerModel>> {
        let state = self.state.read();
        Ok(state.customers.iter().find(|c| c.id.as_str() == id).cloned())
    }

    async fn get_customer_by_email(&self, email: &str) -> ApiResult<Option<CustomerModel>> {
        let state = self.state.read();
        Ok(state
            .customers
            .iter()
            .find(|c| c.email.as_str().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_customers_by_name(&self, name: &str) -> ApiResult<Vec<CustomerModel>> {
        let needle = name.to_lowercase();
        let state = self.state.read();
        Ok(state
            .customers
            .iter()
            .filter(|c| {
                c.first_name.as_str().to_lowercase().contains(&needle)
                    || c.last_name.as_str().to_lowercase().contains(&needle)
            })
            .cloned()
            .collect())
    }

    async fn update_customer_details(
        &self,
        id: &str,
        profile: &CustomerProfileUpdate,
        address: &AddressUpdate,
        expected_version: i64,
    ) -> ApiResult<Option<CustomerModel>> {
        let first_name = bounded(&profile.first_name)?;
        let last_name = bounded(&profile.last_name)?;
        let email = bounded(&profile.email)?;
        let phone = bounded(&profile.phone)?;
        let new_address = AddressModel {
            street: bounded(&address.street)?,
            city: bounded(&address.city)?,
            state: bounded(&address.state)?,
            zip_code: bounded(&address.zip_code)?,
        };

        let mut state = self.state.write();
        let Some(stored) = state.customers.iter_mut().find(|c| c.id.as_str() == id) else {
            return Ok(None);
        };
        if stored.version != expected_version {
            return Err(ApiError::Conflict(format!(
                "Customer {id} was modified concurrently"
            )));
        }
        stored.first_name = first_name;
        stored.last_name = last_name;
        stored.email = email;
        stored.phone = phone;
        stored.address = Some(new_address);
        stored.updated_at = Utc::now();
        stored.version += 1;
        Ok(Some(stored.clone()))
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn get_subscription_by_id(
        &self,
        id: &str,
    ) -> ApiResult<Option<VehicleSubscriptionModel>> {
        let state = self.state.read();
        Ok(state
            .subscriptions
            .iter()
            .find(|s| s.id.as_str() == id)
            .cloned())
    }

    async fn get_subscriptions_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<VehicleSubscriptionModel>> {
        let state = self.state.read();
        Ok(state
            .subscriptions
            .iter()
            .filter(|s| s.customer_id.as_str() == customer_id)
            .cloned()
            .collect())
    }

    async fn create_subscription(
        &self,
        new: NewSubscription,
    ) -> ApiResult<VehicleSubscriptionModel> {
        let mut state = self.state.write();

        let mut locations = Vec::with_capacity(new.location_ids.len());
        for loc_id in &new.location_ids {
            let loc = state
                .locations
                .iter()
                .find(|l| l.id == *loc_id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("Location not found: {loc_id}")))?;
            locations.push(loc);
        }

        if new.vehicles.len() as i32 > new.plan_features.max_vehicles {
            return Err(ApiError::ValidationError(format!(
                "Maximum vehicles ({}) reached for this plan",
                new.plan_features.max_vehicles
            )));
        }
        for vehicle in &new.vehicles {
            let exists = state
                .subscriptions
                .iter()
                .flat_map(|s| s.vehicles.iter())
                .any(|v| v.vin == vehicle.vin);
            if exists {
                return Err(ApiError::ValidationError(
                    "Vehicle already exists in system".to_string(),
                ));
            }
        }

        let now = Utc::now();
        let mut vehicles = Vec::with_capacity(new.vehicles.len());
        for vehicle in new.vehicles {
            vehicles.push(materialize_vehicle(&mut state, vehicle, now)?);
        }

        let id: HeaplessString<40> =
            seed::hs(&format!("sub-{}", Uuid::new_v4().simple()))?;
        let subscription = VehicleSubscriptionModel {
            id: id.clone(),
            customer_id: new.customer_id.clone(),
            plan_type: new.plan_type,
            plan_features: new.plan_features,
            status: SubscriptionStatus::Active,
            locations,
            vehicles,
            start_date: new.start_date,
            end_date: None,
            paused_at: None,
            cancelled_at: None,
            billing_info: BillingInfoModel {
                amount: new.billing.amount,
                currency: new.billing.currency,
                frequency: new.billing.frequency,
                next_billing_date: new.billing.next_billing_date,
                last_billing_date: None,
                payment_method: PaymentMethodModel {
                    id: seed::hs(&format!("pm-{}", Uuid::new_v4().simple()))?,
                    method: new.billing.payment_method,
                },
                discount: new.billing.discount,
            },
            created_at: now,
            updated_at: now,
            version: 1,
        };

        if let Some(customer) = state
            .customers
            .iter_mut()
            .find(|c| c.id == subscription.customer_id)
        {
            customer.subscription_ids.push(id.clone());
        }
        state.subscriptions.push(subscription.clone());
        tracing::debug!(subscription_id = %id, "subscription created");
        Ok(subscription)
    }

    async fn update_subscription_status(
        &self,
        id: &str,
        status: SubscriptionStatus,
        expected_version: i64,
    ) -> ApiResult<Option<VehicleSubscriptionModel>> {
        let mut state = self.state.write();
        let Some(sub) = state.subscription_mut(id, expected_version)? else {
            return Ok(None);
        };
        subscription_lifecycle::set_status(sub, status);
        sub.version += 1;
        Ok(Some(sub.clone()))
    }

    async fn add_vehicle_to_subscription(
        &self,
        subscription_id: &str,
        vehicle: NewVehicle,
        expected_version: i64,
    ) -> ApiResult<VehicleSubscriptionModel> {
        let mut state = self.state.write();

        let sub = state
            .subscriptions
            .iter()
            .find(|s| s.id.as_str() == subscription_id)
            .ok_or_else(|| {
                ApiError::NotFound(format!("Subscription not found: {subscription_id}"))
            })?;
        if sub.version != expected_version {
            return Err(ApiError::Conflict(format!(
                "Subscription {subscription_id} was modified concurrently"
            )));
        }
        // The cap error takes precedence, so only run the system-wide VIN
        // check when the vehicle would otherwise fit.
        if sub.has_vehicle_capacity() {
            let elsewhere = state
                .subscriptions
                .iter()
                .filter(|s| s.id.as_str() != subscription_id)
                .flat_map(|s| s.vehicles.iter())
                .any(|v| v.vin == vehicle.vin);
            if elsewhere {
                return Err(ApiError::ValidationError(
                    "Vehicle already exists in system".to_string(),
                ));
            }
        }

        let model = materialize_vehicle(&mut state, vehicle, Utc::now())?;
        // Lookup again: materialize_vehicle needed the whole state.
        let sub = state
            .subscriptions
            .iter_mut()
            .find(|s| s.id.as_str() == subscription_id)
            .ok_or_else(|| {
                ApiError::NotFound(format!("Subscription not found: {subscription_id}"))
            })?;
        subscription_lifecycle::add_vehicle(sub, model)?;
        sub.version += 1;
        Ok(sub.clone())
    }

    async fn remove_vehicle_from_subscription(
        &self,
        subscription_id: &str,
        vehicle_id: &str,
        expected_version: i64,
    ) -> ApiResult<VehicleSubscriptionModel> {
        let mut state = self.state.write();
        let sub = state
            .subscription_mut(subscription_id, expected_version)?
            .ok_or_else(|| {
                ApiError::NotFound(format!("Subscription not found: {subscription_id}"))
            })?;
        subscription_lifecycle::remove_vehicle(sub, vehicle_id);
        sub.version += 1;
        Ok(sub.clone())
    }

    async fn delete_subscription(&self, id: &str) -> ApiResult<bool> {
        let mut state = self.state.write();
        let Some(index) = state.subscriptions.iter().position(|s| s.id.as_str() == id) else {
            return Ok(false);
        };
        let removed = state.subscriptions.remove(index);
        if let Some(customer) = state
            .customers
            .iter_mut()
            .find(|c| c.id == removed.customer_id)
        {
            customer.subscription_ids.retain(|s| s.as_str() != id);
        }
        tracing::debug!(subscription_id = id, "subscription deleted");
        Ok(true)
    }

    async fn get_vehicle_by_id(&self, id: &str) -> ApiResult<Option<VehicleModel>> {
        let state = self.state.read();
        Ok(state
            .subscriptions
            .iter()
            .flat_map(|s| s.vehicles.iter())
            .find(|v| v.id.as_str() == id)
            .cloned())
    }

    async fn get_vehicles_by_ids(
        &self,
        ids: &[crate::models::identifiable::EntityId],
    ) -> ApiResult<Vec<Option<VehicleModel>>> {
        let state = self.state.read();
        Ok(ids
            .iter()
            .map(|id| {
                state
                    .subscriptions
                    .iter()
                    .flat_map(|s| s.vehicles.iter())
                    .find(|v| v.id == *id)
                    .cloned()
            })
            .collect())
    }
}

/// Assigns the next monotonic `veh-N` id and stamps `added_at`.
fn materialize_vehicle(
    state: &mut MemoryState,
    vehicle: NewVehicle,
    added_at: chrono::DateTime<Utc>,
) -> ApiResult<VehicleModel> {
    let number = state.next_vehicle_number;
    state.next_vehicle_number += 1;
    Ok(VehicleModel {
        id: seed::hs(&format!("veh-{number}"))?,
        vin: vehicle.vin,
        make: vehicle.make,
        model: vehicle.model,
        year: vehicle.year,
        color: vehicle.color,
        license_plate: vehicle.license_plate,
        added_at,
    })
}

#[async_trait]
impl LocationRepository for MemoryStore {
    async fn get_all_locations(&self) -> ApiResult<Vec<CarWashLocationModel>> {
        Ok(self.state.read().locations.clone())
    }

    async fn get_location_by_id(&self, id: &str) -> ApiResult<Option<CarWashLocationModel>> {
        let state = self.state.read();
        Ok(state.locations.iter().find(|l| l.id.as_str() == id).cloned())
    }
}

#[async_trait]
impl PurchaseRepository for MemoryStore {
    async fn get_purchases_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<PurchaseModel>> {
        let state = self.state.read();
        let mut purchases: Vec<_> = state
            .purchases
            .iter()
            .filter(|p| p.user_id.as_str() == customer_id)
            .cloned()
            .collect();
        purchases.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date));
        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subscription::{BillingFrequency, PaymentMethod, PlanFeatures};
    use crate::repository::subscriptions::NewBillingInfo;
    use crate::service::request_ledger;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn new_vehicle(vin: &str) -> NewVehicle {
        NewVehicle {
            vin: HeaplessString::try_from(vin).unwrap(),
            make: HeaplessString::try_from("Ford").unwrap(),
            model: HeaplessString::try_from("Focus").unwrap(),
            year: 2022,
            color: HeaplessString::try_from("Green").unwrap(),
            license_plate: HeaplessString::try_from("NEW 1234").unwrap(),
        }
    }

    #[tokio::test]
    async fn actioning_a_request_persists_ledger_invariants() {
        let store = MemoryStore::seeded().expect("seeded store");

        let mut request = store
            .get_request_by_id("req-004")
            .await
            .expect("read")
            .expect("req-004 present");
        let version = request.version;
        let history_before = request.history.len();

        request_ledger::apply_action(
            &mut request,
            CsrRequestStatus::Completed,
            "csr-014",
            "refunded the duplicate charge",
        )
        .expect("action applies");
        store
            .append_history_entry(
                "req-004",
                request.history[0].clone(),
                version,
            )
            .await
            .expect("append persists");

        let reloaded = store
            .get_request_by_id("req-004")
            .await
            .expect("read")
            .expect("still present");
        assert_eq!(reloaded.status, CsrRequestStatus::Completed);
        assert_eq!(reloaded.history.len(), history_before + 1);
        assert_eq!(reloaded.history[0].status, reloaded.status);
        assert_eq!(reloaded.history[0].timestamp, reloaded.updated_at);
        assert_eq!(reloaded.version, version + 1);
    }

    #[tokio::test]
    async fn stale_version_write_is_rejected() {
        let store = MemoryStore::seeded().expect("seeded store");

        let request = store
            .get_request_by_id("req-001")
            .await
            .expect("read")
            .expect("present");
        let entry = request.history[0].clone();

        let err = store
            .append_history_entry("req-001", entry, request.version + 5)
            .await
            .expect_err("stale version must conflict");
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn full_overwrite_update_bumps_version() {
        let store = MemoryStore::seeded().expect("seeded store");

        let mut request = store
            .get_request_by_id("req-001")
            .await
            .expect("read")
            .expect("present");
        request_ledger::apply_action(
            &mut request,
            CsrRequestStatus::Rejected,
            "csr-014",
            "customer withdrew the request",
        )
        .expect("action applies");

        let updated = store
            .update_request(&request)
            .await
            .expect("write")
            .expect("request exists");
        assert_eq!(updated.version, request.version + 1);
        assert_eq!(updated.status, CsrRequestStatus::Rejected);
    }

    #[tokio::test]
    async fn vehicle_ids_are_monotonic_and_never_reused() {
        let store = MemoryStore::seeded().expect("seeded store");

        let sub = store
            .get_subscription_by_id("sub-002")
            .await
            .expect("read")
            .expect("present");
        let sub = store
            .add_vehicle_to_subscription("sub-002", new_vehicle("3FADP4BJ7KM000001"), sub.version)
            .await
            .expect("add fits under the cap");
        let first_id = sub.vehicles.last().expect("added vehicle").id.clone();
        assert_eq!(first_id.as_str(), "veh-105");

        let sub = store
            .remove_vehicle_from_subscription("sub-002", first_id.as_str(), sub.version)
            .await
            .expect("remove");
        let sub = store
            .add_vehicle_to_subscription("sub-002", new_vehicle("3FADP4BJ7KM000002"), sub.version)
            .await
            .expect("second add");
        assert_eq!(sub.vehicles.last().expect("added vehicle").id.as_str(), "veh-106");
    }

    #[tokio::test]
    async fn duplicate_vin_across_subscriptions_is_rejected() {
        let store = MemoryStore::seeded().expect("seeded store");

        let sub = store
            .get_subscription_by_id("sub-002")
            .await
            .expect("read")
            .expect("present");
        // VIN already on sub-001.
        let err = store
            .add_vehicle_to_subscription("sub-002", new_vehicle("1HGCM82633A004352"), sub.version)
            .await
            .expect_err("system-wide VIN uniqueness");
        assert!(matches!(err, ApiError::ValidationError(msg) if msg.contains("already exists")));
    }

    #[tokio::test]
    async fn delete_subscription_removes_back_references_and_vehicles() {
        let store = MemoryStore::seeded().expect("seeded store");

        assert!(store.delete_subscription("sub-001").await.expect("delete"));

        assert!(store
            .get_subscription_by_id("sub-001")
            .await
            .expect("read")
            .is_none());
        assert!(store
            .get_vehicle_by_id("veh-101")
            .await
            .expect("read")
            .is_none());
        let customer = store
            .get_customer_by_id("cust-1001")
            .await
            .expect("read")
            .expect("present");
        assert!(!customer
            .subscription_ids
            .iter()
            .any(|s| s.as_str() == "sub-001"));

        assert!(!store.delete_subscription("sub-001").await.expect("idempotent"));
    }

    #[tokio::test]
    async fn create_subscription_resolves_locations_and_assigns_ids() {
        let store = MemoryStore::seeded().expect("seeded store");

        let created = store
            .create_subscription(NewSubscription {
                customer_id: HeaplessString::try_from("cust-1004").unwrap(),
                plan_type: crate::models::subscription::SubscriptionPlanType::Basic,
                plan_features: PlanFeatures {
                    max_vehicles: 1,
                    max_washes_per_month: 4,
                    detailing_included: false,
                },
                location_ids: vec![HeaplessString::try_from("loc-003").unwrap()],
                vehicles: vec![new_vehicle("2T1BURHE5JC000003")],
                start_date: Utc::now(),
                billing: NewBillingInfo {
                    amount: Decimal::from_str("19.99").unwrap(),
                    currency: HeaplessString::try_from("USD").unwrap(),
                    frequency: BillingFrequency::Monthly,
                    next_billing_date: Utc::now(),
                    payment_method: PaymentMethod::Card {
                        brand: HeaplessString::try_from("visa").unwrap(),
                        last4: HeaplessString::try_from("1111").unwrap(),
                    },
                    discount: None,
                },
            })
            .await
            .expect("create");

        assert!(created.id.as_str().starts_with("sub-"));
        assert_eq!(created.status, SubscriptionStatus::Active);
        assert_eq!(created.locations[0].id.as_str(), "loc-003");
        assert_eq!(created.vehicles[0].id.as_str(), "veh-105");

        let customer = store
            .get_customer_by_id("cust-1004")
            .await
            .expect("read")
            .expect("present");
        assert!(customer.subscription_ids.contains(&created.id));
    }

    #[tokio::test]
    async fn create_subscription_with_unknown_location_fails() {
        let store = MemoryStore::seeded().expect("seeded store");

        let err = store
            .create_subscription(NewSubscription {
                customer_id: HeaplessString::try_from("cust-1004").unwrap(),
                plan_type: crate::models::subscription::SubscriptionPlanType::Basic,
                plan_features: PlanFeatures {
                    max_vehicles: 1,
                    max_washes_per_month: 4,
                    detailing_included: false,
                },
                location_ids: vec![HeaplessString::try_from("loc-999").unwrap()],
                vehicles: vec![],
                start_date: Utc::now(),
                billing: NewBillingInfo {
                    amount: Decimal::from_str("19.99").unwrap(),
                    currency: HeaplessString::try_from("USD").unwrap(),
                    frequency: BillingFrequency::Monthly,
                    next_billing_date: Utc::now(),
                    payment_method: PaymentMethod::BankTransfer {
                        last4: HeaplessString::try_from("0001").unwrap(),
                    },
                    discount: None,
                },
            })
            .await
            .expect_err("unknown location");
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn profile_update_applies_and_guards_version() {
        let store = MemoryStore::seeded().expect("seeded store");

        let customer = store
            .get_customer_by_id("cust-1001")
            .await
            .expect("read")
            .expect("present");

        let profile = CustomerProfileUpdate {
            first_name: "Sara".to_string(),
            last_name: "Johnson".to_string(),
            email: "sara.johnson@example.com".to_string(),
            phone: "5559876543".to_string(),
        };
        let address = AddressUpdate {
            street: "456 New Ave".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62702".to_string(),
        };

        let updated = store
            .update_customer_details("cust-1001", &profile, &address, customer.version)
            .await
            .expect("write")
            .expect("customer exists");
        assert_eq!(updated.first_name.as_str(), "Sara");
        assert_eq!(
            updated.address.as_ref().map(|a| a.street.as_str()),
            Some("456 New Ave")
        );
        assert_eq!(updated.version, customer.version + 1);

        let err = store
            .update_customer_details("cust-1001", &profile, &address, customer.version)
            .await
            .expect_err("stale version");
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn vehicle_batch_lookup_preserves_order_and_gaps() {
        let store = MemoryStore::seeded().expect("seeded store");

        let ids = vec![
            HeaplessString::try_from("veh-102").unwrap(),
            HeaplessString::try_from("veh-999").unwrap(),
            HeaplessString::try_from("veh-101").unwrap(),
        ];
        let vehicles = store.get_vehicles_by_ids(&ids).await.expect("read");

        assert_eq!(vehicles.len(), 3);
        assert_eq!(
            vehicles[0].as_ref().map(|v| v.id.as_str()),
            Some("veh-102")
        );
        assert!(vehicles[1].is_none());
        assert_eq!(
            vehicles[2].as_ref().map(|v| v.id.as_str()),
            Some("veh-101")
        );
    }

    #[tokio::test]
    async fn status_update_applies_lifecycle_side_effects() {
        let store = MemoryStore::seeded().expect("seeded store");

        let sub = store
            .get_subscription_by_id("sub-001")
            .await
            .expect("read")
            .expect("present");
        let updated = store
            .update_subscription_status("sub-001", SubscriptionStatus::Cancelled, sub.version)
            .await
            .expect("write")
            .expect("subscription exists");

        assert_eq!(updated.status, SubscriptionStatus::Cancelled);
        assert_eq!(updated.cancelled_at, updated.end_date);
        assert_eq!(updated.version, sub.version + 1);
    }
}
