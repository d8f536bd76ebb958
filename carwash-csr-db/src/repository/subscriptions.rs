use async_trait::async_trait;
use carwash_csr_api::ApiResult;
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;

use crate::models::identifiable::EntityId;
use crate::models::subscription::{
    BillingFrequency, Discount, PaymentMethod, PlanFeatures, SubscriptionPlanType,
    SubscriptionStatus, VehicleModel, VehicleSubscriptionModel,
};

/// Input payload for creating a subscription. The store assigns the
/// subscription id, vehicle ids and payment-method id, resolves location
/// ids into embedded location records, and stamps the audit timestamps.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub customer_id: EntityId,
    pub plan_type: SubscriptionPlanType,
    pub plan_features: PlanFeatures,
    pub location_ids: Vec<EntityId>,
    pub vehicles: Vec<NewVehicle>,
    pub start_date: DateTime<Utc>,
    pub billing: NewBillingInfo,
}

#[derive(Debug, Clone)]
pub struct NewBillingInfo {
    pub amount: Decimal,
    pub currency: HeaplessString<3>,
    pub frequency: BillingFrequency,
    pub next_billing_date: DateTime<Utc>,
    pub payment_method: PaymentMethod,
    pub discount: Option<Discount>,
}

/// A vehicle as entered by the CSR; the store assigns its `veh-N` id.
#[derive(Debug, Clone)]
pub struct NewVehicle {
    pub vin: HeaplessString<20>,
    pub make: HeaplessString<50>,
    pub model: HeaplessString<50>,
    pub year: i32,
    pub color: HeaplessString<30>,
    pub license_plate: HeaplessString<20>,
}

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn get_subscription_by_id(
        &self,
        id: &str,
    ) -> ApiResult<Option<VehicleSubscriptionModel>>;

    async fn get_subscriptions_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<VehicleSubscriptionModel>>;

    async fn create_subscription(
        &self,
        new: NewSubscription,
    ) -> ApiResult<VehicleSubscriptionModel>;

    /// Moves the subscription to `status` and applies the lifecycle
    /// timestamp side effects (paused_at / cancelled_at / end_date).
    async fn update_subscription_status(
        &self,
        id: &str,
        status: SubscriptionStatus,
        expected_version: i64,
    ) -> ApiResult<Option<VehicleSubscriptionModel>>;

    /// Adds a vehicle, enforcing the plan's vehicle cap and system-wide
    /// VIN uniqueness. The assigned id continues the monotonic `veh-N`
    /// sequence from the highest id ever issued.
    async fn add_vehicle_to_subscription(
        &self,
        subscription_id: &str,
        vehicle: NewVehicle,
        expected_version: i64,
    ) -> ApiResult<VehicleSubscriptionModel>;

    async fn remove_vehicle_from_subscription(
        &self,
        subscription_id: &str,
        vehicle_id: &str,
        expected_version: i64,
    ) -> ApiResult<VehicleSubscriptionModel>;

    /// Deletes the subscription together with every dependent record.
    /// Returns whether a subscription was actually removed.
    async fn delete_subscription(&self, id: &str) -> ApiResult<bool>;

    async fn get_vehicle_by_id(&self, id: &str) -> ApiResult<Option<VehicleModel>>;

    /// Batch lookup preserving input order; unknown ids yield `None` at
    /// their position rather than shrinking the result.
    async fn get_vehicles_by_ids(&self, ids: &[EntityId])
        -> ApiResult<Vec<Option<VehicleModel>>>;
}
