use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::identifiable::{EntityId, Identifiable};
use crate::models::subscription::billing::BillingInfoModel;
use crate::models::subscription::common_enums::{SubscriptionPlanType, SubscriptionStatus};
use crate::models::subscription::location::CarWashLocationModel;
use crate::models::subscription::vehicle::VehicleModel;
use crate::models::versioned::Versioned;

/// Numeric and boolean caps attached to a plan tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFeatures {
    /// Maximum number of vehicles allowed on the subscription
    pub max_vehicles: i32,
    /// How many washes are included per month
    pub max_washes_per_month: i32,
    pub detailing_included: bool,
}

/// # Documentation
/// A customer's vehicle-wash subscription: plan tier and caps, covered
/// vehicles (unique by VIN, bounded by `plan_features.max_vehicles`),
/// valid locations, billing, and lifecycle timestamps.
///
/// Status side effects: pausing sets `paused_at`, cancelling sets
/// `cancelled_at` and `end_date` to the same instant, re-activating clears
/// `paused_at`. At most one status-specific timestamp is meaningful at a
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleSubscriptionModel {
    pub id: EntityId,

    pub customer_id: EntityId,

    #[serde(
        serialize_with = "crate::models::subscription::common_enums::serialize_plan_type",
        deserialize_with = "crate::models::subscription::common_enums::deserialize_plan_type"
    )]
    pub plan_type: SubscriptionPlanType,

    pub plan_features: PlanFeatures,

    #[serde(
        serialize_with = "crate::models::subscription::common_enums::serialize_subscription_status",
        deserialize_with = "crate::models::subscription::common_enums::deserialize_subscription_status"
    )]
    pub status: SubscriptionStatus,

    pub locations: Vec<CarWashLocationModel>,

    /// Vehicles covered by this subscription
    pub vehicles: Vec<VehicleModel>,

    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub paused_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,

    pub billing_info: BillingInfoModel,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Snapshot version for optimistic-concurrency checks on writes
    pub version: i64,
}

impl VehicleSubscriptionModel {
    /// Whether another vehicle fits under the plan cap.
    pub fn has_vehicle_capacity(&self) -> bool {
        (self.vehicles.len() as i32) < self.plan_features.max_vehicles
    }
}

impl Identifiable for VehicleSubscriptionModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}

impl Versioned for VehicleSubscriptionModel {
    fn get_version(&self) -> i64 {
        self.version
    }
}
