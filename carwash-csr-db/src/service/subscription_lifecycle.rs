use carwash_csr_api::{ApiError, ApiResult};
use chrono::Utc;

use crate::models::subscription::{SubscriptionStatus, VehicleModel, VehicleSubscriptionModel};

/// Moves a subscription between lifecycle states and keeps the
/// status-specific timestamps consistent.
///
/// No predecessor table is enforced; the side effects are:
/// - paused: `paused_at` is stamped
/// - cancelled: `cancelled_at` and `end_date` are stamped with one instant
/// - active: a stale `paused_at` is cleared
/// - expired: accepted as-is (set by an external time-based process)
pub fn set_status(subscription: &mut VehicleSubscriptionModel, new_status: SubscriptionStatus) {
    let now = Utc::now();
    match new_status {
        SubscriptionStatus::Paused => {
            subscription.paused_at = Some(now);
        }
        SubscriptionStatus::Cancelled => {
            subscription.cancelled_at = Some(now);
            subscription.end_date = Some(now);
        }
        SubscriptionStatus::Active => {
            subscription.paused_at = None;
        }
        SubscriptionStatus::Expired => {}
    }
    subscription.status = new_status;
    subscription.updated_at = now;
}

/// Adds a vehicle to a subscription, enforcing the plan cap and VIN
/// uniqueness. Both checks are hard stops; on failure the subscription is
/// left untouched. The caller supplies a fully formed vehicle (id already
/// allocated by the backing store, `added_at` stamped).
pub fn add_vehicle(
    subscription: &mut VehicleSubscriptionModel,
    vehicle: VehicleModel,
) -> ApiResult<()> {
    if !subscription.has_vehicle_capacity() {
        return Err(ApiError::ValidationError(format!(
            "Maximum vehicles ({}) reached for this plan",
            subscription.plan_features.max_vehicles
        )));
    }
    if subscription.vehicles.iter().any(|v| v.vin == vehicle.vin) {
        return Err(ApiError::ValidationError(
            "Vehicle already exists in system".to_string(),
        ));
    }

    subscription.vehicles.push(vehicle);
    subscription.updated_at = Utc::now();
    Ok(())
}

/// Removes the matching vehicle unconditionally. A subscription may be
/// left with zero vehicles.
pub fn remove_vehicle(subscription: &mut VehicleSubscriptionModel, vehicle_id: &str) {
    subscription.vehicles.retain(|v| v.id.as_str() != vehicle_id);
    subscription.updated_at = Utc::now();
}
