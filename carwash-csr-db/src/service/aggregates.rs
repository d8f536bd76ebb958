use carwash_csr_api::{ApiError, ApiResult};

use crate::models::customer::CustomerModel;
use crate::models::subscription::{SubscriptionStatus, VehicleSubscriptionModel};
use crate::repository::customers::CustomerRepository;
use crate::repository::subscriptions::SubscriptionRepository;

/// A customer together with everything the detail screen shows about them.
#[derive(Debug, Clone)]
pub struct CustomerOverview {
    pub customer: CustomerModel,
    pub subscriptions: Vec<VehicleSubscriptionModel>,
    pub has_active_subscription: bool,
    pub total_vehicles: usize,
}

impl CustomerOverview {
    pub fn build(
        customer: CustomerModel,
        subscriptions: Vec<VehicleSubscriptionModel>,
    ) -> Self {
        let has_active_subscription = subscriptions
            .iter()
            .any(|s| s.status == SubscriptionStatus::Active);
        let total_vehicles = subscriptions.iter().map(|s| s.vehicles.len()).sum();
        Self {
            customer,
            subscriptions,
            has_active_subscription,
            total_vehicles,
        }
    }
}

/// Loads a customer and their subscriptions in one call.
pub async fn load_customer_overview(
    customers: &dyn CustomerRepository,
    subscriptions: &dyn SubscriptionRepository,
    customer_id: &str,
) -> ApiResult<CustomerOverview> {
    let customer = customers
        .get_customer_by_id(customer_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Customer not found: {customer_id}")))?;
    let subs = subscriptions
        .get_subscriptions_by_customer_id(customer_id)
        .await?;
    Ok(CustomerOverview::build(customer, subs))
}
