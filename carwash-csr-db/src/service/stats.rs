use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::models::customer::CustomerModel;
use crate::models::request::{CsrRequestModel, CsrRequestStatus};
use crate::models::subscription::{SubscriptionStatus, VehicleSubscriptionModel};

/// Normalizes billing amounts across frequencies to a single monthly
/// revenue figure. Only active subscriptions contribute; the sum is
/// rounded half-up to two decimal places.
///
/// Pure aggregation; no side effects, nothing persisted.
pub fn monthly_revenue(subscriptions: &[VehicleSubscriptionModel]) -> Decimal {
    let total: Decimal = subscriptions
        .iter()
        .filter(|s| s.status == SubscriptionStatus::Active)
        .map(|s| {
            s.billing_info.amount
                / Decimal::from(s.billing_info.frequency.months_per_period())
        })
        .sum();
    total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Headline numbers for the dashboard landing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub completed_requests: usize,
    pub total_customers: usize,
    pub monthly_revenue: Decimal,
}

impl DashboardStats {
    pub fn compute(
        requests: &[CsrRequestModel],
        customers: &[CustomerModel],
        subscriptions: &[VehicleSubscriptionModel],
    ) -> Self {
        Self {
            total_requests: requests.len(),
            pending_requests: requests
                .iter()
                .filter(|r| r.status == CsrRequestStatus::Pending)
                .count(),
            completed_requests: requests
                .iter()
                .filter(|r| r.status == CsrRequestStatus::Completed)
                .count(),
            total_customers: customers.len(),
            monthly_revenue: monthly_revenue(subscriptions),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subscription::BillingFrequency;
    use crate::store::seed::{seed_customers, seed_requests, seed_subscriptions};
    use std::str::FromStr;

    fn subscription_with(
        status: SubscriptionStatus,
        amount: &str,
        frequency: BillingFrequency,
    ) -> VehicleSubscriptionModel {
        let mut sub = seed_subscriptions().expect("seed data").remove(0);
        sub.status = status;
        sub.billing_info.amount = Decimal::from_str(amount).expect("valid amount");
        sub.billing_info.frequency = frequency;
        sub
    }

    #[test]
    fn quarterly_and_annual_amounts_normalize_to_monthly() {
        let subs = vec![
            subscription_with(SubscriptionStatus::Active, "300", BillingFrequency::Quarterly),
            subscription_with(SubscriptionStatus::Active, "1200", BillingFrequency::Annual),
        ];

        assert_eq!(monthly_revenue(&subs), Decimal::from(200));
    }

    #[test]
    fn only_active_subscriptions_contribute() {
        let subs = vec![
            subscription_with(SubscriptionStatus::Active, "100", BillingFrequency::Monthly),
            subscription_with(SubscriptionStatus::Paused, "999", BillingFrequency::Monthly),
            subscription_with(SubscriptionStatus::Cancelled, "999", BillingFrequency::Monthly),
            subscription_with(SubscriptionStatus::Expired, "999", BillingFrequency::Monthly),
        ];

        assert_eq!(monthly_revenue(&subs), Decimal::from(100));
    }

    #[test]
    fn revenue_rounds_half_up_to_two_places() {
        let subs = vec![subscription_with(
            SubscriptionStatus::Active,
            "100",
            BillingFrequency::Quarterly,
        )];

        // 100 / 3 = 33.333... -> 33.33
        assert_eq!(monthly_revenue(&subs), Decimal::from_str("33.33").unwrap());
    }

    #[test]
    fn dashboard_stats_counts_by_status() {
        let requests = seed_requests().expect("seed data");
        let customers = seed_customers().expect("seed data");
        let subscriptions = seed_subscriptions().expect("seed data");

        let stats = DashboardStats::compute(&requests, &customers, &subscriptions);

        assert_eq!(stats.total_requests, requests.len());
        assert_eq!(
            stats.pending_requests,
            requests
                .iter()
                .filter(|r| r.status == CsrRequestStatus::Pending)
                .count()
        );
        assert_eq!(stats.total_customers, customers.len());
    }
}
