use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::VehicleSubscriptionModel;
use sqlx::PgPool;

use super::repo_impl::{attach_collections, SUBSCRIPTION_COLUMNS, SUBSCRIPTION_JOINS};
use crate::utils::TryFromRow;

pub(super) async fn find_by_id_impl(
    pool: &PgPool,
    id: &str,
) -> ApiResult<Option<VehicleSubscriptionModel>> {
    let query = format!(
        "SELECT {SUBSCRIPTION_COLUMNS} {SUBSCRIPTION_JOINS} WHERE s.id = $1"
    );
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let subscription = VehicleSubscriptionModel::try_from_row(&row)
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let mut subscriptions = vec![subscription];
    attach_collections(pool, &mut subscriptions).await?;
    Ok(subscriptions.pop())
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::models::subscription::{
        BillingFrequency, DiscountValue, PaymentMethod, SubscriptionStatus,
    };
    use carwash_csr_db::repository::subscriptions::SubscriptionRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn hydrates_the_whole_aggregate(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let sub = stores
            .subscriptions
            .get_subscription_by_id("sub-002")
            .await?
            .expect("seeded");
        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert_eq!(sub.billing_info.frequency, BillingFrequency::Quarterly);
        assert!(matches!(
            sub.billing_info.payment_method.method,
            PaymentMethod::Paypal { .. }
        ));
        assert!(matches!(
            sub.billing_info.discount.as_ref().map(|d| &d.value),
            Some(DiscountValue::Percentage(_))
        ));
        assert_eq!(sub.vehicles.len(), 1);
        assert_eq!(sub.locations.len(), 1);

        assert!(stores
            .subscriptions
            .get_subscription_by_id("sub-999")
            .await?
            .is_none());
        Ok(())
    }
}
