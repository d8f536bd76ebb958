use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::VehicleSubscriptionModel;
use sqlx::PgPool;

use super::repo_impl::{attach_collections, SUBSCRIPTION_COLUMNS, SUBSCRIPTION_JOINS};
use crate::utils::TryFromRow;

pub(super) async fn find_by_customer_id_impl(
    pool: &PgPool,
    customer_id: &str,
) -> ApiResult<Vec<VehicleSubscriptionModel>> {
    let query = format!(
        "SELECT {SUBSCRIPTION_COLUMNS} {SUBSCRIPTION_JOINS} WHERE s.customer_id = $1 ORDER BY s.created_at"
    );
    let rows = sqlx::query(&query)
        .bind(customer_id)
        .fetch_all(pool)
        .await?;

    let mut subscriptions = rows
        .iter()
        .map(|row| {
            VehicleSubscriptionModel::try_from_row(row)
                .map_err(|e| ApiError::DatabaseError(e.to_string()))
        })
        .collect::<ApiResult<Vec<_>>>()?;
    attach_collections(pool, &mut subscriptions).await?;
    Ok(subscriptions)
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::repository::subscriptions::SubscriptionRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn returns_only_the_customers_subscriptions(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let subs = stores
            .subscriptions
            .get_subscriptions_by_customer_id("cust-1001")
            .await?;
        assert_eq!(subs.len(), 1);
        assert_eq!(subs[0].id.as_str(), "sub-001");
        assert_eq!(subs[0].vehicles.len(), 2);

        let none = stores
            .subscriptions
            .get_subscriptions_by_customer_id("cust-9999")
            .await?;
        assert!(none.is_empty());
        Ok(())
    }
}
