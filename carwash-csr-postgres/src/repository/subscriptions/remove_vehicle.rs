use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::VehicleSubscriptionModel;
use chrono::Utc;
use sqlx::PgPool;

/// Removing a vehicle may leave the subscription with zero vehicles; the
/// subscription itself never auto-cancels.
pub(super) async fn remove_vehicle_impl(
    pool: &PgPool,
    subscription_id: &str,
    vehicle_id: &str,
    expected_version: i64,
) -> ApiResult<VehicleSubscriptionModel> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE vehicle_subscriptions
        SET updated_at = $2, version = version + 1
        WHERE id = $1 AND version = $3
        "#,
    )
    .bind(subscription_id)
    .bind(Utc::now())
    .bind(expected_version)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query("SELECT 1 FROM vehicle_subscriptions WHERE id = $1")
            .bind(subscription_id)
            .fetch_optional(&mut *tx)
            .await?;
        return if exists.is_none() {
            Err(ApiError::NotFound(format!(
                "Subscription not found: {subscription_id}"
            )))
        } else {
            Err(ApiError::Conflict(format!(
                "Subscription {subscription_id} was modified concurrently"
            )))
        };
    }

    sqlx::query("DELETE FROM vehicles WHERE id = $1 AND subscription_id = $2")
        .bind(vehicle_id)
        .bind(subscription_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::debug!(subscription_id, vehicle_id, "vehicle removed");

    super::find_by_id::find_by_id_impl(pool, subscription_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "Subscription {subscription_id} vanished after vehicle removal"
            ))
        })
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::repository::subscriptions::SubscriptionRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn removal_may_empty_the_subscription(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let sub = stores
            .subscriptions
            .get_subscription_by_id("sub-003")
            .await?
            .expect("seeded");
        assert_eq!(sub.vehicles.len(), 1);

        let sub = stores
            .subscriptions
            .remove_vehicle_from_subscription("sub-003", "veh-104", sub.version)
            .await?;
        assert!(sub.vehicles.is_empty());

        assert!(stores
            .subscriptions
            .get_vehicle_by_id("veh-104")
            .await?
            .is_none());
        Ok(())
    }
}
