use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::{SubscriptionStatus, VehicleSubscriptionModel};
use carwash_csr_db::service::subscription_lifecycle;
use sqlx::PgPool;

/// Applies the lifecycle transition in memory, then persists every
/// affected column under the version guard.
pub(super) async fn update_status_impl(
    pool: &PgPool,
    id: &str,
    status: SubscriptionStatus,
    expected_version: i64,
) -> ApiResult<Option<VehicleSubscriptionModel>> {
    let Some(mut subscription) = super::find_by_id::find_by_id_impl(pool, id).await? else {
        return Ok(None);
    };
    if subscription.version != expected_version {
        return Err(ApiError::Conflict(format!(
            "Subscription {id} was modified concurrently"
        )));
    }

    subscription_lifecycle::set_status(&mut subscription, status);

    let result = sqlx::query(
        r#"
        UPDATE vehicle_subscriptions
        SET status = $2, end_date = $3, paused_at = $4, cancelled_at = $5,
            updated_at = $6, version = version + 1
        WHERE id = $1 AND version = $7
        "#,
    )
    .bind(id)
    .bind(subscription.status)
    .bind(subscription.end_date)
    .bind(subscription.paused_at)
    .bind(subscription.cancelled_at)
    .bind(subscription.updated_at)
    .bind(expected_version)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::Conflict(format!(
            "Subscription {id} was modified concurrently"
        )));
    }

    subscription.version += 1;
    Ok(Some(subscription))
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::models::subscription::SubscriptionStatus;
    use carwash_csr_db::repository::subscriptions::SubscriptionRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn pause_and_reactivate_round_trip(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let sub = stores
            .subscriptions
            .get_subscription_by_id("sub-001")
            .await?
            .expect("seeded");

        let paused = stores
            .subscriptions
            .update_subscription_status("sub-001", SubscriptionStatus::Paused, sub.version)
            .await?
            .expect("exists");
        assert!(paused.paused_at.is_some());

        let active = stores
            .subscriptions
            .update_subscription_status("sub-001", SubscriptionStatus::Active, paused.version)
            .await?
            .expect("exists");
        assert!(active.paused_at.is_none());
        assert_eq!(active.version, sub.version + 2);
        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn cancel_stamps_matching_timestamps(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let sub = stores
            .subscriptions
            .get_subscription_by_id("sub-002")
            .await?
            .expect("seeded");
        let cancelled = stores
            .subscriptions
            .update_subscription_status("sub-002", SubscriptionStatus::Cancelled, sub.version)
            .await?
            .expect("exists");
        assert_eq!(cancelled.cancelled_at, cancelled.end_date);
        assert!(cancelled.cancelled_at.is_some());
        Ok(())
    }
}
