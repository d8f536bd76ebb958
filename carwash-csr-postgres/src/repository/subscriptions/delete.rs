use carwash_csr_api::ApiResult;
use sqlx::{PgPool, Row};

/// Deletes the subscription and every dependent record in one
/// transaction, children first: discount, billing, payment method,
/// location links, vehicles, plan features, then the subscription row.
pub(super) async fn delete_impl(pool: &PgPool, id: &str) -> ApiResult<bool> {
    let mut tx = pool.begin().await?;

    let payment_method_id: Option<String> = sqlx::query(
        "SELECT payment_method_id FROM billing_info WHERE subscription_id = $1",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .map(|row| row.try_get("payment_method_id"))
    .transpose()?;

    sqlx::query("DELETE FROM billing_discounts WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM billing_info WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if let Some(payment_method_id) = payment_method_id {
        sqlx::query("DELETE FROM payment_methods WHERE id = $1")
            .bind(&payment_method_id)
            .execute(&mut *tx)
            .await?;
    }
    sqlx::query("DELETE FROM subscription_locations WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM vehicles WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM subscription_plan_features WHERE subscription_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM vehicle_subscriptions WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        tracing::info!(subscription_id = id, "subscription deleted");
    }
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::repository::subscriptions::SubscriptionRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn delete_cascades_and_is_idempotent(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        assert!(stores.subscriptions.delete_subscription("sub-001").await?);
        assert!(stores
            .subscriptions
            .get_subscription_by_id("sub-001")
            .await?
            .is_none());
        assert!(stores
            .subscriptions
            .get_vehicle_by_id("veh-101")
            .await?
            .is_none());

        assert!(!stores.subscriptions.delete_subscription("sub-001").await?);
        Ok(())
    }
}
