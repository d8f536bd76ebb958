use carwash_csr_api::profile::{AddressUpdate, CustomerProfileUpdate};
use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::customer::CustomerModel;
use chrono::Utc;
use sqlx::PgPool;

/// Applies a validated profile-form submission: the `users` row and the
/// address upsert commit together or not at all.
pub(super) async fn update_details_impl(
    pool: &PgPool,
    id: &str,
    profile: &CustomerProfileUpdate,
    address: &AddressUpdate,
    expected_version: i64,
) -> ApiResult<Option<CustomerModel>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE users
        SET first_name = $2, last_name = $3, email = $4, phone = $5,
            updated_at = $6, version = version + 1
        WHERE id = $1 AND version = $7
        "#,
    )
    .bind(id)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(&profile.email)
    .bind(&profile.phone)
    .bind(Utc::now())
    .bind(expected_version)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query("SELECT 1 FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        return if exists.is_none() {
            Ok(None)
        } else {
            Err(ApiError::Conflict(format!(
                "Customer {id} was modified concurrently"
            )))
        };
    }

    sqlx::query(
        r#"
        INSERT INTO customer_addresses (user_id, street, city, state, zip_code)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id) DO UPDATE
        SET street = EXCLUDED.street, city = EXCLUDED.city,
            state = EXCLUDED.state, zip_code = EXCLUDED.zip_code
        "#,
    )
    .bind(id)
    .bind(&address.street)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zip_code)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(customer_id = id, "customer details updated");

    super::find_by_id::find_by_id_impl(pool, id).await
}
