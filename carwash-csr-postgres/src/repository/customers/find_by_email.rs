use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::customer::CustomerModel;
use sqlx::PgPool;

use super::repo_impl::{attach_references, CUSTOMER_COLUMNS};
use crate::utils::TryFromRow;

pub(super) async fn find_by_email_impl(
    pool: &PgPool,
    email: &str,
) -> ApiResult<Option<CustomerModel>> {
    let query = format!(
        r#"
        SELECT {CUSTOMER_COLUMNS}
        FROM users u
        LEFT JOIN customer_addresses a ON a.user_id = u.id
        WHERE LOWER(u.email) = LOWER($1)
        "#
    );
    let row = sqlx::query(&query).bind(email).fetch_optional(pool).await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let customer = CustomerModel::try_from_row(&row)
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let mut customers = vec![customer];
    attach_references(pool, &mut customers).await?;
    Ok(customers.pop())
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::repository::customers::CustomerRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn email_lookup_is_case_insensitive(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let customer = stores
            .customers
            .get_customer_by_email("SARAH.JOHNSON@example.com")
            .await?
            .expect("seeded");
        assert_eq!(customer.id.as_str(), "cust-1001");
        Ok(())
    }
}
