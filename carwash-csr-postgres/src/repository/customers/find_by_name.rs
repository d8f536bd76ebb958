use carwash_csr_api::ApiResult;
use carwash_csr_db::models::customer::CustomerModel;
use sqlx::PgPool;

use super::repo_impl::{attach_references, rows_to_customers, CUSTOMER_COLUMNS};

/// Case-insensitive substring match. Fuzzy ranking happens in the service
/// layer; the store only narrows the candidate set.
pub(super) async fn find_by_name_impl(
    pool: &PgPool,
    name: &str,
) -> ApiResult<Vec<CustomerModel>> {
    let query = format!(
        r#"
        SELECT {CUSTOMER_COLUMNS}
        FROM users u
        LEFT JOIN customer_addresses a ON a.user_id = u.id
        WHERE u.first_name ILIKE '%' || $1 || '%'
           OR u.last_name ILIKE '%' || $1 || '%'
        ORDER BY u.last_name, u.first_name
        "#
    );
    let rows = sqlx::query(&query).bind(name).fetch_all(pool).await?;

    let mut customers = rows_to_customers(&rows)?;
    attach_references(pool, &mut customers).await?;
    Ok(customers)
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::repository::customers::CustomerRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn matches_substrings_of_either_name(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let matches = stores.customers.get_customers_by_name("john").await?;
        assert!(matches.iter().any(|c| c.id.as_str() == "cust-1001"));

        let matches = stores.customers.get_customers_by_name("vasq").await?;
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id.as_str(), "cust-1003");
        Ok(())
    }
}
