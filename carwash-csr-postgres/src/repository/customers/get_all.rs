use carwash_csr_api::ApiResult;
use carwash_csr_db::models::customer::CustomerModel;
use sqlx::PgPool;

use super::repo_impl::{attach_references, rows_to_customers, CUSTOMER_COLUMNS};

pub(super) async fn get_all_impl(pool: &PgPool) -> ApiResult<Vec<CustomerModel>> {
    let query = format!(
        r#"
        SELECT {CUSTOMER_COLUMNS}
        FROM users u
        LEFT JOIN customer_addresses a ON a.user_id = u.id
        WHERE u.role = 'customer'
        ORDER BY u.last_name, u.first_name
        "#
    );
    let rows = sqlx::query(&query).fetch_all(pool).await?;

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
    async fn lists_customers_with_back_references(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let customers = stores.customers.get_all_customers().await?;
        assert!(customers.len() >= 4);

        let sarah = customers
            .iter()
            .find(|c| c.id.as_str() == "cust-1001")
            .expect("seeded");
        assert!(sarah.subscription_ids.iter().any(|s| s.as_str() == "sub-001"));
        assert_eq!(sarah.request_ids.len(), 2);
        Ok(())
    }
}
