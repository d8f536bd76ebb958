use carwash_csr_api::ApiResult;
use carwash_csr_db::models::request::CsrRequestModel;
use sqlx::PgPool;

use super::repo_impl::{attach_history, rows_to_requests};

pub(super) async fn find_by_customer_id_impl(
    pool: &PgPool,
    customer_id: &str,
) -> ApiResult<Vec<CsrRequestModel>> {
    let rows = sqlx::query(
        r#"
        SELECT id, customer_id, request_type, status, details, created_at, updated_at, version
        FROM csr_requests
        WHERE customer_id = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(customer_id)
    .fetch_all(pool)
    .await?;

    let mut requests = rows_to_requests(&rows)?;
    attach_history(pool, &mut requests).await?;
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::repository::requests::RequestRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn returns_only_the_customers_requests(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let requests = stores
            .requests
            .get_requests_by_customer_id("cust-1004")
            .await?;
        assert_eq!(requests.len(), 2);
        assert!(requests
            .iter()
            .all(|r| r.customer_id.as_str() == "cust-1004"));
        Ok(())
    }
}
