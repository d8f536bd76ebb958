use carwash_csr_api::ApiResult;
use carwash_csr_db::models::request::{CsrRequestModel, CsrRequestStatus};
use sqlx::PgPool;

use super::repo_impl::{attach_history, rows_to_requests};

pub(super) async fn find_by_status_impl(
    pool: &PgPool,
    status: CsrRequestStatus,
) -> ApiResult<Vec<CsrRequestModel>> {
    let rows = sqlx::query(
        r#"
        SELECT id, customer_id, request_type, status, details, created_at, updated_at, version
        FROM csr_requests
        WHERE status = $1
        ORDER BY created_at DESC
        "#,
    )
    .bind(status)
    .fetch_all(pool)
    .await?;

    let mut requests = rows_to_requests(&rows)?;
    attach_history(pool, &mut requests).await?;
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::models::request::CsrRequestStatus;
    use carwash_csr_db::repository::requests::RequestRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn filters_by_status() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let pending = stores
            .requests
            .get_requests_by_status(CsrRequestStatus::Pending)
            .await?;
        assert!(pending.iter().all(|r| r.status == CsrRequestStatus::Pending));
        assert!(pending.iter().any(|r| r.id.as_str() == "req-004"));

        let approved = stores
            .requests
            .get_requests_by_status(CsrRequestStatus::Approved)
            .await?;
        assert!(approved.iter().any(|r| r.id.as_str() == "req-002"));
        Ok(())
    }
}
