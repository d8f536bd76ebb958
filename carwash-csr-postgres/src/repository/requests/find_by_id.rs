use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::request::CsrRequestModel;
use sqlx::PgPool;

use super::repo_impl::attach_history;
use crate::utils::TryFromRow;

pub(super) async fn find_by_id_impl(
    pool: &PgPool,
    id: &str,
) -> ApiResult<Option<CsrRequestModel>> {
    let row = sqlx::query(
        r#"
        SELECT id, customer_id, request_type, status, details, created_at, updated_at, version
        FROM csr_requests
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let request = CsrRequestModel::try_from_row(&row)
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let mut requests = vec![request];
    attach_history(pool, &mut requests).await?;
    Ok(requests.pop())
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::models::request::CsrRequestStatus;
    use carwash_csr_db::repository::requests::RequestRepository;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn finds_request_with_full_history(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let request = stores
            .requests
            .get_request_by_id("req-003")
            .await?
            .expect("req-003 seeded");
        assert_eq!(request.status, CsrRequestStatus::Rejected);
        assert_eq!(request.history.len(), 3);
        assert_eq!(request.history[0].status, CsrRequestStatus::Rejected);

        assert!(stores.requests.get_request_by_id("req-999").await?.is_none());
        Ok(())
    }
}
