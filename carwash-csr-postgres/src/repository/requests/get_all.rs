use carwash_csr_api::ApiResult;
use carwash_csr_db::models::request::CsrRequestModel;
use sqlx::PgPool;

use super::repo_impl::{attach_history, rows_to_requests};

pub(super) async fn get_all_impl(pool: &PgPool) -> ApiResult<Vec<CsrRequestModel>> {
    let rows = sqlx::query(
        r#"
        SELECT id, customer_id, request_type, status, details, created_at, updated_at, version
        FROM csr_requests
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    let mut requests = rows_to_requests(&rows)?;
    attach_history(pool, &mut requests).await?;
    Ok(requests)
}
