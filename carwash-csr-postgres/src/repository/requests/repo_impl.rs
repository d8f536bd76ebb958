use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::request::{
    CsrRequestModel, CsrRequestStatus, RequestHistoryEntryModel,
};
use carwash_csr_db::repository::requests::RequestRepository;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct RequestRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl RequestRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Maps the main `csr_requests` row; history is attached afterwards.
impl TryFromRow<PgRow> for CsrRequestModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(CsrRequestModel {
            id: get_heapless_string(row, "id")?,
            customer_id: get_heapless_string(row, "customer_id")?,
            request_type: row.try_get("request_type")?,
            status: row.try_get("status")?,
            details: get_heapless_string(row, "details")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            version: row.try_get("version")?,
            history: Vec::new(),
        })
    }
}

impl TryFromRow<PgRow> for RequestHistoryEntryModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(RequestHistoryEntryModel {
            timestamp: row.try_get("entry_timestamp")?,
            status: row.try_get("status")?,
            updated_by: get_heapless_string(row, "updated_by")?,
            comment: get_optional_heapless_string(row, "comment")?,
        })
    }
}

/// Loads and attaches the newest-first history collection for each request.
pub(super) async fn attach_history(
    pool: &PgPool,
    requests: &mut [CsrRequestModel],
) -> ApiResult<()> {
    if requests.is_empty() {
        return Ok(());
    }

    let ids: Vec<String> = requests.iter().map(|r| r.id.to_string()).collect();
    let rows = sqlx::query(
        r#"
        SELECT request_id, entry_timestamp, status, updated_by, comment
        FROM csr_request_history
        WHERE request_id = ANY($1)
        ORDER BY entry_timestamp DESC, id DESC
        "#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    let mut by_request: HashMap<String, Vec<RequestHistoryEntryModel>> = HashMap::new();
    for row in &rows {
        let request_id: String = row.try_get("request_id")?;
        let entry = RequestHistoryEntryModel::try_from_row(row)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        by_request.entry(request_id).or_default().push(entry);
    }

    for request in requests {
        request.history = by_request.remove(request.id.as_str()).unwrap_or_default();
    }
    Ok(())
}

pub(super) fn rows_to_requests(rows: &[PgRow]) -> ApiResult<Vec<CsrRequestModel>> {
    rows.iter()
        .map(|row| {
            CsrRequestModel::try_from_row(row)
                .map_err(|e| ApiError::DatabaseError(e.to_string()))
        })
        .collect()
}

#[async_trait]
impl RequestRepository for RequestRepositoryImpl {
    async fn get_all_requests(&self) -> ApiResult<Vec<CsrRequestModel>> {
        super::get_all::get_all_impl(&self.pool).await
    }

    async fn get_request_by_id(&self, id: &str) -> ApiResult<Option<CsrRequestModel>> {
        super::find_by_id::find_by_id_impl(&self.pool, id).await
    }

    async fn get_requests_by_status(
        &self,
        status: CsrRequestStatus,
    ) -> ApiResult<Vec<CsrRequestModel>> {
        super::find_by_status::find_by_status_impl(&self.pool, status).await
    }

    async fn get_requests_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<CsrRequestModel>> {
        super::find_by_customer_id::find_by_customer_id_impl(&self.pool, customer_id).await
    }

    async fn update_request(
        &self,
        request: &CsrRequestModel,
    ) -> ApiResult<Option<CsrRequestModel>> {
        super::update::update_impl(&self.pool, request).await
    }

    async fn append_history_entry(
        &self,
        request_id: &str,
        entry: RequestHistoryEntryModel,
        expected_version: i64,
    ) -> ApiResult<CsrRequestModel> {
        super::append_history::append_history_impl(&self.pool, request_id, entry, expected_version)
            .await
    }
}
