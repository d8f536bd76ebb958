use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::request::{CsrRequestModel, RequestHistoryEntryModel};
use sqlx::PgPool;

/// Append-only ledger write: moves the request to the entry's status and
/// inserts exactly one history row. Prior rows are never touched.
pub(super) async fn append_history_impl(
    pool: &PgPool,
    request_id: &str,
    entry: RequestHistoryEntryModel,
    expected_version: i64,
) -> ApiResult<CsrRequestModel> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE csr_requests
        SET status = $2, updated_at = $3, version = version + 1
        WHERE id = $1 AND version = $4
        "#,
    )
    .bind(request_id)
    .bind(entry.status)
    .bind(entry.timestamp)
    .bind(expected_version)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query("SELECT 1 FROM csr_requests WHERE id = $1")
            .bind(request_id)
            .fetch_optional(&mut *tx)
            .await?;
        return if exists.is_none() {
            Err(ApiError::NotFound(format!("Request not found: {request_id}")))
        } else {
            Err(ApiError::Conflict(format!(
                "Request {request_id} was modified concurrently"
            )))
        };
    }

    sqlx::query(
        r#"
        INSERT INTO csr_request_history
            (request_id, entry_timestamp, status, updated_by, comment)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(request_id)
    .bind(entry.timestamp)
    .bind(entry.status)
    .bind(entry.updated_by.as_str())
    .bind(entry.comment.as_ref().map(|c| c.as_str()))
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(request_id, "history entry appended");

    super::find_by_id::find_by_id_impl(pool, request_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Request not found: {request_id}")))
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_api::ApiError;
    use carwash_csr_db::models::request::CsrRequestStatus;
    use carwash_csr_db::repository::requests::RequestRepository;
    use carwash_csr_db::service::request_ledger;

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn append_preserves_prior_entries(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let mut request = stores
            .requests
            .get_request_by_id("req-004")
            .await?
            .expect("seeded");
        let version = request.version;
        let prior = request.history.clone();

        request_ledger::apply_action(
            &mut request,
            CsrRequestStatus::Completed,
            "csr-021",
            "refunded the duplicate charge",
        )?;
        let updated = stores
            .requests
            .append_history_entry("req-004", request.history[0].clone(), version)
            .await?;

        assert_eq!(updated.status, CsrRequestStatus::Completed);
        assert_eq!(updated.history.len(), prior.len() + 1);
        assert_eq!(&updated.history[1..], prior.as_slice());
        assert_eq!(updated.version, version + 1);

        let err = stores
            .requests
            .append_history_entry("req-004", updated.history[0].clone(), version)
            .await;
        assert!(matches!(err, Err(ApiError::Conflict(_))));
        Ok(())
    }
}
