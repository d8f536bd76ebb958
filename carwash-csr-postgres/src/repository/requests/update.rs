use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::request::CsrRequestModel;
use sqlx::PgPool;

/// Full-overwrite write: replaces the main record and rewrites the whole
/// history collection in one transaction. Entries are inserted oldest
/// first so the serial id tie-breaker matches recency.
pub(super) async fn update_impl(
    pool: &PgPool,
    request: &CsrRequestModel,
) -> ApiResult<Option<CsrRequestModel>> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        r#"
        UPDATE csr_requests
        SET request_type = $2, status = $3, details = $4, updated_at = $5,
            version = version + 1
        WHERE id = $1 AND version = $6
        "#,
    )
    .bind(request.id.as_str())
    .bind(request.request_type)
    .bind(request.status)
    .bind(request.details.as_str())
    .bind(request.updated_at)
    .bind(request.version)
    .execute(&mut *tx)
    .await?;

    if result.rows_affected() == 0 {
        let exists = sqlx::query("SELECT 1 FROM csr_requests WHERE id = $1")
            .bind(request.id.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        return if exists.is_none() {
            Ok(None)
        } else {
            Err(ApiError::Conflict(format!(
                "Request {} was modified concurrently",
                request.id
            )))
        };
    }

    sqlx::query("DELETE FROM csr_request_history WHERE request_id = $1")
        .bind(request.id.as_str())
        .execute(&mut *tx)
        .await?;

    for entry in request.history.iter().rev() {
        sqlx::query(
            r#"
            INSERT INTO csr_request_history
                (request_id, entry_timestamp, status, updated_by, comment)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(request.id.as_str())
        .bind(entry.timestamp)
        .bind(entry.status)
        .bind(entry.updated_by.as_str())
        .bind(entry.comment.as_ref().map(|c| c.as_str()))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::debug!(request_id = %request.id, "request overwritten");

    let mut updated = request.clone();
    updated.version += 1;
    Ok(Some(updated))
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
    async fn overwrite_persists_history_and_bumps_version(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let mut request = stores
            .requests
            .get_request_by_id("req-001")
            .await?
            .expect("seeded");
        let version = request.version;
        request_ledger::apply_action(
            &mut request,
            CsrRequestStatus::Completed,
            "csr-021",
            "address updated in billing system",
        )?;

        let updated = stores
            .requests
            .update_request(&request)
            .await?
            .expect("request exists");
        assert_eq!(updated.version, version + 1);

        let reloaded = stores
            .requests
            .get_request_by_id("req-001")
            .await?
            .expect("still present");
        assert_eq!(reloaded.status, CsrRequestStatus::Completed);
        assert_eq!(reloaded.history.len(), request.history.len());
        assert_eq!(reloaded.history[0].status, reloaded.status);
        assert_eq!(reloaded.history[0].timestamp, reloaded.updated_at);

        // A second write with the stale snapshot must conflict.
        let err = stores.requests.update_request(&request).await;
        assert!(matches!(err, Err(ApiError::Conflict(_))));
        Ok(())
    }
}
