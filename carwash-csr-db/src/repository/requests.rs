use async_trait::async_trait;
use carwash_csr_api::ApiResult;

use crate::models::request::{CsrRequestModel, CsrRequestStatus, RequestHistoryEntryModel};

/// Data-access facade for CSR requests.
///
/// Both the seeded in-memory store and the Postgres store implement this
/// contract identically. Lookups that find nothing return `Ok(None)` /
/// empty collections; store failures surface as `ApiError::DatabaseError`;
/// writes against a stale version fail with `ApiError::Conflict`.
#[async_trait]
pub trait RequestRepository: Send + Sync {
    /// All requests, newest first by creation date
    async fn get_all_requests(&self) -> ApiResult<Vec<CsrRequestModel>>;

    async fn get_request_by_id(&self, id: &str) -> ApiResult<Option<CsrRequestModel>>;

    async fn get_requests_by_status(
        &self,
        status: CsrRequestStatus,
    ) -> ApiResult<Vec<CsrRequestModel>>;

    async fn get_requests_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<CsrRequestModel>>;

    /// Full-overwrite write: replaces the main record and the entire
    /// history collection with the request's in-memory state. The caller
    /// must pass the complete, correctly ordered (newest-first) history.
    ///
    /// Version-checked: `request.version` must match the stored version.
    /// Returns `Ok(None)` when the request does not exist.
    async fn update_request(
        &self,
        request: &CsrRequestModel,
    ) -> ApiResult<Option<CsrRequestModel>>;

    /// Append-only alternative to [`Self::update_request`]: prepends one
    /// history entry and moves the request to the entry's status without
    /// rewriting prior history rows. Preferred for ledger writes.
    async fn append_history_entry(
        &self,
        request_id: &str,
        entry: RequestHistoryEntryModel,
        expected_version: i64,
    ) -> ApiResult<CsrRequestModel>;
}
