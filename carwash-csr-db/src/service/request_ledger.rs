use carwash_csr_api::{ApiError, ApiResult};
use chrono::Utc;
use heapless::String as HeaplessString;

use crate::models::request::{CsrRequestModel, CsrRequestStatus, RequestHistoryEntryModel};

/// Append-only status ledger for CSR requests.
///
/// Applies an action taken from the request details screen: records a new
/// history entry and moves the request to `new_status`. Prior entries are
/// never touched; history stays ordered newest-first and `updated_at`
/// always equals the newest entry's timestamp.
///
/// The actor id is threaded in from the caller's [`carwash_csr_api::CsrSession`];
/// the ledger itself has no notion of a current user.
pub fn apply_action(
    request: &mut CsrRequestModel,
    new_status: CsrRequestStatus,
    actor_id: &str,
    comment: &str,
) -> ApiResult<()> {
    if comment.trim().is_empty() {
        return Err(ApiError::ValidationError(
            "action description required".to_string(),
        ));
    }
    // The action form offers pending/rejected/completed only; approved is a
    // legacy status with no reachable transition.
    if new_status == CsrRequestStatus::Approved {
        return Err(ApiError::ValidationError(
            "approved is not an actionable status".to_string(),
        ));
    }
    if request.status != CsrRequestStatus::Pending {
        return Err(ApiError::ValidationError(format!(
            "request {} is not pending and cannot be actioned",
            request.id
        )));
    }

    let comment = HeaplessString::try_from(comment).map_err(|_| {
        ApiError::ValidationError("action description too long (max 250 chars)".to_string())
    })?;
    let actor = HeaplessString::try_from(actor_id)
        .map_err(|_| ApiError::ValidationError("actor id too long".to_string()))?;

    let now = Utc::now();
    request.history.insert(
        0,
        RequestHistoryEntryModel {
            timestamp: now,
            status: new_status,
            updated_by: actor,
            comment: Some(comment),
        },
    );
    request.status = new_status;
    request.updated_at = now;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::seed::seed_requests;

    fn pending_request() -> CsrRequestModel {
        seed_requests()
            .expect("seed data")
            .into_iter()
            .find(|r| r.id.as_str() == "req-001")
            .expect("req-001 in seed data")
    }

    #[test]
    fn action_prepends_entry_and_syncs_derived_fields() {
        let mut request = pending_request();
        let before = request.history.len();

        apply_action(
            &mut request,
            CsrRequestStatus::Completed,
            "csr-007",
            "issued refund",
        )
        .expect("action applies");

        assert_eq!(request.history.len(), before + 1);
        assert_eq!(request.status, CsrRequestStatus::Completed);
        assert_eq!(request.history[0].status, request.status);
        assert_eq!(request.history[0].timestamp, request.updated_at);
        assert_eq!(request.history[0].updated_by.as_str(), "csr-007");
        assert_eq!(
            request.history[0].comment.as_ref().map(|c| c.as_str()),
            Some("issued refund")
        );
    }

    #[test]
    fn action_never_mutates_prior_entries() {
        let mut request = pending_request();
        let prior = request.history.clone();

        apply_action(
            &mut request,
            CsrRequestStatus::Rejected,
            "csr-007",
            "duplicate request",
        )
        .expect("action applies");

        assert_eq!(&request.history[1..], prior.as_slice());
    }

    #[test]
    fn blank_comment_is_rejected() {
        let mut request = pending_request();
        let before = request.clone();

        let err = apply_action(&mut request, CsrRequestStatus::Completed, "csr-007", "   ")
            .expect_err("blank comment must fail");

        assert!(matches!(err, ApiError::ValidationError(msg) if msg.contains("action description required")));
        assert_eq!(request.history.len(), before.history.len());
        assert_eq!(request.status, before.status);
    }

    #[test]
    fn approved_is_not_offered_by_the_action_form() {
        let mut request = pending_request();

        let err = apply_action(&mut request, CsrRequestStatus::Approved, "csr-007", "note")
            .expect_err("approved must be rejected");

        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn non_pending_requests_cannot_be_actioned() {
        let mut request = pending_request();
        apply_action(&mut request, CsrRequestStatus::Rejected, "csr-007", "done")
            .expect("first action applies");

        let err = apply_action(&mut request, CsrRequestStatus::Completed, "csr-007", "again")
            .expect_err("terminal request must reject further actions");
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn pending_to_pending_records_a_comment_only_entry() {
        let mut request = pending_request();
        let before = request.history.len();

        apply_action(
            &mut request,
            CsrRequestStatus::Pending,
            "csr-007",
            "called customer, waiting on documents",
        )
        .expect("pending is an offered status");

        assert_eq!(request.status, CsrRequestStatus::Pending);
        assert_eq!(request.history.len(), before + 1);
    }
}
