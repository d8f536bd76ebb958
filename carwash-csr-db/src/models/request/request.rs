use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::{EntityId, Identifiable};
use crate::models::request::common_enums::{CsrRequestStatus, CsrRequestType};
use crate::models::request::history::RequestHistoryEntryModel;
use crate::models::versioned::Versioned;

/// # Documentation
/// A customer service request together with its full audit trail.
///
/// Invariants maintained by the ledger:
/// - `history` is never empty once the request exists
/// - `history[0].status` equals `status`
/// - `updated_at` equals `history[0].timestamp`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrRequestModel {
    pub id: EntityId,

    pub customer_id: EntityId,

    #[serde(
        serialize_with = "crate::models::request::common_enums::serialize_request_type",
        deserialize_with = "crate::models::request::common_enums::deserialize_request_type"
    )]
    pub request_type: CsrRequestType,

    #[serde(
        serialize_with = "crate::models::request::common_enums::serialize_request_status",
        deserialize_with = "crate::models::request::common_enums::deserialize_request_status"
    )]
    pub status: CsrRequestStatus,

    /// Free-text details supplied by the customer
    pub details: HeaplessString<250>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Snapshot version for optimistic-concurrency checks on writes
    pub version: i64,

    /// Status history, newest-first
    pub history: Vec<RequestHistoryEntryModel>,
}

impl Identifiable for CsrRequestModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}

impl Versioned for CsrRequestModel {
    fn get_version(&self) -> i64 {
        self.version
    }
}
