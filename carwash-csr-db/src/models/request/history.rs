use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::EntityId;
use crate::models::request::common_enums::CsrRequestStatus;

/// # Documentation
/// A single entry in a request's audit trail: one status change, who made
/// it, and when. Entries are immutable once appended; the ledger only ever
/// prepends new entries, newest-first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestHistoryEntryModel {
    pub timestamp: DateTime<Utc>,

    #[serde(
        serialize_with = "crate::models::request::common_enums::serialize_request_status",
        deserialize_with = "crate::models::request::common_enums::deserialize_request_status"
    )]
    pub status: CsrRequestStatus,

    /// Actor id of the CSR who recorded the change
    pub updated_by: EntityId,

    pub comment: Option<HeaplessString<250>>,
}
