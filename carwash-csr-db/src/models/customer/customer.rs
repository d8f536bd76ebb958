use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::customer::common_enums::UserRole;
use crate::models::identifiable::{EntityId, Identifiable};
use crate::models::versioned::Versioned;

/// Mailing address attached to a customer profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressModel {
    pub street: HeaplessString<100>,
    pub city: HeaplessString<50>,
    pub state: HeaplessString<2>,
    pub zip_code: HeaplessString<10>,
}

/// # Documentation
/// Database model for a customer as seen by the CSR dashboard.
///
/// The subscription/request id lists are display-only back references used
/// for aggregation on detail pages; referential integrity is owned by the
/// foreign keys on the other side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerModel {
    pub id: EntityId,

    pub first_name: HeaplessString<50>,
    pub last_name: HeaplessString<50>,
    pub email: HeaplessString<100>,
    pub phone: HeaplessString<20>,

    /// Optional profile picture URL
    pub profile_picture: Option<HeaplessString<250>>,

    #[serde(
        serialize_with = "crate::models::customer::common_enums::serialize_user_role",
        deserialize_with = "crate::models::customer::common_enums::deserialize_user_role"
    )]
    pub role: UserRole,

    pub address: Option<AddressModel>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Snapshot version for optimistic-concurrency checks on writes
    pub version: i64,

    /// Display-only back references
    pub subscription_ids: Vec<EntityId>,
    pub request_ids: Vec<EntityId>,
}

impl CustomerModel {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Identifiable for CustomerModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}

impl Versioned for CustomerModel {
    fn get_version(&self) -> i64 {
        self.version
    }
}
