use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::{EntityId, Identifiable};

/// A vehicle covered by a subscription. Owned by its subscription; it has
/// no lifecycle of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleModel {
    pub id: EntityId,

    pub vin: HeaplessString<20>,
    pub make: HeaplessString<50>,
    pub model: HeaplessString<50>,
    pub year: i32,
    pub color: HeaplessString<30>,
    pub license_plate: HeaplessString<20>,

    /// When this vehicle was added to the subscription
    pub added_at: DateTime<Utc>,
}

impl Identifiable for VehicleModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}
