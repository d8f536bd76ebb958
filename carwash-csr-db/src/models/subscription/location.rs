use heapless::String as HeaplessString;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::{EntityId, Identifiable};

/// A car wash location a subscription is valid at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarWashLocationModel {
    pub id: EntityId,

    pub name: HeaplessString<100>,
    pub address: HeaplessString<100>,
    pub city: HeaplessString<50>,
    pub state: HeaplessString<2>,
    pub zip: HeaplessString<10>,
    pub phone: HeaplessString<20>,
    pub email: HeaplessString<100>,
    pub website: Option<HeaplessString<100>>,
}

impl Identifiable for CarWashLocationModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}
