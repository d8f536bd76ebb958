use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::{EntityId, Identifiable};

/// # Documentation
/// A single entry in a customer's purchase history. Read-only on the
/// dashboard; rendered on the customer details page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseModel {
    pub id: EntityId,

    pub user_id: EntityId,

    /// Vehicle the wash was purchased for
    pub vehicle_id: EntityId,

    pub purchase_date: DateTime<Utc>,
    pub amount: Decimal,
    pub payment_method: HeaplessString<50>,

    /// Whether an active subscription covered this wash
    pub covered_by_subscription: Option<bool>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Identifiable for PurchaseModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}
