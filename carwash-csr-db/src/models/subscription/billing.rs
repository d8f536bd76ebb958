use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::identifiable::{EntityId, Identifiable};
use crate::models::subscription::common_enums::BillingFrequency;

/// How a subscription is paid. One variant per payment rail; the variant
/// carries exactly the fields that rail needs, no shared nullable bag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card {
        brand: HeaplessString<20>,
        last4: HeaplessString<4>,
    },
    Paypal {
        email: HeaplessString<100>,
    },
    BankTransfer {
        last4: HeaplessString<4>,
    },
}

impl PaymentMethod {
    /// Wire label stored in the `type` column at the persistence boundary.
    pub fn kind(&self) -> &'static str {
        match self {
            PaymentMethod::Card { .. } => "card",
            PaymentMethod::Paypal { .. } => "paypal",
            PaymentMethod::BankTransfer { .. } => "bank_transfer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodModel {
    pub id: EntityId,
    #[serde(flatten)]
    pub method: PaymentMethod,
}

impl Identifiable for PaymentMethodModel {
    fn get_id(&self) -> &EntityId {
        &self.id
    }
}

/// A discount is either a percentage or a flat amount, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountValue {
    Percentage(Decimal),
    Amount(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub value: DiscountValue,
    pub reason: HeaplessString<100>,
    pub valid_until: Option<DateTime<Utc>>,
}

/// Billing details owned by a subscription
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInfoModel {
    /// Amount charged once per billing period
    pub amount: Decimal,
    pub currency: HeaplessString<3>,

    #[serde(
        serialize_with = "crate::models::subscription::common_enums::serialize_billing_frequency",
        deserialize_with = "crate::models::subscription::common_enums::deserialize_billing_frequency"
    )]
    pub frequency: BillingFrequency,

    pub next_billing_date: DateTime<Utc>,
    pub last_billing_date: Option<DateTime<Utc>>,

    pub payment_method: PaymentMethodModel,
    pub discount: Option<Discount>,
}
