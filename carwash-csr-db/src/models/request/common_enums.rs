use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Database model for CSR request type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "csr_request_type", rename_all = "snake_case")]
pub enum CsrRequestType {
    AddressChange,
    AccountAccess,
    SubscriptionManagement,
    BillingIssue,
    ServiceCancellation,
    Other,
}

impl CsrRequestType {
    /// Human-readable label shown in list views and searched against.
    pub fn label(&self) -> &'static str {
        match self {
            CsrRequestType::AddressChange => "Address Change",
            CsrRequestType::AccountAccess => "Account Access",
            CsrRequestType::SubscriptionManagement => "Subscription Management",
            CsrRequestType::BillingIssue => "Billing Issue",
            CsrRequestType::ServiceCancellation => "Service Cancellation",
            CsrRequestType::Other => "Other",
        }
    }
}

impl std::fmt::Display for CsrRequestType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for CsrRequestType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "address_change" => Ok(CsrRequestType::AddressChange),
            "account_access" => Ok(CsrRequestType::AccountAccess),
            "subscription_management" => Ok(CsrRequestType::SubscriptionManagement),
            "billing_issue" => Ok(CsrRequestType::BillingIssue),
            "service_cancellation" => Ok(CsrRequestType::ServiceCancellation),
            "other" => Ok(CsrRequestType::Other),
            _ => Err(()),
        }
    }
}

/// Database model for CSR request status enum
///
/// `Approved` is a legacy status: it renders in history and badges but the
/// action form never offers it, so no ledger transition produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "csr_request_status", rename_all = "snake_case")]
pub enum CsrRequestStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl CsrRequestStatus {
    /// Terminal statuses have no outgoing transition in the action form.
    pub fn is_terminal(&self) -> bool {
        matches!(self, CsrRequestStatus::Rejected | CsrRequestStatus::Completed)
    }
}

impl std::fmt::Display for CsrRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CsrRequestStatus::Pending => write!(f, "pending"),
            CsrRequestStatus::Approved => write!(f, "approved"),
            CsrRequestStatus::Rejected => write!(f, "rejected"),
            CsrRequestStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for CsrRequestStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CsrRequestStatus::Pending),
            "approved" => Ok(CsrRequestStatus::Approved),
            "rejected" => Ok(CsrRequestStatus::Rejected),
            "completed" => Ok(CsrRequestStatus::Completed),
            _ => Err(()),
        }
    }
}

pub fn serialize_request_status<S>(
    value: &CsrRequestStatus,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize_request_status<'de, D>(deserializer: D) -> Result<CsrRequestStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value_str = String::deserialize(deserializer)?;
    CsrRequestStatus::from_str(&value_str).map_err(|_| {
        serde::de::Error::custom(format!("Invalid CsrRequestStatus: {value_str}"))
    })
}

pub fn serialize_request_type<S>(value: &CsrRequestType, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let value_str = match value {
        CsrRequestType::AddressChange => "address_change",
        CsrRequestType::AccountAccess => "account_access",
        CsrRequestType::SubscriptionManagement => "subscription_management",
        CsrRequestType::BillingIssue => "billing_issue",
        CsrRequestType::ServiceCancellation => "service_cancellation",
        CsrRequestType::Other => "other",
    };
    serializer.serialize_str(value_str)
}

pub fn deserialize_request_type<'de, D>(deserializer: D) -> Result<CsrRequestType, D::Error>
where
    D: Deserializer<'de>,
{
    let value_str = String::deserialize(deserializer)?;
    CsrRequestType::from_str(&value_str)
        .map_err(|_| serde::de::Error::custom(format!("Invalid CsrRequestType: {value_str}")))
}
