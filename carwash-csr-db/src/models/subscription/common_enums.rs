use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Database model for subscription status enum
///
/// `Expired` has no producing transition in the dashboard; it is set by an
/// external time-based process and must be accepted but is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_status", rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Active,
    Paused,
    Cancelled,
    Expired,
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "active"),
            SubscriptionStatus::Paused => write!(f, "paused"),
            SubscriptionStatus::Cancelled => write!(f, "cancelled"),
            SubscriptionStatus::Expired => write!(f, "expired"),
        }
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(SubscriptionStatus::Active),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "expired" => Ok(SubscriptionStatus::Expired),
            _ => Err(()),
        }
    }
}

/// Database model for subscription plan tier enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "subscription_plan_type", rename_all = "PascalCase")]
pub enum SubscriptionPlanType {
    Basic,
    Standard,
    Premium,
    Enterprise,
}

impl std::fmt::Display for SubscriptionPlanType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionPlanType::Basic => write!(f, "Basic"),
            SubscriptionPlanType::Standard => write!(f, "Standard"),
            SubscriptionPlanType::Premium => write!(f, "Premium"),
            SubscriptionPlanType::Enterprise => write!(f, "Enterprise"),
        }
    }
}

impl FromStr for SubscriptionPlanType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Basic" => Ok(SubscriptionPlanType::Basic),
            "Standard" => Ok(SubscriptionPlanType::Standard),
            "Premium" => Ok(SubscriptionPlanType::Premium),
            "Enterprise" => Ok(SubscriptionPlanType::Enterprise),
            _ => Err(()),
        }
    }
}

/// Database model for billing frequency enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "billing_frequency", rename_all = "snake_case")]
pub enum BillingFrequency {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl BillingFrequency {
    /// Number of months a single billing period covers.
    pub fn months_per_period(&self) -> u32 {
        match self {
            BillingFrequency::Monthly => 1,
            BillingFrequency::Quarterly => 3,
            BillingFrequency::SemiAnnual => 6,
            BillingFrequency::Annual => 12,
        }
    }
}

impl std::fmt::Display for BillingFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BillingFrequency::Monthly => write!(f, "monthly"),
            BillingFrequency::Quarterly => write!(f, "quarterly"),
            BillingFrequency::SemiAnnual => write!(f, "semi_annual"),
            BillingFrequency::Annual => write!(f, "annual"),
        }
    }
}

impl FromStr for BillingFrequency {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "monthly" => Ok(BillingFrequency::Monthly),
            "quarterly" => Ok(BillingFrequency::Quarterly),
            "semi_annual" => Ok(BillingFrequency::SemiAnnual),
            "annual" => Ok(BillingFrequency::Annual),
            _ => Err(()),
        }
    }
}

pub fn serialize_subscription_status<S>(
    value: &SubscriptionStatus,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize_subscription_status<'de, D>(
    deserializer: D,
) -> Result<SubscriptionStatus, D::Error>
where
    D: Deserializer<'de>,
{
    let value_str = String::deserialize(deserializer)?;
    SubscriptionStatus::from_str(&value_str).map_err(|_| {
        serde::de::Error::custom(format!("Invalid SubscriptionStatus: {value_str}"))
    })
}

pub fn serialize_plan_type<S>(
    value: &SubscriptionPlanType,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize_plan_type<'de, D>(deserializer: D) -> Result<SubscriptionPlanType, D::Error>
where
    D: Deserializer<'de>,
{
    let value_str = String::deserialize(deserializer)?;
    SubscriptionPlanType::from_str(&value_str).map_err(|_| {
        serde::de::Error::custom(format!("Invalid SubscriptionPlanType: {value_str}"))
    })
}

pub fn serialize_billing_frequency<S>(
    value: &BillingFrequency,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_string())
}

pub fn deserialize_billing_frequency<'de, D>(deserializer: D) -> Result<BillingFrequency, D::Error>
where
    D: Deserializer<'de>,
{
    let value_str = String::deserialize(deserializer)?;
    BillingFrequency::from_str(&value_str).map_err(|_| {
        serde::de::Error::custom(format!("Invalid BillingFrequency: {value_str}"))
    })
}
