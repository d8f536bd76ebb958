//! Development fixtures for the in-memory store.
//!
//! Request seeds reproduce the dataset the dashboard was originally tuned
//! against, including the one legacy `approved` request (`req-002`) kept
//! around to prove old data still renders after the status model changed.

use std::str::FromStr;

use carwash_csr_api::{ApiError, ApiResult};
use chrono::{DateTime, Utc};
use heapless::String as HeaplessString;
use rust_decimal::Decimal;

use crate::models::customer::{AddressModel, CustomerModel, PurchaseModel, UserRole};
use crate::models::request::{
    CsrRequestModel, CsrRequestStatus, CsrRequestType, RequestHistoryEntryModel,
};
use crate::models::subscription::{
    BillingFrequency, BillingInfoModel, CarWashLocationModel, Discount, DiscountValue,
    PaymentMethod, PaymentMethodModel, PlanFeatures, SubscriptionPlanType, SubscriptionStatus,
    VehicleModel, VehicleSubscriptionModel,
};

/// Bounded-string constructor for fixture literals. Overflow is a bug in
/// the fixture itself, surfaced as an internal error rather than a panic.
pub(crate) fn hs<const N: usize>(s: &str) -> ApiResult<HeaplessString<N>> {
    HeaplessString::try_from(s)
        .map_err(|_| ApiError::InternalError(format!("seed value exceeds field limit: {s}")))
}

fn ts(s: &str) -> ApiResult<DateTime<Utc>> {
    s.parse::<DateTime<Utc>>()
        .map_err(|e| ApiError::InternalError(format!("bad seed timestamp {s}: {e}")))
}

fn money(s: &str) -> ApiResult<Decimal> {
    Decimal::from_str(s)
        .map_err(|e| ApiError::InternalError(format!("bad seed amount {s}: {e}")))
}

fn entry(
    timestamp: &str,
    status: CsrRequestStatus,
    comment: &str,
) -> ApiResult<RequestHistoryEntryModel> {
    Ok(RequestHistoryEntryModel {
        timestamp: ts(timestamp)?,
        status,
        updated_by: hs("csr-001")?,
        comment: Some(hs(comment)?),
    })
}

#[allow(clippy::too_many_arguments)]
fn request(
    id: &str,
    customer_id: &str,
    request_type: CsrRequestType,
    status: CsrRequestStatus,
    created_at: &str,
    updated_at: &str,
    details: &str,
    history: Vec<RequestHistoryEntryModel>,
) -> ApiResult<CsrRequestModel> {
    Ok(CsrRequestModel {
        id: hs(id)?,
        customer_id: hs(customer_id)?,
        request_type,
        status,
        details: hs(details)?,
        created_at: ts(created_at)?,
        updated_at: ts(updated_at)?,
        version: 1,
        history,
    })
}

pub fn seed_requests() -> ApiResult<Vec<CsrRequestModel>> {
    Ok(vec![
        request(
            "req-001",
            "cust-1001",
            CsrRequestType::AddressChange,
            CsrRequestStatus::Pending,
            "2025-06-01T10:00:00Z",
            "2025-06-01T10:00:00Z",
            "Changing address from 123 Old St to 456 New Ave",
            vec![entry(
                "2025-06-01T10:00:00Z",
                CsrRequestStatus::Pending,
                "Initial request received",
            )?],
        )?,
        request(
            "req-002",
            "cust-1002",
            CsrRequestType::AccountAccess,
            CsrRequestStatus::Approved,
            "2025-06-02T09:30:00Z",
            "2025-06-02T11:00:00Z",
            "Forgot my password and need access to my account",
            vec![
                entry(
                    "2025-06-02T11:00:00Z",
                    CsrRequestStatus::Approved,
                    "Access granted after verification",
                )?,
                entry(
                    "2025-06-02T10:00:00Z",
                    CsrRequestStatus::Pending,
                    "Customer verified identity via security questions",
                )?,
                entry(
                    "2025-06-02T09:30:00Z",
                    CsrRequestStatus::Pending,
                    "Initial request received",
                )?,
            ],
        )?,
        request(
            "req-003",
            "cust-1003",
            CsrRequestType::SubscriptionManagement,
            CsrRequestStatus::Rejected,
            "2025-06-03T14:15:00Z",
            "2025-06-03T16:00:00Z",
            "I'd like to change my subscription to the Basic plan",
            vec![
                entry(
                    "2025-06-03T16:00:00Z",
                    CsrRequestStatus::Rejected,
                    "Subscription change rejected due to plan restrictions",
                )?,
                entry(
                    "2025-06-03T14:30:00Z",
                    CsrRequestStatus::Pending,
                    "Explained to customer that primary location does not support Basic plan",
                )?,
                entry(
                    "2025-06-03T14:15:00Z",
                    CsrRequestStatus::Pending,
                    "Initial request received",
                )?,
            ],
        )?,
        request(
            "req-004",
            "cust-1004",
            CsrRequestType::BillingIssue,
            CsrRequestStatus::Pending,
            "2025-06-04T08:45:00Z",
            "2025-06-04T08:45:00Z",
            "I was charged twice for my last bill",
            vec![entry(
                "2025-06-04T08:45:00Z",
                CsrRequestStatus::Pending,
                "Billing issue reported by customer",
            )?],
        )?,
        request(
            "req-005",
            "cust-1004",
            CsrRequestType::ServiceCancellation,
            CsrRequestStatus::Completed,
            "2025-06-05T12:00:00Z",
            "2025-06-05T13:30:00Z",
            "I'm relocating and need to cancel my service",
            vec![
                entry(
                    "2025-06-05T13:30:00Z",
                    CsrRequestStatus::Completed,
                    "Service cancellation processed successfully",
                )?,
                entry(
                    "2025-06-05T12:30:00Z",
                    CsrRequestStatus::Pending,
                    "Customer confirmed relocation and requested cancellation",
                )?,
                entry(
                    "2025-06-05T12:00:00Z",
                    CsrRequestStatus::Pending,
                    "Initial request received",
                )?,
            ],
        )?,
        request(
            "req-006",
            "cust-1001",
            CsrRequestType::Other,
            CsrRequestStatus::Pending,
            "2025-06-06T15:00:00Z",
            "2025-06-06T15:00:00Z",
            "I'd like to learn more about your services!",
            vec![entry(
                "2025-06-06T15:00:00Z",
                CsrRequestStatus::Pending,
                "Initial request received",
            )?],
        )?,
    ])
}

#[allow(clippy::too_many_arguments)]
fn customer(
    id: &str,
    first_name: &str,
    last_name: &str,
    email: &str,
    phone: &str,
    address: Option<AddressModel>,
    subscription_ids: &[&str],
    request_ids: &[&str],
) -> ApiResult<CustomerModel> {
    Ok(CustomerModel {
        id: hs(id)?,
        first_name: hs(first_name)?,
        last_name: hs(last_name)?,
        email: hs(email)?,
        phone: hs(phone)?,
        profile_picture: None,
        role: UserRole::Customer,
        address,
        created_at: ts("2025-01-15T09:00:00Z")?,
        updated_at: ts("2025-01-15T09:00:00Z")?,
        version: 1,
        subscription_ids: subscription_ids
            .iter()
            .map(|s| hs(s))
            .collect::<ApiResult<Vec<_>>>()?,
        request_ids: request_ids
            .iter()
            .map(|s| hs(s))
            .collect::<ApiResult<Vec<_>>>()?,
    })
}

fn address(street: &str, city: &str, state: &str, zip: &str) -> ApiResult<AddressModel> {
    Ok(AddressModel {
        street: hs(street)?,
        city: hs(city)?,
        state: hs(state)?,
        zip_code: hs(zip)?,
    })
}

pub fn seed_customers() -> ApiResult<Vec<CustomerModel>> {
    Ok(vec![
        customer(
            "cust-1001",
            "Sarah",
            "Johnson",
            "sarah.johnson@example.com",
            "5551234567",
            Some(address("123 Old St", "Springfield", "IL", "62701")?),
            &["sub-001"],
            &["req-001", "req-006"],
        )?,
        customer(
            "cust-1002",
            "Marcus",
            "Webb",
            "marcus.webb@example.com",
            "5552345678",
            Some(address("88 Birchwood Ln", "Naperville", "IL", "60540")?),
            &["sub-002"],
            &["req-002"],
        )?,
        customer(
            "cust-1003",
            "Elena",
            "Vasquez",
            "elena.vasquez@example.com",
            "5553456789",
            Some(address("410 Harbor Dr", "Evanston", "IL", "60201")?),
            &["sub-003"],
            &["req-003"],
        )?,
        customer(
            "cust-1004",
            "David",
            "Okafor",
            "david.okafor@example.com",
            "5554567890",
            None,
            &[],
            &["req-004", "req-005"],
        )?,
    ])
}

fn vehicle(
    id: &str,
    vin: &str,
    make: &str,
    model: &str,
    year: i32,
    color: &str,
    plate: &str,
    added_at: &str,
) -> ApiResult<VehicleModel> {
    Ok(VehicleModel {
        id: hs(id)?,
        vin: hs(vin)?,
        make: hs(make)?,
        model: hs(model)?,
        year,
        color: hs(color)?,
        license_plate: hs(plate)?,
        added_at: ts(added_at)?,
    })
}

/// Minimal vehicle fixture for lifecycle tests.
pub fn test_vehicle(id: &str, vin: &str) -> VehicleModel {
    VehicleModel {
        id: HeaplessString::try_from(id).unwrap_or_default(),
        vin: HeaplessString::try_from(vin).unwrap_or_default(),
        make: HeaplessString::try_from("Honda").unwrap_or_default(),
        model: HeaplessString::try_from("Civic").unwrap_or_default(),
        year: 2021,
        color: HeaplessString::try_from("Blue").unwrap_or_default(),
        license_plate: HeaplessString::try_from("TST 0000").unwrap_or_default(),
        added_at: Utc::now(),
    }
}

fn location(
    id: &str,
    name: &str,
    street: &str,
    city: &str,
    state: &str,
    zip: &str,
    phone: &str,
    email: &str,
) -> ApiResult<CarWashLocationModel> {
    Ok(CarWashLocationModel {
        id: hs(id)?,
        name: hs(name)?,
        address: hs(street)?,
        city: hs(city)?,
        state: hs(state)?,
        zip: hs(zip)?,
        phone: hs(phone)?,
        email: hs(email)?,
        website: Some(hs("https://www.sparklewash.example.com")?),
    })
}

pub fn seed_locations() -> ApiResult<Vec<CarWashLocationModel>> {
    Ok(vec![
        location(
            "loc-001",
            "Sparkle Wash Downtown",
            "200 Main St",
            "Springfield",
            "IL",
            "62701",
            "5559001001",
            "downtown@sparklewash.example.com",
        )?,
        location(
            "loc-002",
            "Sparkle Wash Northside",
            "77 Lakeview Rd",
            "Evanston",
            "IL",
            "60201",
            "5559001002",
            "northside@sparklewash.example.com",
        )?,
        location(
            "loc-003",
            "Sparkle Wash Express",
            "14 Route 59",
            "Naperville",
            "IL",
            "60540",
            "5559001003",
            "express@sparklewash.example.com",
        )?,
    ])
}

fn billing(
    amount: &str,
    frequency: BillingFrequency,
    pm_id: &str,
    method: PaymentMethod,
    discount: Option<Discount>,
) -> ApiResult<BillingInfoModel> {
    Ok(BillingInfoModel {
        amount: money(amount)?,
        currency: hs("USD")?,
        frequency,
        next_billing_date: ts("2025-07-01T00:00:00Z")?,
        last_billing_date: Some(ts("2025-06-01T00:00:00Z")?),
        payment_method: PaymentMethodModel {
            id: hs(pm_id)?,
            method,
        },
        discount,
    })
}

pub fn seed_subscriptions() -> ApiResult<Vec<VehicleSubscriptionModel>> {
    let locations = seed_locations()?;

    Ok(vec![
        VehicleSubscriptionModel {
            id: hs("sub-001")?,
            customer_id: hs("cust-1001")?,
            plan_type: SubscriptionPlanType::Standard,
            plan_features: PlanFeatures {
                max_vehicles: 2,
                max_washes_per_month: 8,
                detailing_included: false,
            },
            status: SubscriptionStatus::Active,
            locations: vec![locations[0].clone(), locations[1].clone()],
            vehicles: vec![
                vehicle(
                    "veh-101",
                    "1HGCM82633A004352",
                    "Honda",
                    "Accord",
                    2020,
                    "Silver",
                    "SJ 4421",
                    "2025-02-01T10:00:00Z",
                )?,
                vehicle(
                    "veh-102",
                    "5YJ3E1EA7KF317528",
                    "Tesla",
                    "Model 3",
                    2023,
                    "White",
                    "SJ 8810",
                    "2025-03-12T10:00:00Z",
                )?,
            ],
            start_date: ts("2025-02-01T00:00:00Z")?,
            end_date: None,
            paused_at: None,
            cancelled_at: None,
            billing_info: billing(
                "49.99",
                BillingFrequency::Monthly,
                "pm-001",
                PaymentMethod::Card {
                    brand: hs("visa")?,
                    last4: hs("4242")?,
                },
                None,
            )?,
            created_at: ts("2025-02-01T00:00:00Z")?,
            updated_at: ts("2025-03-12T10:00:00Z")?,
            version: 1,
        },
        VehicleSubscriptionModel {
            id: hs("sub-002")?,
            customer_id: hs("cust-1002")?,
            plan_type: SubscriptionPlanType::Premium,
            plan_features: PlanFeatures {
                max_vehicles: 3,
                max_washes_per_month: 30,
                detailing_included: true,
            },
            status: SubscriptionStatus::Active,
            locations: vec![locations[2].clone()],
            vehicles: vec![vehicle(
                "veh-103",
                "WBA5A5C51FD520392",
                "BMW",
                "528i",
                2019,
                "Black",
                "MW 2204",
                "2025-04-01T09:00:00Z",
            )?],
            start_date: ts("2025-04-01T00:00:00Z")?,
            end_date: None,
            paused_at: None,
            cancelled_at: None,
            billing_info: billing(
                "219.99",
                BillingFrequency::Quarterly,
                "pm-002",
                PaymentMethod::Paypal {
                    email: hs("marcus.webb@example.com")?,
                },
                Some(Discount {
                    value: DiscountValue::Percentage(money("10")?),
                    reason: hs("Loyalty program")?,
                    valid_until: Some(ts("2025-12-31T00:00:00Z")?),
                }),
            )?,
            created_at: ts("2025-04-01T00:00:00Z")?,
            updated_at: ts("2025-04-01T09:00:00Z")?,
            version: 1,
        },
        VehicleSubscriptionModel {
            id: hs("sub-003")?,
            customer_id: hs("cust-1003")?,
            plan_type: SubscriptionPlanType::Basic,
            plan_features: PlanFeatures {
                max_vehicles: 1,
                max_washes_per_month: 4,
                detailing_included: false,
            },
            status: SubscriptionStatus::Paused,
            locations: vec![locations[1].clone()],
            vehicles: vec![vehicle(
                "veh-104",
                "JTDKARFU0L3100482",
                "Toyota",
                "Prius",
                2020,
                "Red",
                "EV 7731",
                "2025-05-01T11:00:00Z",
            )?],
            start_date: ts("2025-05-01T00:00:00Z")?,
            end_date: None,
            paused_at: Some(ts("2025-06-10T08:00:00Z")?),
            cancelled_at: None,
            billing_info: billing(
                "19.99",
                BillingFrequency::Monthly,
                "pm-003",
                PaymentMethod::BankTransfer { last4: hs("6610")? },
                None,
            )?,
            created_at: ts("2025-05-01T00:00:00Z")?,
            updated_at: ts("2025-06-10T08:00:00Z")?,
            version: 1,
        },
    ])
}

fn purchase(
    id: &str,
    user_id: &str,
    vehicle_id: &str,
    purchase_date: &str,
    amount: &str,
    payment_method: &str,
    covered: bool,
) -> ApiResult<PurchaseModel> {
    Ok(PurchaseModel {
        id: hs(id)?,
        user_id: hs(user_id)?,
        vehicle_id: hs(vehicle_id)?,
        purchase_date: ts(purchase_date)?,
        amount: money(amount)?,
        payment_method: hs(payment_method)?,
        covered_by_subscription: Some(covered),
        created_at: Some(ts(purchase_date)?),
        updated_at: Some(ts(purchase_date)?),
    })
}

pub fn seed_purchases() -> ApiResult<Vec<PurchaseModel>> {
    Ok(vec![
        purchase(
            "pur-001",
            "cust-1001",
            "veh-101",
            "2025-06-03T14:20:00Z",
            "0.00",
            "subscription",
            true,
        )?,
        purchase(
            "pur-002",
            "cust-1001",
            "veh-102",
            "2025-06-08T16:45:00Z",
            "24.99",
            "card",
            false,
        )?,
        purchase(
            "pur-003",
            "cust-1002",
            "veh-103",
            "2025-06-11T10:05:00Z",
            "0.00",
            "subscription",
            true,
        )?,
        purchase(
            "pur-004",
            "cust-1004",
            "veh-104",
            "2025-05-28T13:30:00Z",
            "34.99",
            "card",
            false,
        )?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_request_history_head_matches_the_request() {
        for request in seed_requests().expect("seed data") {
            let head = request.history.first().expect("non-empty history");
            assert_eq!(head.status, request.status, "request {}", request.id);
            assert_eq!(head.timestamp, request.updated_at, "request {}", request.id);
        }
    }

    #[test]
    fn request_customers_all_exist() {
        let customers = seed_customers().expect("seed data");
        for request in seed_requests().expect("seed data") {
            assert!(
                customers.iter().any(|c| c.id == request.customer_id),
                "request {} references unknown customer {}",
                request.id,
                request.customer_id
            );
        }
    }

    #[test]
    fn subscription_vehicles_respect_plan_caps_and_unique_vins() {
        for sub in seed_subscriptions().expect("seed data") {
            assert!(
                sub.vehicles.len() as i32 <= sub.plan_features.max_vehicles,
                "subscription {} over its vehicle cap",
                sub.id
            );
            let mut vins: Vec<_> = sub.vehicles.iter().map(|v| v.vin.as_str()).collect();
            vins.sort_unstable();
            vins.dedup();
            assert_eq!(vins.len(), sub.vehicles.len());
        }
    }

    #[test]
    fn legacy_approved_request_survives_in_seed_data() {
        let requests = seed_requests().expect("seed data");
        let legacy = requests
            .iter()
            .find(|r| r.id.as_str() == "req-002")
            .expect("req-002 present");
        assert_eq!(legacy.status, CsrRequestStatus::Approved);
    }
}
