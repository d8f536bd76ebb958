use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::{DiscountValue, PaymentMethod, VehicleSubscriptionModel};
use carwash_csr_db::repository::subscriptions::NewSubscription;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

/// Creates the subscription aggregate in one transaction: the main row,
/// plan features, payment method, billing info, optional discount,
/// location links, and initial vehicles. Nothing is left behind on error.
pub(super) async fn create_impl(
    pool: &PgPool,
    new: NewSubscription,
) -> ApiResult<VehicleSubscriptionModel> {
    if new.vehicles.len() as i32 > new.plan_features.max_vehicles {
        return Err(ApiError::ValidationError(format!(
            "Maximum vehicles ({}) reached for this plan",
            new.plan_features.max_vehicles
        )));
    }

    let mut tx = pool.begin().await?;

    for location_id in &new.location_ids {
        let exists = sqlx::query("SELECT 1 FROM car_wash_locations WHERE id = $1")
            .bind(location_id.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(ApiError::NotFound(format!(
                "Location not found: {location_id}"
            )));
        }
    }

    for vehicle in &new.vehicles {
        let exists = sqlx::query("SELECT 1 FROM vehicles WHERE vin = $1")
            .bind(vehicle.vin.as_str())
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_some() {
            return Err(ApiError::ValidationError(
                "Vehicle already exists in system".to_string(),
            ));
        }
    }

    let now = Utc::now();
    let subscription_id = format!("sub-{}", Uuid::new_v4().simple());
    let payment_method_id = format!("pm-{}", Uuid::new_v4().simple());

    sqlx::query(
        r#"
        INSERT INTO vehicle_subscriptions
            (id, customer_id, plan_type, status, start_date, created_at, updated_at, version)
        VALUES ($1, $2, $3, 'active', $4, $5, $5, 1)
        "#,
    )
    .bind(&subscription_id)
    .bind(new.customer_id.as_str())
    .bind(new.plan_type)
    .bind(new.start_date)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO subscription_plan_features
            (subscription_id, max_vehicles, max_washes_per_month, detailing_included)
        VALUES ($1, $2, $3, $4)
        "#,
    )
    .bind(&subscription_id)
    .bind(new.plan_features.max_vehicles)
    .bind(new.plan_features.max_washes_per_month)
    .bind(new.plan_features.detailing_included)
    .execute(&mut *tx)
    .await?;

    let (card_brand, card_last4, paypal_email, bank_last4) = match &new.billing.payment_method {
        PaymentMethod::Card { brand, last4 } => {
            (Some(brand.as_str()), Some(last4.as_str()), None, None)
        }
        PaymentMethod::Paypal { email } => (None, None, Some(email.as_str()), None),
        PaymentMethod::BankTransfer { last4 } => (None, None, None, Some(last4.as_str())),
    };
    sqlx::query(
        r#"
        INSERT INTO payment_methods
            (id, kind, card_brand, card_last4, paypal_email, bank_account_last4)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&payment_method_id)
    .bind(new.billing.payment_method.kind())
    .bind(card_brand)
    .bind(card_last4)
    .bind(paypal_email)
    .bind(bank_last4)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO billing_info
            (subscription_id, amount, currency, frequency, next_billing_date, payment_method_id)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&subscription_id)
    .bind(new.billing.amount)
    .bind(new.billing.currency.as_str())
    .bind(new.billing.frequency)
    .bind(new.billing.next_billing_date)
    .bind(&payment_method_id)
    .execute(&mut *tx)
    .await?;

    if let Some(discount) = &new.billing.discount {
        let (kind, value) = match &discount.value {
            DiscountValue::Percentage(v) => ("percentage", v),
            DiscountValue::Amount(v) => ("amount", v),
        };
        sqlx::query(
            r#"
            INSERT INTO billing_discounts (subscription_id, kind, value, reason, valid_until)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&subscription_id)
        .bind(kind)
        .bind(value)
        .bind(discount.reason.as_str())
        .bind(discount.valid_until)
        .execute(&mut *tx)
        .await?;
    }

    for (position, location_id) in new.location_ids.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO subscription_locations (subscription_id, location_id, position)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&subscription_id)
        .bind(location_id.as_str())
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    for vehicle in &new.vehicles {
        let number: i64 = sqlx::query_scalar("SELECT nextval('vehicle_id_seq')")
            .fetch_one(&mut *tx)
            .await?;
        sqlx::query(
            r#"
            INSERT INTO vehicles
                (id, subscription_id, vin, make, model, year, color, license_plate, added_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(format!("veh-{number}"))
        .bind(&subscription_id)
        .bind(vehicle.vin.as_str())
        .bind(vehicle.make.as_str())
        .bind(vehicle.model.as_str())
        .bind(vehicle.year)
        .bind(vehicle.color.as_str())
        .bind(vehicle.license_plate.as_str())
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(subscription_id = %subscription_id, "subscription created");

    super::find_by_id::find_by_id_impl(pool, &subscription_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "Subscription {subscription_id} vanished after create"
            ))
        })
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_db::models::subscription::{
        BillingFrequency, PaymentMethod, PlanFeatures, SubscriptionPlanType, SubscriptionStatus,
    };
    use carwash_csr_db::repository::subscriptions::{
        NewBillingInfo, NewSubscription, NewVehicle, SubscriptionRepository,
    };
    use chrono::Utc;
    use heapless::String as HeaplessString;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn basic_subscription(vin: &str) -> NewSubscription {
        NewSubscription {
            customer_id: HeaplessString::try_from("cust-1004").unwrap(),
            plan_type: SubscriptionPlanType::Basic,
            plan_features: PlanFeatures {
                max_vehicles: 1,
                max_washes_per_month: 4,
                detailing_included: false,
            },
            location_ids: vec![HeaplessString::try_from("loc-001").unwrap()],
            vehicles: vec![NewVehicle {
                vin: HeaplessString::try_from(vin).unwrap(),
                make: HeaplessString::try_from("Mazda").unwrap(),
                model: HeaplessString::try_from("CX-5").unwrap(),
                year: 2022,
                color: HeaplessString::try_from("Gray").unwrap(),
                license_plate: HeaplessString::try_from("NEW 5150").unwrap(),
            }],
            start_date: Utc::now(),
            billing: NewBillingInfo {
                amount: Decimal::from_str("19.99").unwrap(),
                currency: HeaplessString::try_from("USD").unwrap(),
                frequency: BillingFrequency::Monthly,
                next_billing_date: Utc::now(),
                payment_method: PaymentMethod::Card {
                    brand: HeaplessString::try_from("visa").unwrap(),
                    last4: HeaplessString::try_from("0099").unwrap(),
                },
                discount: None,
            },
        }
    }

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn create_persists_the_whole_aggregate(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        let created = stores
            .subscriptions
            .create_subscription(basic_subscription("JM3KFBDM0N0600001"))
            .await?;
        assert!(created.id.as_str().starts_with("sub-"));
        assert_eq!(created.status, SubscriptionStatus::Active);
        assert_eq!(created.vehicles.len(), 1);
        assert!(created.vehicles[0].id.as_str().starts_with("veh-"));
        assert_eq!(created.locations[0].id.as_str(), "loc-001");

        // Duplicate VIN anywhere in the system is rejected.
        let err = stores
            .subscriptions
            .create_subscription(basic_subscription("JM3KFBDM0N0600001"))
            .await;
        assert!(err.is_err());
        Ok(())
    }
}
