use std::sync::Arc;

use async_trait::async_trait;
use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::{
    BillingInfoModel, CarWashLocationModel, Discount, DiscountValue, PaymentMethod,
    PaymentMethodModel, PlanFeatures, SubscriptionStatus, VehicleModel,
    VehicleSubscriptionModel,
};
use carwash_csr_db::repository::subscriptions::{
    NewSubscription, NewVehicle, SubscriptionRepository,
};
use carwash_csr_db::EntityId;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};

pub struct SubscriptionRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl SubscriptionRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl TryFromRow<PgRow> for VehicleModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(VehicleModel {
            id: get_heapless_string(row, "id")?,
            vin: get_heapless_string(row, "vin")?,
            make: get_heapless_string(row, "make")?,
            model: get_heapless_string(row, "model")?,
            year: row.try_get("year")?,
            color: get_heapless_string(row, "color")?,
            license_plate: get_heapless_string(row, "license_plate")?,
            added_at: row.try_get("added_at")?,
        })
    }
}

impl TryFromRow<PgRow> for CarWashLocationModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(CarWashLocationModel {
            id: get_heapless_string(row, "id")?,
            name: get_heapless_string(row, "name")?,
            address: get_heapless_string(row, "address")?,
            city: get_heapless_string(row, "city")?,
            state: get_heapless_string(row, "state")?,
            zip: get_heapless_string(row, "zip")?,
            phone: get_heapless_string(row, "phone")?,
            email: get_heapless_string(row, "email")?,
            website: get_optional_heapless_string(row, "website")?,
        })
    }
}

/// The wide row produced by [`SUBSCRIPTION_COLUMNS`]: the subscription
/// joined with its plan features, billing info, payment method, and
/// optional discount. Vehicles and locations are attached afterwards.
impl TryFromRow<PgRow> for VehicleSubscriptionModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let payment_kind: String = row.try_get("payment_kind")?;
        let method = match payment_kind.as_str() {
            "card" => PaymentMethod::Card {
                brand: get_heapless_string(row, "card_brand")?,
                last4: get_heapless_string(row, "card_last4")?,
            },
            "paypal" => PaymentMethod::Paypal {
                email: get_heapless_string(row, "paypal_email")?,
            },
            "bank_transfer" => PaymentMethod::BankTransfer {
                last4: get_heapless_string(row, "bank_account_last4")?,
            },
            other => return Err(format!("unknown payment method kind: {other}").into()),
        };

        let discount_kind: Option<String> = row.try_get("discount_kind")?;
        let discount = match discount_kind.as_deref() {
            None => None,
            Some(kind) => {
                let value = match kind {
                    "percentage" => DiscountValue::Percentage(row.try_get("discount_value")?),
                    "amount" => DiscountValue::Amount(row.try_get("discount_value")?),
                    other => return Err(format!("unknown discount kind: {other}").into()),
                };
                Some(Discount {
                    value,
                    reason: get_heapless_string(row, "discount_reason")?,
                    valid_until: row.try_get("discount_valid_until")?,
                })
            }
        };

        Ok(VehicleSubscriptionModel {
            id: get_heapless_string(row, "id")?,
            customer_id: get_heapless_string(row, "customer_id")?,
            plan_type: row.try_get("plan_type")?,
            plan_features: PlanFeatures {
                max_vehicles: row.try_get("max_vehicles")?,
                max_washes_per_month: row.try_get("max_washes_per_month")?,
                detailing_included: row.try_get("detailing_included")?,
            },
            status: row.try_get("status")?,
            locations: Vec::new(),
            vehicles: Vec::new(),
            start_date: row.try_get("start_date")?,
            end_date: row.try_get("end_date")?,
            paused_at: row.try_get("paused_at")?,
            cancelled_at: row.try_get("cancelled_at")?,
            billing_info: BillingInfoModel {
                amount: row.try_get("amount")?,
                currency: get_heapless_string(row, "currency")?,
                frequency: row.try_get("frequency")?,
                next_billing_date: row.try_get("next_billing_date")?,
                last_billing_date: row.try_get("last_billing_date")?,
                payment_method: PaymentMethodModel {
                    id: get_heapless_string(row, "payment_method_id")?,
                    method,
                },
                discount,
            },
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            version: row.try_get("version")?,
        })
    }
}

pub(super) const SUBSCRIPTION_COLUMNS: &str = r#"
    s.id, s.customer_id, s.plan_type, s.status, s.start_date, s.end_date,
    s.paused_at, s.cancelled_at, s.created_at, s.updated_at, s.version,
    f.max_vehicles, f.max_washes_per_month, f.detailing_included,
    b.amount, b.currency, b.frequency, b.next_billing_date, b.last_billing_date,
    p.id AS payment_method_id, p.kind AS payment_kind,
    p.card_brand, p.card_last4, p.paypal_email, p.bank_account_last4,
    d.kind AS discount_kind, d.value AS discount_value,
    d.reason AS discount_reason, d.valid_until AS discount_valid_until
"#;

pub(super) const SUBSCRIPTION_JOINS: &str = r#"
    FROM vehicle_subscriptions s
    JOIN subscription_plan_features f ON f.subscription_id = s.id
    JOIN billing_info b ON b.subscription_id = s.id
    JOIN payment_methods p ON p.id = b.payment_method_id
    LEFT JOIN billing_discounts d ON d.subscription_id = s.id
"#;

/// Attaches the vehicle and location collections to each subscription.
pub(super) async fn attach_collections(
    pool: &PgPool,
    subscriptions: &mut [VehicleSubscriptionModel],
) -> ApiResult<()> {
    for subscription in subscriptions.iter_mut() {
        let vehicle_rows = sqlx::query(
            r#"
            SELECT id, vin, make, model, year, color, license_plate, added_at
            FROM vehicles
            WHERE subscription_id = $1
            ORDER BY added_at, id
            "#,
        )
        .bind(subscription.id.as_str())
        .fetch_all(pool)
        .await?;
        subscription.vehicles = vehicle_rows
            .iter()
            .map(|row| {
                VehicleModel::try_from_row(row)
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))
            })
            .collect::<ApiResult<Vec<_>>>()?;

        let location_rows = sqlx::query(
            r#"
            SELECT l.id, l.name, l.address, l.city, l.state, l.zip, l.phone, l.email, l.website
            FROM car_wash_locations l
            JOIN subscription_locations sl ON sl.location_id = l.id
            WHERE sl.subscription_id = $1
            ORDER BY sl.position
            "#,
        )
        .bind(subscription.id.as_str())
        .fetch_all(pool)
        .await?;
        subscription.locations = location_rows
            .iter()
            .map(|row| {
                CarWashLocationModel::try_from_row(row)
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))
            })
            .collect::<ApiResult<Vec<_>>>()?;
    }
    Ok(())
}

#[async_trait]
impl SubscriptionRepository for SubscriptionRepositoryImpl {
    async fn get_subscription_by_id(
        &self,
        id: &str,
    ) -> ApiResult<Option<VehicleSubscriptionModel>> {
        super::find_by_id::find_by_id_impl(&self.pool, id).await
    }

    async fn get_subscriptions_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<VehicleSubscriptionModel>> {
        super::find_by_customer_id::find_by_customer_id_impl(&self.pool, customer_id).await
    }

    async fn create_subscription(
        &self,
        new: NewSubscription,
    ) -> ApiResult<VehicleSubscriptionModel> {
        super::create::create_impl(&self.pool, new).await
    }

    async fn update_subscription_status(
        &self,
        id: &str,
        status: SubscriptionStatus,
        expected_version: i64,
    ) -> ApiResult<Option<VehicleSubscriptionModel>> {
        super::update_status::update_status_impl(&self.pool, id, status, expected_version).await
    }

    async fn add_vehicle_to_subscription(
        &self,
        subscription_id: &str,
        vehicle: NewVehicle,
        expected_version: i64,
    ) -> ApiResult<VehicleSubscriptionModel> {
        super::add_vehicle::add_vehicle_impl(&self.pool, subscription_id, vehicle, expected_version)
            .await
    }

    async fn remove_vehicle_from_subscription(
        &self,
        subscription_id: &str,
        vehicle_id: &str,
        expected_version: i64,
    ) -> ApiResult<VehicleSubscriptionModel> {
        super::remove_vehicle::remove_vehicle_impl(
            &self.pool,
            subscription_id,
            vehicle_id,
            expected_version,
        )
        .await
    }

    async fn delete_subscription(&self, id: &str) -> ApiResult<bool> {
        super::delete::delete_impl(&self.pool, id).await
    }

    async fn get_vehicle_by_id(&self, id: &str) -> ApiResult<Option<VehicleModel>> {
        super::vehicles::get_vehicle_by_id_impl(&self.pool, id).await
    }

    async fn get_vehicles_by_ids(
        &self,
        ids: &[EntityId],
    ) -> ApiResult<Vec<Option<VehicleModel>>> {
        super::vehicles::get_vehicles_by_ids_impl(&self.pool, ids).await
    }
}
