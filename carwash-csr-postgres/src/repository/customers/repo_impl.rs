use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use carwash_csr_api::profile::{AddressUpdate, CustomerProfileUpdate};
use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::customer::{AddressModel, CustomerModel};
use carwash_csr_db::EntityId;
use heapless::String as HeaplessString;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::utils::{get_heapless_string, get_optional_heapless_string, TryFromRow};
use carwash_csr_db::repository::customers::CustomerRepository;

pub struct CustomerRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl CustomerRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// Selected columns every customer query must produce: the `users` row
/// LEFT JOINed with `customer_addresses`.
pub(super) const CUSTOMER_COLUMNS: &str = r#"
    u.id, u.first_name, u.last_name, u.email, u.phone, u.profile_picture,
    u.role, u.created_at, u.updated_at, u.version,
    a.street, a.city, a.state, a.zip_code
"#;

impl TryFromRow<PgRow> for CustomerModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let street: Option<HeaplessString<100>> = get_optional_heapless_string(row, "street")?;
        let address = match street {
            Some(street) => Some(AddressModel {
                street,
                city: get_heapless_string(row, "city")?,
                state: get_heapless_string(row, "state")?,
                zip_code: get_heapless_string(row, "zip_code")?,
            }),
            None => None,
        };

        Ok(CustomerModel {
            id: get_heapless_string(row, "id")?,
            first_name: get_heapless_string(row, "first_name")?,
            last_name: get_heapless_string(row, "last_name")?,
            email: get_heapless_string(row, "email")?,
            phone: get_heapless_string(row, "phone")?,
            profile_picture: get_optional_heapless_string(row, "profile_picture")?,
            role: row.try_get("role")?,
            address,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            version: row.try_get("version")?,
            subscription_ids: Vec::new(),
            request_ids: Vec::new(),
        })
    }
}

fn to_entity_ids(ids: Vec<String>) -> ApiResult<Vec<EntityId>> {
    ids.iter()
        .map(|s| {
            EntityId::from_str(s)
                .map_err(|_| ApiError::DatabaseError(format!("id too long: {s}")))
        })
        .collect()
}

/// Fills in the display-only subscription/request back references.
pub(super) async fn attach_references(
    pool: &PgPool,
    customers: &mut [CustomerModel],
) -> ApiResult<()> {
    for customer in customers.iter_mut() {
        let subscription_ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM vehicle_subscriptions WHERE customer_id = $1 ORDER BY created_at",
        )
        .bind(customer.id.as_str())
        .fetch_all(pool)
        .await?;
        customer.subscription_ids = to_entity_ids(subscription_ids)?;

        let request_ids: Vec<String> = sqlx::query_scalar(
            "SELECT id FROM csr_requests WHERE customer_id = $1 ORDER BY created_at",
        )
        .bind(customer.id.as_str())
        .fetch_all(pool)
        .await?;
        customer.request_ids = to_entity_ids(request_ids)?;
    }
    Ok(())
}

pub(super) fn rows_to_customers(rows: &[PgRow]) -> ApiResult<Vec<CustomerModel>> {
    rows.iter()
        .map(|row| {
            CustomerModel::try_from_row(row)
                .map_err(|e| ApiError::DatabaseError(e.to_string()))
        })
        .collect()
}

#[async_trait]
impl CustomerRepository for CustomerRepositoryImpl {
    async fn get_all_customers(&self) -> ApiResult<Vec<CustomerModel>> {
        super::get_all::get_all_impl(&self.pool).await
    }

    async fn get_customer_by_id(&self, id: &str) -> ApiResult<Option<CustomerModel>> {
        super::find_by_id::find_by_id_impl(&self.pool, id).await
    }

    async fn get_customer_by_email(&self, email: &str) -> ApiResult<Option<CustomerModel>> {
        super::find_by_email::find_by_email_impl(&self.pool, email).await
    }

    async fn get_customers_by_name(&self, name: &str) -> ApiResult<Vec<CustomerModel>> {
        super::find_by_name::find_by_name_impl(&self.pool, name).await
    }

    async fn update_customer_details(
        &self,
        id: &str,
        profile: &CustomerProfileUpdate,
        address: &AddressUpdate,
        expected_version: i64,
    ) -> ApiResult<Option<CustomerModel>> {
        super::update_details::update_details_impl(&self.pool, id, profile, address, expected_version)
            .await
    }
}
