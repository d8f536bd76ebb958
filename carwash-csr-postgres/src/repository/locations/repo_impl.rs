use std::sync::Arc;

use async_trait::async_trait;
use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::CarWashLocationModel;
use carwash_csr_db::repository::locations::LocationRepository;
use sqlx::PgPool;

use crate::utils::TryFromRow;

pub struct LocationRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl LocationRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepository for LocationRepositoryImpl {
    async fn get_all_locations(&self) -> ApiResult<Vec<CarWashLocationModel>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, address, city, state, zip, phone, email, website
            FROM car_wash_locations
            ORDER BY name
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                CarWashLocationModel::try_from_row(row)
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))
            })
            .collect()
    }

    async fn get_location_by_id(&self, id: &str) -> ApiResult<Option<CarWashLocationModel>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, address, city, state, zip, phone, email, website
            FROM car_wash_locations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        row.as_ref()
            .map(|row| {
                CarWashLocationModel::try_from_row(row)
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))
            })
            .transpose()
    }
}
