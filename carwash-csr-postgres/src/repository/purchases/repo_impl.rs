use std::sync::Arc;

use async_trait::async_trait;
use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::customer::PurchaseModel;
use carwash_csr_db::repository::purchases::PurchaseRepository;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::utils::{get_heapless_string, TryFromRow};

pub struct PurchaseRepositoryImpl {
    pub(crate) pool: Arc<PgPool>,
}

impl PurchaseRepositoryImpl {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

impl TryFromRow<PgRow> for PurchaseModel {
    fn try_from_row(row: &PgRow) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        Ok(PurchaseModel {
            id: get_heapless_string(row, "id")?,
            user_id: get_heapless_string(row, "user_id")?,
            vehicle_id: get_heapless_string(row, "vehicle_id")?,
            purchase_date: row.try_get("purchase_date")?,
            amount: row.try_get("amount")?,
            payment_method: get_heapless_string(row, "payment_method")?,
            covered_by_subscription: row.try_get("covered_by_subscription")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl PurchaseRepository for PurchaseRepositoryImpl {
    async fn get_purchases_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<PurchaseModel>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, vehicle_id, purchase_date, amount, payment_method,
                   covered_by_subscription, created_at, updated_at
            FROM purchases
            WHERE user_id = $1
            ORDER BY purchase_date DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&*self.pool)
        .await?;

        rows.iter()
            .map(|row| {
                PurchaseModel::try_from_row(row)
                    .map_err(|e| ApiError::DatabaseError(e.to_string()))
            })
            .collect()
    }
}
