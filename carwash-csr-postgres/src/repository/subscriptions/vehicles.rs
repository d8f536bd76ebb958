use std::collections::HashMap;

use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::VehicleModel;
use carwash_csr_db::EntityId;
use sqlx::PgPool;

use crate::utils::TryFromRow;

pub(super) async fn get_vehicle_by_id_impl(
    pool: &PgPool,
    id: &str,
) -> ApiResult<Option<VehicleModel>> {
    let row = sqlx::query(
        r#"
        SELECT id, vin, make, model, year, color, license_plate, added_at
        FROM vehicles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(|row| {
            VehicleModel::try_from_row(row).map_err(|e| ApiError::DatabaseError(e.to_string()))
        })
        .transpose()
}

/// Batch lookup preserving input order; unknown ids yield `None` at
/// their position.
pub(super) async fn get_vehicles_by_ids_impl(
    pool: &PgPool,
    ids: &[EntityId],
) -> ApiResult<Vec<Option<VehicleModel>>> {
    if ids.is_empty() {
        return Ok(vec![]);
    }

    let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let rows = sqlx::query(
        r#"
        SELECT id, vin, make, model, year, color, license_plate, added_at
        FROM vehicles
        WHERE id = ANY($1)
        "#,
    )
    .bind(&id_strings)
    .fetch_all(pool)
    .await?;

    let mut by_id: HashMap<String, VehicleModel> = HashMap::new();
    for row in &rows {
        let vehicle = VehicleModel::try_from_row(row)
            .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        by_id.insert(vehicle.id.to_string(), vehicle);
    }

    Ok(ids.iter().map(|id| by_id.remove(id.as_str())).collect())
}
