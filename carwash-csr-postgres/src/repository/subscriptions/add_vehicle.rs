use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::subscription::VehicleSubscriptionModel;
use carwash_csr_db::repository::subscriptions::NewVehicle;
use chrono::Utc;
use sqlx::{PgPool, Row};

/// Adds a vehicle under the plan cap and system-wide VIN uniqueness.
/// The subscription row is locked for the duration of the checks.
pub(super) async fn add_vehicle_impl(
    pool: &PgPool,
    subscription_id: &str,
    vehicle: NewVehicle,
    expected_version: i64,
) -> ApiResult<VehicleSubscriptionModel> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        SELECT s.version, f.max_vehicles,
               (SELECT COUNT(*) FROM vehicles v WHERE v.subscription_id = s.id) AS vehicle_count
        FROM vehicle_subscriptions s
        JOIN subscription_plan_features f ON f.subscription_id = s.id
        WHERE s.id = $1
        FOR UPDATE OF s
        "#,
    )
    .bind(subscription_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("Subscription not found: {subscription_id}")))?;

    let version: i64 = row.try_get("version")?;
    let max_vehicles: i32 = row.try_get("max_vehicles")?;
    let vehicle_count: i64 = row.try_get("vehicle_count")?;

    if version != expected_version {
        return Err(ApiError::Conflict(format!(
            "Subscription {subscription_id} was modified concurrently"
        )));
    }
    if vehicle_count >= max_vehicles as i64 {
        return Err(ApiError::ValidationError(format!(
            "Maximum vehicles ({max_vehicles}) reached for this plan"
        )));
    }

    let vin_exists = sqlx::query("SELECT 1 FROM vehicles WHERE vin = $1")
        .bind(vehicle.vin.as_str())
        .fetch_optional(&mut *tx)
        .await?;
    if vin_exists.is_some() {
        return Err(ApiError::ValidationError(
            "Vehicle already exists in system".to_string(),
        ));
    }

    let number: i64 = sqlx::query_scalar("SELECT nextval('vehicle_id_seq')")
        .fetch_one(&mut *tx)
        .await?;
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO vehicles
            (id, subscription_id, vin, make, model, year, color, license_plate, added_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(format!("veh-{number}"))
    .bind(subscription_id)
    .bind(vehicle.vin.as_str())
    .bind(vehicle.make.as_str())
    .bind(vehicle.model.as_str())
    .bind(vehicle.year)
    .bind(vehicle.color.as_str())
    .bind(vehicle.license_plate.as_str())
    .bind(now)
    .execute(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        UPDATE vehicle_subscriptions
        SET updated_at = $2, version = version + 1
        WHERE id = $1
        "#,
    )
    .bind(subscription_id)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::debug!(subscription_id, vehicle_id = %format!("veh-{number}"), "vehicle added");

    super::find_by_id::find_by_id_impl(pool, subscription_id)
        .await?
        .ok_or_else(|| {
            ApiError::InternalError(format!(
                "Subscription {subscription_id} vanished after vehicle add"
            ))
        })
}

#[cfg(test)]
mod tests {
    use crate::test_helper::setup_test_stores;
    use carwash_csr_api::ApiError;
    use carwash_csr_db::repository::subscriptions::{NewVehicle, SubscriptionRepository};
    use heapless::String as HeaplessString;

    fn new_vehicle(vin: &str) -> NewVehicle {
        NewVehicle {
            vin: HeaplessString::try_from(vin).unwrap(),
            make: HeaplessString::try_from("Subaru").unwrap(),
            model: HeaplessString::try_from("Outback").unwrap(),
            year: 2023,
            color: HeaplessString::try_from("Green").unwrap(),
            license_plate: HeaplessString::try_from("ADD 0042").unwrap(),
        }
    }

    #[tokio::test]
    #[ignore = "requires a local Postgres"]
    #[serial_test::serial]
    async fn allocates_monotonic_ids_and_enforces_the_cap(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let stores = setup_test_stores().await?;

        // sub-002 is Premium (3 vehicles) with one seeded vehicle.
        let sub = stores
            .subscriptions
            .get_subscription_by_id("sub-002")
            .await?
            .expect("seeded");
        let sub = stores
            .subscriptions
            .add_vehicle_to_subscription("sub-002", new_vehicle("4S4BTANC0P3200001"), sub.version)
            .await?;
        let added = sub.vehicles.last().expect("added vehicle");
        assert!(added.id.as_str().starts_with("veh-"));

        // Duplicate VIN from sub-001 is visible system-wide.
        let err = stores
            .subscriptions
            .add_vehicle_to_subscription("sub-002", new_vehicle("1HGCM82633A004352"), sub.version)
            .await;
        assert!(matches!(err, Err(ApiError::ValidationError(_))));

        // sub-003 is Basic (1 vehicle) and already full.
        let full = stores
            .subscriptions
            .get_subscription_by_id("sub-003")
            .await?
            .expect("seeded");
        let err = stores
            .subscriptions
            .add_vehicle_to_subscription("sub-003", new_vehicle("4S4BTANC0P3200002"), full.version)
            .await;
        assert!(
            matches!(err, Err(ApiError::ValidationError(msg)) if msg.contains("Maximum vehicles (1)"))
        );
        Ok(())
    }
}
