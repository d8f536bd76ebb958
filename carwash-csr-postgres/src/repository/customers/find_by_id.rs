use carwash_csr_api::{ApiError, ApiResult};
use carwash_csr_db::models::customer::CustomerModel;
use sqlx::PgPool;

use super::repo_impl::{attach_references, CUSTOMER_COLUMNS};
use crate::utils::TryFromRow;

pub(super) async fn find_by_id_impl(
    pool: &PgPool,
    id: &str,
) -> ApiResult<Option<CustomerModel>> {
    let query = format!(
        r#"
        SELECT {CUSTOMER_COLUMNS}
        FROM users u
        LEFT JOIN customer_addresses a ON a.user_id = u.id
        WHERE u.id = $1
        "#
    );
    let row = sqlx::query(&query).bind(id).fetch_optional(pool).await?;

    let Some(row) = row else {
        return Ok(None);
    };
    let customer = CustomerModel::try_from_row(&row)
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;
    let mut customers = vec![customer];
    attach_references(pool, &mut customers).await?;
    Ok(customers.pop())
}
