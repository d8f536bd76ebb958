use async_trait::async_trait;
use carwash_csr_api::ApiResult;

use crate::models::customer::PurchaseModel;

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Purchase history for one customer, newest first.
    async fn get_purchases_by_customer_id(
        &self,
        customer_id: &str,
    ) -> ApiResult<Vec<PurchaseModel>>;
}
