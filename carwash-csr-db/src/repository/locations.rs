use async_trait::async_trait;
use carwash_csr_api::ApiResult;

use crate::models::subscription::CarWashLocationModel;

#[async_trait]
pub trait LocationRepository: Send + Sync {
    async fn get_all_locations(&self) -> ApiResult<Vec<CarWashLocationModel>>;

    async fn get_location_by_id(&self, id: &str) -> ApiResult<Option<CarWashLocationModel>>;
}
