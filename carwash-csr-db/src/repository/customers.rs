use async_trait::async_trait;
use carwash_csr_api::profile::{AddressUpdate, CustomerProfileUpdate};
use carwash_csr_api::ApiResult;

use crate::models::customer::CustomerModel;

#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn get_all_customers(&self) -> ApiResult<Vec<CustomerModel>>;

    async fn get_customer_by_id(&self, id: &str) -> ApiResult<Option<CustomerModel>>;

    async fn get_customer_by_email(&self, email: &str) -> ApiResult<Option<CustomerModel>>;

    /// Case-insensitive substring match over first and last name.
    async fn get_customers_by_name(&self, name: &str) -> ApiResult<Vec<CustomerModel>>;

    /// Applies a validated profile-form submission. The caller is expected
    /// to have run `validator` on both payloads already; stores only check
    /// bounded-length limits and the version guard.
    ///
    /// Returns `Ok(None)` when the customer does not exist.
    async fn update_customer_details(
        &self,
        id: &str,
        profile: &CustomerProfileUpdate,
        address: &AddressUpdate,
        expected_version: i64,
    ) -> ApiResult<Option<CustomerModel>>;
}
