use std::sync::Arc;

use sqlx::PgPool;

use crate::repository::customers::CustomerRepositoryImpl;
use crate::repository::locations::LocationRepositoryImpl;
use crate::repository::purchases::PurchaseRepositoryImpl;
use crate::repository::requests::RequestRepositoryImpl;
use crate::repository::subscriptions::SubscriptionRepositoryImpl;

/// One repository instance per aggregate, all sharing a connection pool.
pub struct PostgresStores {
    pub requests: Arc<RequestRepositoryImpl>,
    pub customers: Arc<CustomerRepositoryImpl>,
    pub subscriptions: Arc<SubscriptionRepositoryImpl>,
    pub locations: Arc<LocationRepositoryImpl>,
    pub purchases: Arc<PurchaseRepositoryImpl>,
}

impl PostgresStores {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            requests: Arc::new(RequestRepositoryImpl::new(pool.clone())),
            customers: Arc::new(CustomerRepositoryImpl::new(pool.clone())),
            subscriptions: Arc::new(SubscriptionRepositoryImpl::new(pool.clone())),
            locations: Arc::new(LocationRepositoryImpl::new(pool.clone())),
            purchases: Arc::new(PurchaseRepositoryImpl::new(pool)),
        }
    }
}
