pub mod add_vehicle;
pub mod create;
pub mod delete;
pub mod find_by_customer_id;
pub mod find_by_id;
pub mod remove_vehicle;
pub mod repo_impl;
pub mod update_status;
pub mod vehicles;

pub use repo_impl::SubscriptionRepositoryImpl;
