pub mod append_history;
pub mod find_by_customer_id;
pub mod find_by_id;
pub mod find_by_status;
pub mod get_all;
pub mod repo_impl;
pub mod update;

pub use repo_impl::RequestRepositoryImpl;
