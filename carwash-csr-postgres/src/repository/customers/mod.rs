pub mod find_by_email;
pub mod find_by_id;
pub mod find_by_name;
pub mod get_all;
pub mod repo_impl;
pub mod update_details;

pub use repo_impl::CustomerRepositoryImpl;
