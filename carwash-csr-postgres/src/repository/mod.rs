pub mod customers;
pub mod db_init;
pub mod locations;
pub mod purchases;
pub mod requests;
pub mod subscriptions;
