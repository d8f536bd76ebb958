pub mod customers;
pub mod locations;
pub mod pagination;
pub mod purchases;
pub mod requests;
pub mod subscriptions;

// Re-exports
pub use customers::*;
pub use locations::*;
pub use pagination::*;
pub use purchases::*;
pub use requests::*;
pub use subscriptions::*;
