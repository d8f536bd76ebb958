pub mod customer;
pub mod identifiable;
pub mod request;
pub mod subscription;
pub mod versioned;

// Re-exports
pub use customer::*;
pub use identifiable::*;
pub use request::*;
pub use subscription::*;
pub use versioned::*;
