pub mod aggregates;
pub mod request_ledger;
pub mod search;
pub mod stats;
pub mod subscription_lifecycle;

// Re-exports
pub use aggregates::*;
pub use request_ledger::*;
pub use search::*;
pub use stats::*;
pub use subscription_lifecycle::*;
