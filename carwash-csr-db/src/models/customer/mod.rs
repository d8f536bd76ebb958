mod common_enums;
pub mod customer;
pub mod purchase;

pub use common_enums::*;
pub use customer::*;
pub use purchase::*;
