pub mod billing;
mod common_enums;
pub mod location;
pub mod subscription;
pub mod vehicle;

pub use billing::*;
pub use common_enums::*;
pub use location::*;
pub use subscription::*;
pub use vehicle::*;
