mod common_enums;
pub mod history;
pub mod request;

pub use common_enums::*;
pub use history::*;
pub use request::*;
