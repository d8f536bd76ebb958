pub mod error;
pub mod profile;
pub mod session;

pub use error::*;
pub use profile::*;
pub use session::*;
