pub mod portfolio;
pub mod transaction;
pub mod user;

pub use portfolio::*;
pub use transaction::*;
pub use user::*;
