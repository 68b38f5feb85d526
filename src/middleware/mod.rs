pub mod auth;
pub mod ownership;

pub use auth::{CurrentUser, MaybeUser};
pub use ownership::OwnedBusiness;
