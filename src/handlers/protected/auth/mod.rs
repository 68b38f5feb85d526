// Account endpoints behind a valid bearer token.

pub mod password;
pub mod profile;
pub mod session;

pub use password::change_password_post;
pub use profile::{me_get, me_put};
pub use session::logout_post;
