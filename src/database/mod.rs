pub mod businesses;
pub mod manager;
pub mod models;
pub mod users;

pub use manager::{is_unique_violation, DatabaseError, DatabaseManager};
