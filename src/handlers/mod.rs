pub mod business;
pub mod protected;
pub mod public;
