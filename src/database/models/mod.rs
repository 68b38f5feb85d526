pub mod business;
pub mod user;

pub use business::{
    current_year, Business, BusinessField, BusinessStatus, Funder, FundingMethod, IncomeRecord, SocialMedia, MIN_YEAR,
};
pub use user::User;
