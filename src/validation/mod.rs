//! Field-level validation shared by every handler.
//!
//! One constraint set, one place: each check appends a per-field message
//! to a [`Violations`] map and handlers convert a non-empty map into a
//! single `ValidationFailed` response listing every violated field, not
//! just the first. No mutation is applied while the map is non-empty.

use std::collections::HashMap;

use crate::database::models::{current_year, BusinessField, BusinessStatus, FundingMethod, MIN_YEAR};
use crate::error::ApiError;

/// Accumulated per-field violations.
#[derive(Debug, Default)]
pub struct Violations {
    errors: HashMap<String, String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        // First message per field wins; later checks on the same field
        // are usually consequences of the first failure.
        self.errors.entry(field.to_string()).or_insert_with(|| message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Empty map passes; anything else becomes a 400 listing every field.
    pub fn into_result(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_failed("Validation failed", self.errors))
        }
    }
}

fn trimmed(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Length bounds count characters, not bytes, so multibyte input near a
/// bound validates the same as ASCII.
fn char_len_in(value: &str, min: usize, max: usize) -> bool {
    let len = value.chars().count();
    len >= min && len <= max
}

// ---- User fields ----

pub fn user_name(v: &mut Violations, value: Option<&str>, required: bool) {
    match trimmed(value) {
        Some(name) if !char_len_in(name, 2, 50) => {
            v.add("name", "Name must be between 2 and 50 characters");
        }
        Some(_) => {}
        None if required => v.add("name", "Name is required"),
        None => {}
    }
}

pub fn email(v: &mut Violations, value: Option<&str>) {
    match trimmed(value) {
        Some(email) => {
            let well_formed = email.split_once('@').map_or(false, |(local, domain)| {
                !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
            });
            if !well_formed || email.contains(char::is_whitespace) {
                v.add("email", "Please provide a valid email");
            }
        }
        None => v.add("email", "Email is required"),
    }
}

pub fn password(v: &mut Violations, field: &str, value: Option<&str>) {
    match value {
        Some(pw) if pw.chars().count() < 6 => v.add(field, "Password must be at least 6 characters long"),
        Some(_) => {}
        None => v.add(field, "Password is required"),
    }
}

// ---- Business fields ----

pub fn business_name(v: &mut Violations, value: Option<&str>, required: bool) {
    match trimmed(value) {
        Some(name) if !char_len_in(name, 2, 100) => {
            v.add("businessName", "Business name must be between 2 and 100 characters");
        }
        Some(_) => {}
        None if required => v.add("businessName", "Business name is required"),
        None => {}
    }
}

pub fn description(v: &mut Violations, value: Option<&str>, required: bool) {
    match trimmed(value) {
        Some(text) if !char_len_in(text, 10, 500) => {
            v.add("description", "Description must be between 10 and 500 characters");
        }
        Some(_) => {}
        None if required => v.add("description", "Business description is required"),
        None => {}
    }
}

pub fn year(v: &mut Violations, field: &str, value: Option<i64>, required: bool) {
    match value {
        Some(year) if year < MIN_YEAR as i64 || year > current_year() as i64 => {
            v.add(field, format!("{} must be between {} and current year", label(field), MIN_YEAR));
        }
        Some(_) => {}
        None if required => v.add(field, format!("{} is required", label(field))),
        None => {}
    }
}

fn label(field: &str) -> &'static str {
    match field {
        "startedAt" => "Start year",
        "year" => "Year",
        _ => "Value",
    }
}

pub fn business_field(v: &mut Violations, value: Option<&str>, required: bool) {
    match trimmed(value) {
        Some(raw) => {
            if BusinessField::try_from(raw.to_string()).is_err() {
                v.add("businessField", "Please select a valid business field");
            }
        }
        None if required => v.add("businessField", "Business field is required"),
        None => {}
    }
}

pub fn status(v: &mut Violations, value: Option<&str>) {
    if let Some(raw) = trimmed(value) {
        if BusinessStatus::try_from(raw.to_string()).is_err() {
            v.add("status", "Please select a valid status");
        }
    }
}

pub fn website(v: &mut Violations, value: Option<&str>) {
    if let Some(url) = trimmed(value) {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            v.add("website", "Please enter a valid website URL");
        }
    }
}

pub fn phone_number(v: &mut Violations, value: Option<&str>) {
    if let Some(phone) = trimmed(value) {
        let rest = phone.strip_prefix('+').unwrap_or(phone);
        let valid = !rest.is_empty()
            && rest.chars().all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '(' || c == ')');
        if !valid {
            v.add("phoneNumber", "Please enter a valid phone number");
        }
    }
}

pub fn city(v: &mut Violations, field: &str, value: Option<&str>) {
    if let Some(city) = trimmed(value) {
        if !char_len_in(city, 2, 50) {
            v.add(field, "City must be between 2 and 50 characters");
        }
    }
}

pub fn country(v: &mut Violations, value: Option<&str>) {
    if let Some(country) = trimmed(value) {
        if country.chars().count() > 50 {
            v.add("country", "Country name cannot exceed 50 characters");
        }
    }
}

pub fn tags(v: &mut Violations, values: Option<&[String]>) {
    if let Some(tags) = values {
        if tags.iter().any(|t| t.trim().chars().count() > 30) {
            v.add("tags", "Tag cannot exceed 30 characters");
        }
    }
}

// ---- Income / funder fields ----

pub fn amount(v: &mut Violations, field: &str, value: Option<f64>, required: bool) {
    match value {
        Some(amount) if !(amount >= 0.0) => v.add(field, "Amount must be a positive number"),
        Some(_) => {}
        None if required => v.add(field, "Amount is required"),
        None => {}
    }
}

pub fn funder_name(v: &mut Violations, value: Option<&str>) {
    match trimmed(value) {
        Some(name) if !char_len_in(name, 2, 100) => {
            v.add("name", "Funder name must be between 2 and 100 characters");
        }
        Some(_) => {}
        None => v.add("name", "Funder name is required"),
    }
}

pub fn funding_method(v: &mut Violations, value: Option<&str>) {
    match trimmed(value) {
        Some(raw) => {
            if FundingMethod::try_from(raw.to_string()).is_err() {
                v.add("method", "Please select a valid funding method");
            }
        }
        None => v.add("method", "Funding method is required"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_violation_is_reported_not_just_the_first() {
        let mut v = Violations::new();
        business_name(&mut v, Some("x"), true);
        description(&mut v, Some("too short"), true);
        year(&mut v, "startedAt", Some(1850), true);
        business_field(&mut v, Some("Astrology"), true);

        assert_eq!(v.len(), 4);
        let err = v.into_result().unwrap_err();
        let body = err.to_json();
        let fields = body["field_errors"].as_object().unwrap();
        assert!(fields.contains_key("businessName"));
        assert!(fields.contains_key("description"));
        assert!(fields.contains_key("startedAt"));
        assert!(fields.contains_key("businessField"));
    }

    #[test]
    fn empty_violations_pass() {
        let mut v = Violations::new();
        business_name(&mut v, Some("Green Farm Solutions"), true);
        description(&mut v, Some("Sustainable agriculture solutions for farmers"), true);
        year(&mut v, "startedAt", Some(2020), true);
        business_field(&mut v, Some("Agriculture"), true);
        assert!(v.into_result().is_ok());
    }

    #[test]
    fn optional_fields_are_skipped_when_absent() {
        let mut v = Violations::new();
        business_name(&mut v, None, false);
        year(&mut v, "startedAt", None, false);
        website(&mut v, None);
        amount(&mut v, "amount", None, false);
        assert!(v.is_empty());
    }

    #[test]
    fn required_fields_are_flagged_when_absent() {
        let mut v = Violations::new();
        user_name(&mut v, None, true);
        email(&mut v, None);
        password(&mut v, "password", None);
        business_field(&mut v, None, true);
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn email_format_is_checked() {
        for bad in ["plainaddress", "missing@tld", "@nodomain.com", "two words@x.com"] {
            let mut v = Violations::new();
            email(&mut v, Some(bad));
            assert!(!v.is_empty(), "expected '{}' to be rejected", bad);
        }

        let mut v = Violations::new();
        email(&mut v, Some("jane.smith@example.com"));
        assert!(v.is_empty());
    }

    #[test]
    fn year_bounds_are_inclusive() {
        let mut v = Violations::new();
        year(&mut v, "year", Some(1900), true);
        year(&mut v, "year", Some(current_year() as i64), true);
        assert!(v.is_empty());

        let mut v = Violations::new();
        year(&mut v, "year", Some(1899), true);
        assert!(!v.is_empty());

        let mut v = Violations::new();
        year(&mut v, "year", Some(current_year() as i64 + 1), true);
        assert!(!v.is_empty());
    }

    #[test]
    fn negative_and_nan_amounts_are_rejected() {
        let mut v = Violations::new();
        amount(&mut v, "amount", Some(-1.0), true);
        assert!(!v.is_empty());

        let mut v = Violations::new();
        amount(&mut v, "amount", Some(f64::NAN), true);
        assert!(!v.is_empty());

        let mut v = Violations::new();
        amount(&mut v, "amount", Some(0.0), true);
        assert!(v.is_empty());
    }

    #[test]
    fn funding_method_must_be_in_closed_set() {
        let mut v = Violations::new();
        funding_method(&mut v, Some("Crowdfunding"));
        assert!(!v.is_empty());

        for ok in ["Grant", "Loan", "Investment", "Donation"] {
            let mut v = Violations::new();
            funding_method(&mut v, Some(ok));
            assert!(v.is_empty(), "expected '{}' to pass", ok);
        }
    }

    #[test]
    fn length_bounds_count_characters_not_bytes() {
        // 50 two-byte characters is a valid name even though it exceeds
        // 50 bytes; 51 characters is over the bound.
        let mut v = Violations::new();
        user_name(&mut v, Some(&"é".repeat(50)), true);
        assert!(v.is_empty());

        let mut v = Violations::new();
        user_name(&mut v, Some(&"é".repeat(51)), true);
        assert!(!v.is_empty());

        let mut v = Violations::new();
        description(&mut v, Some(&"ü".repeat(500)), true);
        assert!(v.is_empty());

        let multibyte_tags = vec!["ü".repeat(30)];
        let mut v = Violations::new();
        tags(&mut v, Some(&multibyte_tags));
        assert!(v.is_empty());
    }

    #[test]
    fn website_and_phone_formats() {
        let mut v = Violations::new();
        website(&mut v, Some("https://greenfarm.co.ke"));
        phone_number(&mut v, Some("+254 700 123 456"));
        assert!(v.is_empty());

        let mut v = Violations::new();
        website(&mut v, Some("greenfarm.co.ke"));
        phone_number(&mut v, Some("call me maybe"));
        assert_eq!(v.len(), 2);
    }
}
