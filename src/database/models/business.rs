use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Earliest year accepted for start year and income records.
pub const MIN_YEAR: i32 = 1900;

pub fn current_year() -> i32 {
    Utc::now().year()
}

#[derive(Debug, Error)]
#[error("unknown value for {field}: '{value}'")]
pub struct ParseEnumError {
    field: &'static str,
    value: String,
}

/// Closed set of business sectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessField {
    Agriculture,
    Technology,
    Healthcare,
    Education,
    Finance,
    Retail,
    Manufacturing,
    Services,
}

impl BusinessField {
    pub const ALL: [BusinessField; 8] = [
        BusinessField::Agriculture,
        BusinessField::Technology,
        BusinessField::Healthcare,
        BusinessField::Education,
        BusinessField::Finance,
        BusinessField::Retail,
        BusinessField::Manufacturing,
        BusinessField::Services,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessField::Agriculture => "Agriculture",
            BusinessField::Technology => "Technology",
            BusinessField::Healthcare => "Healthcare",
            BusinessField::Education => "Education",
            BusinessField::Finance => "Finance",
            BusinessField::Retail => "Retail",
            BusinessField::Manufacturing => "Manufacturing",
            BusinessField::Services => "Services",
        }
    }
}

impl std::fmt::Display for BusinessField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BusinessField {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == value)
            .copied()
            .ok_or(ParseEnumError { field: "businessField", value })
    }
}

/// Closed set of funding methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FundingMethod {
    Grant,
    Loan,
    Investment,
    Donation,
}

impl FundingMethod {
    pub const ALL: [FundingMethod; 4] = [
        FundingMethod::Grant,
        FundingMethod::Loan,
        FundingMethod::Investment,
        FundingMethod::Donation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FundingMethod::Grant => "Grant",
            FundingMethod::Loan => "Loan",
            FundingMethod::Investment => "Investment",
            FundingMethod::Donation => "Donation",
        }
    }
}

impl std::fmt::Display for FundingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for FundingMethod {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == value)
            .copied()
            .ok_or(ParseEnumError { field: "method", value })
    }
}

/// Closed set of business statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BusinessStatus {
    Active,
    Inactive,
    #[serde(rename = "Seeking Investment")]
    SeekingInvestment,
    Expanding,
}

impl BusinessStatus {
    pub const ALL: [BusinessStatus; 4] = [
        BusinessStatus::Active,
        BusinessStatus::Inactive,
        BusinessStatus::SeekingInvestment,
        BusinessStatus::Expanding,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessStatus::Active => "Active",
            BusinessStatus::Inactive => "Inactive",
            BusinessStatus::SeekingInvestment => "Seeking Investment",
            BusinessStatus::Expanding => "Expanding",
        }
    }
}

impl std::fmt::Display for BusinessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for BusinessStatus {
    type Error = ParseEnumError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .find(|v| v.as_str() == value)
            .copied()
            .ok_or(ParseEnumError { field: "status", value })
    }
}

/// One income amount per year. Keyed by year within a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub year: i32,
    pub amount: f64,
}

/// A funding entry. Unlike income records these are not unique-keyed;
/// the same funder may appear more than once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funder {
    pub name: String,
    pub method: FundingMethod,
    #[serde(default)]
    pub amount: Option<f64>,
    #[serde(default = "Utc::now")]
    pub date_received: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocialMedia {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// A business profile row. Owned by exactly one user; the single-profile
/// rule is enforced at creation time, not by the schema.
#[derive(Debug, Clone, FromRow)]
pub struct Business {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub description: String,
    pub started_at: i32,
    #[sqlx(try_from = "String")]
    pub business_field: BusinessField,
    pub income_records: Json<Vec<IncomeRecord>>,
    pub funders: Json<Vec<Funder>>,
    pub is_public: bool,
    pub business_logo: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub website: Option<String>,
    pub phone_number: Option<String>,
    pub social_media: Json<SocialMedia>,
    pub tags: Vec<String>,
    #[sqlx(try_from = "String")]
    pub status: BusinessStatus,
    /// Optimistic concurrency counter, bumped on every collection write.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Business {
    /// Merge an income record by year.
    ///
    /// If a record for the year exists its amount is replaced; otherwise a
    /// new record is appended. The collection is re-sorted ascending by
    /// year after every mutation.
    pub fn apply_income_record(&mut self, year: i32, amount: f64) {
        let records = &mut self.income_records.0;
        match records.iter_mut().find(|r| r.year == year) {
            Some(existing) => existing.amount = amount,
            None => records.push(IncomeRecord { year, amount }),
        }
        records.sort_by_key(|r| r.year);
    }

    /// Append a funder entry. No dedup: repeat funders are allowed.
    pub fn push_funder(&mut self, funder: Funder) {
        self.funders.0.push(funder);
    }

    // Derived values - computed on read, never stored, so they cannot
    // drift from the underlying collections.

    pub fn total_income(&self) -> f64 {
        self.income_records.0.iter().map(|r| r.amount).sum()
    }

    pub fn latest_income_year(&self) -> Option<i32> {
        self.income_records.0.iter().map(|r| r.year).max()
    }

    pub fn total_funders(&self) -> usize {
        self.funders.0.len()
    }

    pub fn business_age(&self) -> i32 {
        current_year() - self.started_at
    }

    /// Full API document: stored fields in wire form plus derived values.
    pub fn to_api_json(&self) -> Value {
        json!({
            "id": self.id,
            "userId": self.user_id,
            "businessName": self.business_name,
            "description": self.description,
            "startedAt": self.started_at,
            "businessField": self.business_field,
            "incomeRecords": self.income_records.0,
            "funders": self.funders.0,
            "isPublic": self.is_public,
            "businessLogo": self.business_logo,
            "location": {
                "city": self.city,
                "country": self.country,
            },
            "website": self.website,
            "phoneNumber": self.phone_number,
            "socialMedia": self.social_media.0,
            "tags": self.tags,
            "status": self.status,
            "totalIncome": self.total_income(),
            "latestIncomeYear": self.latest_income_year(),
            "totalFunders": self.total_funders(),
            "businessAge": self.business_age(),
            "createdAt": self.created_at,
            "updatedAt": self.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_business() -> Business {
        Business {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_name: "Green Farm Solutions".to_string(),
            description: "Sustainable agriculture solutions for small-scale farmers".to_string(),
            started_at: 2019,
            business_field: BusinessField::Agriculture,
            income_records: Json(vec![]),
            funders: Json(vec![]),
            is_public: true,
            business_logo: None,
            city: Some("Nairobi".to_string()),
            country: Some("Kenya".to_string()),
            website: None,
            phone_number: None,
            social_media: Json(SocialMedia::default()),
            tags: vec![],
            status: BusinessStatus::Active,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn income_record_for_new_year_is_appended_sorted() {
        let mut business = sample_business();
        business.apply_income_record(2021, 75000.0);
        business.apply_income_record(2019, 30000.0);
        business.apply_income_record(2020, 50000.0);

        let years: Vec<i32> = business.income_records.0.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2020, 2021]);
    }

    #[test]
    fn income_record_for_existing_year_replaces_amount() {
        let mut business = sample_business();
        business.apply_income_record(2019, 30000.0);
        business.apply_income_record(2019, 85000.0);

        assert_eq!(business.income_records.0, vec![IncomeRecord { year: 2019, amount: 85000.0 }]);
    }

    #[test]
    fn collection_stays_sorted_after_replacement() {
        let mut business = sample_business();
        business.apply_income_record(2020, 50000.0);
        business.apply_income_record(2019, 30000.0);
        business.apply_income_record(2020, 60000.0);

        let years: Vec<i32> = business.income_records.0.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2019, 2020]);
        assert_eq!(business.income_records.0[1].amount, 60000.0);
    }

    #[test]
    fn funder_append_never_dedups() {
        let mut business = sample_business();
        let funder = Funder {
            name: "AgriBank Kenya".to_string(),
            method: FundingMethod::Loan,
            amount: Some(100000.0),
            date_received: Utc::now(),
        };
        business.push_funder(funder.clone());
        business.push_funder(funder);

        assert_eq!(business.total_funders(), 2);
    }

    #[test]
    fn derived_values_follow_collections() {
        let mut business = sample_business();
        assert_eq!(business.total_income(), 0.0);
        assert_eq!(business.latest_income_year(), None);

        business.apply_income_record(2019, 30000.0);
        business.apply_income_record(2021, 50000.0);

        assert_eq!(business.total_income(), 80000.0);
        assert_eq!(business.latest_income_year(), Some(2021));
        assert_eq!(business.business_age(), current_year() - 2019);
    }

    #[test]
    fn status_round_trips_through_text() {
        for status in BusinessStatus::ALL {
            let parsed = BusinessStatus::try_from(status.as_str().to_string()).unwrap();
            assert_eq!(parsed, status);
        }
        assert!(BusinessStatus::try_from("Dormant".to_string()).is_err());
    }

    #[test]
    fn funder_wire_format_uses_camel_case() {
        let funder = Funder {
            name: "Green Initiative Fund".to_string(),
            method: FundingMethod::Grant,
            amount: None,
            date_received: Utc::now(),
        };
        let value = serde_json::to_value(&funder).unwrap();
        assert!(value.get("dateReceived").is_some());
        assert_eq!(value["method"], "Grant");
    }

    #[test]
    fn api_document_includes_derived_fields() {
        let mut business = sample_business();
        business.apply_income_record(2019, 30000.0);

        let doc = business.to_api_json();
        assert_eq!(doc["totalIncome"], 30000.0);
        assert_eq!(doc["latestIncomeYear"], 2019);
        assert_eq!(doc["location"]["city"], "Nairobi");
        assert!(doc.get("password").is_none());
    }
}
