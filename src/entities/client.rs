// 👤 Client Entity - one row of the clients sheet
//
// Identity: `id` from the sheet, or a generated UUID when the column is empty.
// Relationships: `tax_id` → Account.client_tax_id, `agency_code` → Agency.code
//
// The only hard rule on ingestion: no name, no client.

use crate::coerce::{parse_amount, parse_code, parse_date, MaritalStatus};
use crate::fields::{Field, Row};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    /// Sheet id, or a generated UUID
    pub id: String,

    /// Always non-empty
    pub name: String,

    pub social_name: Option<String>,

    /// CPF/CNPJ as typed in the sheet, punctuation included
    pub tax_id: String,

    /// RG
    pub national_id: Option<String>,

    // ========================================================================
    // CONTACT
    // ========================================================================
    pub email: String,
    pub address: String,

    // ========================================================================
    // PROFILE
    // ========================================================================
    /// `None` when the sheet value could not be read as a date
    pub birth_date: Option<NaiveDate>,

    pub annual_income: f64,
    pub net_worth: f64,
    pub marital_status: MaritalStatus,

    /// Agency code (foreign key to Agency.code), 0 when unknown
    pub agency_code: i64,
}

impl Client {
    /// Build a client from a typed row.
    ///
    /// Returns `None` only when the name is empty or blank. Every other field
    /// degrades to its default.
    pub fn from_row(row: &Row) -> Option<Self> {
        let name = row.get(Field::Name).trim();
        if name.is_empty() {
            return None;
        }

        let raw_birth_date = row.get(Field::BirthDate);
        let birth_date = parse_date(raw_birth_date);
        if birth_date.is_none() && !raw_birth_date.is_empty() {
            tracing::debug!(client = %name, value = %raw_birth_date, "unreadable birth date");
        }

        Some(Client {
            id: row.optional(Field::Id).unwrap_or_else(generate_id),
            name: name.to_string(),
            social_name: row.optional(Field::SocialName),
            tax_id: row.get(Field::TaxId).to_string(),
            national_id: row.optional(Field::NationalId),
            email: row.get(Field::Email).to_string(),
            address: row.get(Field::Address).to_string(),
            birth_date,
            annual_income: parse_amount(row.get(Field::AnnualIncome)),
            net_worth: parse_amount(row.get(Field::NetWorth)),
            marital_status: MaritalStatus::from_raw(row.get(Field::MaritalStatus)),
            agency_code: parse_code(row.get(Field::AgencyCode)),
        })
    }

    /// Tax ID with punctuation removed: "123.456.789-00" → "12345678900"
    pub fn tax_id_digits(&self) -> String {
        digits_only(&self.tax_id)
    }

    /// Birth date, or `fallback` when unknown.
    ///
    /// This is lossy: a client whose date was unreadable becomes
    /// indistinguishable from one really born on `fallback`. Prefer rendering
    /// `birth_date == None` as "unknown".
    pub fn birth_date_or(&self, fallback: NaiveDate) -> NaiveDate {
        self.birth_date.unwrap_or(fallback)
    }

    /// Name to show: social name when present
    pub fn display_name(&self) -> &str {
        self.social_name.as_deref().unwrap_or(&self.name)
    }
}

pub(crate) fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub(crate) fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

// ============================================================================
// TESTS
// ============================================================================
