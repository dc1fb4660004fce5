// 💳 Account Entity - one row of the accounts sheet
//
// Relationship: `client_tax_id` → Client.tax_id (exact string match, no
// punctuation normalization at join time).

use crate::coerce::{parse_amount, parse_number, AccountType};
use crate::entities::client::generate_id;
use crate::fields::{Field, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Sheet id, or a generated UUID
    pub id: String,

    /// Owner's CPF/CNPJ exactly as typed in the accounts sheet
    pub client_tax_id: String,

    pub account_type: AccountType,

    /// May be negative (overdraft)
    pub balance: f64,

    pub credit_limit: f64,
    pub available_credit: f64,
}

impl Account {
    /// Build an account from a typed row. Never rejects a row.
    pub fn from_row(row: &Row) -> Self {
        Account {
            id: row.optional(Field::Id).unwrap_or_else(generate_id),
            client_tax_id: row.get(Field::ClientTaxId).to_string(),
            account_type: AccountType::from_raw(row.get(Field::AccountType)),
            balance: parse_number(row.get(Field::Balance)),
            credit_limit: parse_amount(row.get(Field::CreditLimit)),
            available_credit: parse_amount(row.get(Field::AvailableCredit)),
        }
    }

    /// Check if account is overdrawn (negative balance)
    pub fn is_overdrawn(&self) -> bool {
        self.balance < 0.0
    }

    /// Money the client can move right now: balance plus unused credit
    pub fn total_available(&self) -> f64 {
        self.balance + self.available_credit
    }

    /// Credit already drawn against the limit
    pub fn credit_in_use(&self) -> f64 {
        (self.credit_limit - self.available_credit).max(0.0)
    }
}
