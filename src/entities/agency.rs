// 🏦 Agency Entity - one row of the agencies sheet
//
// `code` is the natural key clients point at. Codes are not guaranteed unique;
// lookups take the first match.

use crate::coerce::parse_code;
use crate::entities::client::generate_id;
use crate::fields::{Field, Row};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: String,
    /// Branch code, 0 when unreadable
    pub code: i64,
    pub name: String,
    pub address: String,
}

impl Agency {
    /// Build an agency from a typed row. Never rejects a row.
    pub fn from_row(row: &Row) -> Self {
        Agency {
            id: row.optional(Field::Id).unwrap_or_else(generate_id),
            code: parse_code(row.get(Field::Code)),
            name: row.get(Field::Name).to_string(),
            address: row.get(Field::Address).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agency_from_row() {
        let row = Row::from_pairs([
            (Field::Code, "0042"),
            (Field::Name, "Centro"),
            (Field::Address, "Av. Paulista, 1000"),
        ]);
        let agency = Agency::from_row(&row);

        assert!(!agency.id.is_empty());
        assert_eq!(agency.code, 42);
        assert_eq!(agency.name, "Centro");
        assert_eq!(agency.address, "Av. Paulista, 1000");
    }

    #[test]
    fn test_agency_defaults() {
        let agency = Agency::from_row(&Row::default());

        assert_eq!(agency.code, 0);
        assert_eq!(agency.name, "");
        assert_eq!(agency.address, "");
    }
}
