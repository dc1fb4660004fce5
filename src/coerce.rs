// 🔢 Type coercers - untyped spreadsheet text → typed values
//
// Every coercer is total: bad input degrades to a documented default instead
// of failing the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ============================================================================
// DATES
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum DateOrder {
    DayMonthYear,
    YearMonthDay,
}

static DATE_PATTERNS: Lazy<Vec<(Regex, DateOrder)>> = Lazy::new(|| {
    [
        (r"^(\d{1,2})/(\d{1,2})/(\d{4})$", DateOrder::DayMonthYear),
        (r"^(\d{4})-(\d{1,2})-(\d{1,2})$", DateOrder::YearMonthDay),
        (r"^(\d{1,2})-(\d{1,2})-(\d{4})$", DateOrder::DayMonthYear),
    ]
    .into_iter()
    .filter_map(|(pattern, order)| Regex::new(pattern).ok().map(|re| (re, order)))
    .collect()
});

/// Layouts tried when no positional pattern matches.
const FALLBACK_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];
const FALLBACK_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%d.%m.%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

/// Parse a date cell.
///
/// Tries `dd/mm/yyyy`, `yyyy-mm-dd` and `dd-mm-yyyy` in that order. The first
/// pattern that matches structurally decides the result; an impossible
/// calendar date (e.g. `31/02/1990`) is `None`. Otherwise a handful of
/// unambiguous layouts (RFC 3339, RFC 2822, ISO datetimes) are attempted.
///
/// Returns `None` when nothing parses. Callers decide what "unknown" means;
/// see `Client::birth_date_or` for the ingestion-time fallback.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return None;
    }

    for (pattern, order) in DATE_PATTERNS.iter() {
        if let Some(caps) = pattern.captures(cleaned) {
            let group = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
            let (year, month, day) = match order {
                DateOrder::DayMonthYear => (group(3)?, group(2)?, group(1)?),
                DateOrder::YearMonthDay => (group(1)?, group(2)?, group(3)?),
            };
            return NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day);
        }
    }

    parse_date_generic(cleaned)
}

fn parse_date_generic(cleaned: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(cleaned) {
        return Some(dt.date_naive());
    }

    FALLBACK_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            FALLBACK_DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
        })
}

// ============================================================================
// NUMBERS
// ============================================================================

/// Parse a locale-formatted number ("R$ 1234,56", "-50", "3.5%").
///
/// Keeps only digits, `,`, `.` and `-`, turns the first comma into a decimal
/// point and reads the longest numeric prefix. Commas are always decimal
/// separators, so `"1,234"` reads as `1.234` and `"1.234,56"` as `1.234`.
/// Empty or unparseable input yields `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    leading_float(&cleaned.replacen(',', ".", 1)).unwrap_or(0.0)
}

/// Like `parse_number`, but negative results also degrade to `0.0`.
/// Used for income, net worth, and credit fields.
pub fn parse_amount(raw: &str) -> f64 {
    let value = parse_number(raw);
    if value < 0.0 {
        0.0
    } else {
        value
    }
}

/// Integer code (agency numbers). Fractions are truncated.
pub fn parse_code(raw: &str) -> i64 {
    parse_number(raw).trunc() as i64
}

/// Longest prefix of the form `-?digits[.digits]` with at least one digit.
fn leading_float(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if bytes.first() == Some(&b'-') {
        end += 1;
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if frac_end > frac_start || digits > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    s.get(..end)?.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ============================================================================
// ENUMS
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaritalStatus {
    #[default]
    Single,
    Married,
    Widowed,
    Divorced,
}

impl MaritalStatus {
    /// Case-insensitive substring match; anything unrecognized is `Single`.
    pub fn from_raw(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();

        if lower.contains("casado") {
            MaritalStatus::Married
        } else if lower.contains("viuv") || lower.contains("viúv") {
            MaritalStatus::Widowed
        } else if lower.contains("divorciad") {
            MaritalStatus::Divorced
        } else {
            MaritalStatus::Single
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MaritalStatus::Single => "Single",
            MaritalStatus::Married => "Married",
            MaritalStatus::Widowed => "Widowed",
            MaritalStatus::Divorced => "Divorced",
        }
    }

    /// Parse the English name used by the CLI and API (`"married"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "single" => Some(MaritalStatus::Single),
            "married" => Some(MaritalStatus::Married),
            "widowed" => Some(MaritalStatus::Widowed),
            "divorced" => Some(MaritalStatus::Divorced),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
}

impl AccountType {
    /// `poupan...` means savings; everything else is checking.
    pub fn from_raw(raw: &str) -> Self {
        if raw.to_lowercase().contains("poupan") {
            AccountType::Savings
        } else {
            AccountType::Checking
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
