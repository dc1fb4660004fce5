// Bank Directory - Core Library
// Exposes all modules for use in CLI, API server, and tests

pub mod coerce;     // Cell → typed value (dates, numbers, enums)
pub mod config;
pub mod csv_line;   // Quote-aware line tokenizer
pub mod entities;   // Client, Account, Agency
pub mod error;
pub mod export;
pub mod feed;       // Spreadsheet transport
pub mod fields;     // Header aliases and typed rows
pub mod ingest;
pub mod query;
pub mod repository;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use coerce::{
    parse_amount, parse_code, parse_date, parse_number,
    AccountType, MaritalStatus,
};
pub use config::{init_tracing, Config};
pub use csv_line::split_line;
pub use entities::{Account, Agency, Client};
pub use error::{ConfigError, FeedError};
pub use export::{export_clients, write_clients};
pub use feed::{fetch_lines, HttpSheetSource, Sheet, SheetSource, TabNames};
pub use fields::{Field, HeaderLayout, Row, SheetTable};
pub use ingest::{
    accounts_from_csv, agencies_from_csv, clients_from_csv,
    ingest_accounts, ingest_agencies, ingest_clients,
};
pub use query::{paginate, search, Page, SearchQuery, DEFAULT_PAGE_SIZE};
pub use repository::{LoadReport, Repository, SheetStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
