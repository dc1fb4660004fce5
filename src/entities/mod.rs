// Entity Models
//
// Each entity is an immutable snapshot built once per ingestion pass:
// - `from_row` maps a typed sheet row to the entity
// - missing or malformed cells degrade to field defaults
// - a re-fetch builds new values; nothing is updated in place

pub mod account;
pub mod agency;
pub mod client;

pub use account::Account;
pub use agency::Agency;
pub use client::Client;
