// 🗂️ Repository - current snapshot of clients, accounts, agencies
//
// Each collection sits behind its own lock as an `Arc<Vec<_>>`. Ingestion
// builds a complete new vector and swaps the `Arc`; readers clone the `Arc`
// and never see a half-built collection. A failed pass keeps the old one.
//
// Construct one Repository at startup and share it (`Arc<Repository>`).

use crate::entities::{Account, Agency, Client};
use crate::error::FeedError;
use crate::feed::{Sheet, SheetSource};
use crate::ingest::{ingest_accounts, ingest_agencies, ingest_clients};
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

// ============================================================================
// LOAD REPORT
// ============================================================================

/// Outcome of one sheet's ingestion pass.
///
/// `Empty` and `Failed` are deliberately distinct: the first is an empty
/// state, the second deserves a retry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SheetStatus {
    Loaded { count: usize },
    Empty,
    Failed { message: String },
}

impl SheetStatus {
    fn from_count(count: usize) -> Self {
        if count == 0 {
            SheetStatus::Empty
        } else {
            SheetStatus::Loaded { count }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SheetStatus::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadReport {
    pub clients: SheetStatus,
    pub accounts: SheetStatus,
    pub agencies: SheetStatus,
}

impl LoadReport {
    pub fn get(&self, sheet: Sheet) -> &SheetStatus {
        match sheet {
            Sheet::Clients => &self.clients,
            Sheet::Accounts => &self.accounts,
            Sheet::Agencies => &self.agencies,
        }
    }

    pub fn all_ok(&self) -> bool {
        Sheet::ALL.iter().all(|sheet| !self.get(*sheet).is_failed())
    }
}

// ============================================================================
// REPOSITORY
// ============================================================================

type Snapshot<T> = RwLock<Arc<Vec<T>>>;

pub struct Repository {
    source: Arc<dyn SheetSource>,
    clients: Snapshot<Client>,
    accounts: Snapshot<Account>,
    agencies: Snapshot<Agency>,
}

fn read<T>(slot: &Snapshot<T>) -> Arc<Vec<T>> {
    slot.read().unwrap_or_else(PoisonError::into_inner).clone()
}

fn replace<T>(slot: &Snapshot<T>, items: Vec<T>) -> Arc<Vec<T>> {
    let fresh = Arc::new(items);
    *slot.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&fresh);
    fresh
}

fn report<T>(sheet: Sheet, outcome: &Result<Arc<Vec<T>>, FeedError>) -> SheetStatus {
    match outcome {
        Ok(items) => SheetStatus::from_count(items.len()),
        Err(err) => {
            tracing::error!(sheet = %sheet, error = %err, "ingestion failed, keeping previous snapshot");
            SheetStatus::Failed {
                message: err.to_string(),
            }
        }
    }
}

impl Repository {
    /// Create an empty repository reading from `source`.
    pub fn new(source: Arc<dyn SheetSource>) -> Self {
        Repository {
            source,
            clients: RwLock::new(Arc::new(Vec::new())),
            accounts: RwLock::new(Arc::new(Vec::new())),
            agencies: RwLock::new(Arc::new(Vec::new())),
        }
    }

    // ------------------------------------------------------------------------
    // Ingestion
    // ------------------------------------------------------------------------

    /// Re-fetch the clients sheet and swap in the new collection.
    pub async fn load_clients(&self) -> Result<Arc<Vec<Client>>, FeedError> {
        let clients = ingest_clients(self.source.as_ref()).await?;
        tracing::info!(sheet = %Sheet::Clients, count = clients.len(), "snapshot replaced");
        Ok(replace(&self.clients, clients))
    }

    pub async fn load_accounts(&self) -> Result<Arc<Vec<Account>>, FeedError> {
        let accounts = ingest_accounts(self.source.as_ref()).await?;
        tracing::info!(sheet = %Sheet::Accounts, count = accounts.len(), "snapshot replaced");
        Ok(replace(&self.accounts, accounts))
    }

    pub async fn load_agencies(&self) -> Result<Arc<Vec<Agency>>, FeedError> {
        let agencies = ingest_agencies(self.source.as_ref()).await?;
        tracing::info!(sheet = %Sheet::Agencies, count = agencies.len(), "snapshot replaced");
        Ok(replace(&self.agencies, agencies))
    }

    /// Ingest all three sheets concurrently. One sheet failing does not
    /// stop the others; its previous snapshot is kept.
    pub async fn load_all(&self) -> LoadReport {
        let (clients, accounts, agencies) =
            tokio::join!(self.load_clients(), self.load_accounts(), self.load_agencies());

        LoadReport {
            clients: report(Sheet::Clients, &clients),
            accounts: report(Sheet::Accounts, &accounts),
            agencies: report(Sheet::Agencies, &agencies),
        }
    }

    // ------------------------------------------------------------------------
    // Listing
    // ------------------------------------------------------------------------

    pub fn clients(&self) -> Arc<Vec<Client>> {
        read(&self.clients)
    }

    pub fn accounts(&self) -> Arc<Vec<Account>> {
        read(&self.accounts)
    }

    pub fn agencies(&self) -> Arc<Vec<Agency>> {
        read(&self.agencies)
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    /// Accounts whose `client_tax_id` equals `tax_id` exactly.
    pub fn accounts_for_client(&self, tax_id: &str) -> Vec<Account> {
        self.accounts()
            .iter()
            .filter(|account| account.client_tax_id == tax_id)
            .cloned()
            .collect()
    }

    /// First agency with this code.
    pub fn agency_by_code(&self, code: i64) -> Option<Agency> {
        self.agencies().iter().find(|agency| agency.code == code).cloned()
    }

    pub fn client_by_id(&self, id: &str) -> Option<Client> {
        self.clients().iter().find(|client| client.id == id).cloned()
    }

    /// Every client registered under `tax_id` (duplicates are allowed).
    pub fn clients_by_tax_id(&self, tax_id: &str) -> Vec<Client> {
        self.clients()
            .iter()
            .filter(|client| client.tax_id == tax_id)
            .cloned()
            .collect()
    }

    /// Distinct agency codes referenced by clients, ascending.
    pub fn agency_codes(&self) -> Vec<i64> {
        self.clients()
            .iter()
            .map(|client| client.agency_code)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::tests::StaticSource;

    const CLIENTS: &str = "id,nome,cpfcnpj,codigoagencia\n\
                           c1,Ana,123.456.789-00,2\n\
                           c2,Bia,987.654.321-00,1\n\
                           c3,Ana Duplicada,123.456.789-00,2\n";
    const ACCOUNTS: &str = "id,cpfcnpjcliente,tipo,saldo\n\
                            a1,123.456.789-00,corrente,100\n\
                            a2,12345678900,poupança,50\n\
                            a3,123.456.789-00,poupança,10\n";
    const AGENCIES: &str = "id,codigo,nome\nag1,1,Centro\nag2,2,Norte\nag3,2,Norte Antiga\n";

    fn full_source() -> Arc<StaticSource> {
        Arc::new(
            StaticSource::default()
                .with(Sheet::Clients, CLIENTS)
                .with(Sheet::Accounts, ACCOUNTS)
                .with(Sheet::Agencies, AGENCIES),
        )
    }

    async fn loaded() -> Repository {
        let repo = Repository::new(full_source());
        let report = repo.load_all().await;
        assert!(report.all_ok());
        repo
    }

    #[tokio::test]
    async fn test_new_repository_is_empty() {
        let repo = Repository::new(full_source());
        assert!(repo.clients().is_empty());
        assert!(repo.accounts().is_empty());
        assert!(repo.agencies().is_empty());
    }

    #[tokio::test]
    async fn test_load_all_report() {
        let repo = Repository::new(full_source());
        let report = repo.load_all().await;

        assert_eq!(report.clients, SheetStatus::Loaded { count: 3 });
        assert_eq!(report.accounts, SheetStatus::Loaded { count: 3 });
        assert_eq!(report.agencies, SheetStatus::Loaded { count: 3 });
    }

    #[tokio::test]
    async fn test_accounts_for_client_exact_match() {
        let repo = loaded().await;

        let ids: Vec<String> = repo
            .accounts_for_client("123.456.789-00")
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a1", "a3"]);

        // No punctuation normalization at join time
        let ids: Vec<String> = repo
            .accounts_for_client("12345678900")
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec!["a2"]);

        assert!(repo.accounts_for_client("000").is_empty());
    }

    #[tokio::test]
    async fn test_agency_by_code_first_match() {
        let repo = loaded().await;

        assert_eq!(repo.agency_by_code(2).unwrap().name, "Norte");
        assert_eq!(repo.agency_by_code(1).unwrap().id, "ag1");
        assert!(repo.agency_by_code(99).is_none());
    }

    #[tokio::test]
    async fn test_equality_lookups() {
        let repo = loaded().await;

        assert_eq!(repo.client_by_id("c2").unwrap().name, "Bia");
        assert!(repo.client_by_id("missing").is_none());
        assert_eq!(repo.clients_by_tax_id("123.456.789-00").len(), 2);
    }

    #[tokio::test]
    async fn test_agency_codes_sorted_distinct() {
        let repo = loaded().await;
        assert_eq!(repo.agency_codes(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_snapshot() {
        let source = full_source();
        let repo = Repository::new(source.clone());
        repo.load_all().await;

        source.remove(Sheet::Clients);
        let report = repo.load_all().await;

        assert!(report.clients.is_failed());
        assert!(!report.all_ok());
        assert_eq!(repo.clients().len(), 3);
        assert!(repo.load_clients().await.is_err());
    }

    #[tokio::test]
    async fn test_empty_sheet_replaces_with_empty() {
        let source = full_source();
        let repo = Repository::new(source.clone());
        repo.load_all().await;

        source.set(Sheet::Accounts, "id,cpfcnpjcliente\n");
        let report = repo.load_all().await;

        assert_eq!(report.accounts, SheetStatus::Empty);
        assert!(report.all_ok());
        assert!(repo.accounts().is_empty());
    }

    #[tokio::test]
    async fn test_reload_swaps_whole_collection() {
        let source = full_source();
        let repo = Repository::new(source.clone());
        repo.load_all().await;

        let before = repo.clients();
        source.set(Sheet::Clients, "nome\nZé\n");
        repo.load_clients().await.unwrap();

        // Readers holding the old snapshot keep it intact
        assert_eq!(before.len(), 3);
        assert_eq!(repo.clients().len(), 1);
        assert_eq!(repo.clients()[0].name, "Zé");
    }
}
