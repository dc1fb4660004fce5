// Bank Directory - CLI
// Fetches the spreadsheet on every run and prints what was asked for.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use bank_directory::{
    export_clients, init_tracing, search, Account, Client, Config, MaritalStatus, Repository,
    SearchQuery, Sheet, SheetStatus,
};

#[derive(Parser, Debug)]
#[command(name = "bank-directory", version = bank_directory::VERSION, about = "Browse the bank clients spreadsheet")]
struct Cli {
    /// TOML config file (defaults to ./directory.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search and page through clients
    Clients {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        agency: Option<i64>,
        /// single, married, widowed or divorced
        #[arg(long, value_parser = parse_status)]
        status: Option<MaritalStatus>,
        #[arg(long, default_value_t = 1)]
        page: usize,
        #[arg(long = "page-size")]
        page_size: Option<usize>,
    },
    /// Accounts owned by a CPF/CNPJ (exact match)
    Accounts { tax_id: String },
    /// One agency by code
    Agency { code: i64 },
    /// Every agency
    Agencies,
    /// Write the client list to a CSV file
    Export { path: PathBuf },
    /// Load all sheets and report counts
    Summary,
}

fn parse_status(raw: &str) -> std::result::Result<MaritalStatus, String> {
    MaritalStatus::from_name(raw)
        .ok_or_else(|| format!("unknown marital status '{}' (single, married, widowed, divorced)", raw))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    init_tracing(&config.log_level);

    let repo = Repository::new(Arc::new(config.sheet_source()));

    match cli.command {
        Commands::Clients {
            search: term,
            agency,
            status,
            page,
            page_size,
        } => {
            let mut query = SearchQuery::new(term).with_page(page, page_size.unwrap_or(config.page_size));
            query.agency_code = agency;
            query.marital_status = status;
            run_clients(&repo, &query).await
        }
        Commands::Accounts { tax_id } => run_accounts(&repo, &tax_id).await,
        Commands::Agency { code } => run_agency(&repo, code).await,
        Commands::Agencies => run_agencies(&repo).await,
        Commands::Export { path } => run_export(&repo, &path).await,
        Commands::Summary => run_summary(&repo).await,
    }
}

// ============================================================================
// Commands
// ============================================================================

async fn run_clients(repo: &Repository, query: &SearchQuery) -> Result<()> {
    let clients = repo.load_clients().await.context("fetching clients sheet")?;
    let page = search(&clients, query);

    println!("👥 Clients");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    if page.items.is_empty() {
        println!("No clients found.");
    }
    for client in &page.items {
        print_client(client);
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "Page {} of {} ({} matching)",
        page.page, page.total_pages, page.total
    );
    Ok(())
}

async fn run_accounts(repo: &Repository, tax_id: &str) -> Result<()> {
    let (clients, accounts) = tokio::join!(repo.load_clients(), repo.load_accounts());
    accounts.context("fetching accounts sheet")?;
    if let Err(e) = clients {
        tracing::warn!(error = %e, "clients sheet unavailable, owner name omitted");
    }

    let owner = repo.clients_by_tax_id(tax_id).into_iter().next();
    match &owner {
        Some(client) => println!("💳 Accounts of {} ({})", client.display_name(), tax_id),
        None => println!("💳 Accounts of {}", tax_id),
    }
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let accounts = repo.accounts_for_client(tax_id);
    if accounts.is_empty() {
        println!("No accounts found.");
        return Ok(());
    }
    for account in &accounts {
        print_account(account);
    }

    let total: f64 = accounts.iter().map(|a| a.balance).sum();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("Total balance: {:.2}", total);
    Ok(())
}

async fn run_agency(repo: &Repository, code: i64) -> Result<()> {
    repo.load_agencies().await.context("fetching agencies sheet")?;

    match repo.agency_by_code(code) {
        Some(agency) => {
            println!("🏦 Agency {}", agency.code);
            println!("   Name:    {}", agency.name);
            println!("   Address: {}", agency.address);
        }
        None => println!("No agency with code {}.", code),
    }
    Ok(())
}

async fn run_agencies(repo: &Repository) -> Result<()> {
    let agencies = repo.load_agencies().await.context("fetching agencies sheet")?;

    println!("🏦 Agencies ({})", agencies.len());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for agency in agencies.iter() {
        println!("{:>6}  {:<30} {}", agency.code, agency.name, agency.address);
    }
    Ok(())
}

async fn run_export(repo: &Repository, path: &std::path::Path) -> Result<()> {
    let clients = repo.load_clients().await.context("fetching clients sheet")?;
    let written = export_clients(path, &clients)
        .with_context(|| format!("writing {}", path.display()))?;
    println!("✓ Exported {} clients to {}", written, path.display());
    Ok(())
}

async fn run_summary(repo: &Repository) -> Result<()> {
    println!("📊 Loading all sheets...");
    let report = repo.load_all().await;

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for sheet in Sheet::ALL {
        match report.get(sheet) {
            SheetStatus::Loaded { count } => println!("✓ {:<9} {} rows", sheet, count),
            SheetStatus::Empty => println!("○ {:<9} empty", sheet),
            SheetStatus::Failed { message } => println!("✗ {:<9} {}", sheet, message),
        }
    }

    let accounts = repo.accounts();
    if !accounts.is_empty() {
        let balance: f64 = accounts.iter().map(|a| a.balance).sum();
        let overdrawn = accounts.iter().filter(|a| a.is_overdrawn()).count();
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Total balance:       {:.2}", balance);
        println!("Overdrawn accounts:  {}", overdrawn);
    }

    let codes = repo.agency_codes();
    if !codes.is_empty() {
        println!("Agencies with clients: {:?}", codes);
    }

    if !report.all_ok() {
        anyhow::bail!("one or more sheets failed to load");
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_client(client: &Client) {
    let birth = client
        .birth_date
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| "-".to_string());

    println!(
        "{:<32} {:<20} agency {:<4} {:<9} born {}",
        client.display_name(),
        client.tax_id,
        client.agency_code,
        client.marital_status.as_str(),
        birth
    );
}

fn print_account(account: &Account) {
    let flag = if account.is_overdrawn() { " ⚠️" } else { "" };
    println!(
        "{:<38} {:<9} balance {:>12.2}  limit {:>10.2}  available {:>10.2}{}",
        account.id,
        account.account_type.as_str(),
        account.balance,
        account.credit_limit,
        account.total_available(),
        flag
    );
}
