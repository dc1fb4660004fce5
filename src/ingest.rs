// 🧱 Ingestion - sheet lines → entity collections
//
// One pass per sheet: tokenize, resolve headers, build entities. Row-level
// problems never abort a pass.

use crate::entities::{Account, Agency, Client};
use crate::feed::{fetch_lines, split_lines, Sheet, SheetSource};
use crate::error::FeedError;
use crate::fields::SheetTable;

/// Build clients from sheet lines (header first). Nameless rows are dropped.
pub fn clients_from_lines(lines: &[String]) -> Vec<Client> {
    let table = SheetTable::from_lines(lines);
    let clients: Vec<Client> = table.rows.iter().filter_map(Client::from_row).collect();

    let dropped = table.len() - clients.len();
    if dropped > 0 {
        tracing::info!(dropped, kept = clients.len(), "skipped client rows without a name");
    }

    clients
}

pub fn accounts_from_lines(lines: &[String]) -> Vec<Account> {
    SheetTable::from_lines(lines).rows.iter().map(Account::from_row).collect()
}

pub fn agencies_from_lines(lines: &[String]) -> Vec<Agency> {
    SheetTable::from_lines(lines).rows.iter().map(Agency::from_row).collect()
}

/// Parse raw CSV text (any line endings) straight into clients.
pub fn clients_from_csv(text: &str) -> Vec<Client> {
    clients_from_lines(&split_lines(text))
}

pub fn accounts_from_csv(text: &str) -> Vec<Account> {
    accounts_from_lines(&split_lines(text))
}

pub fn agencies_from_csv(text: &str) -> Vec<Agency> {
    agencies_from_lines(&split_lines(text))
}

// ============================================================================
// FULL PASSES (fetch + build)
// ============================================================================

pub async fn ingest_clients(source: &dyn SheetSource) -> Result<Vec<Client>, FeedError> {
    Ok(clients_from_lines(&fetch_lines(source, Sheet::Clients).await?))
}

pub async fn ingest_accounts(source: &dyn SheetSource) -> Result<Vec<Account>, FeedError> {
    Ok(accounts_from_lines(&fetch_lines(source, Sheet::Accounts).await?))
}

pub async fn ingest_agencies(source: &dyn SheetSource) -> Result<Vec<Agency>, FeedError> {
    Ok(agencies_from_lines(&fetch_lines(source, Sheet::Agencies).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::{AccountType, MaritalStatus};
    use crate::feed::tests::StaticSource;

    #[test]
    fn test_minimal_two_line_csv() {
        let clients = clients_from_csv("nome,cpfcnpj\nAna,111");
        assert_eq!(clients.len(), 1);

        let ana = &clients[0];
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.tax_id, "111");
        assert!(!ana.id.is_empty());
        assert_eq!(ana.social_name, None);
        assert_eq!(ana.national_id, None);
        assert_eq!(ana.email, "");
        assert_eq!(ana.address, "");
        assert_eq!(ana.birth_date, None);
        assert_eq!(ana.annual_income, 0.0);
        assert_eq!(ana.net_worth, 0.0);
        assert_eq!(ana.marital_status, MaritalStatus::Single);
        assert_eq!(ana.agency_code, 0);
    }

    #[test]
    fn test_nameless_rows_never_survive() {
        let csv = "id,nome,cpf\n1,Ana,111\n2,,222\n3,   ,333\n4,\"\",444\n5,Bia,555";
        let clients = clients_from_csv(csv);

        let names: Vec<&str> = clients.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "Bia"]);
        assert!(clients.iter().all(|c| !c.name.trim().is_empty()));
    }

    #[test]
    fn test_realistic_clients_sheet() {
        let csv = "\
\"id\",\"nome\",\"cpfCnpj\",\"rg\",\"dataNascimento\",\"nomeSocial\",\"email\",\"endereco\",\"rendaAnual\",\"patrimonio\",\"estadoCivil\",\"codigoAgencia\"\r\n\
\"c1\",\"Maria Silva\",\"123.456.789-00\",\"\",\"1985-03-07\",\"\",\"maria@example.com\",\"Rua das Flores, 12\",\"120000,00\",\"350000\",\"Casado\",\"1\"\r\n\
\"c2\",\"João Pereira\",\"987.654.321-00\",\"MG-1234\",\"07/11/1972\",\"Jota\",\"joao@example.com\",\"\",\"95000\",\"\",\"Divorciado\",\"2\"\r\n";

        let clients = clients_from_csv(csv);
        assert_eq!(clients.len(), 2);

        assert_eq!(clients[0].id, "c1");
        assert_eq!(clients[0].address, "Rua das Flores, 12");
        assert_eq!(clients[0].annual_income, 120000.0);
        assert_eq!(clients[0].marital_status, MaritalStatus::Married);
        assert_eq!(clients[0].agency_code, 1);

        assert_eq!(clients[1].national_id.as_deref(), Some("MG-1234"));
        assert_eq!(clients[1].social_name.as_deref(), Some("Jota"));
        assert_eq!(clients[1].marital_status, MaritalStatus::Divorced);
        assert_eq!(clients[1].net_worth, 0.0);
    }

    #[test]
    fn test_accounts_sheet() {
        let csv = "id,cpfCnpjCliente,tipo,saldo,limiteCredito,creditoDisponivel\n\
                   a1,123.456.789-00,corrente,\"1500,75\",2000,1800\n\
                   a2,123.456.789-00,poupança,-20,0,0\n";
        let accounts = accounts_from_csv(csv);

        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].balance, 1500.75);
        assert_eq!(accounts[0].account_type, AccountType::Checking);
        assert_eq!(accounts[1].account_type, AccountType::Savings);
        assert_eq!(accounts[1].balance, -20.0);
    }

    #[test]
    fn test_agencies_sheet_with_spaced_headers() {
        let csv = "id,Código,Nome,Endereço\nag1,1,Agência Centro,\"Praça da Sé, 1\"\n";
        let agencies = agencies_from_csv(csv);

        assert_eq!(agencies.len(), 1);
        assert_eq!(agencies[0].code, 1);
        assert_eq!(agencies[0].name, "Agência Centro");
        assert_eq!(agencies[0].address, "Praça da Sé, 1");
    }

    #[test]
    fn test_header_only_sheet_yields_nothing() {
        assert!(clients_from_csv("nome,cpf").is_empty());
        assert!(accounts_from_csv("").is_empty());
    }

    #[tokio::test]
    async fn test_ingest_clients_through_source() {
        let source = StaticSource::default().with(Sheet::Clients, "nome,cpf\nAna,1\nBia,2\n");
        let clients = ingest_clients(&source).await.unwrap();
        assert_eq!(clients.len(), 2);
    }

    #[tokio::test]
    async fn test_ingest_failure_propagates() {
        let source = StaticSource::default();
        assert!(ingest_agencies(&source).await.is_err());
    }
}
