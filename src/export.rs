// 📤 Export - client snapshot → CSV in the sheet's own column vocabulary
//
// Headers use the primary alias of each field, so an exported file can be fed
// back through ingestion. Numbers use `.` decimals, dates `dd/mm/yyyy`.

use crate::coerce::MaritalStatus;
use crate::entities::Client;
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Debug, Serialize)]
struct ClientRecord<'a> {
    id: &'a str,
    nome: &'a str,
    nomesocial: &'a str,
    cpfcnpj: &'a str,
    rg: &'a str,
    email: &'a str,
    endereco: &'a str,
    datanascimento: String,
    rendaanual: f64,
    patrimonio: f64,
    estadocivil: &'static str,
    codigoagencia: i64,
}

impl<'a> From<&'a Client> for ClientRecord<'a> {
    fn from(client: &'a Client) -> Self {
        ClientRecord {
            id: &client.id,
            nome: &client.name,
            nomesocial: client.social_name.as_deref().unwrap_or(""),
            cpfcnpj: &client.tax_id,
            rg: client.national_id.as_deref().unwrap_or(""),
            email: &client.email,
            endereco: &client.address,
            datanascimento: client
                .birth_date
                .map(|d| d.format("%d/%m/%Y").to_string())
                .unwrap_or_default(),
            rendaanual: client.annual_income,
            patrimonio: client.net_worth,
            estadocivil: sheet_label(client.marital_status),
            codigoagencia: client.agency_code,
        }
    }
}

/// Label the sheet uses, recognized again by `MaritalStatus::from_raw`.
fn sheet_label(status: MaritalStatus) -> &'static str {
    match status {
        MaritalStatus::Single => "Solteiro",
        MaritalStatus::Married => "Casado",
        MaritalStatus::Widowed => "Viúvo",
        MaritalStatus::Divorced => "Divorciado",
    }
}

/// Write `clients` as CSV (header row included) to any writer.
pub fn write_clients<W: io::Write>(writer: W, clients: &[Client]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for client in clients {
        wtr.serialize(ClientRecord::from(client))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `clients` to a file at `path`, replacing it.
pub fn export_clients(path: &Path, clients: &[Client]) -> csv::Result<usize> {
    let file = std::fs::File::create(path)?;
    write_clients(file, clients)?;
    Ok(clients.len())
}
