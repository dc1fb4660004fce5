// 🏷️ Field normalizer - header aliases → closed set of logical fields
//
// Spreadsheet revisions rename columns ("CPF/CNPJ", "cpfcnpj", "CPF"...).
// Headers are normalized to a key, then each logical field resolves through a
// priority list of accepted keys. Rows are keyed by `Field`, never by raw text.

use crate::csv_line::split_line;
use std::collections::HashMap;

// ============================================================================
// NORMALIZATION
// ============================================================================

fn strip_quotes(value: &str) -> &str {
    value.trim().trim_matches(|c| c == '"' || c == '\'').trim()
}

/// Normalization key for a header cell: trimmed, quote-stripped, lower-case.
///
/// Unicode-aware, so `"Código Agência"` becomes `"código agência"`.
pub fn header_key(header: &str) -> String {
    strip_quotes(header).to_lowercase()
}

/// Normalized data cell. A column missing from a short row reads as empty.
pub fn cell_value(cell: Option<&str>) -> String {
    cell.map(strip_quotes).unwrap_or_default().to_string()
}

// ============================================================================
// LOGICAL FIELDS
// ============================================================================

/// Every column the entity builders know how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    Name,
    SocialName,
    TaxId,
    NationalId,
    Email,
    Address,
    BirthDate,
    AnnualIncome,
    NetWorth,
    MaritalStatus,
    AgencyCode,
    ClientTaxId,
    AccountType,
    Balance,
    CreditLimit,
    AvailableCredit,
    Code,
}

impl Field {
    pub const ALL: [Field; 18] = [
        Field::Id,
        Field::Name,
        Field::SocialName,
        Field::TaxId,
        Field::NationalId,
        Field::Email,
        Field::Address,
        Field::BirthDate,
        Field::AnnualIncome,
        Field::NetWorth,
        Field::MaritalStatus,
        Field::AgencyCode,
        Field::ClientTaxId,
        Field::AccountType,
        Field::Balance,
        Field::CreditLimit,
        Field::AvailableCredit,
        Field::Code,
    ];

    /// Accepted header keys, highest priority first.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Field::Id => &["id"],
            Field::Name => &["nome"],
            Field::SocialName => &["nomesocial", "nome social", "nome_social"],
            Field::TaxId => &["cpfcnpj", "cpf/cnpj", "cpf", "cnpj"],
            Field::NationalId => &["rg"],
            Field::Email => &["email"],
            Field::Address => &["endereco", "endereço"],
            Field::BirthDate => &["datanascimento", "data nascimento", "data_nascimento"],
            Field::AnnualIncome => &["rendaanual", "renda anual", "renda_anual"],
            Field::NetWorth => &["patrimonio", "patrimônio"],
            Field::MaritalStatus => &["estadocivil", "estado civil", "estado_civil"],
            Field::AgencyCode => &["codigoagencia", "código agência", "agencia", "codigo_agencia"],
            Field::ClientTaxId => &["cpfcnpjcliente", "cpf/cnpj cliente"],
            Field::AccountType => &["tipo"],
            Field::Balance => &["saldo"],
            Field::CreditLimit => &["limitecredito", "limite crédito"],
            Field::AvailableCredit => &["creditodisponivel", "crédito disponível"],
            Field::Code => &["codigo", "código"],
        }
    }
}

// ============================================================================
// HEADER LAYOUT + ROWS
// ============================================================================

/// Column indices per field, ordered by alias priority.
#[derive(Debug, Clone, Default)]
pub struct HeaderLayout {
    columns: HashMap<Field, Vec<usize>>,
}

impl HeaderLayout {
    pub fn from_headers(headers: &[String]) -> Self {
        let keys: Vec<String> = headers.iter().map(|h| header_key(h)).collect();

        let columns = Field::ALL
            .iter()
            .filter_map(|field| {
                let indices: Vec<usize> = field
                    .aliases()
                    .iter()
                    .flat_map(|alias| {
                        keys.iter()
                            .enumerate()
                            .filter(move |(_, key)| key.as_str() == *alias)
                            .map(|(idx, _)| idx)
                    })
                    .collect();

                (!indices.is_empty()).then_some((*field, indices))
            })
            .collect();

        HeaderLayout { columns }
    }

    /// Whether any alias of `field` appears in the header row.
    pub fn has(&self, field: Field) -> bool {
        self.columns.contains_key(&field)
    }

    /// Resolve one data line into a typed row. The first alias with a
    /// non-empty cell wins.
    pub fn row(&self, cells: &[String]) -> Row {
        let values = self
            .columns
            .iter()
            .filter_map(|(field, indices)| {
                indices
                    .iter()
                    .map(|&idx| cell_value(cells.get(idx).map(String::as_str)))
                    .find(|value| !value.is_empty())
                    .map(|value| (*field, value))
            })
            .collect();

        Row { values }
    }
}

/// One data row keyed by logical field. Absent fields read as `""`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: HashMap<Field, String>,
}

impl Row {
    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// `None` when the field is absent or empty.
    pub fn optional(&self, field: Field) -> Option<String> {
        self.values.get(&field).cloned()
    }

    /// Build a row directly, mainly for tests and hand-made fixtures.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let values = pairs
            .into_iter()
            .map(|(field, value)| (field, value.into()))
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();

        Row { values }
    }
}

/// A sheet split into header layout and typed rows.
#[derive(Debug, Clone, Default)]
pub struct SheetTable {
    pub layout: HeaderLayout,
    pub rows: Vec<Row>,
}

impl SheetTable {
    /// Build from non-blank lines: the first is the header row.
    pub fn from_lines(lines: &[String]) -> Self {
        let Some((header, data)) = lines.split_first() else {
            return SheetTable::default();
        };

        let layout = HeaderLayout::from_headers(&split_line(header));
        let rows = data
            .iter()
            .map(|line| layout.row(&split_line(line)))
            .collect();

        SheetTable { layout, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ============================================================================
// TESTS
// ============================================================================
