// 🔎 Query engine - filter clients, then cut a page
//
// Filtering is a linear scan over the snapshot. Pagination never clamps: a
// page past the end is an empty page, not an error.

use crate::coerce::MaritalStatus;
use crate::entities::client::digits_only;
use crate::entities::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free text over name, social name and tax ID. Empty matches everything.
    pub term: String,
    pub agency_code: Option<i64>,
    pub marital_status: Option<MaritalStatus>,
    /// 1-based
    pub page: usize,
    pub page_size: usize,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            term: String::new(),
            agency_code: None,
            marital_status: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        SearchQuery {
            term: term.into(),
            ..Default::default()
        }
    }

    pub fn with_agency(mut self, code: i64) -> Self {
        self.agency_code = Some(code);
        self
    }

    pub fn with_marital_status(mut self, status: MaritalStatus) -> Self {
        self.marital_status = Some(status);
        self
    }

    pub fn with_page(mut self, page: usize, page_size: usize) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub total_pages: usize,
    pub page: usize,
}

// ============================================================================
// MATCHING
// ============================================================================

/// Pre-lowered search term and its digits-only form.
struct Term {
    lower: String,
    digits: String,
}

impl Term {
    fn parse(raw: &str) -> Option<Self> {
        let lower = raw.trim().to_lowercase();
        if lower.is_empty() {
            return None;
        }
        let digits = digits_only(&lower);
        Some(Term { lower, digits })
    }

    fn matches(&self, client: &Client) -> bool {
        if client.name.to_lowercase().contains(&self.lower) {
            return true;
        }

        if let Some(social) = &client.social_name {
            if social.to_lowercase().contains(&self.lower) {
                return true;
            }
        }

        if client.tax_id.is_empty() {
            return false;
        }

        // Formatted or bare: "123.456" and "123456" both hit "123.456.789-00"
        client.tax_id.to_lowercase().contains(&self.lower)
            || (!self.digits.is_empty() && client.tax_id_digits().contains(&self.digits))
    }
}

/// Every filter of a query, with the term prepared once.
struct Filter<'q> {
    query: &'q SearchQuery,
    term: Option<Term>,
}

impl<'q> Filter<'q> {
    fn new(query: &'q SearchQuery) -> Self {
        Filter {
            query,
            term: Term::parse(&query.term),
        }
    }

    fn accepts(&self, client: &Client) -> bool {
        if self.query.agency_code.is_some_and(|code| client.agency_code != code) {
            return false;
        }
        if self.query.marital_status.is_some_and(|status| client.marital_status != status) {
            return false;
        }
        self.term.as_ref().map_or(true, |term| term.matches(client))
    }
}

/// Whether `client` passes every filter in `query` (pagination aside).
pub fn matches(client: &Client, query: &SearchQuery) -> bool {
    Filter::new(query).accepts(client)
}

// ============================================================================
// SEARCH + PAGINATION
// ============================================================================

/// Filter `clients` by `query` and return the requested page.
pub fn search(clients: &[Client], query: &SearchQuery) -> Page<Client> {
    let filter = Filter::new(query);
    let filtered: Vec<&Client> = clients.iter().filter(|c| filter.accepts(c)).collect();

    let page = paginate(&filtered, query.page, query.page_size);
    Page {
        items: page.items.into_iter().cloned().collect(),
        total: page.total,
        total_pages: page.total_pages,
        page: page.page,
    }
}

/// Slice `[(page-1)*size, page*size)` out of `items`.
///
/// `page_size` 0 is treated as 1. `page` 0 or past the last page yields no
/// items; `total` and `total_pages` are always reported.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let size = page_size.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(size);

    let window = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(size))
        .filter(|start| *start < total)
        .map(|start| &items[start..total.min(start.saturating_add(size))])
        .unwrap_or(&[]);

    Page {
        items: window.to_vec(),
        total,
        total_pages,
        page,
    }
}

// ============================================================================
// TESTS
// ============================================================================
