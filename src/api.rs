// REST API with Axum
//
// Read-only JSON view of the repository, plus POST /api/reload to re-fetch
// every sheet. Handlers only read `Arc` snapshots; no lock is held across an
// await.

use crate::coerce::MaritalStatus;
use crate::entities::{Account, Agency, Client};
use crate::query::{search, Page, SearchQuery};
use crate::repository::{LoadReport, Repository};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    /// Used when a request omits `page_size`
    pub page_size: usize,
}

/// API Response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }
}

fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    let body = ApiResponse {
        success: false,
        data: (),
        error: Some(message.into()),
    };
    (status, Json(body)).into_response()
}

/// GET /api/clients query string
#[derive(Debug, Default, Deserialize)]
pub struct ClientParams {
    pub q: Option<String>,
    pub agency: Option<i64>,
    pub status: Option<String>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
}

impl ClientParams {
    fn into_query(self, default_page_size: usize) -> Result<SearchQuery, String> {
        let marital_status = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(
                MaritalStatus::from_name(raw).ok_or_else(|| format!("unknown marital status '{}'", raw))?,
            ),
        };

        Ok(SearchQuery {
            term: self.q.unwrap_or_default(),
            agency_code: self.agency,
            marital_status,
            page: self.page.unwrap_or(1),
            page_size: self.page_size.unwrap_or(default_page_size),
        })
    }
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/clients - Filtered, paginated client list
async fn list_clients(State(state): State<AppState>, Query(params): Query<ClientParams>) -> Response {
    let query = match params.into_query(state.page_size) {
        Ok(query) => query,
        Err(message) => return failure(StatusCode::BAD_REQUEST, message),
    };

    let page: Page<Client> = search(&state.repo.clients(), &query);
    Json(ApiResponse::ok(page)).into_response()
}

/// GET /api/clients/:id
async fn get_client(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.repo.client_by_id(&id) {
        Some(client) => Json(ApiResponse::ok(client)).into_response(),
        None => failure(StatusCode::NOT_FOUND, format!("client '{}' not found", id)),
    }
}

/// GET /api/clients/:id/accounts - Accounts joined on the client's tax ID
async fn get_client_accounts(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let Some(client) = state.repo.client_by_id(&id) else {
        return failure(StatusCode::NOT_FOUND, format!("client '{}' not found", id));
    };

    let accounts: Vec<Account> = state.repo.accounts_for_client(&client.tax_id);
    Json(ApiResponse::ok(accounts)).into_response()
}

/// GET /api/agencies
async fn list_agencies(State(state): State<AppState>) -> impl IntoResponse {
    let agencies: Vec<Agency> = state.repo.agencies().to_vec();
    Json(ApiResponse::ok(agencies))
}

/// GET /api/agencies/:code
async fn get_agency(State(state): State<AppState>, Path(code): Path<i64>) -> Response {
    match state.repo.agency_by_code(code) {
        Some(agency) => Json(ApiResponse::ok(agency)).into_response(),
        None => failure(StatusCode::NOT_FOUND, format!("agency {} not found", code)),
    }
}

/// POST /api/reload - Re-fetch all sheets
///
/// Failed sheets keep their previous snapshot; the report says which.
async fn reload(State(state): State<AppState>) -> Response {
    let report: LoadReport = state.repo.load_all().await;

    if report.all_ok() {
        return Json(ApiResponse::ok(report)).into_response();
    }

    let body = ApiResponse {
        success: false,
        data: report,
        error: Some("one or more sheets failed to load".to_string()),
    };
    (StatusCode::BAD_GATEWAY, Json(body)).into_response()
}

// ============================================================================
// Router
// ============================================================================

/// Build the application router, API mounted under `/api`.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/clients", get(list_clients))
        .route("/clients/:id", get(get_client))
        .route("/clients/:id/accounts", get(get_client_accounts))
        .route("/agencies", get(list_agencies))
        .route("/agencies/:code", get(get_agency))
        .route("/reload", post(reload))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::tests::StaticSource;
    use crate::feed::Sheet;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    const CLIENTS: &str = "id,nome,cpfcnpj,estadocivil,codigoagencia\n\
                           c1,Ana Souza,123.456.789-00,Casado,1\n\
                           c2,Bruno Lima,987.654.321-00,Solteiro,2\n\
                           c3,Carla Dias,111.222.333-44,Casado,1\n";
    const ACCOUNTS: &str = "id,cpfcnpjcliente,tipo,saldo,limitecredito\n\
                            a1,123.456.789-00,corrente,\"1500,50\",500\n\
                            a2,123.456.789-00,poupança,-20,0\n\
                            a3,987.654.321-00,corrente,10,0\n";
    const AGENCIES: &str = "id,codigo,nome,endereco\nag1,1,Centro,Rua A\nag2,2,Norte,Rua B\n";

    async fn app_with(source: Arc<StaticSource>) -> Router {
        let repo = Arc::new(Repository::new(source));
        repo.load_all().await;
        router(AppState { repo, page_size: 2 })
    }

    async fn app() -> Router {
        app_with(Arc::new(
            StaticSource::default()
                .with(Sheet::Clients, CLIENTS)
                .with(Sheet::Accounts, ACCOUNTS)
                .with(Sheet::Agencies, AGENCIES),
        ))
        .await
    }

    async fn call(app: Router, method: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = call(app().await, "GET", "/api/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], "OK");
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_list_clients_uses_default_page_size() {
        let (status, body) = call(app().await, "GET", "/api/clients").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 3);
        assert_eq!(body["data"]["total_pages"], 2);
        assert_eq!(body["data"]["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_list_clients_filters() {
        let (_, body) = call(app().await, "GET", "/api/clients?agency=1&status=married&page_size=10").await;
        let names: Vec<&str> = body["data"]["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Ana Souza", "Carla Dias"]);

        let (_, body) = call(app().await, "GET", "/api/clients?q=98765432100").await;
        assert_eq!(body["data"]["items"][0]["id"], "c2");
    }

    #[tokio::test]
    async fn test_list_clients_bad_status() {
        let (status, body) = call(app().await, "GET", "/api/clients?status=complicated").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_page_past_end_is_empty() {
        let (status, body) = call(app().await, "GET", "/api/clients?page=9").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"]["items"].as_array().unwrap().is_empty());
        assert_eq!(body["data"]["page"], 9);
    }

    #[tokio::test]
    async fn test_client_and_accounts() {
        let (status, body) = call(app().await, "GET", "/api/clients/c1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["marital_status"], "Married");

        let (status, body) = call(app().await, "GET", "/api/clients/c1/accounts").await;
        assert_eq!(status, StatusCode::OK);
        let accounts = body["data"].as_array().unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0]["balance"], 1500.5);

        let (status, _) = call(app().await, "GET", "/api/clients/nobody/accounts").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_agencies() {
        let (_, body) = call(app().await, "GET", "/api/agencies").await;
        assert_eq!(body["data"].as_array().unwrap().len(), 2);

        let (status, body) = call(app().await, "GET", "/api/agencies/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["name"], "Norte");

        let (status, _) = call(app().await, "GET", "/api/agencies/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_reload_reports_failures() {
        let source = Arc::new(
            StaticSource::default()
                .with(Sheet::Clients, CLIENTS)
                .with(Sheet::Agencies, AGENCIES),
        );
        let app = app_with(source).await;

        let (status, body) = call(app.clone(), "POST", "/api/reload").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["data"]["clients"]["status"], "loaded");
        assert_eq!(body["data"]["clients"]["count"], 3);
        assert_eq!(body["data"]["accounts"]["status"], "failed");

        // Clients snapshot is still served
        let (_, body) = call(app, "GET", "/api/clients").await;
        assert_eq!(body["data"]["total"], 3);
    }
}
