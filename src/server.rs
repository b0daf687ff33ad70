use std::net::SocketAddr;

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::rpc::{dispatch, make_response, DispatchError, ResponseMode, RpcRequest, SUPPORTED_METHODS};
use crate::tools::ToolRegistry;

const API_VERSION: &str = "1.0.0";

#[derive(Clone)]
pub struct ApiState {
    registry: ToolRegistry,
}

impl ApiState {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ModeQuery {
    mode: Option<String>,
}

impl ModeQuery {
    fn mode(&self) -> ResponseMode {
        ResponseMode::from_query(self.mode.as_deref())
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    ok: bool,
    version: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoResponse {
    message: &'static str,
    version: &'static str,
    supported_methods: [&'static str; 2],
    total_tools: usize,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    mode: ResponseMode,
    id: Option<Value>,
    error: DispatchError,
}

impl ApiError {
    fn new(mode: ResponseMode, id: Option<Value>, error: DispatchError) -> Self {
        let status = if error.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            status,
            mode,
            id,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = make_response(self.mode, self.id.as_ref(), Err(&self.error));
        (self.status, Json(body)).into_response()
    }
}

pub fn router(state: ApiState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/mcp", get(mcp_info).post(mcp_call))
        .layer(cors)
        .with_state(state)
}

pub async fn run_server(registry: ToolRegistry, bind: SocketAddr) -> Result<()> {
    let tool_count = registry.len();
    let app = router(ApiState::new(registry));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("tool API listening on http://{bind}/api/mcp ({tool_count} tools)");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn mcp_info(State(state): State<ApiState>, Query(query): Query<ModeQuery>) -> Json<Value> {
    let info = InfoResponse {
        message: "MCP API is running. Please use POST with JSON body.",
        version: API_VERSION,
        supported_methods: SUPPORTED_METHODS,
        total_tools: state.registry.len(),
    };
    Json(make_response(query.mode(), None, Ok(json!(info))))
}

async fn mcp_call(
    State(state): State<ApiState>,
    Query(query): Query<ModeQuery>,
    body: Bytes,
) -> std::result::Result<Json<Value>, ApiError> {
    let mode = query.mode();
    let request = RpcRequest::parse(&body).map_err(|error| ApiError::new(mode, None, error))?;

    match dispatch(&state.registry, &request).await {
        Ok(result) => Ok(Json(make_response(mode, request.id.as_ref(), Ok(result)))),
        Err(error) => Err(ApiError::new(mode, request.id, error)),
    }
}
