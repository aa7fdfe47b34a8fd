//! # HTTP surface
//!
//! Assembles the per-entity routers under `/api`, adds the liveness probe and the
//! permissive CORS layer, and owns the one place where [`ServiceError`] becomes a status
//! code.
//!
//! | Error                                  | Status |
//! |----------------------------------------|--------|
//! | `InvalidArgument`, `NoFieldsProvided`  | 400    |
//! | `NotFound`                             | 404    |
//! | `Conflict`                             | 409    |
//! | `Internal`                             | 500    |
//!
//! Error bodies are `{"error": <kind>, "message": <text>}`.

use axum::Router;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::{
    ServiceError, create_game_router, create_player_router, create_player_stats_router,
    create_team_router,
};

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable error class, see [`ServiceError::kind`].
    pub error: String,
    /// Human-readable explanation.
    pub message: String,
}

impl ServiceError {
    /// The HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidArgument(_) | ServiceError::NoFieldsProvided => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
        }
        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Parses an identifier taken from the URL path.
///
/// Only the syntax is checked here; the service rejects zero and negative ids.
pub fn parse_id(entity: &'static str, raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::InvalidArgument(format!("invalid {} ID: {}", entity, raw)))
}

/// Adds the CORS headers to every response and answers preflight requests directly.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

/// HTTP endpoint for the liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Creates the complete application router.
///
/// # Arguments
/// * `pool` - SQLite connection pool shared by every handler
///
/// # Routes
/// - `GET /health` - Liveness probe
/// - `/api/teams...` - see [`create_team_router`]
/// - `/api/players...` - see [`create_player_router`]
/// - `/api/games...` - see [`create_game_router`]
/// - `/api/player-stats...` - see [`create_player_stats_router`]
///
/// # Examples
/// ```no_run
/// # use gridiron::{Database, create_router};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let db = Database::open(std::path::Path::new("gridiron.db")).await?;
/// let app = create_router(db.pool().clone());
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn create_router(pool: SqlitePool) -> Router {
    let api = create_team_router(pool.clone())
        .merge(create_player_router(pool.clone()))
        .merge(create_game_router(pool.clone()))
        .merge(create_player_stats_router(pool));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(middleware::from_fn(cors))
}
