mod content;
mod genres;
mod oshi;
mod users;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use fancloud_db::UserRow;
use fancloud_wiki::{WikiClient, WikiError};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{request_id, RequestId, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub wiki: WikiClient,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

#[derive(Debug, Serialize)]
struct MessageData {
    message: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn json(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: &str, error: &fancloud_db::DbError) -> ApiError {
    match error {
        fancloud_db::DbError::NotFound => ApiError::new(request_id, "not_found", "record not found"),
        fancloud_db::DbError::Content(e) => {
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        _ => {
            tracing::error!(error = %error, "database query failed");
            ApiError::new(request_id, "internal_error", "database query failed")
        }
    }
}

pub(super) fn map_wiki_error(request_id: &str, error: &WikiError) -> ApiError {
    if error.is_not_found() {
        return ApiError::new(request_id, "not_found", error.to_string());
    }
    tracing::warn!(error = %error, "encyclopedia request failed");
    ApiError::new(request_id, "internal_error", "encyclopedia lookup failed")
}

/// Reject blank required string fields with a `validation_error`.
pub(super) fn require_non_blank<'a>(
    request_id: &str,
    field: &str,
    value: &'a str,
) -> Result<&'a str, ApiError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            format!("{field} must not be empty"),
        ));
    }
    Ok(trimmed)
}

/// Resolve an email to its user row, returning 404 if not registered.
pub(super) async fn resolve_user(
    pool: &PgPool,
    email: &str,
    request_id: &str,
) -> Result<UserRow, ApiError> {
    fancloud_db::get_user_by_email(pool, email.trim())
        .await
        .map_err(|e| map_db_error(request_id, &e))?
        .ok_or_else(|| ApiError::new(request_id, "not_found", "user not found"))
}

fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::HEAD, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .allow_credentials(true)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/user/register", post(users::register))
        .route("/user/login", post(users::login))
        .route("/genre/genres", get(genres::list_genres))
        .route("/genre/select-genres", post(genres::select_genres))
        .route("/genre/get-user-genres", post(genres::get_user_genres))
        .route("/oshi/search-oshi", post(oshi::search_oshi))
        .route("/oshi/fetch-oshi-info", post(oshi::fetch_oshi_info))
        .route(
            "/oshi/save-oshi-info-and-genres",
            post(oshi::save_oshi_info_and_genres),
        )
        .route("/oshi/get-user-oshi-genres", post(oshi::get_user_oshi_genres))
        .route("/oshi/get-oshi-info", post(oshi::get_oshi_info))
        .route("/oshi/delete-oshi", post(oshi::delete_oshi))
        .route("/content/create-content", post(content::create_content))
        .route("/content/fetch-content", post(content::fetch_content))
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    let public_routes = Router::new()
        .route("/", get(root))
        .route("/send", get(keep_alive))
        .route("/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router())
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors_origins)),
        )
        .with_state(state)
}

async fn root(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::json(
        req_id.0,
        MessageData {
            message: "Hello from fancloud",
        },
    )
}

/// Keep-alive probe hit by an external pinger; `HEAD` is served by the same route.
async fn keep_alive(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::json(
        req_id.0,
        MessageData {
            message: "APP is active",
        },
    )
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    match fancloud_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            ApiResponse::json(
                req_id.0,
                HealthData {
                    status: "ok",
                    database: "ok",
                },
            ),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiResponse::json(
                    req_id.0,
                    HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                ),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
