use axum::{extract::State, http::StatusCode, Extension, Json};
use fancloud_core::{validate_items, ContentItem};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::middleware::RequestId;

use super::{map_db_error, require_non_blank, resolve_user, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct CreateContentRequest {
    pub email: String,
    pub oshi_name: String,
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Deserialize)]
pub(super) struct FetchContentRequest {
    pub email: String,
    pub oshi_name: String,
}

#[derive(Debug, Serialize)]
pub(super) struct CreatedContent {
    oshi_name: String,
    ids: Vec<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct PageContent {
    oshi_name: String,
    content: Vec<ContentItem>,
}

/// Resolve the owner and their saved oshi row id, 404 on either miss.
async fn resolve_oshi_id(
    pool: &PgPool,
    email: &str,
    oshi_name: &str,
    request_id: &str,
) -> Result<i64, ApiError> {
    let user = resolve_user(pool, email, request_id).await?;
    let row = fancloud_db::get_oshi(pool, user.id, oshi_name)
        .await
        .map_err(|e| map_db_error(request_id, &e))?
        .ok_or_else(|| {
            ApiError::new(
                request_id,
                "not_found",
                format!("oshi '{oshi_name}' not found"),
            )
        })?;
    Ok(row.id)
}

/// POST /content/create-content
///
/// Replaces the whole page; an empty `content` list clears it.
pub(super) async fn create_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<CreateContentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedContent>>), ApiError> {
    let rid = &req_id.0;
    let oshi_name = require_non_blank(rid, "oshi_name", &body.oshi_name)?;
    validate_items(&body.content)
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    let oshi_id = resolve_oshi_id(&state.pool, &body.email, oshi_name, rid).await?;

    let ids = fancloud_db::replace_content_blocks(&state.pool, oshi_id, &body.content)
        .await
        .map_err(|e| map_db_error(rid, &e))?;

    tracing::info!(oshi_id, blocks = ids.len(), "replaced oshi page content");

    Ok((
        StatusCode::CREATED,
        ApiResponse::json(
            req_id.0.clone(),
            CreatedContent {
                oshi_name: oshi_name.to_owned(),
                ids,
            },
        ),
    ))
}

/// POST /content/fetch-content
pub(super) async fn fetch_content(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<FetchContentRequest>,
) -> Result<Json<ApiResponse<PageContent>>, ApiError> {
    let rid = &req_id.0;
    let oshi_name = require_non_blank(rid, "oshi_name", &body.oshi_name)?;
    let oshi_id = resolve_oshi_id(&state.pool, &body.email, oshi_name, rid).await?;

    let rows = fancloud_db::list_content_blocks(&state.pool, oshi_id)
        .await
        .map_err(|e| map_db_error(rid, &e))?;

    let mut content = Vec::with_capacity(rows.len());
    for row in rows {
        let block_id = row.id;
        let item = row.into_item().map_err(|e| {
            tracing::error!(block_id, error = %e, "stored content block is unreadable");
            ApiError::new(rid, "internal_error", "stored content is corrupt")
        })?;
        content.push(item);
    }

    Ok(ApiResponse::json(
        req_id.0.clone(),
        PageContent {
            oshi_name: oshi_name.to_owned(),
            content,
        },
    ))
}
