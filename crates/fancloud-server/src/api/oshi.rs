//! Oshi handlers: encyclopedia search and lookup, and the saved oshi list.
//!
//! - `POST /oshi/search-oshi`: up to four candidate titles
//! - `POST /oshi/fetch-oshi-info`: live profile, not persisted
//! - `POST /oshi/save-oshi-info-and-genres`: scrape and upsert for a user
//! - `POST /oshi/get-user-oshi-genres`: a user's saved oshi
//! - `POST /oshi/get-oshi-info`: one saved profile
//! - `POST /oshi/delete-oshi`: remove a saved oshi

use axum::{extract::State, Extension, Json};
use fancloud_core::{profile::IMAGE_NOT_FOUND, RenderedProfile};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{
    genres::invalid_genres, map_db_error, map_wiki_error, require_non_blank, resolve_user,
    ApiError, ApiResponse, AppState,
};

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct FetchInfoRequest {
    pub oshi_name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct SaveOshiRequest {
    pub email: String,
    pub oshi_name: String,
    pub genre: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserOshiRequest {
    pub email: String,
    pub oshi_name: String,
}

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(super) struct SearchResults {
    titles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct OshiInfo {
    oshi_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    genre: Option<String>,
    #[serde(flatten)]
    profile: RenderedProfile,
}

#[derive(Debug, Serialize)]
pub(super) struct OshiListItem {
    oshi_name: String,
    genre: String,
    image_url: String,
}

#[derive(Debug, Serialize)]
pub(super) struct OshiList {
    oshi: Vec<OshiListItem>,
}

#[derive(Debug, Serialize)]
pub(super) struct DeletedOshi {
    oshi_name: String,
    deleted: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /oshi/search-oshi
pub(super) async fn search_oshi(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SearchRequest>,
) -> Result<Json<ApiResponse<SearchResults>>, ApiError> {
    let rid = &req_id.0;
    let query = require_non_blank(rid, "query", &body.query)?;

    let titles = state
        .wiki
        .search_titles(query)
        .await
        .map_err(|e| map_wiki_error(rid, &e))?;

    Ok(ApiResponse::json(req_id.0.clone(), SearchResults { titles }))
}

/// POST /oshi/fetch-oshi-info
pub(super) async fn fetch_oshi_info(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<FetchInfoRequest>,
) -> Result<Json<ApiResponse<OshiInfo>>, ApiError> {
    let rid = &req_id.0;
    let oshi_name = require_non_blank(rid, "oshi_name", &body.oshi_name)?;

    let profile = state
        .wiki
        .fetch_profile(oshi_name)
        .await
        .map_err(|e| map_wiki_error(rid, &e))?;

    Ok(ApiResponse::json(
        req_id.0.clone(),
        OshiInfo {
            oshi_name: oshi_name.to_owned(),
            genre: None,
            profile: profile.render(),
        },
    ))
}

/// POST /oshi/save-oshi-info-and-genres
///
/// Checks run cheapest first: user, then genre, then the two outbound calls.
pub(super) async fn save_oshi_info_and_genres(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SaveOshiRequest>,
) -> Result<Json<ApiResponse<OshiInfo>>, ApiError> {
    let rid = &req_id.0;
    let oshi_name = require_non_blank(rid, "oshi_name", &body.oshi_name)?;
    let genre = require_non_blank(rid, "genre", &body.genre)?;

    let user = resolve_user(&state.pool, &body.email, rid).await?;

    let allowed = fancloud_db::list_genre_names(&state.pool)
        .await
        .map_err(|e| map_db_error(rid, &e))?;
    let picked = [genre.to_owned()];
    if !invalid_genres(&picked, &allowed).is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("invalid genre: {genre}"),
        ));
    }

    let profile = state
        .wiki
        .fetch_profile(oshi_name)
        .await
        .map_err(|e| map_wiki_error(rid, &e))?;

    let row = fancloud_db::upsert_oshi(
        &state.pool,
        &fancloud_db::NewOshi {
            user_id: user.id,
            oshi_name,
            genre,
            profile: &profile,
        },
    )
    .await
    .map_err(|e| map_db_error(rid, &e))?;

    tracing::info!(user_id = %user.id, oshi_id = row.id, oshi_name, "saved oshi profile");

    Ok(ApiResponse::json(
        req_id.0.clone(),
        OshiInfo {
            oshi_name: row.oshi_name,
            genre: Some(row.genre),
            profile: profile.render(),
        },
    ))
}

/// POST /oshi/get-user-oshi-genres
pub(super) async fn get_user_oshi_genres(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UserRequest>,
) -> Result<Json<ApiResponse<OshiList>>, ApiError> {
    let rid = &req_id.0;
    let user = resolve_user(&state.pool, &body.email, rid).await?;

    let rows = fancloud_db::list_user_oshi(&state.pool, user.id)
        .await
        .map_err(|e| map_db_error(rid, &e))?;

    let oshi = rows
        .into_iter()
        .map(|row| OshiListItem {
            oshi_name: row.oshi_name,
            genre: row.genre,
            image_url: row.image_url.unwrap_or_else(|| IMAGE_NOT_FOUND.to_owned()),
        })
        .collect();

    Ok(ApiResponse::json(req_id.0.clone(), OshiList { oshi }))
}

/// POST /oshi/get-oshi-info
pub(super) async fn get_oshi_info(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UserOshiRequest>,
) -> Result<Json<ApiResponse<OshiInfo>>, ApiError> {
    let rid = &req_id.0;
    let oshi_name = require_non_blank(rid, "oshi_name", &body.oshi_name)?;
    let user = resolve_user(&state.pool, &body.email, rid).await?;

    let row = fancloud_db::get_oshi(&state.pool, user.id, oshi_name)
        .await
        .map_err(|e| map_db_error(rid, &e))?
        .ok_or_else(|| ApiError::new(rid, "not_found", format!("oshi '{oshi_name}' not found")))?;

    let profile = row.to_profile().render();
    Ok(ApiResponse::json(
        req_id.0.clone(),
        OshiInfo {
            oshi_name: row.oshi_name,
            genre: Some(row.genre),
            profile,
        },
    ))
}

/// POST /oshi/delete-oshi
pub(super) async fn delete_oshi(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UserOshiRequest>,
) -> Result<Json<ApiResponse<DeletedOshi>>, ApiError> {
    let rid = &req_id.0;
    let oshi_name = require_non_blank(rid, "oshi_name", &body.oshi_name)?;
    let user = resolve_user(&state.pool, &body.email, rid).await?;

    fancloud_db::delete_oshi(&state.pool, user.id, oshi_name)
        .await
        .map_err(|e| match e {
            fancloud_db::DbError::NotFound => {
                ApiError::new(rid, "not_found", format!("oshi '{oshi_name}' not found"))
            }
            other => map_db_error(rid, &other),
        })?;

    tracing::info!(user_id = %user.id, oshi_name, "deleted oshi");

    Ok(ApiResponse::json(
        req_id.0.clone(),
        DeletedOshi {
            oshi_name: oshi_name.to_owned(),
            deleted: true,
        },
    ))
}
