use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, resolve_user, ApiError, ApiResponse, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SelectGenresRequest {
    pub email: String,
    pub genres: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserGenresRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GenreList {
    genres: Vec<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct SelectedGenres {
    selected_genres: Vec<String>,
}

/// Trimmed, de-duplicated picks in request order.
fn normalize_picks(picks: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(picks.len());
    for pick in picks.iter().map(|g| g.trim()).filter(|g| !g.is_empty()) {
        if !out.iter().any(|existing| existing == pick) {
            out.push(pick.to_owned());
        }
    }
    out
}

/// Picks that are not in the allow-list.
pub(super) fn invalid_genres<'a>(picks: &'a [String], allowed: &[String]) -> Vec<&'a str> {
    picks
        .iter()
        .filter(|pick| !allowed.contains(*pick))
        .map(String::as_str)
        .collect()
}

/// GET /genre/genres
pub(super) async fn list_genres(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<GenreList>>, ApiError> {
    let genres = fancloud_db::list_genre_names(&state.pool)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e))?;

    Ok(ApiResponse::json(req_id.0, GenreList { genres }))
}

/// POST /genre/select-genres
pub(super) async fn select_genres(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<SelectGenresRequest>,
) -> Result<Json<ApiResponse<SelectedGenres>>, ApiError> {
    let rid = &req_id.0;

    let picks = normalize_picks(&body.genres);
    if picks.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "select at least one genre",
        ));
    }

    let user = resolve_user(&state.pool, &body.email, rid).await?;

    let allowed = fancloud_db::list_genre_names(&state.pool)
        .await
        .map_err(|e| map_db_error(rid, &e))?;
    let invalid = invalid_genres(&picks, &allowed);
    if !invalid.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("invalid genres: {}", invalid.join(", ")),
        ));
    }

    let added = fancloud_db::add_user_genres(&state.pool, user.id, &picks)
        .await
        .map_err(|e| map_db_error(rid, &e))?;
    tracing::debug!(user_id = %user.id, added, "user genres updated");

    let selected_genres = fancloud_db::list_user_genres(&state.pool, user.id)
        .await
        .map_err(|e| map_db_error(rid, &e))?;

    Ok(ApiResponse::json(
        req_id.0.clone(),
        SelectedGenres { selected_genres },
    ))
}

/// POST /genre/get-user-genres
pub(super) async fn get_user_genres(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<UserGenresRequest>,
) -> Result<Json<ApiResponse<GenreList>>, ApiError> {
    let rid = &req_id.0;
    let user = resolve_user(&state.pool, &body.email, rid).await?;

    let genres = fancloud_db::list_user_genres(&state.pool, user.id)
        .await
        .map_err(|e| map_db_error(rid, &e))?;

    Ok(ApiResponse::json(req_id.0.clone(), GenreList { genres }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn normalize_picks_trims_and_dedupes_in_order() {
        let picks = strings(&[" 歌手", "俳優", "歌手 ", "", "アイドル"]);
        assert_eq!(normalize_picks(&picks), strings(&["歌手", "俳優", "アイドル"]));
    }

    #[test]
    fn invalid_genres_lists_only_unknown_picks() {
        let allowed = strings(&["歌手", "俳優"]);
        let picks = strings(&["歌手", "料理", "旅行"]);
        assert_eq!(invalid_genres(&picks, &allowed), vec!["料理", "旅行"]);
    }
}
