//! Account handlers: registration and login.

use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;
use crate::password::{hash_password, verify_password};

use super::{map_db_error, ApiError, ApiResponse, AppState};

const MAX_USERNAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 8;
const LOGIN_FAILED: &str = "email or password is incorrect";

#[derive(Debug, Deserialize)]
pub(super) struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AccountData {
    username: String,
    email: String,
}

/// Minimal shape check: one `@`, a non-empty local part and a dotted domain.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}

fn validate_registration(req_id: &str, body: &RegisterRequest) -> Result<(), ApiError> {
    if !is_plausible_email(body.email.trim()) {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("'{}' is not a valid email address", body.email.trim()),
        ));
    }
    let username_len = body.username.trim().chars().count();
    if username_len == 0 || username_len > MAX_USERNAME_CHARS {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("username must be 1-{MAX_USERNAME_CHARS} characters"),
        ));
    }
    if body.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("password must be at least {MIN_PASSWORD_CHARS} characters"),
        ));
    }
    Ok(())
}

/// POST /user/register
pub(super) async fn register(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AccountData>>), ApiError> {
    let rid = &req_id.0;
    validate_registration(rid, &body)?;

    let email = body.email.trim();
    let username = body.username.trim();
    let credential = hash_password(&body.password);

    let user = fancloud_db::create_user(
        &state.pool,
        &fancloud_db::NewUser {
            email,
            username,
            password_hash: &credential.hash,
            password_salt: &credential.salt,
        },
    )
    .await
    .map_err(|e| {
        if e.is_unique_violation() {
            ApiError::new(rid, "conflict", "email is already registered")
        } else {
            map_db_error(rid, &e)
        }
    })?;

    tracing::info!(user_id = %user.id, "registered user");

    Ok((
        StatusCode::CREATED,
        ApiResponse::json(
            req_id.0.clone(),
            AccountData {
                username: user.username,
                email: user.email,
            },
        ),
    ))
}

/// POST /user/login
pub(super) async fn login(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AccountData>>, ApiError> {
    let rid = &req_id.0;

    let user = fancloud_db::get_user_by_email(&state.pool, body.email.trim())
        .await
        .map_err(|e| map_db_error(rid, &e))?
        .ok_or_else(|| ApiError::new(rid, "unauthorized", LOGIN_FAILED))?;

    if !verify_password(&body.password, &user.password_salt, &user.password_hash) {
        return Err(ApiError::new(rid, "unauthorized", LOGIN_FAILED));
    }

    Ok(ApiResponse::json(
        req_id.0.clone(),
        AccountData {
            username: user.username,
            email: user.email,
        },
    ))
}
