use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        jwt::{AuthUser, JwtKeys},
        password::{hash_password, verify_password},
    },
    error::ApiError,
    state::AppState,
};

use super::{
    dto::{
        PublicUser, RefreshRequest, RegisterRequest, TokenRequest, TokenResponse, UpdateMeRequest,
    },
    email::normalize_email,
    repo::User,
};

const MIN_PASSWORD_LEN: usize = 8;

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let email = normalize_email(&payload.email)?;
    if payload.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::field(
            "password",
            format!("password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(%email, "email already registered");
        return Err(ApiError::Conflict("email already registered"));
    }

    let hash = hash_password(&payload.password)?;
    let user = User::create(&state.db, &email, &hash, payload.name.trim()).await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn token(
    State(state): State<AppState>,
    Json(payload): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    // Unknown email and wrong password are indistinguishable to the caller.
    let Ok(email) = normalize_email(&payload.email) else {
        return Err(ApiError::Unauthorized("invalid credentials"));
    };

    let Some(user) = User::find_by_email(&state.db, &email).await? else {
        warn!(%email, "token request for unknown email");
        return Err(ApiError::Unauthorized("invalid credentials"));
    };

    if !user.is_active || !verify_password(&payload.password, &user.password_hash)? {
        warn!(user_id = %user.id, "token request with invalid password");
        return Err(ApiError::Unauthorized("invalid credentials"));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, "token issued");
    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| ApiError::Unauthorized("invalid refresh token"))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or(ApiError::Unauthorized("invalid refresh token"))?;

    let access_token = keys.sign_access(user.id)?;
    let refresh_token = keys.sign_refresh(user.id)?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
        user: user.into(),
    }))
}

#[instrument(skip(state))]
pub async fn me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or(ApiError::Unauthorized("user not found"))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let email = match payload.email.as_deref() {
        Some(raw) => Some(normalize_email(raw)?),
        None => None,
    };

    if let Some(password) = payload.password.as_deref() {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(ApiError::field(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
    }
    let password_hash = payload
        .password
        .as_deref()
        .map(hash_password)
        .transpose()?;

    if let Some(email) = &email {
        if let Some(existing) = User::find_by_email(&state.db, email).await? {
            if existing.id != user_id {
                return Err(ApiError::Conflict("email already registered"));
            }
        }
    }

    let user = User::update(
        &state.db,
        user_id,
        email.as_deref(),
        payload.name.as_deref().map(str::trim),
        password_hash.as_deref(),
    )
    .await?
    .ok_or(ApiError::Unauthorized("user not found"))?;

    info!(user_id = %user.id, "profile updated");
    Ok(Json(user.into()))
}
