use std::sync::Arc;

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::{app_state::AppState, errors::AppError, models::dto::request::LoginRequest};

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub refresh_token: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct RefreshTokenResponse {
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
    #[serde(default)]
    pub all_devices: bool,
}

#[post("/api/auth/login")]
pub async fn login(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let issued = state.auth_service.login(&request).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        token: issued.token,
        refresh_token: issued.refresh_token,
        username: issued.user.username,
    }))
}

#[post("/api/auth/refresh")]
pub async fn refresh_token(
    state: web::Data<Arc<AppState>>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse, AppError> {
    let issued = state.auth_service.refresh(&request.refresh_token).await?;

    Ok(HttpResponse::Ok().json(RefreshTokenResponse {
        token: issued.token,
        refresh_token: issued.refresh_token,
    }))
}

#[post("/api/auth/logout")]
pub async fn logout(
    state: web::Data<Arc<AppState>>,
    request: web::Json<LogoutRequest>,
) -> Result<HttpResponse, AppError> {
    state
        .auth_service
        .logout(&request.refresh_token, request.all_devices)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
