use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::{require_owner, AuthenticatedUser},
    db::Database,
    errors::AppError,
    models::dto::{
        request::CreateUserRequest,
        response::{ApiResponse, UserDto},
    },
};

/// Open registration; the only write endpoint outside the auth scope.
#[post("/api/users")]
pub async fn register(
    state: web::Data<Arc<AppState>>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.register(request.into_inner()).await?;

    let response = ApiResponse {
        data: UserDto::from(user),
        message: "User registered".to_string(),
    };
    Ok(HttpResponse::Created().json(response))
}

#[get("/api/users/{username}")]
pub async fn get_user(
    state: web::Data<Arc<AppState>>,
    username: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_owner(&auth.0, &username)?;

    let user = state.user_service.get_user(&username).await?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/live")]
pub async fn health_check_live() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[get("/health/ready")]
pub async fn health_check_ready(db: web::Data<Database>) -> HttpResponse {
    let db_health = db.health_check().await;

    let status = if db_health.is_ok() {
        "ready"
    } else {
        "not_ready"
    };

    let response = serde_json::json!({
        "status": status,
        "version": env!("CARGO_PKG_VERSION"),
        "dependencies": {
            "mongodb": if db_health.is_ok() { "ok" } else { "error" }
        }
    });

    if db_health.is_ok() {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
