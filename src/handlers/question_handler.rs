use std::sync::Arc;

use actix_web::{get, put, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::SubmitAnswerRequest,
};

/// The authenticated user's current question. First access seeds the user's
/// review queue from the question bank.
#[get("/api/questions")]
pub async fn current_question(
    state: web::Data<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state.review_service.current_question(&auth.0.sub).await?;
    Ok(HttpResponse::Ok().json(question))
}

/// Submits an answer for the current question and re-threads the user's
/// rotation. Answers for any other question come back as a conflict.
#[put("/api/questions")]
pub async fn submit_answer(
    state: web::Data<Arc<AppState>>,
    request: web::Json<SubmitAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let request = request.into_inner();
    request.validate()?;

    let outcome = state
        .review_service
        .submit_answer(&auth.0.sub, &request.question_id, request.correct)
        .await?;
    Ok(HttpResponse::Ok().json(outcome))
}
