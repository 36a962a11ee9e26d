use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::request::{QuizRequest, QuizRequestBody},
    services::http_helpers::{enforce_rate_limit, parse_json_body},
};

pub async fn generate_quiz(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req);
    enforce_rate_limit(&req, &state.rate_limiter)?;

    let body: QuizRequestBody = parse_json_body(&body)?;
    let request = QuizRequest::try_from(body)?;
    log::info!(
        "[{}] quiz request topic='{}' n={} difficulty={}",
        request_id,
        request.topic,
        request.n_questions,
        request.difficulty
    );

    let response = state.quiz_service.generate(request).await.map_err(|err| {
        log::error!("[{}] quiz generation failed: {}", request_id, err);
        err
    })?;

    Ok(HttpResponse::Ok().json(response))
}
