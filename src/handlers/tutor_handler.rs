use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::request::{TutorRequest, TutorRequestBody},
    services::http_helpers::{enforce_rate_limit, parse_json_body},
};

pub async fn tutor(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let request_id = get_request_id(&req);
    enforce_rate_limit(&req, &state.rate_limiter)?;

    let body: TutorRequestBody = parse_json_body(&body)?;
    let request = TutorRequest::try_from(body)?;
    log::info!(
        "[{}] tutor request mode={} image={} history={}",
        request_id,
        request.mode,
        !request.image_data_url.is_empty(),
        request.history.len()
    );

    let response = state.tutor_service.answer(request).await.map_err(|err| {
        log::error!("[{}] tutor request failed: {}", request_id, err);
        err
    })?;

    Ok(HttpResponse::Ok().json(response))
}
