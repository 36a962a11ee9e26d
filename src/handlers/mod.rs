pub mod health_handler;
pub mod pyq_handler;
pub mod quiz_handler;
pub mod tutor_handler;

use actix_web::web;

use crate::services::http_helpers::method_not_allowed;

pub use health_handler::health_check;
pub use pyq_handler::generate_pyqs;
pub use quiz_handler::generate_quiz;
pub use tutor_handler::tutor;

/// Screenshot data URLs are capped at 2.5 MB of text; leave room for the
/// rest of the body.
pub const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Registers every route. POST-only resources answer other methods with 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::PayloadConfig::new(MAX_BODY_BYTES))
        .service(health_check)
        .service(
            web::resource("/tutor")
                .route(web::post().to(tutor))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/quiz")
                .route(web::post().to(generate_quiz))
                .default_service(web::to(method_not_allowed)),
        )
        .service(
            web::resource("/pyq-generate")
                .route(web::post().to(generate_pyqs))
                .default_service(web::to(method_not_allowed)),
        );
}
