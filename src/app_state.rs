use std::sync::Arc;

use crate::{
    config::Config,
    services::{
        model_service::{CompletionClient, ModelService, OpenAiCompletionClient},
        pyq_service::PyqService,
        quiz_service::QuizService,
        rate_limiter::RateLimiter,
        tutor_service::TutorService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub tutor_service: Arc<TutorService>,
    pub quiz_service: Arc<QuizService>,
    pub pyq_service: Arc<PyqService>,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = Arc::new(OpenAiCompletionClient::from_config(&config));
        Self::with_client(config, client)
    }

    /// Builds the state around any completion client. One rate limiter is
    /// shared by every endpoint; each endpoint owns its response cache.
    pub fn with_client(config: Config, client: Arc<dyn CompletionClient>) -> Self {
        let model_service = Arc::new(ModelService::new(client, config.inference_timeout()));

        let tutor_service = Arc::new(TutorService::new(
            Arc::clone(&model_service),
            config.cache_max_items,
        ));
        let quiz_service = Arc::new(QuizService::new(
            Arc::clone(&model_service),
            config.cache_max_items,
        ));
        let pyq_service = Arc::new(PyqService::new(model_service, config.cache_max_items));

        let rate_limiter = Arc::new(RateLimiter::new(
            config.rate_limit_max_requests,
            config.rate_limit_window(),
        ));

        Self {
            tutor_service,
            quiz_service,
            pyq_service,
            rate_limiter,
            config: Arc::new(config),
        }
    }
}
