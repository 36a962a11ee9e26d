use std::{sync::Arc, time::Duration};

use crate::{
    constants::prompts::{small_talk_reply, TUTOR_SYSTEM_PROMPT},
    errors::AppResult,
    models::dto::{request::TutorRequest, response::TutorResponse},
    services::{
        cache::{TtlCache, DEFAULT_TTL},
        model_service::{CompletionRequest, ModelService},
        sanitizer::sanitize_tutor_output,
    },
};

pub const SMALL_TALK_TTL: Duration = Duration::from_secs(30 * 60);
const TUTOR_TEMPERATURE: f32 = 0.3;
const TUTOR_RETRIES: u32 = 1;

pub struct TutorService {
    model: Arc<ModelService>,
    cache: TtlCache<String>,
}

impl TutorService {
    pub fn new(model: Arc<ModelService>, cache_max_items: usize) -> Self {
        Self {
            model,
            cache: TtlCache::new(DEFAULT_TTL, cache_max_items),
        }
    }

    pub async fn answer(&self, request: TutorRequest) -> AppResult<TutorResponse> {
        let cache_key = request.cache_key();

        if let Some(output) = self.cache.get(&cache_key) {
            log::debug!("Tutor cache hit for key {}", cache_key);
            return Ok(TutorResponse {
                cached: true,
                cache_key,
                output,
            });
        }

        if request.is_small_talk() {
            let output = small_talk_reply(request.mode);
            self.cache
                .set_with_ttl(cache_key.clone(), output.clone(), SMALL_TALK_TTL);
            return Ok(TutorResponse {
                cached: false,
                cache_key,
                output,
            });
        }

        let history = request
            .history
            .iter()
            .filter_map(|turn| turn.as_message())
            .map(|(role, text)| (role, text.to_string()))
            .collect();

        let completion = CompletionRequest::new(TUTOR_SYSTEM_PROMPT, request.user_message())
            .with_history(history)
            .with_image(Some(request.image_data_url.clone()))
            .with_max_tokens(request.mode.max_tokens())
            .with_temperature(TUTOR_TEMPERATURE)
            .with_retries(TUTOR_RETRIES);

        let raw = self.model.complete(&completion).await?;
        let output = sanitize_tutor_output(&raw);
        self.cache.set(cache_key.clone(), output.clone());

        Ok(TutorResponse {
            cached: false,
            cache_key,
            output,
        })
    }
}
