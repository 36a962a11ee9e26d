use std::{sync::Arc, time::Duration};

use validator::Validate;

use crate::{
    constants::quiz_prompt::PYQ_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::PyqSet,
        dto::{request::PyqRequest, response::PyqResponse},
    },
    services::{
        cache::TtlCache,
        json_extractor::extract_json,
        model_service::{CompletionRequest, ModelService},
    },
};

pub const PYQ_CACHE_TTL: Duration = Duration::from_secs(30 * 60);
const PYQ_TEMPERATURE: f32 = 0.2;

pub fn pyq_max_tokens(n_questions: u8) -> u32 {
    (u32::from(n_questions) * 280).clamp(1400, 3000)
}

pub struct PyqService {
    model: Arc<ModelService>,
    cache: TtlCache<PyqSet>,
}

impl PyqService {
    pub fn new(model: Arc<ModelService>, cache_max_items: usize) -> Self {
        Self {
            model,
            cache: TtlCache::new(PYQ_CACHE_TTL, cache_max_items),
        }
    }

    pub async fn generate(&self, request: PyqRequest) -> AppResult<PyqResponse> {
        let cache_key = request.cache_key();

        if let Some(set) = self.cache.get(&cache_key) {
            log::debug!("PYQ cache hit for key {}", cache_key);
            return Ok(PyqResponse {
                cached: true,
                cache_key,
                set,
            });
        }

        // Single attempt: practice sets are cheap to re-request.
        let completion = CompletionRequest::new(PYQ_SYSTEM_PROMPT, request.user_message())
            .with_max_tokens(pyq_max_tokens(request.n_questions))
            .with_temperature(PYQ_TEMPERATURE)
            .with_json_mode();

        let raw = self.model.complete(&completion).await?;
        let set = parse_pyq_set(&raw)?;
        log::info!(
            "Generated {} PYQ-style items for topic '{}'",
            set.items.len(),
            request.topic
        );

        self.cache.set(cache_key.clone(), set.clone());

        Ok(PyqResponse {
            cached: false,
            cache_key,
            set,
        })
    }
}

pub fn parse_pyq_set(raw: &str) -> AppResult<PyqSet> {
    let value = extract_json(raw)?;
    let set: PyqSet = serde_json::from_value(value)
        .map_err(|e| AppError::MalformedOutput(format!("Invalid PYQ structure: {}", e)))?;
    set.validate()
        .map_err(|e| AppError::MalformedOutput(format!("Invalid PYQ structure: {}", e)))?;
    Ok(set)
}
