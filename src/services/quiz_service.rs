use std::{sync::Arc, time::Duration};

use validator::Validate;

use crate::{
    constants::quiz_prompt::QUIZ_SYSTEM_PROMPT,
    errors::{AppError, AppResult},
    models::{
        domain::Quiz,
        dto::{request::QuizRequest, response::QuizResponse},
    },
    services::{
        cache::TtlCache,
        json_extractor::extract_json,
        model_service::{CompletionRequest, ModelService},
    },
};

pub const QUIZ_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const QUIZ_TEMPERATURE: f32 = 0.2;
const QUIZ_RETRIES: u32 = 1;

/// Completion budget scales with the number of questions asked for.
pub fn quiz_max_tokens(n_questions: u8) -> u32 {
    (u32::from(n_questions) * 300).clamp(1500, 4500)
}

pub struct QuizService {
    model: Arc<ModelService>,
    cache: TtlCache<Quiz>,
}

impl QuizService {
    pub fn new(model: Arc<ModelService>, cache_max_items: usize) -> Self {
        Self {
            model,
            cache: TtlCache::new(QUIZ_CACHE_TTL, cache_max_items),
        }
    }

    pub async fn generate(&self, request: QuizRequest) -> AppResult<QuizResponse> {
        let cache_key = request.cache_key();

        if let Some(quiz) = self.cache.get(&cache_key) {
            log::debug!("Quiz cache hit for key {}", cache_key);
            return Ok(QuizResponse {
                cached: true,
                cache_key,
                quiz,
            });
        }

        let completion = CompletionRequest::new(QUIZ_SYSTEM_PROMPT, request.user_message())
            .with_max_tokens(quiz_max_tokens(request.n_questions))
            .with_temperature(QUIZ_TEMPERATURE)
            .with_json_mode()
            .with_retries(QUIZ_RETRIES);

        let raw = self.model.complete(&completion).await?;
        let quiz = parse_quiz(&raw)?;
        log::info!(
            "Generated quiz '{}' with {} items for topic '{}'",
            quiz.quiz_title,
            quiz.items.len(),
            request.topic
        );

        self.cache.set(cache_key.clone(), quiz.clone());

        Ok(QuizResponse {
            cached: false,
            cache_key,
            quiz,
        })
    }
}

/// Salvages JSON from the raw reply and checks it against the quiz shape.
/// Shape failures are the model's fault, so they surface as malformed output
/// rather than as a client validation error.
pub fn parse_quiz(raw: &str) -> AppResult<Quiz> {
    let value = extract_json(raw)?;
    let quiz: Quiz = serde_json::from_value(value)
        .map_err(|e| AppError::MalformedOutput(format!("Invalid quiz structure: {}", e)))?;
    quiz.validate()
        .map_err(|e| AppError::MalformedOutput(format!("Invalid quiz structure: {}", e)))?;
    Ok(quiz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::dto::request::QuizRequestBody,
        test_utils::{fixtures::quiz_json, test_helpers::ScriptedClient},
    };

    fn service(client: Arc<ScriptedClient>) -> QuizService {
        let model = ModelService::new(client, Duration::from_secs(5))
            .with_backoff(Duration::from_millis(1));
        QuizService::new(Arc::new(model), 50)
    }

    fn request(topic: &str, n: f64) -> QuizRequest {
        QuizRequest::try_from(QuizRequestBody {
            topic: Some(topic.to_string()),
            n_questions: Some(n),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_quiz_max_tokens_is_clamped() {
        assert_eq!(quiz_max_tokens(3), 1500);
        assert_eq!(quiz_max_tokens(10), 3000);
        assert_eq!(quiz_max_tokens(15), 4500);
    }

    #[test]
    fn test_parse_quiz_accepts_fenced_payload() {
        let raw = format!("```json\n{}\n```", quiz_json(2));
        let quiz = parse_quiz(&raw).unwrap();
        assert_eq!(quiz.items.len(), 2);
    }

    #[test]
    fn test_parse_quiz_accepts_numeric_ids() {
        let mut value: serde_json::Value = serde_json::from_str(&quiz_json(3)).unwrap();
        for (i, item) in value["items"].as_array_mut().unwrap().iter_mut().enumerate() {
            item["id"] = serde_json::json!(i + 1);
        }

        let quiz = parse_quiz(&value.to_string()).unwrap();

        let ids: Vec<&str> = quiz.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_quiz_rejects_missing_items() {
        let err = parse_quiz(r#"{"schemaVersion": 1, "quizTitle": "x"}"#).unwrap_err();
        match err {
            AppError::MalformedOutput(msg) => assert!(msg.starts_with("Invalid quiz structure")),
            other => panic!("expected malformed output, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_quiz_rejects_non_json() {
        let err = parse_quiz("Sorry, I can't help with that.").unwrap_err();
        assert!(matches!(err, AppError::MalformedOutput(_)));
    }

    #[tokio::test]
    async fn test_generate_caches_validated_quiz() {
        let client = Arc::new(ScriptedClient::always(quiz_json(5)));
        let service = service(Arc::clone(&client));

        let first = service.generate(request("Vectors", 5.0)).await.unwrap();
        let second = service.generate(request("Vectors", 5.0)).await.unwrap();

        assert!(!first.cached);
        assert!(second.cached);
        assert_eq!(first.cache_key, second.cache_key);
        assert_eq!(second.quiz, first.quiz);
        assert_eq!(client.call_count(), 1);

        let sent = &client.requests()[0];
        assert!(sent.json_mode);
        assert_eq!(sent.max_tokens, 1500);
        assert_eq!(sent.retries, 1);
    }

    #[tokio::test]
    async fn test_generate_does_not_cache_malformed_output() {
        let client = Arc::new(ScriptedClient::new(vec![
            Ok("not json at all".to_string()),
            Ok(quiz_json(3)),
        ]));
        let service = service(Arc::clone(&client));

        let err = service.generate(request("Vectors", 3.0)).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedOutput(_)));

        let response = service.generate(request("Vectors", 3.0)).await.unwrap();
        assert!(!response.cached);
        assert_eq!(response.quiz.items.len(), 3);
    }
}
