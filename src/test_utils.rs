#[cfg(test)]
pub mod fixtures {
    use serde_json::{json, Value};

    pub fn quiz_item(id: &str) -> Value {
        json!({
            "id": id,
            "topic": "Vectors",
            "difficulty": "easy",
            "question": "Angle between i_hat and j_hat?",
            "options": ["0", "45 degrees", "90 degrees", "180 degrees"],
            "correctIndex": 2,
            "explanationBullets": ["Unit vectors along axes are perpendicular"],
            "commonMistakes": ["Confusing dot and cross product"],
            "fastTip": "i_hat · j_hat = 0"
        })
    }

    /// A well-formed quiz payload with `n` items, serialized as the model
    /// would return it.
    pub fn quiz_json(n: usize) -> String {
        let items: Vec<Value> = (1..=n).map(|i| quiz_item(&format!("q{i}"))).collect();
        json!({
            "schemaVersion": 1,
            "quizTitle": "Vectors practice",
            "items": items
        })
        .to_string()
    }

    pub fn pyq_json(n: usize) -> String {
        let items: Vec<Value> = (1..=n)
            .map(|i| {
                json!({
                    "id": format!("p{i}"),
                    "year": 2024,
                    "subject": "physics",
                    "chapter": "Kinematics",
                    "difficulty": "medium",
                    "question": "A ball is dropped from 20 m. Time to reach ground? (g = 10)",
                    "options": ["1 s", "2 s", "3 s", "4 s"],
                    "correctIndex": 1,
                    "solution": "h = g t^2 / 2 gives t = 2 s",
                    "whyOthersWrong": ["Too short", "Too long", "Too long"]
                })
            })
            .collect();
        json!({ "schemaVersion": 1, "items": items }).to_string()
    }
}

#[cfg(test)]
pub mod test_helpers {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex, PoisonError},
    };

    use async_trait::async_trait;

    use crate::{
        app_state::AppState,
        config::Config,
        errors::{AppError, AppResult},
        services::model_service::{CompletionClient, CompletionRequest},
    };

    /// Completion client that replays canned responses in order. The last
    /// response repeats once the script runs out.
    pub struct ScriptedClient {
        responses: Mutex<VecDeque<AppResult<String>>>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedClient {
        pub fn new(responses: Vec<AppResult<String>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn always(output: impl Into<String>) -> Self {
            Self::new(vec![Ok(output.into())])
        }

        pub fn always_err(err: AppError) -> Self {
            Self::new(vec![Err(err)])
        }

        pub fn call_count(&self) -> usize {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        pub fn requests(&self) -> Vec<CompletionRequest> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, request: &CompletionRequest) -> AppResult<String> {
            self.requests
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(request.clone());

            let mut responses = self.responses.lock().unwrap_or_else(PoisonError::into_inner);
            match responses.len() {
                0 => Err(AppError::Upstream("no scripted response".to_string())),
                1 => responses[0].clone(),
                _ => responses
                    .pop_front()
                    .unwrap_or_else(|| Err(AppError::Upstream("no scripted response".to_string()))),
            }
        }
    }

    pub fn test_state(client: Arc<ScriptedClient>) -> AppState {
        AppState::with_client(Config::test_config(), client)
    }

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: actix_web::http::StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::test_helpers::*;
    use crate::errors::AppError;
    use crate::services::model_service::{CompletionClient, CompletionRequest};

    #[test]
    fn test_fixtures_produce_valid_json() {
        let quiz: serde_json::Value = serde_json::from_str(&quiz_json(3)).unwrap();
        let pyq: serde_json::Value = serde_json::from_str(&pyq_json(2)).unwrap();

        assert_eq!(quiz["items"].as_array().unwrap().len(), 3);
        assert_eq!(pyq["items"][1]["id"], "p2");
    }

    #[tokio::test]
    async fn test_scripted_client_replays_then_repeats_last() {
        let client = ScriptedClient::new(vec![
            Err(AppError::Upstream("first".to_string())),
            Ok("second".to_string()),
        ]);
        let request = CompletionRequest::new("system", "user");

        assert!(client.complete(&request).await.is_err());
        assert_eq!(client.complete(&request).await.unwrap(), "second");
        assert_eq!(client.complete(&request).await.unwrap(), "second");
        assert_eq!(client.call_count(), 3);
    }
}
