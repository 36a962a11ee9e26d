use serde::Serialize;

use crate::models::domain::{PyqSet, Quiz};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorResponse {
    pub cached: bool,
    pub cache_key: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResponse {
    pub cached: bool,
    pub cache_key: String,
    pub quiz: Quiz,
}

/// The set's `schemaVersion` and `items` sit beside the cache metadata
/// rather than under a nested key.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PyqResponse {
    pub cached: bool,
    pub cache_key: String,
    #[serde(flatten)]
    pub set: PyqSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}
