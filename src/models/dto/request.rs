use serde::Deserialize;
use validator::Validate;

use crate::errors::AppError;
use crate::models::domain::{Difficulty, HistoryTurn, Subject, TutorMode};
use crate::models::lenient;
use crate::services::fingerprint::sha256_hex;

pub const MAX_IMAGE_DATA_URL_CHARS: u64 = 2_500_000;
pub const MAX_QUESTION_CHARS: usize = 2000;
pub const MAX_HISTORY_TURNS: usize = 6;

pub const DEFAULT_QUESTION_COUNT: u8 = 5;
pub const QUIZ_QUESTION_RANGE: (u8, u8) = (3, 15);
pub const PYQ_QUESTION_RANGE: (u8, u8) = (3, 10);

// Raw bodies: everything optional and scalar-tolerant so missing or
// mistyped fields produce our own field-specific messages instead of serde's.

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequestBody {
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub chapter: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub subtopic: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub image_data_url: Option<String>,
    pub conversation_history: Option<Vec<HistoryTurn>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizRequestBody {
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient::loose_number")]
    pub n_questions: Option<f64>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PyqRequestBody {
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient::scalar_string")]
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "lenient::loose_number")]
    pub n_questions: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct TutorRequest {
    pub mode: TutorMode,
    pub subject: String,
    pub chapter: String,
    pub subtopic: String,
    pub question: String,
    #[validate(length(
        max = 2_500_000,
        message = "Image too large. Please upload a smaller screenshot (try crop) and retry."
    ))]
    pub image_data_url: String,
    pub history: Vec<HistoryTurn>,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct QuizRequest {
    #[validate(length(min = 1, max = 200, message = "topic must be 1-200 characters"))]
    pub topic: String,
    #[validate(range(min = 3, max = 15))]
    pub n_questions: u8,
    pub difficulty: Difficulty,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct PyqRequest {
    pub subject: Option<Subject>,
    #[validate(length(min = 1, max = 200, message = "topic must be 1-200 characters"))]
    pub topic: String,
    pub difficulty: Difficulty,
    #[validate(range(min = 3, max = 10))]
    pub n_questions: u8,
}

impl TryFrom<TutorRequestBody> for TutorRequest {
    type Error = AppError;

    fn try_from(body: TutorRequestBody) -> Result<Self, Self::Error> {
        let mode = trimmed(body.mode);
        if mode.is_empty() {
            return Err(AppError::ValidationError(
                "Missing required field: mode".to_string(),
            ));
        }
        let mode: TutorMode = mode.parse().map_err(AppError::ValidationError)?;

        let question = trimmed(body.question);
        let subtopic = trimmed(body.subtopic);
        let image_data_url = trimmed(body.image_data_url);
        if question.is_empty() && subtopic.is_empty() && image_data_url.is_empty() {
            return Err(AppError::ValidationError(
                "Provide either subtopic or question or imageDataUrl".to_string(),
            ));
        }

        if !image_data_url.is_empty() && !image_data_url.starts_with("data:image/") {
            return Err(AppError::ValidationError(
                "imageDataUrl must be a data:image/* base64 data URL".to_string(),
            ));
        }
        if question.chars().count() > MAX_QUESTION_CHARS {
            return Err(AppError::ValidationError(
                "Question too long. Please shorten to <= 2000 characters.".to_string(),
            ));
        }

        let mut history = body.conversation_history.unwrap_or_default();
        if history.len() > MAX_HISTORY_TURNS {
            history.drain(..history.len() - MAX_HISTORY_TURNS);
        }

        let request = TutorRequest {
            mode,
            subject: trimmed(body.subject).to_lowercase(),
            chapter: trimmed(body.chapter),
            subtopic,
            question,
            image_data_url,
            history,
        };
        request.validate()?;
        Ok(request)
    }
}

impl TryFrom<QuizRequestBody> for QuizRequest {
    type Error = AppError;

    fn try_from(body: QuizRequestBody) -> Result<Self, Self::Error> {
        let topic = trimmed(body.topic);
        if topic.is_empty() {
            return Err(AppError::ValidationError(
                "Missing required field: topic".to_string(),
            ));
        }

        let request = QuizRequest {
            topic,
            n_questions: clamp_question_count(body.n_questions, QUIZ_QUESTION_RANGE),
            difficulty: parse_difficulty(body.difficulty)?,
            subject: trimmed(body.subject),
        };
        request.validate()?;
        Ok(request)
    }
}

impl TryFrom<PyqRequestBody> for PyqRequest {
    type Error = AppError;

    fn try_from(body: PyqRequestBody) -> Result<Self, Self::Error> {
        let topic = trimmed(body.topic);
        if topic.is_empty() {
            return Err(AppError::ValidationError(
                "Missing required field: topic".to_string(),
            ));
        }

        let subject = trimmed(body.subject);
        let subject = if subject.is_empty() {
            None
        } else {
            Some(subject.parse::<Subject>().map_err(AppError::ValidationError)?)
        };

        let request = PyqRequest {
            subject,
            topic,
            difficulty: parse_difficulty(body.difficulty)?,
            n_questions: clamp_question_count(body.n_questions, PYQ_QUESTION_RANGE),
        };
        request.validate()?;
        Ok(request)
    }
}

impl TutorRequest {
    /// Prompt text for the current turn. Optional context lines are omitted
    /// when empty; the mode line is always present.
    pub fn user_message(&self) -> String {
        let mut lines = Vec::new();
        if !self.subject.is_empty() {
            lines.push(format!("Subject: {}", self.subject));
        }
        if !self.chapter.is_empty() {
            lines.push(format!("Chapter: {}", self.chapter));
        }
        if !self.subtopic.is_empty() {
            lines.push(format!("Subtopic: {}", self.subtopic));
        }
        lines.push(format!("Tutor mode: {}", self.mode.prompt_label()));
        if !self.question.is_empty() {
            lines.push(format!("\nStudent's question: {}", self.question));
        }
        lines.join("\n")
    }

    /// Image and history are folded in as digests so that the same question
    /// asked with a different screenshot or conversation never collides.
    pub fn cache_key(&self) -> String {
        let image = if self.image_data_url.is_empty() {
            "none".to_string()
        } else {
            sha256_hex(&self.image_data_url)
        };
        let history = if self.history.is_empty() {
            "none".to_string()
        } else {
            let texts: Vec<&str> = self
                .history
                .iter()
                .map(|turn| turn.text.as_deref().unwrap_or(""))
                .collect();
            sha256_hex(&serde_json::to_string(&texts).unwrap_or_default())
        };
        sha256_hex(&format!(
            "tutor:v3|{}|img:{}|hist:{}",
            self.user_message(),
            image,
            history
        ))
    }

    /// Bare greetings and acknowledgements with no topic context attached.
    pub fn is_small_talk(&self) -> bool {
        const GREETINGS: &[&str] = &[
            "hi",
            "hello",
            "hey",
            "hii",
            "hlo",
            "yo",
            "ok",
            "okay",
            "thanks",
            "thank you",
            "thx",
            "good morning",
            "good afternoon",
            "good evening",
        ];

        if !self.image_data_url.is_empty()
            || !self.subject.is_empty()
            || !self.chapter.is_empty()
            || !self.subtopic.is_empty()
        {
            return false;
        }

        let text = self.question.trim().to_lowercase();
        if text.is_empty() {
            return false;
        }
        GREETINGS.contains(&text.as_str())
            || (text.len() <= 4 && text.chars().all(|c| c.is_ascii_lowercase()))
    }
}

impl QuizRequest {
    pub fn user_message(&self) -> String {
        let mut lines = vec!["Create a quiz for JEE MAINS.".to_string()];
        if !self.subject.is_empty() {
            lines.push(format!("Subject preference: {}", self.subject));
        }
        lines.push(format!(
            "Topic: \"{}\" (please infer the intended JEE topic if misspelled)",
            self.topic
        ));
        lines.push(format!("Number of questions: {}", self.n_questions));
        lines.push(format!("Difficulty: {}", self.difficulty));
        lines.push("Return strict JSON as per schema. Use unique ids.".to_string());
        lines.join("\n")
    }

    pub fn cache_key(&self) -> String {
        sha256_hex(&format!("quiz:v2|{}", self.user_message()))
    }
}

impl PyqRequest {
    pub fn user_message(&self) -> String {
        let mut lines = vec!["Create PYQ-style MCQs for JEE MAINS practice.".to_string()];
        if let Some(subject) = self.subject {
            lines.push(format!("Subject: {subject}"));
        }
        lines.push(format!("Topic: {}", self.topic));
        lines.push(format!("Difficulty: {}", self.difficulty));
        lines.push(format!("Number of questions: {}", self.n_questions));
        lines.push(
            "Chapters should be specific (e.g., 'Kinematics', 'Vectors', 'Mole Concept')."
                .to_string(),
        );
        lines.push("Return strict JSON only.".to_string());
        lines.join("\n")
    }

    pub fn cache_key(&self) -> String {
        sha256_hex(&format!("pyqgen:v1|{}", self.user_message()))
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn parse_difficulty(value: Option<String>) -> Result<Difficulty, AppError> {
    let value = trimmed(value);
    if value.is_empty() {
        return Ok(Difficulty::default());
    }
    value.parse().map_err(AppError::ValidationError)
}

/// Floors and clamps a requested item count. Missing values use the default.
fn clamp_question_count(requested: Option<f64>, (min, max): (u8, u8)) -> u8 {
    match requested {
        Some(n) if n.is_finite() => n.floor().clamp(f64::from(min), f64::from(max)) as u8,
        _ => DEFAULT_QUESTION_COUNT.clamp(min, max),
    }
}
