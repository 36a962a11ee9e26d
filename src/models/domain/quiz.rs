use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lenient;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Mixed,
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "mixed" => Ok(Difficulty::Mixed),
            _ => Err("difficulty must be easy|medium|hard|mixed".to_string()),
        }
    }
}

fn schema_version_v1() -> u32 {
    1
}

/// Quiz document returned by the model and served to the client.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(default = "schema_version_v1")]
    pub schema_version: u32,
    #[serde(default)]
    pub quiz_title: String,
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<QuizItem>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuizItem {
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub id: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub difficulty: String,
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: String,
    #[validate(length(equal = 4, message = "options must have exactly 4 entries"))]
    pub options: Vec<String>,
    #[serde(deserialize_with = "lenient::index_number")]
    #[validate(range(max = 3, message = "correctIndex must be 0..=3"))]
    pub correct_index: u8,
    #[serde(default)]
    pub explanation_bullets: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    #[serde(default)]
    pub fast_tip: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item() -> serde_json::Value {
        json!({
            "id": "q1",
            "topic": "Vectors",
            "difficulty": "easy",
            "question": "|i_hat + j_hat| = ?",
            "options": ["1", "sqrt(2)", "2", "0"],
            "correctIndex": 1,
            "explanationBullets": ["Magnitude is sqrt(1 + 1)"],
            "commonMistakes": ["Adding magnitudes directly"],
            "fastTip": "Perpendicular unit vectors: sqrt(2)"
        })
    }

    #[test]
    fn difficulty_parses_allowed_values_only() {
        assert_eq!("mixed".parse::<Difficulty>(), Ok(Difficulty::Mixed));
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("extreme".parse::<Difficulty>().is_err());
        assert!("Easy".parse::<Difficulty>().is_err());
    }

    #[test]
    fn quiz_deserializes_camel_case_payload() {
        let quiz: Quiz = serde_json::from_value(json!({
            "schemaVersion": 1,
            "quizTitle": "Vectors drill",
            "items": [item()]
        }))
        .unwrap();

        assert_eq!(quiz.quiz_title, "Vectors drill");
        assert_eq!(quiz.items[0].correct_index, 1);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn quiz_with_three_options_fails_validation() {
        let mut bad = item();
        bad["options"] = json!(["a", "b", "c"]);
        let quiz: Quiz = serde_json::from_value(json!({ "items": [bad] })).unwrap();

        assert_eq!(quiz.schema_version, 1);
        assert!(quiz.validate().is_err());
    }

    #[test]
    fn quiz_without_items_fails_validation() {
        let quiz: Quiz = serde_json::from_value(json!({ "items": [] })).unwrap();
        assert!(quiz.validate().is_err());
    }

    #[test]
    fn quiz_item_tolerates_numeric_id_and_string_index() {
        let mut loose = item();
        loose["id"] = json!(1);
        loose["correctIndex"] = json!("3");
        let quiz: Quiz = serde_json::from_value(json!({ "items": [loose] })).unwrap();

        assert_eq!(quiz.items[0].id, "1");
        assert_eq!(quiz.items[0].correct_index, 3);
        assert!(quiz.validate().is_ok());
    }

    #[test]
    fn quiz_serializes_back_to_camel_case() {
        let quiz: Quiz = serde_json::from_value(json!({ "items": [item()] })).unwrap();
        let value = serde_json::to_value(&quiz).unwrap();

        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["items"][0]["fastTip"], "Perpendicular unit vectors: sqrt(2)");
    }
}
