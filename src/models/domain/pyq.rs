use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::lenient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Physics,
    Chemistry,
}

impl Subject {
    pub fn as_str(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Physics => "physics",
            Subject::Chemistry => "chemistry",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "math" => Ok(Subject::Math),
            "physics" => Ok(Subject::Physics),
            "chemistry" => Ok(Subject::Chemistry),
            _ => Err("subject must be math|physics|chemistry".to_string()),
        }
    }
}

fn schema_version_v1() -> u32 {
    1
}

/// A generated set of PYQ-style practice questions.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PyqSet {
    #[serde(default = "schema_version_v1")]
    pub schema_version: u32,
    #[validate(length(min = 1, message = "items must not be empty"), nested)]
    pub items: Vec<PyqItem>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PyqItem {
    #[serde(default, deserialize_with = "lenient::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::lenient_year")]
    pub year: u32,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub chapter: String,
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
    pub solution: String,
    #[serde(default)]
    pub why_others_wrong: Vec<String>,
}
