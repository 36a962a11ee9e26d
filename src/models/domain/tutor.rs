use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TutorMode {
    Beginner,
    Revision,
    Advanced,
}

impl TutorMode {
    /// Completion token ceiling per mode. Advanced answers carry derivations
    /// and edge cases, revision answers are deliberately short.
    pub fn max_tokens(self) -> u32 {
        match self {
            TutorMode::Beginner => 1200,
            TutorMode::Revision => 800,
            TutorMode::Advanced => 1600,
        }
    }

    /// Label used inside prompts; matches the mode headings of the tutor
    /// system prompt.
    pub fn prompt_label(self) -> &'static str {
        match self {
            TutorMode::Beginner => "Beginner",
            TutorMode::Revision => "Revision",
            TutorMode::Advanced => "Advanced (200+)",
        }
    }
}

impl fmt::Display for TutorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt_label())
    }
}

impl FromStr for TutorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Beginner" => Ok(TutorMode::Beginner),
            "Revision" => Ok(TutorMode::Revision),
            "Advanced" | "Advanced (200+)" => Ok(TutorMode::Advanced),
            _ => Err("Invalid mode. Use: Beginner | Revision | Advanced".to_string()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One prior turn of the tutor conversation as sent by the client.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct HistoryTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl HistoryTurn {
    /// Turns with an unrecognised role or no text are not replayed.
    pub fn as_message(&self) -> Option<(ChatRole, &str)> {
        let role = match self.role.as_str() {
            "user" => ChatRole::User,
            "assistant" => ChatRole::Assistant,
            _ => return None,
        };
        self.text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
            .map(|text| (role, text))
    }
}
