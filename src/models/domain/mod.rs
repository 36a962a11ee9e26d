pub mod pyq;
pub mod quiz;
pub mod tutor;

pub use pyq::{PyqItem, PyqSet, Subject};
pub use quiz::{Difficulty, Quiz, QuizItem};
pub use tutor::{ChatRole, HistoryTurn, TutorMode};
