pub mod conversation;
pub mod grammar;

use thiserror::Error;

pub use conversation::{ConversationContent, DialogueLine, GrammarNote, Lesson, Scenario, VocabItem};
pub use grammar::{ExerciseItem, GrammarContent, Hint, ModuleContent, UnitKey};

/// A lookup against the static curriculum came back empty. Recoverable:
/// views render an empty state instead of content.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ContentError {
    #[error("no module content for unit {0}")]
    UnitNotFound(UnitKey),
    #[error("no content for lesson {0}")]
    LessonNotFound(u32),
}
