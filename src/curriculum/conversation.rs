use std::collections::HashMap;

use serde::Deserialize;

use crate::curriculum::ContentError;

// --- Static lesson path ---

pub struct LessonDefinition {
    pub id: u32,
    pub title: &'static str,
}

pub const LESSON_PATH: &[LessonDefinition] = &[
    LessonDefinition { id: 1, title: "Absolute Basics" },
    LessonDefinition { id: 2, title: "Daily Actions & Movement" },
    LessonDefinition { id: 3, title: "Food & Preferences" },
    LessonDefinition { id: 4, title: "Time & Routine" },
    LessonDefinition { id: 5, title: "Simple Social Interaction" },
    LessonDefinition { id: 6, title: "Polite / Soft Bengali" },
    LessonDefinition { id: 7, title: "Emotion & Opinion" },
];

// --- Lesson content ---

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub bengali: String,
    pub transliteration: String,
    pub english: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct VocabItem {
    pub bengali: String,
    pub transliteration: String,
    pub english: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct GrammarNote {
    pub title: String,
    pub points: Vec<String>,
}

/// One mini-dialogue with its vocabulary breakdown.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Scenario {
    pub image: String,
    pub dialogue: Vec<DialogueLine>,
    pub vocabulary: Vec<VocabItem>,
    #[serde(default)]
    pub note: Option<GrammarNote>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Lesson {
    pub title: String,
    pub scenarios: Vec<Scenario>,
}

const LESSONS_JSON: &str = include_str!("../../assets/curriculum/lessons.json");

/// Bundled scenario content, keyed by lesson id. Sparse: the lesson path
/// lists every lesson, but ids without content render the not-found state.
pub struct ConversationContent {
    lessons: HashMap<u32, Lesson>,
}

impl ConversationContent {
    pub fn load() -> Self {
        let by_key: HashMap<String, Lesson> =
            serde_json::from_str(LESSONS_JSON).unwrap_or_default();
        let lessons = by_key
            .into_iter()
            .filter_map(|(id, lesson)| id.parse().ok().map(|id: u32| (id, lesson)))
            .collect();
        Self { lessons }
    }

    pub fn lesson(&self, id: u32) -> Result<&Lesson, ContentError> {
        self.lessons.get(&id).ok_or(ContentError::LessonNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lesson_path_ids_are_unique_and_ordered() {
        for pair in LESSON_PATH.windows(2) {
            assert!(pair[0].id < pair[1].id);
        }
    }

    #[test]
    fn bundled_content_has_first_lesson() {
        let content = ConversationContent::load();
        let lesson = content.lesson(1).unwrap();
        assert_eq!(lesson.title, "Absolute Basics");
        assert_eq!(lesson.scenarios.len(), 3);
        for scenario in &lesson.scenarios {
            assert!(!scenario.dialogue.is_empty());
            assert!(!scenario.vocabulary.is_empty());
        }
        // The second and third scenarios carry grammar notes.
        assert!(lesson.scenarios[0].note.is_none());
        assert!(lesson.scenarios[1].note.is_some());
    }

    #[test]
    fn missing_lesson_is_content_not_found() {
        let content = ConversationContent::load();
        assert_eq!(content.lesson(7), Err(ContentError::LessonNotFound(7)));
    }
}
