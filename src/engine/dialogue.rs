use crate::curriculum::conversation::{Lesson, Scenario, VocabItem};

/// What a forward vocabulary step did. `NextScenario` carries the
/// obligation to cancel in-flight audio; `LessonDone` exits to the lesson
/// list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VocabStep {
    Advanced,
    NextScenario,
    LessonDone,
}

/// Cursor through a conversation lesson: which scenario is on screen, which
/// vocabulary card is up, and both reveal flags. Ephemeral, like the drill
/// cursor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DialogueCursor {
    pub scenario: usize,
    pub vocab: usize,
    pub script_revealed: bool,
    pub vocab_revealed: bool,
}

impl DialogueCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_scenario<'a>(&self, lesson: &'a Lesson) -> Option<&'a Scenario> {
        lesson.scenarios.get(self.scenario)
    }

    pub fn current_vocab<'a>(&self, lesson: &'a Lesson) -> Option<&'a VocabItem> {
        self.current_scenario(lesson)?.vocabulary.get(self.vocab)
    }

    pub fn next_vocab(&mut self, lesson: &Lesson) -> VocabStep {
        let Some(scenario) = lesson.scenarios.get(self.scenario) else {
            return VocabStep::LessonDone;
        };
        if self.vocab + 1 < scenario.vocabulary.len() {
            self.vocab += 1;
            self.vocab_revealed = false;
            return VocabStep::Advanced;
        }
        if self.scenario + 1 < lesson.scenarios.len() {
            // Reset the vocab index here, before the next render, so the new
            // scenario is never read through the old index.
            self.scenario += 1;
            self.vocab = 0;
            self.vocab_revealed = false;
            self.script_revealed = false;
            return VocabStep::NextScenario;
        }
        VocabStep::LessonDone
    }

    /// No cross-scenario regression: at vocabulary index 0 this is a no-op,
    /// asymmetric with `next_vocab`'s rollover.
    pub fn prev_vocab(&mut self) {
        if self.vocab > 0 {
            self.vocab -= 1;
            self.vocab_revealed = false;
        }
    }

    pub fn toggle_script(&mut self) {
        self.script_revealed = !self.script_revealed;
    }

    pub fn toggle_vocab(&mut self) {
        self.vocab_revealed = !self.vocab_revealed;
    }

    pub fn is_last_vocab(&self, lesson: &Lesson) -> bool {
        self.current_scenario(lesson)
            .is_some_and(|s| self.vocab + 1 >= s.vocabulary.len())
    }

    pub fn is_last_scenario(&self, lesson: &Lesson) -> bool {
        self.scenario + 1 >= lesson.scenarios.len()
    }
}
