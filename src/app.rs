use std::collections::HashSet;
use std::sync::Arc;
use std::sync::mpsc;

use crate::config::Config;
use crate::curriculum::conversation::{ConversationContent, LESSON_PATH};
use crate::curriculum::grammar::{GrammarContent, UnitKey};
use crate::engine::dialogue::{DialogueCursor, VocabStep};
use crate::engine::drill::{DrillCursor, DrillStep};
use crate::engine::progress::ProgressState;
use crate::engine::unlock::UnlockPolicy;
use crate::event::AppEvent;
use crate::speech::http::HttpSynthesizer;
use crate::speech::playback;
use crate::speech::{SpeechCoordinator, SpeechMessage, SynthesisRequest, script_ssml};
use crate::store::ProgressStore;
use crate::ui::components::menu::Menu;
use crate::ui::components::phase_list::{self, HomeRow};
use crate::ui::theme::Theme;

/// The view state machine. Transitions are explicit targets; there is no
/// back stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Landing,
    GrammarHome,
    GrammarUnit,
    ConversationList,
    ConversationLesson,
}

pub struct App {
    pub screen: Screen,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub grammar: GrammarContent,
    pub conversations: ConversationContent,
    pub progress: ProgressState,
    pub store: Option<ProgressStore>,
    pub policy: UnlockPolicy,
    pub expanded_phases: HashSet<usize>,
    pub home_rows: Vec<HomeRow>,
    pub home_selected: usize,
    pub lesson_selected: usize,
    pub active_unit: Option<UnitKey>,
    pub drill: Option<DrillCursor>,
    pub active_lesson: Option<u32>,
    pub dialogue: Option<DialogueCursor>,
    pub speech: SpeechCoordinator,
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, tx: mpsc::Sender<AppEvent>) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let store = ProgressStore::new().ok();
        let progress = store.as_ref().map(|s| s.load()).unwrap_or_default();

        // Returning learners land with the first phase already open.
        let mut expanded_phases = HashSet::new();
        if !progress.completed().is_empty() {
            expanded_phases.insert(0);
        }
        let home_rows = phase_list::build_rows(&expanded_phases);

        let policy = config.unlock_policy();
        let synthesizer = Arc::new(HttpSynthesizer::new(config.tts_endpoint.clone()));
        let speech = SpeechCoordinator::new(synthesizer, playback::default_sink(), tx);

        Self {
            screen: Screen::Landing,
            config,
            theme,
            menu,
            grammar: GrammarContent::load(),
            conversations: ConversationContent::load(),
            progress,
            store,
            policy,
            expanded_phases,
            home_rows,
            home_selected: 0,
            lesson_selected: 0,
            active_unit: None,
            drill: None,
            active_lesson: None,
            dialogue: None,
            speech,
            notice: None,
            should_quit: false,
        }
    }

    // View transitions. Each one stops in-flight audio and drops the
    // cursors the target view does not own.

    pub fn go_to_landing(&mut self) {
        self.speech.stop();
        self.active_unit = None;
        self.drill = None;
        self.active_lesson = None;
        self.dialogue = None;
        self.notice = None;
        self.screen = Screen::Landing;
    }

    pub fn go_to_grammar_home(&mut self) {
        self.speech.stop();
        self.active_unit = None;
        self.drill = None;
        self.notice = None;
        self.rebuild_home_rows();
        self.screen = Screen::GrammarHome;
    }

    pub fn go_to_conversation_list(&mut self) {
        self.speech.stop();
        self.active_lesson = None;
        self.dialogue = None;
        self.notice = None;
        self.screen = Screen::ConversationList;
    }

    /// Gated by the reachability policy; a locked unit ignores the open.
    pub fn open_unit(&mut self, key: UnitKey) {
        if !self.policy.reachable(key, self.progress.completed()) {
            return;
        }
        self.speech.stop();
        self.active_unit = Some(key);
        self.drill = Some(DrillCursor::new());
        self.notice = None;
        self.screen = Screen::GrammarUnit;
    }

    /// Lessons without bundled content still open; the view renders the
    /// not-found state.
    pub fn open_lesson(&mut self, id: u32) {
        self.speech.stop();
        self.active_lesson = Some(id);
        self.dialogue = Some(DialogueCursor::new());
        self.notice = None;
        self.screen = Screen::ConversationLesson;
    }

    // --- Grammar home ---

    fn rebuild_home_rows(&mut self) {
        self.home_rows = phase_list::build_rows(&self.expanded_phases);
        if self.home_selected >= self.home_rows.len() {
            self.home_selected = self.home_rows.len().saturating_sub(1);
        }
    }

    pub fn toggle_phase(&mut self, phase: usize) {
        if !self.expanded_phases.remove(&phase) {
            self.expanded_phases.insert(phase);
        }
        self.rebuild_home_rows();
    }

    pub fn home_next(&mut self) {
        if self.home_selected + 1 < self.home_rows.len() {
            self.home_selected += 1;
        }
    }

    pub fn home_prev(&mut self) {
        self.home_selected = self.home_selected.saturating_sub(1);
    }

    pub fn home_activate(&mut self) {
        match self.home_rows.get(self.home_selected).copied() {
            Some(HomeRow::Phase(phase)) => self.toggle_phase(phase),
            Some(HomeRow::Unit(key)) => self.open_unit(key),
            None => {}
        }
    }

    // --- Grammar unit ---

    pub fn unit_next(&mut self) {
        let Some(key) = self.active_unit else { return };
        let step = {
            let Ok(content) = self.grammar.module(key) else { return };
            let Some(cursor) = self.drill.as_mut() else { return };
            cursor.clamp(content);
            cursor.next(content)
        };
        match step {
            DrillStep::Advanced | DrillStep::EnteredExtended => {}
            DrillStep::Finished => self.finish_unit(key),
        }
    }

    pub fn unit_prev(&mut self) {
        let Some(key) = self.active_unit else { return };
        let Ok(content) = self.grammar.module(key) else { return };
        if let Some(cursor) = self.drill.as_mut() {
            cursor.clamp(content);
            cursor.prev(content);
        }
    }

    pub fn unit_flip(&mut self) {
        if let Some(cursor) = self.drill.as_mut() {
            cursor.toggle_reveal();
        }
    }

    /// The completion transition: the one place progress is mutated and
    /// persisted.
    fn finish_unit(&mut self, key: UnitKey) {
        self.progress.complete(key);
        let save_failed = self
            .store
            .as_ref()
            .is_some_and(|store| store.save(&self.progress).is_err());
        // Keep the phase holding the new focus visible on the way home.
        self.expanded_phases.insert(self.progress.focus().phase);
        self.go_to_grammar_home();
        if save_failed {
            self.notice = Some("Could not save progress".to_string());
        }
    }

    pub fn speak_exercise(&mut self) {
        if self.speech.is_busy() {
            return;
        }
        let Some(key) = self.active_unit else { return };
        let Ok(content) = self.grammar.module(key) else { return };
        let Some(item) = self.drill.as_ref().and_then(|c| c.current(content)) else {
            return;
        };
        let request = SynthesisRequest::text(item.bengali());
        self.speech.speak(request);
    }

    // --- Conversation ---

    pub fn lesson_next(&mut self) {
        if self.lesson_selected + 1 < LESSON_PATH.len() {
            self.lesson_selected += 1;
        }
    }

    pub fn lesson_prev(&mut self) {
        self.lesson_selected = self.lesson_selected.saturating_sub(1);
    }

    pub fn lesson_activate(&mut self) {
        if let Some(def) = LESSON_PATH.get(self.lesson_selected) {
            self.open_lesson(def.id);
        }
    }

    pub fn vocab_next(&mut self) {
        let Some(id) = self.active_lesson else { return };
        let step = {
            let Ok(lesson) = self.conversations.lesson(id) else { return };
            let Some(cursor) = self.dialogue.as_mut() else { return };
            cursor.next_vocab(lesson)
        };
        match step {
            VocabStep::Advanced => {}
            // Scenario change cancels whatever was playing.
            VocabStep::NextScenario => self.speech.stop(),
            VocabStep::LessonDone => self.go_to_conversation_list(),
        }
    }

    pub fn vocab_prev(&mut self) {
        if let Some(cursor) = self.dialogue.as_mut() {
            cursor.prev_vocab();
        }
    }

    pub fn flip_script(&mut self) {
        if let Some(cursor) = self.dialogue.as_mut() {
            cursor.toggle_script();
        }
    }

    pub fn flip_vocab(&mut self) {
        if let Some(cursor) = self.dialogue.as_mut() {
            cursor.toggle_vocab();
        }
    }

    pub fn speak_vocab(&mut self) {
        if self.speech.is_busy() {
            return;
        }
        let Some(id) = self.active_lesson else { return };
        let Ok(lesson) = self.conversations.lesson(id) else { return };
        let Some(item) = self.dialogue.as_ref().and_then(|c| c.current_vocab(lesson)) else {
            return;
        };
        let request = SynthesisRequest::text(item.bengali.clone())
            .with_rate(self.config.speaking_rate)
            .with_pitch(self.config.pitch);
        self.speech.speak(request);
    }

    pub fn speak_scenario(&mut self) {
        if self.speech.is_busy() {
            return;
        }
        let Some(id) = self.active_lesson else { return };
        let Ok(lesson) = self.conversations.lesson(id) else { return };
        let Some(scenario) = self.dialogue.as_ref().and_then(|c| c.current_scenario(lesson))
        else {
            return;
        };
        let ssml = script_ssml(
            &scenario.dialogue,
            &self.config.voice_primary,
            &self.config.voice_secondary,
        );
        let request = SynthesisRequest::ssml(ssml)
            .with_rate(self.config.speaking_rate)
            .with_pitch(self.config.pitch);
        self.speech.speak(request);
    }

    // --- Speech completions ---

    pub fn on_speech(&mut self, message: SpeechMessage) {
        if let Err(err) = self.speech.on_message(message) {
            self.notice = Some(err.to_string());
        }
    }
}
