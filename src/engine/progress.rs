use std::collections::HashSet;

use crate::curriculum::grammar::{self, UnitKey};

/// The learner's durable progress: which units are done and which one is
/// the recommended next. Owned by the app; leaf views read it but only the
/// completion transition mutates it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressState {
    completed: HashSet<UnitKey>,
    focus: UnitKey,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            completed: HashSet::new(),
            focus: UnitKey::first(),
        }
    }
}

impl ProgressState {
    /// Build from a completed set; focus becomes the first incomplete unit
    /// (the very first unit when everything is done).
    pub fn new(completed: HashSet<UnitKey>) -> Self {
        let focus = first_incomplete(&completed).unwrap_or_else(UnitKey::first);
        Self { completed, focus }
    }

    /// Build from a stored focus. A focus that no longer addresses a real
    /// unit is recomputed rather than kept dangling.
    pub fn with_focus(completed: HashSet<UnitKey>, focus: UnitKey) -> Self {
        if focus.exists() {
            Self { completed, focus }
        } else {
            Self::new(completed)
        }
    }

    pub fn completed(&self) -> &HashSet<UnitKey> {
        &self.completed
    }

    pub fn is_completed(&self, key: UnitKey) -> bool {
        self.completed.contains(&key)
    }

    pub fn focus(&self) -> UnitKey {
        self.focus
    }

    pub fn all_done(&self) -> bool {
        grammar::units().all(|key| self.completed.contains(&key))
    }

    /// The completion transition: record the unit and move focus to the
    /// next incomplete one. When every unit is complete the focus keeps its
    /// last value.
    pub fn complete(&mut self, key: UnitKey) {
        self.completed.insert(key);
        if let Some(next) = advance_focus(key, &self.completed) {
            self.focus = next;
        }
    }
}

pub fn first_incomplete(completed: &HashSet<UnitKey>) -> Option<UnitKey> {
    grammar::units().find(|key| !completed.contains(key))
}

/// Scan forward from a just-completed unit: rest of its phase first (lowest
/// module index), then subsequent phases in order. Phase-major, module-minor
/// is the sole tie-break; `None` when every unit is completed.
pub fn advance_focus(just_completed: UnitKey, completed: &HashSet<UnitKey>) -> Option<UnitKey> {
    for module in just_completed.module + 1..grammar::module_count(just_completed.phase) {
        let key = UnitKey::new(just_completed.phase, module);
        if !completed.contains(&key) {
            return Some(key);
        }
    }
    for phase in just_completed.phase + 1..grammar::phase_count() {
        for module in 0..grammar::module_count(phase) {
            let key = UnitKey::new(phase, module);
            if !completed.contains(&key) {
                return Some(key);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> HashSet<UnitKey> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn advance_focus_prefers_same_phase() {
        let completed = keys(&["0-0"]);
        let next = advance_focus(UnitKey::new(0, 0), &completed);
        assert_eq!(next, Some(UnitKey::new(0, 1)));
    }

    #[test]
    fn advance_focus_rolls_into_next_phase() {
        let completed = keys(&["0-0", "0-1", "0-2"]);
        let next = advance_focus(UnitKey::new(0, 2), &completed);
        assert_eq!(next, Some(UnitKey::new(1, 0)));
    }

    #[test]
    fn advance_focus_skips_completed_gaps() {
        // 0-1 already done out of order: completing 0-0 must land on 0-2.
        let completed = keys(&["0-0", "0-1"]);
        let next = advance_focus(UnitKey::new(0, 0), &completed);
        assert_eq!(next, Some(UnitKey::new(0, 2)));
    }

    #[test]
    fn advance_focus_never_returns_a_completed_unit() {
        let mut completed = HashSet::new();
        for key in grammar::units() {
            completed.insert(key);
            if let Some(next) = advance_focus(key, &completed) {
                assert!(!completed.contains(&next), "{next} already completed");
            }
        }
    }

    #[test]
    fn advance_focus_exhausted_returns_none() {
        let completed: HashSet<UnitKey> = grammar::units().collect();
        assert_eq!(advance_focus(UnitKey::new(3, 6), &completed), None);
    }

    #[test]
    fn fresh_state_focuses_first_unit() {
        let state = ProgressState::default();
        assert_eq!(state.focus(), UnitKey::first());
        assert!(state.completed().is_empty());
    }

    #[test]
    fn new_state_focuses_first_incomplete() {
        let state = ProgressState::new(keys(&["0-0", "0-1"]));
        assert_eq!(state.focus(), UnitKey::new(0, 2));
    }

    #[test]
    fn fully_complete_state_defaults_focus_to_first() {
        let state = ProgressState::new(grammar::units().collect());
        assert_eq!(state.focus(), UnitKey::first());
        assert!(state.all_done());
    }

    #[test]
    fn dangling_stored_focus_is_recomputed() {
        let state = ProgressState::with_focus(keys(&["0-0"]), UnitKey::new(9, 9));
        assert_eq!(state.focus(), UnitKey::new(0, 1));
    }

    #[test]
    fn complete_moves_focus_forward() {
        let mut state = ProgressState::default();
        state.complete(UnitKey::new(0, 0));
        assert!(state.is_completed(UnitKey::new(0, 0)));
        assert_eq!(state.focus(), UnitKey::new(0, 1));
    }

    #[test]
    fn completing_the_last_unit_keeps_final_focus() {
        let mut state = ProgressState::new(
            grammar::units().filter(|k| *k != UnitKey::new(3, 6)).collect(),
        );
        assert_eq!(state.focus(), UnitKey::new(3, 6));
        state.complete(UnitKey::new(3, 6));
        assert_eq!(state.focus(), UnitKey::new(3, 6));
    }
}
