use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::curriculum::ContentError;

// --- Static curriculum shape ---

pub struct PhaseDefinition {
    pub title: &'static str,
    pub modules: &'static [&'static str],
}

pub const PHASES: &[PhaseDefinition] = &[
    PhaseDefinition {
        title: "Phase I: Foundations – Sound, Script, and The Self",
        modules: &[
            "Module 1: The Soundscape of Bengal – Vowels and Phonics",
            "Module 2: The Architecture of Identity – Pronouns & Honorifics",
            "Module 3: The \"Zero Verb\" & Basic Sentences",
        ],
    },
    PhaseDefinition {
        title: "Phase II: Action and Time – The Verb System",
        modules: &[
            "Module 4: The Present Indefinite (Simple Present)",
            "Module 5: Present Continuous (Ongoing Action)",
            "Module 6: Negation and Interrogatives",
        ],
    },
    PhaseDefinition {
        title: "Phase III: Time Travel – Past and Future Tenses",
        modules: &[
            "Module 7: The Future Tense",
            "Module 8: The Simple Past Tense",
        ],
    },
    PhaseDefinition {
        title: "Phase IV: Immersion and Context",
        modules: &[
            "Module 9: The Family (Paribar)",
            "Module 10: Food and Dining (Khabar)",
            "Module 11: Imperatives and Requests",
            "Module 12: Numbers and Shopping",
            "Module 13: The Body and Feelings",
            "Module 14: Complex Sentences & Conjunctions",
            "Module 15: Idioms and Colloquialisms",
        ],
    },
];

pub fn phase_count() -> usize {
    PHASES.len()
}

pub fn module_count(phase: usize) -> usize {
    PHASES.get(phase).map_or(0, |p| p.modules.len())
}

/// All units in phase-major, module-minor order. This order is load-bearing:
/// it defines reachability predecessors and the focus scan.
pub fn units() -> impl Iterator<Item = UnitKey> {
    PHASES.iter().enumerate().flat_map(|(phase, def)| {
        (0..def.modules.len()).map(move |module| UnitKey { phase, module })
    })
}

// --- Unit key ---

/// Address of one grammar unit: a `(phase, module)` pair. Renders as
/// `"0-0"`; this string is what the progress store persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey {
    pub phase: usize,
    pub module: usize,
}

impl UnitKey {
    pub fn new(phase: usize, module: usize) -> Self {
        Self { phase, module }
    }

    pub fn first() -> Self {
        Self { phase: 0, module: 0 }
    }

    pub fn exists(self) -> bool {
        self.module < module_count(self.phase)
    }

    /// The unit immediately before this one in phase-major order, if any.
    pub fn predecessor(self) -> Option<UnitKey> {
        if self.module > 0 {
            return Some(UnitKey::new(self.phase, self.module - 1));
        }
        let mut phase = self.phase;
        while phase > 0 {
            phase -= 1;
            let count = module_count(phase);
            if count > 0 {
                return Some(UnitKey::new(phase, count - 1));
            }
        }
        None
    }

    pub fn module_title(self) -> Option<&'static str> {
        PHASES.get(self.phase).and_then(|p| p.modules.get(self.module)).copied()
    }

    /// Module title with the `"Module N: "` prefix stripped, for headers.
    pub fn short_title(self) -> Option<&'static str> {
        self.module_title()
            .map(|t| t.split_once(": ").map_or(t, |(_, rest)| rest))
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.phase, self.module)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidUnitKey;

impl FromStr for UnitKey {
    type Err = InvalidUnitKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (phase, module) = s.split_once('-').ok_or(InvalidUnitKey)?;
        Ok(UnitKey {
            phase: phase.parse().map_err(|_| InvalidUnitKey)?,
            module: module.parse().map_err(|_| InvalidUnitKey)?,
        })
    }
}

// --- Exercise content ---

/// One flashcard. `Letter` has no reverse side; `Word` flips to its
/// translation.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ExerciseItem {
    Letter {
        bengali: String,
        transliteration: String,
    },
    Word {
        bengali: String,
        transliteration: String,
        english: String,
    },
}

impl ExerciseItem {
    pub fn bengali(&self) -> &str {
        match self {
            ExerciseItem::Letter { bengali, .. } | ExerciseItem::Word { bengali, .. } => bengali,
        }
    }

    pub fn transliteration(&self) -> &str {
        match self {
            ExerciseItem::Letter { transliteration, .. }
            | ExerciseItem::Word { transliteration, .. } => transliteration,
        }
    }

    pub fn english(&self) -> Option<&str> {
        match self {
            ExerciseItem::Letter { .. } => None,
            ExerciseItem::Word { english, .. } => Some(english),
        }
    }

}

/// Explanatory text shown alongside the primary sequence, switched by
/// cursor position (the shipped content changes its note partway through).
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Hint {
    pub from_index: usize,
    pub text: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ModuleContent {
    #[serde(default)]
    pub primary: Vec<ExerciseItem>,
    #[serde(default)]
    pub extended: Vec<ExerciseItem>,
    #[serde(default)]
    pub hints: Vec<Hint>,
    #[serde(default)]
    pub extended_hint: Option<String>,
}

impl ModuleContent {
    pub fn sequence(&self, extended: bool) -> &[ExerciseItem] {
        if extended { &self.extended } else { &self.primary }
    }

    /// The hint for a cursor position: last hint whose `from_index` is not
    /// past `index` while in the primary sequence; `extended_hint` after.
    pub fn hint_for(&self, index: usize, extended: bool) -> Option<&str> {
        if extended {
            return self.extended_hint.as_deref();
        }
        self.hints
            .iter()
            .filter(|h| h.from_index <= index)
            .next_back()
            .map(|h| h.text.as_str())
    }
}

const MODULES_JSON: &str = include_str!("../../assets/curriculum/modules.json");

/// Bundled exercise content, keyed by unit key. Sparse: units without an
/// entry render the empty state.
pub struct GrammarContent {
    modules: HashMap<String, ModuleContent>,
}

impl GrammarContent {
    pub fn load() -> Self {
        let modules: HashMap<String, ModuleContent> =
            serde_json::from_str(MODULES_JSON).unwrap_or_default();
        Self { modules }
    }

    pub fn module(&self, key: UnitKey) -> Result<&ModuleContent, ContentError> {
        self.modules
            .get(&key.to_string())
            .ok_or(ContentError::UnitNotFound(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curriculum_shape_matches_shipped_phases() {
        let counts: Vec<usize> = PHASES.iter().map(|p| p.modules.len()).collect();
        assert_eq!(counts, vec![3, 3, 2, 7]);
        assert_eq!(units().count(), 15);
    }

    #[test]
    fn unit_key_round_trips_through_display() {
        let key = UnitKey::new(3, 6);
        let parsed: UnitKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn unit_key_rejects_malformed_strings() {
        assert!("".parse::<UnitKey>().is_err());
        assert!("3".parse::<UnitKey>().is_err());
        assert!("a-b".parse::<UnitKey>().is_err());
        assert!("1-".parse::<UnitKey>().is_err());
    }

    #[test]
    fn predecessor_crosses_phase_boundary() {
        assert_eq!(UnitKey::new(0, 0).predecessor(), None);
        assert_eq!(UnitKey::new(0, 2).predecessor(), Some(UnitKey::new(0, 1)));
        assert_eq!(UnitKey::new(1, 0).predecessor(), Some(UnitKey::new(0, 2)));
        assert_eq!(UnitKey::new(3, 0).predecessor(), Some(UnitKey::new(2, 1)));
    }

    #[test]
    fn bundled_content_has_first_module() {
        let content = GrammarContent::load();
        let module = content.module(UnitKey::first()).unwrap();
        assert!(!module.primary.is_empty());
        assert!(!module.extended.is_empty());
        assert!(module.primary.iter().any(|e| e.english().is_some()));
    }

    #[test]
    fn missing_module_is_content_not_found() {
        let content = GrammarContent::load();
        let key = UnitKey::new(3, 6);
        assert_eq!(content.module(key), Err(ContentError::UnitNotFound(key)));
    }

    #[test]
    fn hint_selection_tracks_cursor_position() {
        let module = ModuleContent {
            primary: Vec::new(),
            extended: Vec::new(),
            hints: vec![
                Hint { from_index: 0, text: "early".into() },
                Hint { from_index: 6, text: "late".into() },
            ],
            extended_hint: Some("extended".into()),
        };
        assert_eq!(module.hint_for(0, false), Some("early"));
        assert_eq!(module.hint_for(5, false), Some("early"));
        assert_eq!(module.hint_for(6, false), Some("late"));
        assert_eq!(module.hint_for(13, false), Some("late"));
        assert_eq!(module.hint_for(0, true), Some("extended"));
    }
}
