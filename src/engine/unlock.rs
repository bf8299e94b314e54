use std::collections::HashSet;

use crate::curriculum::grammar::UnitKey;

/// The reachability rule for grammar units. The first unit is always
/// reachable and completed units stay revisitable; everything else is this
/// one predicate, selected by config so product rules can change without
/// touching navigation mechanics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnlockPolicy {
    /// Only the very first unit opens.
    FirstOnly,
    /// A unit opens once the unit immediately before it (phase-major
    /// order) is completed.
    #[default]
    Stepwise,
    /// Every unit is always open.
    Open,
}

impl UnlockPolicy {
    pub fn to_key(self) -> &'static str {
        match self {
            UnlockPolicy::FirstOnly => "first-only",
            UnlockPolicy::Stepwise => "stepwise",
            UnlockPolicy::Open => "open",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "first-only" => Some(UnlockPolicy::FirstOnly),
            "stepwise" => Some(UnlockPolicy::Stepwise),
            "open" => Some(UnlockPolicy::Open),
            _ => None,
        }
    }

    pub fn reachable(self, key: UnitKey, completed: &HashSet<UnitKey>) -> bool {
        if !key.exists() {
            return false;
        }
        if key == UnitKey::first() || completed.contains(&key) {
            return true;
        }
        match self {
            UnlockPolicy::FirstOnly => false,
            UnlockPolicy::Stepwise => key
                .predecessor()
                .is_some_and(|prev| completed.contains(&prev)),
            UnlockPolicy::Open => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> HashSet<UnitKey> {
        raw.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn first_unit_is_always_reachable() {
        let empty = HashSet::new();
        for policy in [UnlockPolicy::FirstOnly, UnlockPolicy::Stepwise, UnlockPolicy::Open] {
            assert!(policy.reachable(UnitKey::first(), &empty));
        }
    }

    #[test]
    fn first_only_admits_nothing_else() {
        let completed = keys(&["0-0", "0-1"]);
        assert!(!UnlockPolicy::FirstOnly.reachable(UnitKey::new(0, 2), &completed));
    }

    #[test]
    fn stepwise_unlocks_behind_the_predecessor() {
        let empty = HashSet::new();
        assert!(!UnlockPolicy::Stepwise.reachable(UnitKey::new(0, 1), &empty));

        let completed = keys(&["0-0"]);
        assert!(UnlockPolicy::Stepwise.reachable(UnitKey::new(0, 1), &completed));
        assert!(!UnlockPolicy::Stepwise.reachable(UnitKey::new(0, 2), &completed));

        // Phase boundary: 1-0 unlocks once 0-2 (last of phase 0) completes.
        let end_of_phase = keys(&["0-0", "0-1", "0-2"]);
        assert!(UnlockPolicy::Stepwise.reachable(UnitKey::new(1, 0), &end_of_phase));
    }

    #[test]
    fn open_admits_everything_real() {
        let empty = HashSet::new();
        assert!(UnlockPolicy::Open.reachable(UnitKey::new(3, 6), &empty));
        assert!(!UnlockPolicy::Open.reachable(UnitKey::new(9, 0), &empty));
    }

    #[test]
    fn completed_units_stay_revisitable() {
        let completed = keys(&["0-0", "0-1", "0-2"]);
        assert!(UnlockPolicy::Stepwise.reachable(UnitKey::new(0, 1), &completed));
    }

    #[test]
    fn policy_keys_round_trip() {
        for policy in [UnlockPolicy::FirstOnly, UnlockPolicy::Stepwise, UnlockPolicy::Open] {
            assert_eq!(UnlockPolicy::from_key(policy.to_key()), Some(policy));
        }
        assert_eq!(UnlockPolicy::from_key("everything"), None);
    }
}
