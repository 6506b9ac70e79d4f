//! Tag vocabulary: canonical tags and the aliases accepted for them.
//!
//! Upstream producers rarely stick to the canonical spelling, so every
//! concept has a small table of exact aliases that are consulted before the
//! fuzzy matcher is given a chance.

use crate::types::{GoalKind, SegmentKind, Unit};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Canonical tag of the top-level workout object
pub const WORKOUT: &str = "workout";

/// Canonical tag of a repetition step
pub const REPETITION: &str = "repetition";

/// Canonical step tags, in the order reported by diagnostics
pub const VALID_STEPS: &[&str] = &["repetition", "run", "recover", "rest", "warm-up", "cool-down"];

/// Canonical goal tags, in the order reported by diagnostics
pub const VALID_GOALS: &[&str] = &[
    "speed",
    "heart_rate",
    "heart_rate_zone",
    "cadence",
    "power",
    "lap_time",
];

/// Spellings that mean "repetition", canonical first
pub const REPETITION_ALIASES: &[&str] = &["repetition", "repeat", "loop"];

/// Step aliases in lookup order. Canonical tags map to themselves.
const STEP_ALIASES: &[(&str, SegmentKind)] = &[
    ("run", SegmentKind::Run),
    ("work", SegmentKind::Run),
    ("recover", SegmentKind::Recover),
    ("recovery", SegmentKind::Recover),
    ("rest", SegmentKind::Rest),
    ("break", SegmentKind::Rest),
    ("warm-up", SegmentKind::WarmUp),
    ("warmup", SegmentKind::WarmUp),
    ("wu", SegmentKind::WarmUp),
    ("cool-down", SegmentKind::CoolDown),
    ("cooldown", SegmentKind::CoolDown),
    ("cd", SegmentKind::CoolDown),
];

/// Goal aliases in lookup order. Canonical tags map to themselves.
const GOAL_ALIASES: &[(&str, GoalKind)] = &[
    ("speed", GoalKind::Speed),
    ("pace", GoalKind::Speed),
    ("heart_rate", GoalKind::HeartRate),
    ("hr", GoalKind::HeartRate),
    ("heart_rate_zone", GoalKind::HeartRateZone),
    ("hr_zone", GoalKind::HeartRateZone),
    ("zone", GoalKind::HeartRateZone),
    ("cadence", GoalKind::Cadence),
    ("power", GoalKind::Power),
    ("lap_time", GoalKind::LapTime),
    ("lap", GoalKind::LapTime),
    ("time", GoalKind::LapTime),
];

const UNIT_ALIASES: &[(&str, Unit)] = &[
    ("seconds", Unit::Seconds),
    ("second", Unit::Seconds),
    ("secs", Unit::Seconds),
    ("sec", Unit::Seconds),
    ("s", Unit::Seconds),
    ("meters", Unit::Meters),
    ("meter", Unit::Meters),
    ("metres", Unit::Meters),
    ("metre", Unit::Meters),
    ("m", Unit::Meters),
    ("miles", Unit::Miles),
    ("mile", Unit::Miles),
    ("mi", Unit::Miles),
];

/// Alias tables, built once and shared by every decode call
pub struct Vocabulary {
    steps: HashMap<&'static str, SegmentKind>,
    goals: HashMap<&'static str, GoalKind>,
    units: HashMap<&'static str, Unit>,
    step_tags: Vec<&'static str>,
    goal_tags: Vec<&'static str>,
}

static VOCABULARY: Lazy<Vocabulary> = Lazy::new(Vocabulary::build);

/// Get a reference to the shared alias tables
pub fn vocabulary() -> &'static Vocabulary {
    &VOCABULARY
}

impl Vocabulary {
    fn build() -> Self {
        Self {
            steps: STEP_ALIASES.iter().copied().collect(),
            goals: GOAL_ALIASES.iter().copied().collect(),
            units: UNIT_ALIASES.iter().copied().collect(),
            step_tags: STEP_ALIASES.iter().map(|(tag, _)| *tag).collect(),
            goal_tags: GOAL_ALIASES.iter().map(|(tag, _)| *tag).collect(),
        }
    }

    /// Exact (already case-folded) lookup in the step table
    pub fn step(&self, tag: &str) -> Option<SegmentKind> {
        self.steps.get(tag).copied()
    }

    /// Exact (already case-folded) lookup in the goal table
    pub fn goal(&self, tag: &str) -> Option<GoalKind> {
        self.goals.get(tag).copied()
    }

    pub fn is_repetition(&self, tag: &str) -> bool {
        REPETITION_ALIASES.iter().any(|alias| *alias == tag)
    }

    /// Resolve a unit spelling, ignoring case and surrounding whitespace
    pub fn unit(&self, raw: &str) -> Option<Unit> {
        self.units.get(raw.trim().to_lowercase().as_str()).copied()
    }

    /// Every recognised step spelling, canonical and alias, in table order
    pub fn step_tags(&self) -> &[&'static str] {
        &self.step_tags
    }

    /// Every recognised goal spelling, canonical and alias, in table order
    pub fn goal_tags(&self) -> &[&'static str] {
        &self.goal_tags
    }

    /// Check the tables for consistency
    ///
    /// Returns a list of problems, or an empty Vec if the tables are sound.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.steps.len() != STEP_ALIASES.len() {
            errors.push("Step alias table has duplicate spellings".to_string());
        }
        if self.goals.len() != GOAL_ALIASES.len() {
            errors.push("Goal alias table has duplicate spellings".to_string());
        }

        for tag in self.steps.keys() {
            if self.goals.contains_key(tag) {
                errors.push(format!("'{}' is both a step and a goal alias", tag));
            }
            if self.is_repetition(tag) {
                errors.push(format!("'{}' is both a step and a repetition alias", tag));
            }
        }

        for kind in SegmentKind::ALL {
            if self.step(kind.tag()) != Some(kind) {
                errors.push(format!("Canonical step tag '{}' is not self-mapped", kind.tag()));
            }
        }
        for kind in GoalKind::ALL {
            if self.goal(kind.tag()) != Some(kind) {
                errors.push(format!("Canonical goal tag '{}' is not self-mapped", kind.tag()));
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_validate() {
        let errors = vocabulary().validate();
        assert!(errors.is_empty(), "Vocabulary has errors: {:?}", errors);
    }

    #[test]
    fn test_step_aliases() {
        let vocab = vocabulary();
        assert_eq!(vocab.step("work"), Some(SegmentKind::Run));
        assert_eq!(vocab.step("recovery"), Some(SegmentKind::Recover));
        assert_eq!(vocab.step("break"), Some(SegmentKind::Rest));
        assert_eq!(vocab.step("wu"), Some(SegmentKind::WarmUp));
        assert_eq!(vocab.step("cd"), Some(SegmentKind::CoolDown));
        assert_eq!(vocab.step("sprint"), None);
    }

    #[test]
    fn test_goal_aliases() {
        let vocab = vocabulary();
        assert_eq!(vocab.goal("pace"), Some(GoalKind::Speed));
        assert_eq!(vocab.goal("hr"), Some(GoalKind::HeartRate));
        assert_eq!(vocab.goal("zone"), Some(GoalKind::HeartRateZone));
        assert_eq!(vocab.goal("time"), Some(GoalKind::LapTime));
        assert_eq!(vocab.goal("run"), None);
    }

    #[test]
    fn test_repetition_aliases() {
        let vocab = vocabulary();
        assert!(vocab.is_repetition("repeat"));
        assert!(vocab.is_repetition("loop"));
        assert!(!vocab.is_repetition("run"));
    }

    #[test]
    fn test_unit_aliases() {
        let vocab = vocabulary();
        assert_eq!(vocab.unit("Seconds"), Some(Unit::Seconds));
        assert_eq!(vocab.unit(" metres "), Some(Unit::Meters));
        assert_eq!(vocab.unit("mi"), Some(Unit::Miles));
        assert_eq!(vocab.unit("km"), None);
    }

    #[test]
    fn test_valid_lists_match_kinds() {
        assert_eq!(VALID_STEPS[0], REPETITION);
        for (kind, tag) in SegmentKind::ALL.iter().zip(&VALID_STEPS[1..]) {
            assert_eq!(kind.tag(), *tag);
        }
        for (kind, tag) in GoalKind::ALL.iter().zip(VALID_GOALS) {
            assert_eq!(kind.tag(), *tag);
        }
    }
}
