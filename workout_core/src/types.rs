//! Core domain types for workout plans.
//!
//! This module defines the typed tree the decoder produces:
//! - Units and the closed sets of step and goal kinds
//! - Goals and the fixed-slot goal collection
//! - Steps, including repetitions that own child steps
//! - The top-level workout

use crate::bounds::Bounds;
use crate::{Error, Result};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Identity
// ============================================================================

/// Opaque per-instance identifier, for display and debugging only.
///
/// Never part of equality: two nodes built from the same fields are similar
/// even though their identifiers differ.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0.simple())
    }
}

// ============================================================================
// Kinds and Units
// ============================================================================

/// Measurement unit of a segment step's quantity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Seconds,
    Meters,
    Miles,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Seconds => "seconds",
            Unit::Meters => "meters",
            Unit::Miles => "miles",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of a non-repetition step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentKind {
    Run,
    Recover,
    Rest,
    WarmUp,
    CoolDown,
}

impl SegmentKind {
    pub const ALL: [SegmentKind; 5] = [
        SegmentKind::Run,
        SegmentKind::Recover,
        SegmentKind::Rest,
        SegmentKind::WarmUp,
        SegmentKind::CoolDown,
    ];

    /// Canonical tag
    pub fn tag(&self) -> &'static str {
        match self {
            SegmentKind::Run => "run",
            SegmentKind::Recover => "recover",
            SegmentKind::Rest => "rest",
            SegmentKind::WarmUp => "warm-up",
            SegmentKind::CoolDown => "cool-down",
        }
    }
}

/// Kind of any step, repetition included
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Segment(SegmentKind),
    Repetition,
}

impl StepKind {
    /// Canonical tag
    pub fn tag(&self) -> &'static str {
        match self {
            StepKind::Segment(kind) => kind.tag(),
            StepKind::Repetition => crate::vocabulary::REPETITION,
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Kind of a goal. The unit is implied by the kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GoalKind {
    /// Speed or pace, m/s
    Speed,
    /// Beats per minute
    HeartRate,
    /// Zone 1-5
    HeartRateZone,
    /// Strides per minute
    Cadence,
    /// Watts
    Power,
    /// Seconds
    LapTime,
}

impl GoalKind {
    pub const ALL: [GoalKind; 6] = [
        GoalKind::Speed,
        GoalKind::HeartRate,
        GoalKind::HeartRateZone,
        GoalKind::Cadence,
        GoalKind::Power,
        GoalKind::LapTime,
    ];

    /// Canonical tag
    pub fn tag(&self) -> &'static str {
        match self {
            GoalKind::Speed => "speed",
            GoalKind::HeartRate => "heart_rate",
            GoalKind::HeartRateZone => "heart_rate_zone",
            GoalKind::Cadence => "cadence",
            GoalKind::Power => "power",
            GoalKind::LapTime => "lap_time",
        }
    }

    fn slot(&self) -> usize {
        match self {
            GoalKind::Speed => 0,
            GoalKind::HeartRate => 1,
            GoalKind::HeartRateZone => 2,
            GoalKind::Cadence => 3,
            GoalKind::Power => 4,
            GoalKind::LapTime => 5,
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Trim free text; empty or whitespace-only text becomes `None`
pub(crate) fn clean_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ============================================================================
// Goals
// ============================================================================

/// A target metric attached to a step
#[derive(Clone, Debug)]
pub struct Goal {
    pub(crate) id: ObjectId,
    pub(crate) kind: GoalKind,
    pub(crate) bounds: Bounds,
}

impl Goal {
    /// Build a goal. An inverted minimum/maximum pair is swapped.
    pub fn new(kind: GoalKind, bounds: Bounds) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            bounds: Bounds::new(bounds.value, bounds.minimum, bounds.maximum),
        }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> GoalKind {
        self.kind
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn value(&self) -> Option<f64> {
        self.bounds.value
    }

    pub fn minimum(&self) -> Option<f64> {
        self.bounds.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.bounds.maximum
    }

    /// A goal with no value and no bounds carries no information.
    /// Generators sometimes emit these as placeholders.
    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }
}

/// At most one goal of each kind.
///
/// Duplicates resolve last-write-wins: a later goal of the same kind
/// replaces the earlier one.
#[derive(Clone, Debug, Default)]
pub struct GoalSet {
    pub(crate) slots: [Option<Goal>; 6],
}

impl GoalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot each goal by its kind, in order
    pub fn from_goals(goals: impl IntoIterator<Item = Goal>) -> Self {
        let mut set = Self::new();
        for goal in goals {
            if let Some(previous) = set.insert(goal) {
                tracing::debug!("Replacing duplicate {} goal {}", previous.kind, previous.id);
            }
        }
        set
    }

    /// Store a goal in its slot, returning the goal it replaced
    pub fn insert(&mut self, goal: Goal) -> Option<Goal> {
        self.slots[goal.kind.slot()].replace(goal)
    }

    pub fn get(&self, kind: GoalKind) -> Option<&Goal> {
        self.slots[kind.slot()].as_ref()
    }

    /// Present goals in slot order
    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.slots.iter().flatten()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// No slot holds a goal with any value or bound
    pub fn is_empty(&self) -> bool {
        self.iter().all(Goal::is_empty)
    }
}

// ============================================================================
// Steps
// ============================================================================

/// What distinguishes one step from another beyond the shared fields
#[derive(Clone, Debug)]
pub enum StepVariant {
    /// Run, recover, rest, warm-up or cool-down; quantity measured in `unit`
    Segment {
        kind: SegmentKind,
        unit: Option<Unit>,
    },
    /// Repeat the child steps; the quantity is the repeat count
    Repetition { steps: Vec<Step> },
}

/// One segment of a workout
#[derive(Clone, Debug)]
pub struct Step {
    pub(crate) id: ObjectId,
    pub(crate) variant: StepVariant,
    pub(crate) bounds: Bounds,
    pub(crate) notes: Option<String>,
    pub(crate) goals: GoalSet,
}

impl Step {
    /// Build a step, enforcing the step invariants:
    /// - an inverted minimum/maximum pair is swapped
    /// - a missing value is derived from the bounds
    /// - blank notes become `None`
    /// - a repetition must own at least one step
    pub fn new(variant: StepVariant, bounds: Bounds, notes: Option<&str>, goals: GoalSet) -> Result<Self> {
        if let StepVariant::Repetition { steps } = &variant {
            if steps.is_empty() {
                return Err(Error::EmptyRepetition);
            }
        }

        Ok(Self {
            id: ObjectId::new(),
            variant,
            bounds: Bounds::new(bounds.value, bounds.minimum, bounds.maximum).with_derived_value(),
            notes: clean_text(notes),
            goals,
        })
    }

    /// A run/recover/rest/warm-up/cool-down step with no notes or goals
    pub fn segment(kind: SegmentKind, unit: Option<Unit>, bounds: Bounds) -> Self {
        Self {
            id: ObjectId::new(),
            variant: StepVariant::Segment { kind, unit },
            bounds: Bounds::new(bounds.value, bounds.minimum, bounds.maximum).with_derived_value(),
            notes: None,
            goals: GoalSet::new(),
        }
    }

    /// A repetition of `steps`; `bounds` describes the repeat count
    pub fn repetition(bounds: Bounds, steps: Vec<Step>) -> Result<Self> {
        Self::new(StepVariant::Repetition { steps }, bounds, None, GoalSet::new())
    }

    pub fn with_notes(self, notes: &str) -> Self {
        Self {
            notes: clean_text(Some(notes)),
            ..self
        }
    }

    pub fn with_goals(self, goals: GoalSet) -> Self {
        Self { goals, ..self }
    }

    pub fn id(&self) -> ObjectId {
        self.id
    }

    pub fn kind(&self) -> StepKind {
        match &self.variant {
            StepVariant::Segment { kind, .. } => StepKind::Segment(*kind),
            StepVariant::Repetition { .. } => StepKind::Repetition,
        }
    }

    pub fn variant(&self) -> &StepVariant {
        &self.variant
    }

    pub fn is_repetition(&self) -> bool {
        matches!(self.variant, StepVariant::Repetition { .. })
    }

    /// Unit of a segment step; always `None` for a repetition
    pub fn unit(&self) -> Option<Unit> {
        match &self.variant {
            StepVariant::Segment { unit, .. } => *unit,
            StepVariant::Repetition { .. } => None,
        }
    }

    /// Child steps of a repetition; empty for a segment
    pub fn steps(&self) -> &[Step] {
        match &self.variant {
            StepVariant::Segment { .. } => &[],
            StepVariant::Repetition { steps } => steps,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn value(&self) -> Option<f64> {
        self.bounds.value
    }

    pub fn minimum(&self) -> Option<f64> {
        self.bounds.minimum
    }

    pub fn maximum(&self) -> Option<f64> {
        self.bounds.maximum
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn goals(&self) -> &GoalSet {
        &self.goals
    }
}

// ============================================================================
// Workout
// ============================================================================

/// Top-level plan: an ordered list of steps
#[derive(Clone, Debug, Default)]
pub struct Workout {
    pub(crate) name: Option<String>,
    pub(crate) steps: Vec<Step>,
    pub(crate) notes: Option<String>,
}

impl Workout {
    /// Build a workout; name and notes are trimmed and blank text dropped.
    pub fn new(name: Option<&str>, steps: Vec<Step>, notes: Option<&str>) -> Self {
        Self {
            name: clean_text(name),
            steps,
            notes: clean_text(notes),
        }
    }

    /// An unnamed workout with no notes
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self::new(None, steps, None)
    }

    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: clean_text(Some(name)),
            ..self
        }
    }

    pub fn with_notes(self, notes: &str) -> Self {
        Self {
            notes: clean_text(Some(notes)),
            ..self
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Number of steps including those nested in repetitions
    pub fn total_steps(&self) -> usize {
        fn count(steps: &[Step]) -> usize {
            steps.iter().map(|s| 1 + count(s.steps())).sum()
        }
        count(&self.steps)
    }
}

// ============================================================================
// Display
// ============================================================================

fn write_bounds(f: &mut fmt::Formatter<'_>, bounds: &Bounds, unit: Option<&str>) -> fmt::Result {
    let suffix = unit.map(|u| format!(" {}", u)).unwrap_or_default();
    let range = match (bounds.minimum, bounds.maximum) {
        (Some(lo), Some(hi)) => Some(format!("{} to {}{}", lo, hi, suffix)),
        (Some(lo), None) => Some(format!("> {}{}", lo, suffix)),
        (None, Some(hi)) => Some(format!("< {}{}", hi, suffix)),
        (None, None) => None,
    };

    match (bounds.value, range) {
        (Some(v), Some(range)) => write!(f, "{}; target: {}{}", range, v, suffix),
        (Some(v), None) => write!(f, "{}{}", v, suffix),
        (None, Some(range)) => f.write_str(&range),
        (None, None) => f.write_str("-"),
    }
}

impl Goal {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}goal {}: ", "", self.kind, indent = depth * 2)?;
        write_bounds(f, &self.bounds, None)?;
        writeln!(f)
    }
}

impl Step {
    fn write_tree(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        write!(f, "{:indent$}{} <{}>: ", "", self.kind(), self.id, indent = depth * 2)?;
        match &self.variant {
            StepVariant::Segment { unit, .. } => {
                write_bounds(f, &self.bounds, unit.as_ref().map(Unit::as_str))?;
            }
            StepVariant::Repetition { .. } => {
                f.write_str("x ")?;
                write_bounds(f, &self.bounds, None)?;
            }
        }
        if let Some(notes) = &self.notes {
            write!(f, " ({})", notes)?;
        }
        writeln!(f)?;

        for goal in self.goals.iter() {
            goal.write_tree(f, depth + 1)?;
        }
        for child in self.steps() {
            child.write_tree(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_tree(f, 0)
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => writeln!(f, "Workout: {}", name)?,
            None => writeln!(f, "Workout: (unnamed)")?,
        }
        for step in &self.steps {
            step.write_tree(f, 1)?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f, "Notes: {}", notes)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(value: f64) -> Step {
        Step::segment(SegmentKind::Run, Some(Unit::Seconds), Bounds::value(value))
    }

    #[test]
    fn test_step_swaps_inverted_bounds() {
        let step = Step::segment(SegmentKind::Run, Some(Unit::Seconds), Bounds {
            value: None,
            minimum: Some(360.0),
            maximum: Some(300.0),
        });
        assert_eq!(step.minimum(), Some(300.0));
        assert_eq!(step.maximum(), Some(360.0));
        assert_eq!(step.value(), Some(330.0));
    }

    #[test]
    fn test_goal_swaps_inverted_bounds() {
        let goal = Goal::new(GoalKind::HeartRate, Bounds {
            value: None,
            minimum: Some(160.0),
            maximum: Some(140.0),
        });
        assert_eq!(goal.minimum(), Some(140.0));
        assert_eq!(goal.maximum(), Some(160.0));
        // goals never synthesize a value
        assert_eq!(goal.value(), None);
    }

    #[test]
    fn test_blank_notes_become_none() {
        let step = run(60.0).with_notes("   ");
        assert_eq!(step.notes(), None);
        let step = run(60.0).with_notes("  easy ");
        assert_eq!(step.notes(), Some("easy"));
    }

    #[test]
    fn test_empty_repetition_fails() {
        let result = Step::repetition(Bounds::value(4.0), vec![]);
        assert!(matches!(result, Err(Error::EmptyRepetition)));
    }

    #[test]
    fn test_repetition_accessors() {
        let rep = Step::repetition(Bounds::value(4.0), vec![run(300.0), run(60.0)]).unwrap();
        assert!(rep.is_repetition());
        assert_eq!(rep.kind(), StepKind::Repetition);
        assert_eq!(rep.unit(), None);
        assert_eq!(rep.steps().len(), 2);
        assert_eq!(rep.value(), Some(4.0));
    }

    #[test]
    fn test_goal_set_last_write_wins() {
        let set = GoalSet::from_goals(vec![
            Goal::new(GoalKind::Power, Bounds::value(200.0)),
            Goal::new(GoalKind::Cadence, Bounds::value(180.0)),
            Goal::new(GoalKind::Power, Bounds::value(250.0)),
        ]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(GoalKind::Power).and_then(Goal::value), Some(250.0));
        assert!(set.get(GoalKind::Speed).is_none());
    }

    #[test]
    fn test_goal_set_of_empty_goals_is_empty() {
        let set = GoalSet::from_goals(vec![Goal::new(GoalKind::Speed, Bounds::default())]);
        assert_eq!(set.len(), 1);
        assert!(set.is_empty());
        assert!(GoalSet::new().is_empty());
    }

    #[test]
    fn test_ids_are_distinct() {
        assert_ne!(run(1.0).id(), run(1.0).id());
    }

    #[test]
    fn test_workout_trims_name_and_notes() {
        let workout = Workout::new(Some("  Tempo  "), vec![run(600.0)], Some(" \n "));
        assert_eq!(workout.name(), Some("Tempo"));
        assert_eq!(workout.notes(), None);
    }

    #[test]
    fn test_total_steps_counts_nested() {
        let rep = Step::repetition(Bounds::value(4.0), vec![run(300.0), run(60.0)]).unwrap();
        let workout = Workout::from_steps(vec![run(600.0), rep]);
        assert_eq!(workout.total_steps(), 4);
    }

    #[test]
    fn test_display_tree() {
        let step = Step::segment(SegmentKind::Run, Some(Unit::Seconds), Bounds::range(300.0, 360.0))
            .with_notes("T pace")
            .with_goals(GoalSet::from_goals(vec![Goal::new(GoalKind::HeartRate, Bounds::range(150.0, 160.0))]));
        let rep = Step::repetition(Bounds::value(4.0), vec![step]).unwrap();
        let text = Workout::from_steps(vec![rep]).with_name("Threshold").to_string();

        assert!(text.starts_with("Workout: Threshold\n"));
        assert!(text.contains("repetition <"));
        assert!(text.contains(">: x 4\n"));
        assert!(text.contains("300 to 360 seconds; target: 330 seconds (T pace)"));
        assert!(text.contains("      goal heart_rate: 150 to 160\n"));
    }
}
