//! Normalization: collapse redundant bounds into their minimal form.
//!
//! `compressed` hands back the node itself, borrowed, when nothing in its
//! subtree can be collapsed. Only nodes that actually change are rebuilt,
//! so normalizing an already-normal tree allocates nothing.

use crate::{Goal, GoalSet, ObjectId, Step, StepVariant, Workout};
use std::borrow::Cow;

/// Removal of bounds made redundant by another bound or the target value
pub trait Compress: Clone {
    /// Whether `compressed` would change anything
    fn is_compressible(&self) -> bool;

    /// Normalized copy, or `self` when already normal.
    ///
    /// Idempotent: compressing a compressed node returns it unchanged.
    fn compressed(&self) -> Cow<'_, Self>;
}

impl Compress for Goal {
    fn is_compressible(&self) -> bool {
        self.bounds.is_compressible()
    }

    fn compressed(&self) -> Cow<'_, Self> {
        if !self.is_compressible() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(Goal {
            id: ObjectId::new(),
            kind: self.kind,
            bounds: self.bounds.compressed(),
        })
    }
}

impl Compress for GoalSet {
    /// Empty goals are dropped from their slots, remaining goals compressed.
    /// A set left with no goals is the absent set.
    fn is_compressible(&self) -> bool {
        self.iter().any(|goal| goal.is_empty() || goal.is_compressible())
    }

    fn compressed(&self) -> Cow<'_, Self> {
        if !self.is_compressible() {
            return Cow::Borrowed(self);
        }
        let goals = self
            .iter()
            .filter(|goal| !goal.is_empty())
            .map(|goal| goal.compressed().into_owned());
        Cow::Owned(GoalSet::from_goals(goals))
    }
}

impl Compress for Step {
    fn is_compressible(&self) -> bool {
        self.bounds.is_compressible()
            || self.goals.is_compressible()
            || self.steps().iter().any(Compress::is_compressible)
    }

    fn compressed(&self) -> Cow<'_, Self> {
        if !self.is_compressible() {
            return Cow::Borrowed(self);
        }

        let variant = match &self.variant {
            StepVariant::Segment { kind, unit } => StepVariant::Segment {
                kind: *kind,
                unit: *unit,
            },
            StepVariant::Repetition { steps } => StepVariant::Repetition {
                steps: compress_all(steps).into_owned(),
            },
        };

        // compression never drops the value, so no re-derivation is needed
        Cow::Owned(Step {
            id: ObjectId::new(),
            variant,
            bounds: self.bounds.compressed(),
            notes: self.notes.clone(),
            goals: self.goals.compressed().into_owned(),
        })
    }
}

impl Compress for Workout {
    fn is_compressible(&self) -> bool {
        self.steps.iter().any(Compress::is_compressible)
    }

    fn compressed(&self) -> Cow<'_, Self> {
        if !self.is_compressible() {
            return Cow::Borrowed(self);
        }
        Cow::Owned(Workout {
            name: self.name.clone(),
            steps: compress_all(&self.steps).into_owned(),
            notes: self.notes.clone(),
        })
    }
}

/// Compress a step list, borrowing it whole when no step changes
fn compress_all(steps: &[Step]) -> Cow<'_, [Step]> {
    if !steps.iter().any(Compress::is_compressible) {
        return Cow::Borrowed(steps);
    }
    Cow::Owned(steps.iter().map(|s| s.compressed().into_owned()).collect())
}
