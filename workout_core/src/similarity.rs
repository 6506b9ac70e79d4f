//! Structural comparison of workout trees.
//!
//! `similar` is field-by-field equality that ignores each node's
//! [`ObjectId`](crate::ObjectId), so a decoded tree can be compared with one
//! built by hand, or two decodes of the same plan deduplicated.

use crate::{Goal, GoalSet, Step, StepVariant, Workout};

/// Structural equality, ignoring opaque instance identifiers
pub trait Similar {
    fn similar(&self, other: &Self) -> bool;
}

/// An absent node is only similar to another absent node
impl<T: Similar> Similar for Option<T> {
    fn similar(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.similar(b),
            (None, None) => true,
            _ => false,
        }
    }
}

/// Equal length and pairwise similar in position order
impl<T: Similar> Similar for [T] {
    fn similar(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.similar(b))
    }
}

impl<T: Similar> Similar for Vec<T> {
    fn similar(&self, other: &Self) -> bool {
        self.as_slice().similar(other.as_slice())
    }
}

impl Similar for Goal {
    fn similar(&self, other: &Self) -> bool {
        self.kind == other.kind && self.bounds == other.bounds
    }
}

impl Similar for GoalSet {
    fn similar(&self, other: &Self) -> bool {
        self.slots.iter().zip(&other.slots).all(|(a, b)| a.similar(b))
    }
}

impl Similar for StepVariant {
    fn similar(&self, other: &Self) -> bool {
        match (self, other) {
            (
                StepVariant::Segment { kind, unit },
                StepVariant::Segment {
                    kind: other_kind,
                    unit: other_unit,
                },
            ) => kind == other_kind && unit == other_unit,
            (StepVariant::Repetition { steps }, StepVariant::Repetition { steps: other_steps }) => {
                steps.similar(other_steps)
            }
            _ => false,
        }
    }
}

impl Similar for Step {
    fn similar(&self, other: &Self) -> bool {
        self.bounds == other.bounds
            && self.notes == other.notes
            && self.goals.similar(&other.goals)
            && self.variant.similar(&other.variant)
    }
}

impl Similar for Workout {
    fn similar(&self, other: &Self) -> bool {
        self.name == other.name && self.notes == other.notes && self.steps.similar(&other.steps)
    }
}
