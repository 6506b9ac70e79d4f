//! Tolerant decoder from generated JSON text to a typed [`Workout`].
//!
//! The text is parsed into a generic `serde_json::Value` first, then
//! transformed bottom-up: by the time an object is visited, every object and
//! list nested inside it has already been turned into a typed node. A
//! repetition therefore receives typed child steps, never raw records.
//!
//! Each object's `type` tag is resolved in order:
//! 1. exact canonical tag or alias ([`crate::vocabulary`])
//! 2. fuzzy match: plain ratio against "repetition", then weighted ratio
//!    against the step spellings and the goal spellings ([`crate::fuzzy`])
//!
//! Any failure aborts the whole decode; no partial workout is returned.

use crate::bounds::{self, Fields, MAX, MAXIMUM, MIN, MINIMUM, VALUE};
use crate::config::DecoderConfig;
use crate::fuzzy::{self, DEFAULT_FUZZY_THRESHOLD};
use crate::types::clean_text;
use crate::vocabulary::{vocabulary, REPETITION, WORKOUT};
use crate::{Error, Goal, GoalKind, GoalSet, Result, SegmentKind, Step, StepVariant, Workout};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const TYPE: &str = "type";
pub const STEPS: &str = "steps";
pub const GOALS: &str = "goals";
pub const NAME: &str = "name";
pub const NOTES: &str = "notes";
pub const UNIT: &str = "unit";

const BOUND_KEYS: [&str; 5] = [VALUE, MINIMUM, MIN, MAXIMUM, MAX];

/// Decode `text` with the default fuzzy threshold
pub fn decode(text: &str) -> Result<Workout> {
    Decoder::new().decode(text)
}

/// Remove the triple-backtick fence a generator often wraps its output in,
/// along with a language tag such as `json` on the opening fence line.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(body) = trimmed.strip_prefix("```") else {
        return trimmed.trim_end_matches('`').trim_end();
    };

    let body = body.trim_start_matches('`');
    let body = match body.split_once('\n') {
        Some((first, rest)) if is_language_tag(first) => rest,
        _ => body,
    };
    body.trim_end().trim_end_matches('`').trim()
}

fn is_language_tag(line: &str) -> bool {
    let line = line.trim();
    !line.is_empty() && line.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Resolved meaning of a `type` tag
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tag {
    Workout,
    Repetition,
    Segment(SegmentKind),
    Goal(GoalKind),
}

/// Where an object sits in the tree; picks the error reported for a tag
/// that cannot be resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Context {
    Step,
    Goal,
}

impl Context {
    fn invalid(self, tag: &str) -> Error {
        match self {
            Context::Step => Error::InvalidStepType { tag: tag.to_string() },
            Context::Goal => Error::InvalidGoalType { tag: tag.to_string() },
        }
    }
}

/// A value after bottom-up transformation
#[derive(Debug)]
enum Node {
    Workout(Workout),
    Step(Step),
    Goal(Goal),
    List(Vec<Node>),
    /// Object without a type tag, passed through untouched
    Record(Record),
    Scalar(Value),
}

impl Node {
    fn describe(&self) -> String {
        match self {
            Node::Workout(_) => "a workout".to_string(),
            Node::Step(step) => format!("a {} step", step.kind()),
            Node::Goal(goal) => format!("a {} goal", goal.kind()),
            Node::List(_) => "a list".to_string(),
            Node::Record(record) => format!("an object without a type (keys: {})", record.keys().join(", ")),
            Node::Scalar(value) => value.to_string(),
        }
    }
}

/// Fields of an object, scalars kept raw and structures already transformed
#[derive(Debug, Default)]
struct Record {
    scalars: Map<String, Value>,
    nested: HashMap<String, Node>,
}

impl Fields for Record {
    fn field(&self, key: &str) -> Option<&Value> {
        self.scalars.get(key)
    }
}

impl Record {
    fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .scalars
            .keys()
            .chain(self.nested.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn reject_nested(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            if let Some(node) = self.nested.get(*key) {
                return Err(Error::TypeMismatch {
                    expected: "a number",
                    found: node.describe(),
                });
            }
        }
        Ok(())
    }

    fn bounds(&self) -> Result<bounds::Bounds> {
        self.reject_nested(&BOUND_KEYS)?;
        bounds::resolve(self)
    }

    /// Trimmed text field; blank text is absent
    fn text(&self, key: &str) -> Result<Option<String>> {
        if let Some(node) = self.nested.get(key) {
            return Err(Error::TypeMismatch {
                expected: "a string",
                found: node.describe(),
            });
        }
        match self.scalars.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(clean_text(Some(s.as_str()))),
            Some(other) => Err(Error::TypeMismatch {
                expected: "a string",
                found: other.to_string(),
            }),
        }
    }

    /// Required list of typed steps. A lone step stands in for a one-element list.
    fn take_steps(&mut self, kind: &'static str) -> Result<Vec<Step>> {
        match self.nested.remove(STEPS) {
            Some(Node::List(items)) => expect_steps(items),
            Some(Node::Step(step)) => Ok(vec![step]),
            Some(other) => Err(Error::TypeMismatch {
                expected: "a list of steps",
                found: other.describe(),
            }),
            None => match self.scalars.get(STEPS) {
                None | Some(Value::Null) => Err(Error::MissingField { kind, field: STEPS }),
                Some(other) => Err(Error::TypeMismatch {
                    expected: "a list of steps",
                    found: other.to_string(),
                }),
            },
        }
    }

    /// Optional list of typed goals. A lone goal stands in for a one-element list.
    fn take_goals(&mut self) -> Result<GoalSet> {
        let goals = match self.nested.remove(GOALS) {
            Some(Node::List(items)) => items
                .into_iter()
                .map(|item| match item {
                    Node::Goal(goal) => Ok(goal),
                    other => Err(Error::TypeMismatch {
                        expected: "a goal",
                        found: other.describe(),
                    }),
                })
                .collect::<Result<Vec<_>>>()?,
            Some(Node::Goal(goal)) => vec![goal],
            Some(other) => {
                return Err(Error::TypeMismatch {
                    expected: "a list of goals",
                    found: other.describe(),
                })
            }
            None => match self.scalars.get(GOALS) {
                None | Some(Value::Null) => Vec::new(),
                Some(other) => {
                    return Err(Error::TypeMismatch {
                        expected: "a list of goals",
                        found: other.to_string(),
                    })
                }
            },
        };
        Ok(GoalSet::from_goals(goals))
    }
}

fn expect_steps(items: Vec<Node>) -> Result<Vec<Step>> {
    items
        .into_iter()
        .map(|item| match item {
            Node::Step(step) => Ok(step),
            other => Err(Error::TypeMismatch {
                expected: "a step",
                found: other.describe(),
            }),
        })
        .collect()
}

/// Decoder with a configurable fuzzy threshold.
///
/// Holds no state between calls; one decoder can serve any number of
/// independent inputs.
#[derive(Clone, Debug)]
pub struct Decoder {
    threshold: u8,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self::with_threshold(DEFAULT_FUZZY_THRESHOLD)
    }

    /// Decoder accepting fuzzy candidates scoring at least `threshold` (0..=100)
    pub fn with_threshold(threshold: u8) -> Self {
        Self {
            threshold: threshold.min(100),
        }
    }

    pub fn from_config(config: &DecoderConfig) -> Self {
        Self::with_threshold(config.fuzzy_threshold)
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Decode a workout.
    ///
    /// A top-level list becomes the workout's steps and a lone step becomes
    /// a one-step workout, so a missing `workout` wrapper is tolerated.
    pub fn decode(&self, text: &str) -> Result<Workout> {
        let value: Value = serde_json::from_str(strip_code_fence(text))?;

        match self.transform(value, Context::Step)? {
            Node::Workout(workout) => Ok(workout),
            Node::List(items) => {
                tracing::trace!("Wrapping top-level list of {} items in a workout", items.len());
                Ok(Workout::from_steps(expect_steps(items)?))
            }
            Node::Step(step) => {
                tracing::trace!("Wrapping top-level {} step in a workout", step.kind());
                Ok(Workout::from_steps(vec![step]))
            }
            other => Err(Error::TypeMismatch {
                expected: "a workout, a step or a list of steps",
                found: other.describe(),
            }),
        }
    }

    fn transform(&self, value: Value, context: Context) -> Result<Node> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.transform(item, context))
                .collect::<Result<Vec<_>>>()
                .map(Node::List),
            Value::Object(map) => {
                let mut record = Record::default();
                for (key, value) in map {
                    match value {
                        Value::Array(_) | Value::Object(_) => {
                            let child = if key == GOALS { Context::Goal } else { Context::Step };
                            let node = self.transform(value, child)?;
                            record.nested.insert(key, node);
                        }
                        scalar => {
                            record.scalars.insert(key, scalar);
                        }
                    }
                }
                self.visit_object(record, context)
            }
            scalar => Ok(Node::Scalar(scalar)),
        }
    }

    /// Object hook: children are already typed when this runs
    fn visit_object(&self, mut record: Record, context: Context) -> Result<Node> {
        if let Some(node) = record.nested.get(TYPE) {
            return Err(Error::TypeMismatch {
                expected: "a string type tag",
                found: node.describe(),
            });
        }
        let tag = match record.scalars.get(TYPE) {
            None | Some(Value::Null) => return Ok(Node::Record(record)),
            Some(Value::String(tag)) => tag.trim().to_lowercase(),
            Some(other) => {
                return Err(Error::TypeMismatch {
                    expected: "a string type tag",
                    found: other.to_string(),
                })
            }
        };

        match self.resolve_tag(&tag, context)? {
            Tag::Workout => {
                let steps = record.take_steps(WORKOUT)?;
                let workout = Workout::new(
                    record.text(NAME)?.as_deref(),
                    steps,
                    record.text(NOTES)?.as_deref(),
                );
                Ok(Node::Workout(workout))
            }
            Tag::Repetition => {
                let steps = record.take_steps(REPETITION)?;
                let goals = record.take_goals()?;
                let step = Step::new(
                    StepVariant::Repetition { steps },
                    record.bounds()?,
                    record.text(NOTES)?.as_deref(),
                    goals,
                )?;
                Ok(Node::Step(step))
            }
            Tag::Segment(kind) => {
                let unit = match record.text(UNIT)? {
                    Some(raw) => Some(vocabulary().unit(&raw).ok_or(Error::InvalidUnit { unit: raw })?),
                    None => None,
                };
                let goals = record.take_goals()?;
                let step = Step::new(
                    StepVariant::Segment { kind, unit },
                    record.bounds()?,
                    record.text(NOTES)?.as_deref(),
                    goals,
                )?;
                Ok(Node::Step(step))
            }
            Tag::Goal(kind) => Ok(Node::Goal(Goal::new(kind, record.bounds()?))),
        }
    }

    fn resolve_tag(&self, tag: &str, context: Context) -> Result<Tag> {
        let vocab = vocabulary();

        if tag == WORKOUT {
            return Ok(Tag::Workout);
        }
        if vocab.is_repetition(tag) {
            return Ok(Tag::Repetition);
        }
        if let Some(kind) = vocab.step(tag) {
            return Ok(Tag::Segment(kind));
        }
        if let Some(kind) = vocab.goal(tag) {
            return Ok(Tag::Goal(kind));
        }

        let score = fuzzy::ratio(tag, REPETITION);
        if score >= self.threshold {
            tracing::debug!("Fuzzy matched '{}' to '{}' (score {})", tag, REPETITION, score);
            return Ok(Tag::Repetition);
        }
        if let Some(found) = fuzzy::best_match(tag, vocab.step_tags(), self.threshold) {
            if let Some(kind) = vocab.step(found.candidate) {
                tracing::debug!("Fuzzy matched '{}' to '{}' (score {})", tag, found.candidate, found.score);
                return Ok(Tag::Segment(kind));
            }
        }
        if let Some(found) = fuzzy::best_match(tag, vocab.goal_tags(), self.threshold) {
            if let Some(kind) = vocab.goal(found.candidate) {
                tracing::debug!("Fuzzy matched '{}' to '{}' (score {})", tag, found.candidate, found.score);
                return Ok(Tag::Goal(kind));
            }
        }

        Err(context.invalid(tag))
    }
}
