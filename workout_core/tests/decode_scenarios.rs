//! End-to-end decoding of generated workout text.
//!
//! These tests verify:
//! - Single steps, repetitions and full plans decode to the expected tree
//! - Decoded trees are similar to hand-built equivalents
//! - Misspelled tags are resolved, unrelated tags rejected
//! - Normalization is idempotent on decoded plans

use std::borrow::Cow;
use workout_core::*;

fn run(unit: Unit, bounds: Bounds, notes: &str) -> Step {
    Step::segment(SegmentKind::Run, Some(unit), bounds).with_notes(notes)
}

fn rest(seconds: f64) -> Step {
    Step::segment(SegmentKind::Rest, Some(Unit::Seconds), Bounds::value(seconds))
}

fn threshold_intervals() -> Step {
    Step::repetition(
        Bounds::value(4.0),
        vec![
            run(Unit::Seconds, Bounds::range(300.0, 360.0), "T pace"),
            rest(60.0),
        ],
    )
    .expect("repetition has steps")
}

const SINGLE_STEP: &str = r#"[{
        "type": "run",
        "value": 600,
        "unit": "seconds",
        "notes": "marathon pace"
      }
]"#;

const BASIC_REPETITION: &str = r#"[{
    "type": "repetition",
    "value": 4,
    "steps": [
      {
        "type": "run",
        "minimum": 300,
        "maximum": 360,
        "unit": "seconds",
        "notes": "T pace"
      },
      {
        "type": "rest",
        "value": 60,
        "unit": "seconds"
      }
    ]
  }
]"#;

const DANIELS_PLAN: &str = r#"[
  {"type": "run", "value": 2, "unit": "miles", "notes": "E pace"},
  {
    "type": "repetition",
    "value": 4,
    "steps": [
      {"type": "run", "minimum": 300, "maximum": 360, "unit": "seconds", "notes": "T pace"},
      {"type": "rest", "value": 60, "unit": "seconds"}
    ]
  },
  {"type": "run", "value": 3600, "unit": "seconds", "notes": "E pace"},
  {"type": "run", "minimum": 900, "maximum": 1200, "unit": "seconds", "notes": "T pace"},
  {"type": "run", "value": 2, "unit": "miles", "notes": "E pace"}
]"#;

#[test]
fn test_single_step_workout() {
    let workout = decode(SINGLE_STEP).unwrap();
    assert_eq!(workout.steps().len(), 1);

    let step = &workout.steps()[0];
    assert_eq!(step.kind(), StepKind::Segment(SegmentKind::Run));
    assert_eq!(step.value(), Some(600.0));
    assert_eq!(step.unit(), Some(Unit::Seconds));
    assert_eq!(step.notes(), Some("marathon pace"));

    assert!(step.similar(&run(Unit::Seconds, Bounds::value(600.0), "marathon pace")));
}

#[test]
fn test_basic_repetition() {
    let workout = decode(BASIC_REPETITION).unwrap();
    assert_eq!(workout.steps().len(), 1);

    let repetition = &workout.steps()[0];
    assert_eq!(repetition.kind(), StepKind::Repetition);
    assert_eq!(repetition.value(), Some(4.0));
    assert_eq!(repetition.steps().len(), 2);

    let decoded_run = &repetition.steps()[0];
    assert_eq!(decoded_run.minimum(), Some(300.0));
    assert_eq!(decoded_run.maximum(), Some(360.0));
    assert_eq!(decoded_run.value(), Some(330.0));
    assert_eq!(decoded_run.unit(), Some(Unit::Seconds));
    assert_eq!(decoded_run.notes(), Some("T pace"));

    let decoded_rest = &repetition.steps()[1];
    assert_eq!(decoded_rest.kind(), StepKind::Segment(SegmentKind::Rest));
    assert_eq!(decoded_rest.value(), Some(60.0));
    assert_eq!(decoded_rest.minimum(), None);
    assert_eq!(decoded_rest.maximum(), None);

    assert!(repetition.similar(&threshold_intervals()));
}

#[test]
fn test_daniels_style_plan() {
    let workout = decode(DANIELS_PLAN).unwrap();
    assert_eq!(workout.steps().len(), 5);

    let expected = Workout::from_steps(vec![
        run(Unit::Miles, Bounds::value(2.0), "E pace"),
        threshold_intervals(),
        run(Unit::Seconds, Bounds::value(3600.0), "E pace"),
        run(Unit::Seconds, Bounds::range(900.0, 1200.0), "T pace"),
        run(Unit::Miles, Bounds::value(2.0), "E pace"),
    ]);
    assert!(workout.similar(&expected));
}

#[test]
fn test_plan_differing_in_one_position_is_not_similar() {
    let workout = decode(DANIELS_PLAN).unwrap();
    let expected = Workout::from_steps(vec![
        run(Unit::Miles, Bounds::value(2.0), "E pace"),
        threshold_intervals(),
        run(Unit::Seconds, Bounds::value(3600.0), "E pace"),
        run(Unit::Seconds, Bounds::range(900.0, 1200.0), "T pace"),
        run(Unit::Miles, Bounds::value(3.0), "E pace"),
    ]);
    assert!(!workout.similar(&expected));
}

#[test]
fn test_misspelled_repetition_resolves() {
    let text = BASIC_REPETITION.replace("\"repetition\"", "\"reapetition\"");
    let workout = decode(&text).unwrap();
    assert!(workout.steps()[0].similar(&threshold_intervals()));
}

#[test]
fn test_unrelated_tag_fails() {
    let text = BASIC_REPETITION.replace("\"rest\"", "\"xyz\"");
    let err = decode(&text).unwrap_err();
    match &err {
        Error::InvalidStepType { tag } => assert_eq!(tag, "xyz"),
        other => panic!("Expected InvalidStepType, got {:?}", other),
    }
    assert!(err.to_string().contains("Valid values are repetition, run"));
}

#[test]
fn test_fenced_output_with_aliases() {
    let text = "```json\n{\"type\": \"workout\", \"name\": \"Hills\", \"steps\": [\n\
        {\"type\": \"wu\", \"value\": 900, \"unit\": \"sec\"},\n\
        {\"type\": \"loop\", \"value\": 6, \"steps\": [\n\
            {\"type\": \"work\", \"value\": 90, \"unit\": \"seconds\", \"goals\": [{\"type\": \"zone\", \"value\": 4}]},\n\
            {\"type\": \"recovery\", \"value\": 120, \"unit\": \"seconds\"}\n\
        ]},\n\
        {\"type\": \"cd\", \"value\": 1, \"unit\": \"mile\"}\n\
    ]}\n```";
    let workout = decode(text).unwrap();
    assert_eq!(workout.name(), Some("Hills"));
    assert_eq!(workout.total_steps(), 5);

    let kinds: Vec<StepKind> = workout.steps().iter().map(Step::kind).collect();
    assert_eq!(
        kinds,
        vec![
            StepKind::Segment(SegmentKind::WarmUp),
            StepKind::Repetition,
            StepKind::Segment(SegmentKind::CoolDown),
        ]
    );

    let hill = &workout.steps()[1].steps()[0];
    assert_eq!(hill.kind(), StepKind::Segment(SegmentKind::Run));
    let zone = hill.goals().get(GoalKind::HeartRateZone).unwrap();
    assert_eq!(zone.value(), Some(4.0));
}

#[test]
fn test_inverted_bounds_are_repaired() {
    let text = r#"[{"type": "run", "min": 1200, "max": 900, "unit": "seconds"}]"#;
    let workout = decode(text).unwrap();
    let step = &workout.steps()[0];
    assert_eq!(step.minimum(), Some(900.0));
    assert_eq!(step.maximum(), Some(1200.0));
    assert!(step.minimum() <= step.maximum());
}

#[test]
fn test_decoded_plan_normalizes_idempotently() {
    let text = r#"[
      {"type": "run", "value": 600, "minimum": 600, "unit": "seconds"},
      {"type": "run", "maximum": 400, "unit": "meters"},
      {"type": "repeat", "minimum": 3, "maximum": 3, "steps": [
        {"type": "run", "value": 200, "unit": "meters", "goals": [{"type": "power"}]}
      ]}
    ]"#;
    let workout = decode(text).unwrap();
    assert!(workout.is_compressible());

    let once = workout.compressed().into_owned();
    assert_eq!(once.steps()[0].bounds(), Bounds::value(600.0));
    assert_eq!(once.steps()[1].bounds(), Bounds::value(400.0));
    assert_eq!(once.steps()[2].bounds(), Bounds::value(3.0));
    assert!(once.steps()[2].steps()[0].goals().is_empty());

    let twice = once.compressed();
    assert!(matches!(twice, Cow::Borrowed(_)));
    assert!(twice.similar(&once));
}

#[test]
fn test_decode_is_deterministic_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| decode(DANIELS_PLAN).unwrap()))
        .collect();
    let workouts: Vec<Workout> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for workout in &workouts[1..] {
        assert!(workout.similar(&workouts[0]));
    }
}
