//! Fields reconstructed from neighbouring rows.
//!
//! Every pass here is a single forward scan that carries the previous row's
//! state, so rows must arrive in file order.

use crate::value::Value;

// Captured task-2 columns (log column minus one).
const TARGET_SIDE: usize = 1;
const PRESSED_SIDE: usize = 6;
const CORRECT: usize = 7;
/// Where the reconstructed goal side is inserted; pushes `Correct` to 8.
const GOAL_SIDE: usize = 7;

// Task-1/6 captured columns: trial number, bad touches, score.
const BAD_TOUCHES: usize = 1;
const SCORE: usize = 2;

// Task-5 stopping rows: trial number, turned orange, ...
const TURNED_ORANGE: usize = 1;

/// Side the subject was supposed to press on a task-2 trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalSide {
    Left,
    Right,
    Unknown,
}

impl GoalSide {
    /// A correct response pressed the goal side; an incorrect one pressed
    /// the other side.
    pub fn reconstruct(pressed: &Value, correct: &Value) -> GoalSide {
        let pressed = match pressed.as_text() {
            Some("left") => GoalSide::Left,
            Some("right") => GoalSide::Right,
            _ => return GoalSide::Unknown,
        };
        if correct.as_f64() == Some(1.0) {
            pressed
        } else {
            pressed.opposite()
        }
    }

    fn opposite(self) -> GoalSide {
        match self {
            GoalSide::Left => GoalSide::Right,
            GoalSide::Right => GoalSide::Left,
            GoalSide::Unknown => GoalSide::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalSide::Left => "left",
            GoalSide::Right => "right",
            GoalSide::Unknown => "unknown",
        }
    }

    /// Switch-side flag relative to the previous trial; undefined when
    /// either side is unknown.
    fn switch_from(self, previous: GoalSide) -> Value {
        if self == GoalSide::Unknown || previous == GoalSide::Unknown {
            Value::Text(GoalSide::Unknown.as_str().to_string())
        } else {
            Value::Bool(self != previous)
        }
    }
}

impl From<GoalSide> for Value {
    fn from(side: GoalSide) -> Self {
        Value::Text(side.as_str().to_string())
    }
}

/// Task 2: insert `GoalSide` and append `SwitchRule` and `SwitchSide`.
///
/// The first trial is a switch on both counts. Rows narrower than eight
/// values are padded with nulls first.
pub fn annotate_switches(rows: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
    let mut previous: Option<(Value, GoalSide)> = None;
    rows.into_iter()
        .map(|mut row| {
            if row.len() <= CORRECT {
                row.resize(CORRECT + 1, Value::Null);
            }
            let target = row[TARGET_SIDE].clone();
            let goal = GoalSide::reconstruct(&row[PRESSED_SIDE], &row[CORRECT]);
            let (switch_rule, switch_side) = match &previous {
                None => (Value::Bool(true), Value::Bool(true)),
                Some((prev_target, prev_goal)) => {
                    (Value::Bool(target != *prev_target), goal.switch_from(*prev_goal))
                }
            };
            row.insert(GOAL_SIDE, goal.into());
            row.push(switch_rule);
            row.push(switch_side);
            previous = Some((target, goal));
            row
        })
        .collect()
}

/// Task 3: append the order in which each dot was pressed within its trial.
///
/// Consecutive rows with equal trial numbers form one trial.
pub fn annotate_dot_rank(rows: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
    let mut previous: Option<(Value, i64)> = None;
    rows.into_iter()
        .map(|mut row| {
            let trial = row.first().cloned().unwrap_or(Value::Null);
            let rank = match previous {
                Some((ref prev_trial, prev_rank)) if *prev_trial == trial => prev_rank + 1,
                _ => 1,
            };
            row.push(Value::Int(rank));
            previous = Some((trial, rank));
            row
        })
        .collect()
}

/// Task 5 (stopping): append whether the previous trial's dot turned orange.
pub fn annotate_previous_orange(rows: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
    let mut previous_orange = false;
    rows.into_iter()
        .map(|mut row| {
            let orange = row.get(TURNED_ORANGE).and_then(Value::as_bool) == Some(true);
            row.push(Value::Bool(previous_orange));
            previous_orange = orange;
            row
        })
        .collect()
}

/// Tasks 1/6: append the score only for trials with at least one bad touch.
pub fn annotate_incorrect_scores(rows: Vec<Vec<Value>>) -> Vec<Vec<Value>> {
    rows.into_iter()
        .map(|mut row| {
            let bad_touches = row.get(BAD_TOUCHES).and_then(Value::as_f64).unwrap_or(0.0);
            let score = if bad_touches != 0.0 {
                row.get(SCORE).cloned().unwrap_or(Value::Null)
            } else {
                Value::Null
            };
            row.push(score);
            row
        })
        .collect()
}
