//! Visual search (task 5, default layout).
//!
//! Each practice or task block is a single row of label/value pairs, e.g.
//! `Task 2,EndCondition,Time,Duration,60,...`. The block number is taken
//! from the label and the pair names are dropped.

use super::{fit, Sections};
use crate::error::ParseError;
use crate::io::rows::LogRow;
use crate::task::TaskGrammar;
use crate::value::Value;

const PRACTICE_LABEL: &str = "Practice";

fn block_values(row: &LogRow) -> Vec<Value> {
    let label = row.first().split_whitespace().nth(1).unwrap_or("");
    std::iter::once(label)
        .chain(row.cells.iter().skip(2).step_by(2).map(String::as_str))
        .map(Value::normalize)
        .collect()
}

pub(super) fn scan(body: &[LogRow], grammar: &TaskGrammar) -> Result<Sections, ParseError> {
    let mut sections = Sections::default();
    for row in body {
        let first = row.first();
        if first.contains(PRACTICE_LABEL) {
            let trial = Value::Int(sections.practice.len() as i64 + 1);
            let mut values = fit(block_values(row), grammar.raw_width);
            values.push(trial);
            sections.practice.push(values);
        } else if first.contains(grammar.sentinel) {
            sections.task.push(fit(block_values(row), grammar.raw_width));
        } else if !row.is_data() {
            return Err(row.bad_line());
        }
    }
    Ok(sections)
}
