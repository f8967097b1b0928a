//! Row-level grammars for the six task logs.
//!
//! Every grammar shares one rule: after the preamble, a row whose first cell
//! is blank carries data, a row whose first cell is the grammar's sentinel
//! separates practice from task rows, and anything else is a [`ParseError::BadLine`].

mod columns;
mod implicit;
mod paired;
mod search;

use crate::derive;
use crate::error::ParseError;
use crate::io::rows::LogRow;
use crate::record::TrialRecord;
use crate::task::{LogFormat, TaskGrammar};
use crate::value::Value;

type Rows = Vec<Vec<Value>>;

/// Practice and task trials of one log, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedLog {
    pub practice: Vec<TrialRecord>,
    pub task: Vec<TrialRecord>,
}

/// Rows routed to practice until the sentinel is seen, to task after.
#[derive(Debug, Default)]
struct Sections {
    practice: Rows,
    task: Rows,
    in_task: bool,
}

impl Sections {
    fn push(&mut self, values: Vec<Value>) {
        if self.in_task {
            self.task.push(values);
        } else {
            self.practice.push(values);
        }
    }
}

/// Parse the rows of one log (preamble included) with the given grammar.
pub fn parse(rows: &[LogRow], format: LogFormat) -> Result<ParsedLog, ParseError> {
    let grammar = format.grammar();
    let start = rows
        .iter()
        .position(|row| row.line > grammar.preamble_lines)
        .unwrap_or(rows.len());
    let body = &rows[start..];

    let sections = match format {
        LogFormat::PairedAssociates => {
            let mut sections = paired::scan(body, grammar)?;
            sections.task = derive::annotate_incorrect_scores(sections.task);
            sections
        }
        LogFormat::Switching => {
            let mut sections = columns::scan(body, grammar)?;
            sections.task = derive::annotate_switches(sections.task);
            sections
        }
        LogFormat::SpatialMemory => {
            let mut sections = columns::scan(body, grammar)?;
            sections.task = derive::annotate_dot_rank(sections.task);
            sections
        }
        LogFormat::Stopping => {
            let mut sections = columns::scan(body, grammar)?;
            sections.task = derive::annotate_previous_orange(sections.task);
            sections
        }
        LogFormat::ImplicitLearning => implicit::scan(body, grammar)?,
        LogFormat::VisualSearch => search::scan(body, grammar)?,
    };

    Ok(ParsedLog {
        practice: records(grammar.practice_headers, sections.practice),
        task: records(grammar.task_headers, sections.task),
    })
}

fn records(headers: &[&str], rows: Rows) -> Vec<TrialRecord> {
    rows.into_iter()
        .map(|values| TrialRecord::from_values(headers, values))
        .collect()
}

/// Normalized cells from `from` to the end of the row.
fn capture(row: &LogRow, from: usize) -> Vec<Value> {
    row.cells
        .iter()
        .skip(from)
        .map(|cell| Value::normalize(cell))
        .collect()
}

/// Pad with nulls (or cut) to exactly `width` values.
fn fit(mut values: Vec<Value>, width: usize) -> Vec<Value> {
    values.resize(width, Value::Null);
    values
}

fn is_sentinel(row: &LogRow, grammar: &TaskGrammar) -> bool {
    row.first().trim() == grammar.sentinel
}
