//! Implicit learning (task 4).
//!
//! Task data is one summary row per block, e.g.
//! `Block 4 Calculations,PercentCorrect,91.43%,AvgDistanceFromCenter,32.2,AvgResponseTime,0.65`.
//! Blank-first rows before the first block are practice trials; those after
//! it are per-trial detail that the block rows already summarize.

use super::{capture, fit, Sections};
use crate::error::ParseError;
use crate::io::rows::LogRow;
use crate::task::TaskGrammar;
use crate::value::Value;

const BLOCK_COLUMNS: [usize; 4] = [0, 2, 4, 6];

pub(super) fn scan(body: &[LogRow], grammar: &TaskGrammar) -> Result<Sections, ParseError> {
    let mut sections = Sections::default();
    for row in body {
        if row.first().contains(grammar.sentinel) {
            sections.in_task = true;
            let block = BLOCK_COLUMNS
                .iter()
                .map(|&idx| Value::normalize(row.cell(idx)))
                .collect();
            sections.push(fit(block, grammar.raw_width));
        } else if !row.is_data() {
            return Err(row.bad_line());
        } else if !sections.in_task {
            sections.push(fit(capture(row, 1), grammar.practice_headers.len()));
        }
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use crate::error::ParseError;
    use crate::io::rows::parse_rows;
    use crate::parsers::parse;
    use crate::task::LogFormat;
    use crate::value::Value;

    const LOG: &str = "\
Locations,(1;1),(2;2),(3;3),(4;4)
TrialNum,Correct,ResponseTime,TouchPosition,DistanceFromCenter
,1,True,0.8,(1;1),12.5
,2,False,1.1,(2;3),40.2
Block 1 Calculations,PercentCorrect,95%,AvgDistanceFromCenter,14.2,AvgResponseTime,0.61
,1,True,0.5,(1;1),10
Block 2 Calculations,PercentCorrect,91.43%,AvgDistanceFromCenter,15.0,AvgResponseTime,0.52
";

    #[test]
    fn block_rows_become_task_records() {
        let rows = parse_rows(LOG).unwrap();
        let parsed = parse(&rows, LogFormat::ImplicitLearning).unwrap();
        assert_eq!(parsed.practice.len(), 2);
        assert_eq!(parsed.practice[1].get("Correct"), &Value::Bool(false));
        assert_eq!(parsed.task.len(), 2);
        let block = &parsed.task[1];
        assert_eq!(block.get("Block"), &Value::Int(2));
        assert_eq!(block.get("PercentCorrect"), &Value::Float(91.43));
        assert_eq!(block.get("AvgResponseTime"), &Value::Float(0.52));
    }

    #[test]
    fn unlabelled_header_is_a_bad_line() {
        let text = LOG.replacen("Block 2", "Summary 2", 1);
        let rows = parse_rows(&text).unwrap();
        assert!(matches!(
            parse(&rows, LogFormat::ImplicitLearning),
            Err(ParseError::BadLine { line: 7, .. })
        ));
    }
}
