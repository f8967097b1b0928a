//! Paired-associate learning (tasks 1 and 6).
//!
//! A trial can span several physical rows; only the first row of each run
//! of equal trial-number cells is kept, and only its trial number, bad-touch
//! count and score columns.

use super::{is_sentinel, Sections};
use crate::error::ParseError;
use crate::io::rows::LogRow;
use crate::task::TaskGrammar;
use crate::value::Value;

const TRIAL_NUM: usize = 1;
const KEPT_COLUMNS: [usize; 3] = [TRIAL_NUM, 6, 7];

pub(super) fn scan(body: &[LogRow], grammar: &TaskGrammar) -> Result<Sections, ParseError> {
    let mut sections = Sections::default();
    // Shared across the practice/task boundary.
    let mut previous_trial: Option<&str> = None;
    for row in body {
        if is_sentinel(row, grammar) {
            sections.in_task = true;
        } else if !row.is_data() {
            // Some firmware repeats the practice header row.
            if Value::normalize(row.first()).as_text() == Some("practice") {
                continue;
            }
            return Err(row.bad_line());
        } else {
            let trial = row.cell(TRIAL_NUM);
            if previous_trial == Some(trial) {
                continue;
            }
            previous_trial = Some(trial);
            sections.push(
                KEPT_COLUMNS
                    .iter()
                    .map(|&idx| Value::normalize(row.cell(idx)))
                    .collect(),
            );
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
Locations,(100;100),(200;200)
Stats,12,0.5
Practice,TrialNum,Stim,Loc,Touch,Time,BadTouches,Score
,1,a,(1;1),(1;1),0.4,0,1
,1,a,(1;1),(2;2),0.5,0,1
,2,b,(1;1),(1;1),0.4,1,2
Task,TrialNum,Stim,Loc,Touch,Time,BadTouches,Score
,2,c,(1;1),(1;1),0.4,3,3
,3,d,(1;1),(1;1),0.4,0,1
,3,d,(1;1),(1;1),0.6,0,1
,4,e,(1;1),(1;1),0.4,2,4
";

    #[test]
    fn keeps_first_row_of_each_trial() {
        let rows = parse_rows(LOG).unwrap();
        let parsed = parse(&rows, LogFormat::PairedAssociates).unwrap();
        assert_eq!(parsed.practice.len(), 2);
        // Trial 2 continues across the Task row and is not repeated.
        assert_eq!(parsed.task.len(), 2);
        assert_eq!(parsed.task[0].get("TrialNum"), &Value::Int(3));
        assert_eq!(parsed.task[1].get("NumBadTouches"), &Value::Int(2));
        assert_eq!(parsed.practice[1].get("Score"), &Value::Int(2));
    }

    #[test]
    fn incorrect_only_score_needs_a_bad_touch() {
        let rows = parse_rows(LOG).unwrap();
        let parsed = parse(&rows, LogFormat::PairedAssociates).unwrap();
        assert_eq!(parsed.task[0].get("Score-incorrect only"), &Value::Null);
        assert_eq!(parsed.task[1].get("Score-incorrect only"), &Value::Int(4));
        assert_eq!(parsed.task[0].len(), 4);
        assert_eq!(parsed.practice[0].len(), 3);
    }

    #[test]
    fn parsing_is_repeatable() {
        let rows = parse_rows(LOG).unwrap();
        let first = parse(&rows, LogFormat::PairedAssociates).unwrap();
        let second = parse(&rows, LogFormat::PairedAssociates).unwrap();
        assert_eq!(first, second);
        assert_eq!(parse_rows(LOG).unwrap(), rows);
    }

    #[test]
    fn repeated_practice_header_is_tolerated() {
        let text = LOG.replacen(",2,b,", "PRACTICE,x\n,2,b,", 1);
        let rows = parse_rows(&text).unwrap();
        let parsed = parse(&rows, LogFormat::PairedAssociates).unwrap();
        assert_eq!(parsed.practice.len(), 2);
    }

    #[test]
    fn unknown_label_is_a_bad_line() {
        let text = LOG.replacen(",4,e,", "Note,4,e,", 1);
        let rows = parse_rows(&text).unwrap();
        assert!(matches!(
            parse(&rows, LogFormat::PairedAssociates),
            Err(ParseError::BadLine { line: 11, .. })
        ));
    }
}
