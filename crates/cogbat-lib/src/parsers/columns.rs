//! Grammars that keep every column after the blank first cell: switching,
//! spatial memory and the stopping variant of task 5.

use super::{capture, fit, is_sentinel, Sections};
use crate::error::ParseError;
use crate::io::rows::LogRow;
use crate::task::TaskGrammar;

pub(super) fn scan(body: &[LogRow], grammar: &TaskGrammar) -> Result<Sections, ParseError> {
    let mut sections = Sections::default();
    for row in body {
        if is_sentinel(row, grammar) {
            sections.in_task = true;
        } else if !row.is_data() {
            return Err(row.bad_line());
        } else {
            sections.push(fit(capture(row, 1), grammar.raw_width));
        }
    }
    Ok(sections)
}
