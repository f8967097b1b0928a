//! One log file from name and bytes to summarized [`TaskData`].

use crate::error::ParseError;
use crate::io::filename::{self, LogFileIdentity};
use crate::io::rows;
use crate::metrics::summarize;
use crate::parsers;
use crate::record::TaskData;
use crate::task::Task5Format;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Decode `file_name`, then parse and summarize the log read from `reader`.
pub fn task_data_from_reader<R: Read>(
    file_name: &str,
    reader: R,
    task5: Task5Format,
) -> Result<TaskData, ParseError> {
    let identity = filename::decode(file_name)?;
    task_data_for(identity, reader, task5)
}

/// Load one log file from disk. The name is decoded before the file is
/// opened, so a misnamed file fails without being read.
pub fn load_task_data(path: &Path, task5: Task5Format) -> Result<TaskData, ParseError> {
    let identity = filename::decode_path(path)?;
    let file = File::open(path)?;
    task_data_for(identity, file, task5)
}

fn task_data_for<R: Read>(
    identity: LogFileIdentity,
    reader: R,
    task5: Task5Format,
) -> Result<TaskData, ParseError> {
    let format = identity.task.log_format(task5);
    let log_rows = rows::read_rows(reader)?;
    let parsed = parsers::parse(&log_rows, format)?;
    let summary = summarize(identity.task, &parsed.task);
    debug!(
        "{}: {} practice and {} task records",
        identity.file_name,
        parsed.practice.len(),
        parsed.task.len()
    );
    Ok(TaskData {
        identity,
        format,
        practice: parsed.practice,
        trials: parsed.task,
        summary,
    })
}
