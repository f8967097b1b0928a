//! Decoding of log file names.
//!
//! Names look like `PE211005_IIN028_task1_5-15-2013-16-13-32.csv`: a subject
//! token (two-letter prefix, optional `s` sibling marker, two-digit group,
//! numeric id), the device, the task and a month-day-year-hour-minute-second
//! stamp.

use crate::error::ParseError;
use crate::task::TaskId;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogDate {
    pub month: u32,
    pub day: u32,
    pub year: u32,
}

impl fmt::Display for LogDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.month, self.day, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogTime {
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl fmt::Display for LogTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.hour, self.minute, self.second)
    }
}

/// Identity carried by a log file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFileIdentity {
    pub file_name: String,
    /// Prefix, group and id, e.g. `PE211005`. Unique per subject.
    pub key: String,
    pub group: String,
    pub subject_id: String,
    pub sibling: bool,
    pub device: String,
    pub task: TaskId,
    pub date: LogDate,
    pub time: LogTime,
}

impl LogFileIdentity {
    /// Ids are expected to have four digits; other lengths are kept as-is.
    pub fn has_standard_id(&self) -> bool {
        self.subject_id.len() == 4
    }
}

struct SubjectToken<'a> {
    sibling: bool,
    group: &'a str,
    id: &'a str,
}

fn split_subject(token: &str) -> Option<SubjectToken<'_>> {
    let bytes = token.as_bytes();
    if bytes.len() < 5 || !bytes[0].is_ascii_alphabetic() || !bytes[1].is_ascii_alphabetic() {
        return None;
    }
    let sibling = matches!(bytes[2], b's' | b'S');
    let rest = if sibling { &token[3..] } else { &token[2..] };
    if rest.len() < 3 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (group, id) = rest.split_at(2);
    Some(SubjectToken { sibling, group, id })
}

fn parse_stamp(name: &str, stamp: &str) -> Result<(LogDate, LogTime), ParseError> {
    let parts: Vec<&str> = stamp.split('-').collect();
    if parts.len() != 6 {
        return Err(ParseError::bad_file_name(
            name,
            format!("date/time stamp {} does not have 6 fields", stamp),
        ));
    }
    let mut fields = [0u32; 6];
    for (slot, part) in fields.iter_mut().zip(&parts) {
        *slot = part.parse().map_err(|_| {
            ParseError::bad_file_name(name, format!("non-numeric date/time field {}", part))
        })?;
    }
    let [month, day, year, hour, minute, second] = fields;
    Ok((
        LogDate { month, day, year },
        LogTime {
            hour,
            minute,
            second,
        },
    ))
}

/// Decode a log file name (a bare name; use [`decode_path`] for paths).
pub fn decode(file_name: &str) -> Result<LogFileIdentity, ParseError> {
    let stem = file_name.strip_suffix(".csv").ok_or_else(|| {
        ParseError::bad_file_name(file_name, "extension is not .csv")
    })?;
    let components: Vec<&str> = stem.split('_').collect();
    let [subject, device, task, stamp] = components[..] else {
        return Err(ParseError::bad_file_name(
            file_name,
            format!(
                "expected subject_device_task_stamp, found {} components",
                components.len()
            ),
        ));
    };
    let task: TaskId = task.parse().map_err(|_| {
        ParseError::bad_file_name(
            file_name,
            format!("invalid task designation {}, expected task1 .. task6", task),
        )
    })?;
    let token = split_subject(subject).ok_or_else(|| {
        ParseError::bad_file_name(
            file_name,
            format!(
                "subject {} is not a two-letter prefix, two-digit group and id",
                subject
            ),
        )
    })?;
    let (date, time) = parse_stamp(file_name, stamp)?;

    let identity = LogFileIdentity {
        file_name: file_name.to_string(),
        key: subject.to_string(),
        group: token.group.to_string(),
        subject_id: token.id.to_string(),
        sibling: token.sibling,
        device: device.to_string(),
        task,
        date,
        time,
    };
    if !identity.has_standard_id() {
        warn!(
            "{}: expected a 4-digit subject id, using {}",
            file_name, identity.subject_id
        );
    }
    Ok(identity)
}

pub fn decode_path(path: &Path) -> Result<LogFileIdentity, ParseError> {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            ParseError::bad_file_name(&path.display().to_string(), "not a UTF-8 file name")
        })?;
    decode(name)
}
