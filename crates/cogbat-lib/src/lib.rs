pub mod derive;
pub mod error;
pub mod io;
pub mod metrics;
pub mod parsers;
pub mod pipeline;
pub mod record;
pub mod subject;
pub mod task;
pub mod value;

pub use error::ParseError;
pub use io::filename::{decode, decode_path, LogFileIdentity};
pub use metrics::{mean, summarize, Summary};
pub use parsers::{parse, ParsedLog};
pub use pipeline::{load_task_data, task_data_from_reader};
pub use record::{TaskData, TrialRecord};
pub use subject::{SubjectRecord, SubjectRegistry, TaskConflict};
pub use task::{LogFormat, Task5Format, TaskGrammar, TaskId};
pub use value::Value;
