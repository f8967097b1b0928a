pub mod filename;
pub mod rows;

pub use filename::{decode, decode_path, LogDate, LogFileIdentity, LogTime};
pub use rows::{parse_rows, read_rows, read_rows_from_path, LogRow};
