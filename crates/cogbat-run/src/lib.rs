pub mod config;
pub mod ingest;
pub mod seen;
pub mod store;
pub mod writers;

pub use config::{read_config, RunConfig};
pub use ingest::{ingest, FileFailure, IngestReport};
pub use seen::SeenFiles;
pub use store::{merge_registry, JsonStore, MergeReport, SubjectStore};
pub use writers::{write_summary, write_trial_dump};
