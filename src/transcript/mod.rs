//! Transcript assembly: grouping entries, exon numbering, splice-site and
//! start/stop flags, and conversion to indexed feature records.

pub mod construction;
pub mod types;

pub use construction::{build_records, group_transcripts};
pub use types::Transcript;
