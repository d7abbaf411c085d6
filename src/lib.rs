//! Normalizes nested conference schedules (`schedule.json`) into a flat,
//! validated, uniquely identified set of sessions that can be grouped by
//! date, track, or any other key.

pub mod diagnostics;
pub mod error;
pub mod ids;
pub mod model;
pub mod parser;
pub mod render;
pub mod report;
pub mod source;
pub mod walk;

pub type Result<T> = anyhow::Result<T>;

pub use diagnostics::{Diagnostic, DiagnosticSink, Severity};
pub use error::{DuplicateIdError, ScheduleError};
pub use ids::{Candidate, IdAllocator, flatten_id};
pub use model::{GroupManager, Session, Speaker};
pub use parser::{Parsed, parse, parse_with};
pub use source::ScheduleSource;
