//! Typed tool arguments and results.
//!
//! - `commit`: LogQueryRequest, CommitRecord for `get_git_log`
//! - `timesheet`: TimeEntry, PushEntriesRequest, SubmissionOutcome for `push_kimai_entries`

pub mod commit;
pub mod timesheet;

pub use commit::*;
pub use timesheet::*;
