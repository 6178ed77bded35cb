//! Kimai timesheet submission.
//!
//! Each entry is POSTed on its own to `<base_url>/timesheets`; a rejected or
//! failed entry is recorded and the loop moves on to the next one.

pub mod pusher;

pub use pusher::{render_outcomes, TimesheetPusher};
