use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

/// Format of `%ad` under git's default date style, e.g. `Mon Jan 15 12:00:00 2024 +0100`.
const GIT_DEFAULT_DATE_FORMAT: &str = "%a %b %e %H:%M:%S %Y %z";

/// A working tree that carries a `.git` marker. Only ever read from.
#[derive(Debug, Clone)]
pub struct GitRepository {
    pub path: PathBuf,
    display: String,
}

impl GitRepository {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let display = path.to_string_lossy().to_string();

        // `.git` may be a directory or, for worktrees and submodules, a file
        if !path.join(".git").exists() {
            return Err(AppError::NotAGitRepository(display));
        }

        Ok(Self {
            path: path.to_path_buf(),
            display,
        })
    }

    /// Path as the caller supplied it.
    pub fn display_path(&self) -> &str {
        &self.display
    }
}

/// Relative age of a git default-format date, if it parses.
pub fn relative_date(date: &str) -> Option<String> {
    DateTime::parse_from_str(date.trim(), GIT_DEFAULT_DATE_FORMAT)
        .ok()
        .map(|dt| format_relative_time(dt.timestamp()))
}

pub fn format_relative_time(timestamp: i64) -> String {
    format_relative_time_at(timestamp, Utc::now().timestamp())
}

fn count(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} ago", count(n, unit))
}

/// Same thresholds and rounding as `git log --date=relative`.
fn format_relative_time_at(timestamp: i64, now: i64) -> String {
    const MINUTE: i64 = 60;
    const HOUR: i64 = 60 * MINUTE;
    const DAY: i64 = 24 * HOUR;

    let diff = now - timestamp;

    if diff < 0 {
        "in the future".to_string()
    } else if diff < 90 {
        plural(diff, "second")
    } else if diff < 90 * MINUTE {
        plural((diff + MINUTE / 2) / MINUTE, "minute")
    } else if diff < 36 * HOUR {
        plural((diff + HOUR / 2) / HOUR, "hour")
    } else if diff < 14 * DAY {
        plural((diff + DAY / 2) / DAY, "day")
    } else if diff < 70 * DAY {
        plural((diff + 7 * DAY / 2) / (7 * DAY), "week")
    } else if diff < 365 * DAY {
        plural((diff + 15 * DAY) / (30 * DAY), "month")
    } else if diff < 1825 * DAY {
        let days = diff / DAY;
        let total_months = (days * 12 * 2 + 365) / (365 * 2);
        let (years, months) = (total_months / 12, total_months % 12);
        if months == 0 {
            plural(years, "year")
        } else {
            format!("{}, {}", count(years, "year"), plural(months, "month"))
        }
    } else {
        plural((diff / DAY + 183) / 365, "year")
    }
}
