//! Commit history queries against the `git` binary.
//!
//! A query is a `LogCommand`: its `Display` form is the canonical
//! `git log ...` string and `args()` is the argv actually executed. No shell
//! is involved, so filter values reach git verbatim. Branch names that start
//! with `-` are refused before anything runs, since git would read them as
//! options (`--output=<file>` writes into the repository).
//!
//! Each output line carries `hash|author|email|date|subject`. Lines are split
//! into at most five fields so a subject containing `|` survives intact; lines
//! with fewer fields are skipped and counted.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::git::repository::{relative_date, GitRepository};
use crate::models::{CommitRecord, LogQueryRequest};

pub const FIELD_DELIMITER: char = '|';
pub const PRETTY_FORMAT: &str = "%H|%an|%ae|%ad|%s";

/// Ceiling on captured stdout per query.
pub const MAX_OUTPUT_BYTES: usize = 1024 * 1024;
const MAX_STDERR_BYTES: u64 = 64 * 1024;

const RULE_WIDTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCommand {
    branch: Option<String>,
    limit: u64,
    author: Option<String>,
    since: Option<String>,
    until: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl LogCommand {
    /// `branch` of `None`, `""` or `"HEAD"` targets the checked-out branch.
    pub fn new(request: &LogQueryRequest, branch: Option<&str>) -> Self {
        Self {
            branch: non_empty(branch).filter(|b| b != "HEAD"),
            limit: request.limit(),
            author: non_empty(request.author.as_deref()),
            since: non_empty(request.since.as_deref()),
            until: non_empty(request.until.as_deref()),
        }
    }

    fn filters(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("author", self.author.as_deref()),
            ("since", self.since.as_deref()),
            ("until", self.until.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
    }

    /// Arguments passed to `git`, without the program name.
    pub fn args(&self) -> Vec<String> {
        let mut args = vec!["log".to_string()];
        if let Some(branch) = &self.branch {
            args.push(branch.clone());
        }
        args.push("--oneline".to_string());
        args.push("-n".to_string());
        args.push(self.limit.to_string());
        args.push(format!("--pretty=format:{}", PRETTY_FORMAT));
        for (name, value) in self.filters() {
            args.push(format!("--{}={}", name, value));
        }
        args
    }
}

impl fmt::Display for LogCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("git log")?;
        if let Some(branch) = &self.branch {
            write!(f, " {}", branch)?;
        }
        write!(f, " --oneline -n {} --pretty=format:\"{}\"", self.limit, PRETTY_FORMAT)?;
        for (name, value) in self.filters() {
            write!(f, " --{}=\"{}\"", name, value)?;
        }
        Ok(())
    }
}

/// Refuses branch names git would parse as an option.
pub fn validate_branch(branch: &str) -> Result<()> {
    if branch.starts_with('-') {
        return Err(AppError::InvalidParams(format!(
            "branch must not start with '-': {}",
            branch
        )));
    }
    Ok(())
}

/// Renders the log command for a request, as a string.
pub fn construct_log_command(request: &LogQueryRequest, branch: Option<&str>) -> String {
    LogCommand::new(request, branch).to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    pub commits: Vec<CommitRecord>,
    /// Lines that did not carry five fields
    pub skipped: usize,
}

pub fn parse_log_output(output: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    for line in output.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.splitn(5, FIELD_DELIMITER).collect();
        let [hash, author_name, author_email, date, message] = fields.as_slice() else {
            warn!(line = %line, "Skipping malformed git log line");
            parsed.skipped += 1;
            continue;
        };

        parsed.commits.push(CommitRecord {
            hash: hash.to_string(),
            author_name: author_name.to_string(),
            author_email: author_email.to_string(),
            date: date.to_string(),
            message: message.to_string(),
        });
    }

    parsed
}

fn format_commit(commit: &CommitRecord) -> String {
    let date = match relative_date(&commit.date) {
        Some(relative) => format!("{} ({})", commit.date, relative),
        None => commit.date.clone(),
    };
    format!(
        "Date: {}\nMessage: {}\n{}\n",
        date,
        commit.message,
        "─".repeat(RULE_WIDTH)
    )
}

/// One block per commit, in git's order.
pub fn format_commits(parsed: &ParsedLog) -> String {
    let mut out = if parsed.commits.is_empty() {
        "(no commits)\n".to_string()
    } else {
        parsed
            .commits
            .iter()
            .map(format_commit)
            .collect::<Vec<_>>()
            .join("\n")
    };

    if parsed.skipped > 0 {
        out.push_str(&format!("(skipped {} malformed line(s))\n", parsed.skipped));
    }
    out
}

impl GitRepository {
    /// Runs one query with the working directory set to this repository.
    pub async fn run_log(&self, command: &LogCommand, timeout: Duration) -> Result<String> {
        debug!(repo = %self.display_path(), command = %command, "Running git log");

        let mut cmd = Command::new("git");
        cmd.args(command.args())
            .current_dir(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = async {
            let mut child = cmd
                .spawn()
                .map_err(|e| AppError::CommandExecution(format!("failed to spawn git: {}", e)))?;

            let stdout = child
                .stdout
                .take()
                .ok_or_else(|| AppError::Internal("git stdout not captured".to_string()))?;
            let stderr = child
                .stderr
                .take()
                .ok_or_else(|| AppError::Internal("git stderr not captured".to_string()))?;

            let stderr_task = tokio::spawn(async move {
                let mut buf = Vec::new();
                if let Err(e) = stderr.take(MAX_STDERR_BYTES).read_to_end(&mut buf).await {
                    debug!(error = %e, "Failed to read git stderr");
                }
                buf
            });

            let mut out = Vec::new();
            stdout
                .take(MAX_OUTPUT_BYTES as u64 + 1)
                .read_to_end(&mut out)
                .await?;

            if out.len() > MAX_OUTPUT_BYTES {
                let _ = child.kill().await;
                return Err(AppError::OutputTooLarge { limit: MAX_OUTPUT_BYTES });
            }

            let status = child.wait().await?;
            let stderr = stderr_task.await.unwrap_or_default();

            if !status.success() {
                return Err(AppError::CommandExecution(format!(
                    "`{}` exited with {}: {}",
                    command,
                    status,
                    String::from_utf8_lossy(&stderr).trim()
                )));
            }

            Ok(String::from_utf8_lossy(&out).into_owned())
        };

        tokio::time::timeout(timeout, run)
            .await
            .map_err(|_| AppError::Timeout {
                what: "git log".to_string(),
                secs: timeout.as_secs(),
            })?
    }

    async fn log_section(&self, command: &LogCommand, timeout: Duration) -> Result<String> {
        let output = self.run_log(command, timeout).await?;
        let parsed = parse_log_output(&output);
        debug!(
            commits = parsed.commits.len(),
            skipped = parsed.skipped,
            "Parsed git log output"
        );
        Ok(format_commits(&parsed))
    }

    /// Full report for a request: one section, or one per listed branch in order.
    pub async fn log_report(&self, request: &LogQueryRequest, timeout: Duration) -> Result<String> {
        if let Some(branch) = &request.branch {
            validate_branch(branch)?;
        }
        for branch in request.branch_list().unwrap_or_default() {
            validate_branch(branch)?;
        }

        let mut response = String::new();

        match request.branch_list() {
            Some(branches) => {
                info!(repo = %self.display_path(), branches = branches.len(), "Querying git log");
                for branch in branches {
                    let command = LogCommand::new(request, Some(branch));
                    let section = self.log_section(&command, timeout).await?;
                    response.push_str(&format!("\n=== Branch: {} ===\n{}", branch, section));
                }
            }
            None => {
                info!(repo = %self.display_path(), "Querying git log");
                let command = LogCommand::new(request, request.branch.as_deref());
                response.push_str(&self.log_section(&command, timeout).await?);
            }
        }

        Ok(format!("Git log for {} :\n\n{}", self.display_path(), response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LogQueryRequest {
        LogQueryRequest::default()
    }

    #[test]
    fn default_command_uses_limit_25() {
        assert_eq!(
            construct_log_command(&request(), None),
            r#"git log --oneline -n 25 --pretty=format:"%H|%an|%ae|%ad|%s""#
        );
    }

    #[test]
    fn includes_limit_and_filters_in_fixed_order() {
        let req = LogQueryRequest {
            number: Some(5),
            author: Some("Alice".into()),
            since: Some("2024-01-01".into()),
            until: Some("2024-12-31".into()),
            ..request()
        };
        assert_eq!(
            construct_log_command(&req, None),
            r#"git log --oneline -n 5 --pretty=format:"%H|%an|%ae|%ad|%s" --author="Alice" --since="2024-01-01" --until="2024-12-31""#
        );
    }

    #[test]
    fn filter_subsets_keep_order() {
        let req = LogQueryRequest {
            until: Some("yesterday".into()),
            author: Some("Bob".into()),
            ..request()
        };
        assert_eq!(
            construct_log_command(&req, None),
            r#"git log --oneline -n 25 --pretty=format:"%H|%an|%ae|%ad|%s" --author="Bob" --until="yesterday""#
        );

        let req = LogQueryRequest {
            since: Some("1 week ago".into()),
            ..request()
        };
        assert_eq!(
            construct_log_command(&req, None),
            r#"git log --oneline -n 25 --pretty=format:"%H|%an|%ae|%ad|%s" --since="1 week ago""#
        );
    }

    #[test]
    fn empty_filters_are_omitted() {
        let req = LogQueryRequest {
            author: Some(String::new()),
            since: Some(String::new()),
            ..request()
        };
        assert_eq!(construct_log_command(&req, None), construct_log_command(&request(), None));
    }

    #[test]
    fn targets_named_branch() {
        let req = LogQueryRequest { number: Some(7), ..request() };
        assert_eq!(
            construct_log_command(&req, Some("main")),
            r#"git log main --oneline -n 7 --pretty=format:"%H|%an|%ae|%ad|%s""#
        );
    }

    #[test]
    fn head_or_empty_branch_is_default() {
        let req = LogQueryRequest { number: Some(3), ..request() };
        let default = construct_log_command(&req, None);
        assert_eq!(construct_log_command(&req, Some("")), default);
        assert_eq!(construct_log_command(&req, Some("HEAD")), default);
    }

    #[test]
    fn args_mirror_display_without_quoting() {
        let req = LogQueryRequest {
            number: Some(2),
            author: Some("O'Brien \"Ob\"".into()),
            ..request()
        };
        let command = LogCommand::new(&req, Some("feature/x"));
        assert_eq!(
            command.args(),
            vec![
                "log",
                "feature/x",
                "--oneline",
                "-n",
                "2",
                "--pretty=format:%H|%an|%ae|%ad|%s",
                "--author=O'Brien \"Ob\"",
            ]
        );
    }

    #[test]
    fn option_like_branches_are_refused() {
        assert!(matches!(
            validate_branch("--output=out.txt"),
            Err(AppError::InvalidParams(_))
        ));
        assert!(matches!(validate_branch("-p"), Err(AppError::InvalidParams(_))));
        assert!(validate_branch("feature/x-y").is_ok());
        assert!(validate_branch("HEAD").is_ok());
    }

    #[test]
    fn parses_five_fields_and_keeps_delimiter_in_subject() {
        let output = "abc|Alice|alice@example.com|Mon Jan 15 12:00:00 2024 +0100|fix: a | b\n\
                      def|Bob|bob@example.com|Tue Jan 16 08:30:00 2024 +0000|init";
        let parsed = parse_log_output(output);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.commits.len(), 2);
        assert_eq!(parsed.commits[0].message, "fix: a | b");
        assert_eq!(parsed.commits[1].author_email, "bob@example.com");
    }

    #[test]
    fn skips_short_lines() {
        let output = "abc|Alice|alice@example.com\nxyz|Bob|bob@example.com|Mon Jan 15 12:00:00 2024 +0100|ok\n";
        let parsed = parse_log_output(output);
        assert_eq!(parsed.skipped, 1);
        assert_eq!(parsed.commits.len(), 1);
        assert_eq!(parsed.commits[0].hash, "xyz");
    }

    #[test]
    fn empty_output_has_no_commits() {
        let parsed = parse_log_output("");
        assert!(parsed.commits.is_empty());
        assert_eq!(format_commits(&parsed), "(no commits)\n");
    }

    #[test]
    fn formats_date_before_message_once_per_commit() {
        let parsed = parse_log_output(
            "a|A|a@x|not-a-git-date|first\nb|B|b@x|also-not-a-date|second",
        );
        let rule = "─".repeat(40);
        assert_eq!(
            format_commits(&parsed),
            format!(
                "Date: not-a-git-date\nMessage: first\n{rule}\n\nDate: also-not-a-date\nMessage: second\n{rule}\n"
            )
        );
    }

    #[test]
    fn notes_skipped_lines() {
        let parsed = parse_log_output("garbage\nb|B|b@x|d|second");
        assert!(format_commits(&parsed).ends_with("(skipped 1 malformed line(s))\n"));
    }
}
