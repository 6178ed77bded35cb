use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{KimaiConfig, KIMAI_API_TOKEN, KIMAI_API_URL};
use crate::error::{AppError, Result};
use crate::models::{OutcomeDetail, SubmissionOutcome, TimeEntry, TimesheetResponse};

/// Submits time entries to a Kimai instance, one request per entry.
#[derive(Debug, Clone)]
pub struct TimesheetPusher {
    config: Option<KimaiConfig>,
    client: Client,
}

impl TimesheetPusher {
    pub fn new(config: Option<KimaiConfig>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    /// Pushes every entry in order and returns one outcome per entry.
    ///
    /// Fails before any request when the API is not configured or the list
    /// is empty.
    pub async fn push(&self, entries: &[TimeEntry]) -> Result<Vec<SubmissionOutcome>> {
        let config = self.config.as_ref().ok_or_else(|| {
            AppError::ConfigurationMissing(format!(
                "{} and/or {} are not set; add them to the environment or .env file and restart the server",
                KIMAI_API_URL, KIMAI_API_TOKEN
            ))
        })?;

        if entries.is_empty() {
            return Err(AppError::InvalidParams(
                "entries must contain at least one entry".to_string(),
            ));
        }

        let url = config.timesheets_url();
        let mut outcomes = Vec::with_capacity(entries.len());

        for (i, entry) in entries.iter().enumerate() {
            let detail = match self.submit(&url, &config.token, entry).await {
                Ok(detail) => detail,
                Err(message) => OutcomeDetail::Exception(message),
            };
            let outcome = SubmissionOutcome { index: i + 1, detail };

            if outcome.is_success() {
                info!(index = outcome.index, "Timesheet entry created");
            } else {
                warn!(index = outcome.index, outcome = %outcome, "Timesheet entry not created");
            }
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    async fn submit(
        &self,
        url: &str,
        token: &str,
        entry: &TimeEntry,
    ) -> std::result::Result<OutcomeDetail, String> {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(token)
            .json(entry)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        if !status.is_success() {
            return Ok(OutcomeDetail::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let created: TimesheetResponse =
            serde_json::from_value(body).map_err(|e| format!("invalid response body: {}", e))?;
        match created.id {
            Some(Value::String(id)) => Ok(OutcomeDetail::Created(id)),
            Some(Value::Null) | None => Err("response has no id".to_string()),
            Some(id) => Ok(OutcomeDetail::Created(id.to_string())),
        }
    }
}

/// One line per outcome, in submission order.
pub fn render_outcomes(outcomes: &[SubmissionOutcome]) -> String {
    outcomes
        .iter()
        .map(|o| o.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
