use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub const DEFAULT_LIMIT: u64 = 25;

/// Arguments of `get_git_log`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogQueryRequest {
    pub repo_path: Option<String>,
    #[serde(default, deserialize_with = "positive_limit")]
    pub number: Option<u64>,
    pub author: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    /// Single target branch; `""` and `"HEAD"` mean the checked-out branch
    pub branch: Option<String>,
    /// Anything other than a list of strings is treated as absent
    #[serde(default, deserialize_with = "lenient_branches")]
    pub branches: Option<Vec<String>>,
}

impl LogQueryRequest {
    pub fn limit(&self) -> u64 {
        self.number.unwrap_or(DEFAULT_LIMIT)
    }

    /// Branch list for the multi-branch report, if one was supplied.
    pub fn branch_list(&self) -> Option<&[String]> {
        match &self.branches {
            Some(list) if !list.is_empty() => Some(list.as_slice()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub date: String,
    pub message: String,
}

fn positive_limit<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<Value>::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };

    // Clients may send `5.0` for a JSON-schema "number"
    let limit = match &value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64)),
        _ => None,
    };

    match limit {
        Some(n) if n > 0 => Ok(Some(n)),
        _ => Err(D::Error::custom(format!(
            "number must be a positive integer, got {}",
            value
        ))),
    }
}

fn lenient_branches<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value::<Vec<String>>(v).ok()))
}
