//! Wire types exchanged with the task tracker backend.
//!
//! Every endpoint replies with the same envelope: a `success` flag, a
//! human-readable `message`, and an optional `data` payload whose shape depends
//! on the endpoint.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};

use crate::util::credential::SubjectId;

/// Response envelope shared by all endpoints.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Business-level outcome. Missing means failure.
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiEnvelope {
    /// Decode `data` into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`super::request::RequestError::Business`] when the backend reported
    /// failure, or [`super::request::RequestError::Decode`] when `data` is missing or
    /// does not match `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, super::request::RequestError> {
        use super::request::RequestError;

        if !self.success {
            return Err(RequestError::Business { message: self.message });
        }
        let data = self.data.unwrap_or(serde_json::Value::Null);
        serde_json::from_value(data).map_err(|e| RequestError::Decode { status: None, reason: e.to_string() })
    }
}

/// Body for `POST /user/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /user/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
}

/// Aggregate counts shown on the dashboard.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardMetrics {
    pub tasks_completed_this_month: i64,
    pub not_merged_count: i64,
    pub completed_bug_count: i64,
    pub completed_task_count: i64,
    pub in_progress_count: i64,
}

/// A task as returned by `/task/list` and `/task/get`.
///
/// Number and branch fields are comma lists on input and arrive back either as
/// arrays or scalars, so they stay loosely typed.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "deserialize_i64_from_number")]
    pub id: i64,
    #[serde(default)]
    pub task_name: String,
    #[serde(default)]
    pub task_number: serde_json::Value,
    #[serde(default)]
    pub bug_number: serde_json::Value,
    #[serde(rename = "type", default)]
    pub kind: serde_json::Value,
    #[serde(default)]
    pub branch_name: serde_json::Value,
    #[serde(default)]
    pub changes_type: serde_json::Value,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_merged: Option<bool>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub updated_date: Option<String>,
    #[serde(default)]
    pub merged_date: Option<String>,
    #[serde(default)]
    pub completed_date: Option<String>,
}

/// Body for `POST /task/create`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewTask {
    pub task_name: String,
    pub task_number: Option<Vec<serde_json::Value>>,
    pub bug_number: Option<Vec<serde_json::Value>>,
    #[serde(rename = "type")]
    pub kind: Vec<String>,
    pub branch_name: Option<Vec<serde_json::Value>>,
    pub changes_type: Vec<String>,
    pub description: Option<String>,
    pub user_id: Option<SubjectId>,
}

/// Accepts integers, integral floats, and numeric strings.
fn deserialize_i64_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                return Ok(int);
            }
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            if let Some(float) = number.as_f64()
                && float.is_finite()
                && float.fract() == 0.0
                && float >= i64::MIN as f64
                && float <= i64::MAX as f64
            {
                return Ok(float as i64);
            }
            Err(D::Error::custom("expected integer-compatible number"))
        }
        serde_json::Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| D::Error::custom(format!("expected numeric id, got {s:?}"))),
        _ => Err(D::Error::custom("expected number")),
    }
}
