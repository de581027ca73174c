//! Data models shared by every CapSolver API endpoint.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transport::APP_ID;

/// Task status reported by the service in the shared response envelope.
///
/// `idle` and `processing` mean the remote solver is still working;
/// `ready` and `failed` are terminal and stop the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task created, not picked up yet
    Idle,
    /// Task is being worked on
    #[default]
    Processing,
    /// Task completed, solution is populated
    Ready,
    /// Task failed, check `errorCode`/`errorDescription`
    Failed,
}

impl TaskStatus {
    /// Returns true for `ready` and `failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Ready | TaskStatus::Failed)
    }

    /// Returns the string representation used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Idle => "idle",
            TaskStatus::Processing => "processing",
            TaskStatus::Ready => "ready",
            TaskStatus::Failed => "failed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The uniform response envelope returned by `createTask` and `getTaskResult`.
///
/// `solution` is populated only when `status == ready` and `errorId == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptchaResponse {
    /// 0 means no error, anything else is a server-reported failure
    #[serde(default)]
    pub error_id: i64,
    /// Machine-readable error classifier, e.g. `ERROR_KEY_DENIED_ACCESS`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    /// Human-readable error description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Server-assigned task id, the correlation key for polling
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Opaque solution payload, shape depends on the captcha type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution: Option<Map<String, Value>>,
}

impl CaptchaResponse {
    /// Applies the envelope normalization rule: a nonzero `errorId` is always
    /// reported with terminal `status = failed`, whatever the server sent.
    pub(crate) fn normalize(mut self) -> Self {
        if self.error_id != 0 {
            self.status = TaskStatus::Failed;
        }
        self
    }
}

/// Response of the `getBalance` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    #[serde(default)]
    pub error_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Account balance in USD
    #[serde(default)]
    pub balance: f64,
    /// Prepaid packages, if any
    #[serde(default)]
    pub packages: Vec<Value>,
}

/// Verdict sent back to the service about a previously returned solution.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    /// Whether the solution turned out to be wrong
    pub invalid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of a `createTask` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateTaskRequest<'a> {
    pub client_key: &'a str,
    pub app_id: &'static str,
    pub task: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<&'a str>,
}

impl<'a> CreateTaskRequest<'a> {
    pub fn new(client_key: &'a str, task: Value, callback_url: Option<&'a str>) -> Self {
        Self {
            client_key,
            app_id: APP_ID,
            task,
            callback_url,
        }
    }
}

/// Body of a `getTaskResult` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TaskResultRequest<'a> {
    pub client_key: &'a str,
    pub task_id: &'a str,
}

/// Body of a `getBalance` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BalanceRequest<'a> {
    pub client_key: &'a str,
}

/// Body of a `feedbackTask` request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeedbackRequest<'a> {
    pub client_key: &'a str,
    pub app_id: &'static str,
    pub task_id: &'a str,
    pub result: &'a FeedbackResult,
}

impl<'a> FeedbackRequest<'a> {
    pub fn new(client_key: &'a str, task_id: &'a str, result: &'a FeedbackResult) -> Self {
        Self {
            client_key,
            app_id: APP_ID,
            task_id,
            result,
        }
    }
}
