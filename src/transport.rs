//! HTTP transport for the CapSolver API.
//!
//! One POST per logical request, joined against a configurable base URL.
//! The API signals application errors through the response body, so several
//! non-200 status codes still carry a valid JSON envelope and are parsed
//! rather than rejected.

use async_trait::async_trait;
use serde_json::Value;
use url::Url;

use crate::error::{Result, SolverError};

/// Default API endpoint.
pub const REQUEST_URL: &str = "https://api.capsolver.com";

/// Partner application id sent with every `createTask`/`feedbackTask` call.
pub(crate) const APP_ID: &str = "3E36E3CD-7EB5-4CAF-AA15-91011E652321";

pub(crate) const CREATE_TASK_POSTFIX: &str = "/createTask";
pub(crate) const GET_RESULT_POSTFIX: &str = "/getTaskResult";
pub(crate) const GET_BALANCE_POSTFIX: &str = "/getBalance";
pub(crate) const FEEDBACK_TASK_POSTFIX: &str = "/feedbackTask";

/// Status codes that carry a parseable application-level envelope.
pub const VALID_STATUS_CODES: [u16; 5] = [200, 202, 400, 401, 405];

/// A single-POST transport to the solving service.
///
/// The lifecycle engine talks to this trait only, which is what lets tests
/// script server behavior without a socket.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` as JSON to `postfix` under the base URL and parse the
    /// reply as JSON.
    async fn post(&self, postfix: &str, body: &Value) -> Result<Value>;
}

/// [`Transport`] implementation backed by an rquest [`Client`](rquest::Client).
///
/// The client is shared for the lifetime of the handle, so the create call
/// and every poll of one task reuse the same connection pool.
#[derive(Debug)]
pub struct HttpTransport {
    client: rquest::Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(client: rquest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(&self, postfix: &str, body: &Value) -> Result<Value> {
        let url = self.base_url.join(postfix)?;
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status().as_u16();
        if !VALID_STATUS_CODES.contains(&status) {
            tracing::debug!("rejected response with status {}", status);
            return Err(SolverError::UnexpectedStatus(status));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postfix_join() {
        let base = Url::parse(REQUEST_URL).unwrap();
        assert_eq!(
            base.join(CREATE_TASK_POSTFIX).unwrap().as_str(),
            "https://api.capsolver.com/createTask"
        );
        assert_eq!(
            base.join(GET_RESULT_POSTFIX).unwrap().as_str(),
            "https://api.capsolver.com/getTaskResult"
        );
    }

    #[test]
    fn test_accepted_status_codes() {
        for code in [200, 202, 400, 401, 405] {
            assert!(VALID_STATUS_CODES.contains(&code));
        }
        for code in [201, 204, 403, 404, 429, 500, 502] {
            assert!(!VALID_STATUS_CODES.contains(&code));
        }
    }
}
