//! Task lifecycle engine: create -> poll -> terminal envelope.
//!
//! The engine drives one task from `createTask` to a terminal envelope. It is
//! written once against the [`Transport`] trait; the async client awaits it
//! directly and the blocking client runs it on an owned runtime, so both
//! execution modes share the exact same transition logic.

use std::time::Duration;

use serde_json::Value;
use tokio::time::sleep;

use crate::error::{Result, SolverError};
use crate::models::{CaptchaResponse, CreateTaskRequest, TaskResultRequest};
use crate::transport::{Transport, CREATE_TASK_POSTFIX, GET_RESULT_POSTFIX};

pub(crate) const CAPTCHA_UNSOLVABLE_CODE: &str = "ERROR_CAPTCHA_UNSOLVABLE";
pub(crate) const CAPTCHA_UNSOLVABLE_DESCRIPTION: &str = "Captcha not recognized";

/// Timing and retry policy for the poll loop.
///
/// Injected into the engine instead of living in module-level constants so
/// tests (and impatient callers) can shrink the waits.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Wait before the first poll and between consecutive polls.
    pub sleep_time: Duration,
    /// Maximum number of `getTaskResult` calls before the task is reported
    /// unsolvable. Total wall time is `sleep_time * max_attempts`.
    pub max_attempts: usize,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            sleep_time: Duration::from_secs(5),
            max_attempts: 5,
        }
    }
}

/// Runs one full task lifecycle and always resolves to a terminal envelope,
/// unless the transport itself fails.
///
/// Application errors (`errorId != 0`) and an exhausted poll budget are
/// returned as data with `status = failed`; transport failures propagate as
/// [`SolverError`] from whichever call hit them, create and poll alike.
pub(crate) async fn run_task<T>(
    transport: &T,
    policy: &PollPolicy,
    client_key: &str,
    task: Value,
    callback_url: Option<&str>,
) -> Result<CaptchaResponse>
where
    T: Transport + ?Sized,
{
    let body = serde_json::to_value(CreateTaskRequest::new(client_key, task, callback_url))?;
    let created: CaptchaResponse =
        serde_json::from_value(transport.post(CREATE_TASK_POSTFIX, &body).await?)?;

    if created.error_id != 0 {
        tracing::debug!(error_code = ?created.error_code, "task creation rejected by service");
        return Ok(created.normalize());
    }
    if created.status.is_terminal() {
        tracing::debug!(task_id = ?created.task_id, "task solved synchronously");
        return Ok(created);
    }

    // Polling is keyed by the id from the create reply; the server never
    // rotates ids afterwards.
    let task_id = created.task_id.clone().ok_or_else(|| {
        SolverError::InvalidResponse("createTask reply carries no taskId".into())
    })?;
    tracing::debug!(%task_id, "task created, awaiting first result");

    // The remote solver needs time to pick the task up; polling right away
    // only wastes a round trip.
    sleep(policy.sleep_time).await;

    let poll_body = serde_json::to_value(TaskResultRequest {
        client_key,
        task_id: &task_id,
    })?;

    for attempt in 1..=policy.max_attempts {
        let result: CaptchaResponse =
            serde_json::from_value(transport.post(GET_RESULT_POSTFIX, &poll_body).await?)?;

        if result.error_id != 0 {
            tracing::debug!(%task_id, attempt, error_code = ?result.error_code, "task failed");
            return Ok(result.normalize());
        }
        if result.status.is_terminal() {
            tracing::debug!(%task_id, attempt, status = %result.status, "task reached terminal status");
            return Ok(result);
        }

        tracing::debug!(%task_id, attempt, status = %result.status, "task still pending");
        sleep(policy.sleep_time).await;
    }

    // The service went silent; hand the caller a terminal envelope instead of
    // nothing.
    tracing::debug!(%task_id, "poll budget exhausted, reporting unsolvable");
    Ok(CaptchaResponse {
        error_id: 1,
        error_code: Some(CAPTCHA_UNSOLVABLE_CODE.into()),
        error_description: Some(CAPTCHA_UNSOLVABLE_DESCRIPTION.into()),
        task_id: Some(task_id),
        status: crate::models::TaskStatus::Failed,
        solution: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::time::Instant;
    use tokio_test::assert_ok;

    struct RecordedCall {
        postfix: String,
        body: Value,
        at: Instant,
    }

    /// Transport double fed with a script of replies, recording every call
    /// with a paused-clock timestamp.
    struct ScriptedTransport {
        replies: Mutex<VecDeque<Result<Value>>>,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl ScriptedTransport {
        fn new(replies: Vec<Result<Value>>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> std::sync::MutexGuard<'_, Vec<RecordedCall>> {
            self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn post(&self, postfix: &str, body: &Value) -> Result<Value> {
            self.calls.lock().unwrap().push(RecordedCall {
                postfix: postfix.to_string(),
                body: body.clone(),
                at: Instant::now(),
            });
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .expect("transport called more often than scripted")
        }
    }

    fn policy() -> PollPolicy {
        PollPolicy {
            sleep_time: Duration::from_secs(5),
            max_attempts: 5,
        }
    }

    async fn run(transport: &ScriptedTransport, policy: &PollPolicy) -> Result<CaptchaResponse> {
        run_task(
            transport,
            policy,
            "CAI-test-key",
            json!({"type": "ReCaptchaV2TaskProxyLess"}),
            None,
        )
        .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_at_create_short_circuits() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "errorId": 0,
            "status": "ready",
            "taskId": "T1",
            "solution": {"text": "abcd"}
        }))]);

        let result = assert_ok!(run(&transport, &policy()).await);

        assert_eq!(result.status, TaskStatus::Ready);
        assert_eq!(result.solution.as_ref().unwrap()["text"], "abcd");
        // No polls when the server solves synchronously
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(transport.calls()[0].postfix, CREATE_TASK_POSTFIX);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_until_ready() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"errorId": 0, "status": "processing", "taskId": "T1"})),
            Ok(json!({"errorId": 0, "status": "processing", "taskId": "T1"})),
            Ok(json!({"errorId": 0, "status": "ready", "taskId": "T1", "solution": {"token": "xyz"}})),
        ]);
        let policy = policy();

        let start = Instant::now();
        let result = assert_ok!(run(&transport, &policy).await);

        assert_eq!(result.status, TaskStatus::Ready);
        assert_eq!(result.task_id.as_deref(), Some("T1"));
        assert_eq!(result.solution.as_ref().unwrap()["token"], "xyz");

        let calls = transport.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].postfix, GET_RESULT_POSTFIX);
        assert_eq!(calls[2].postfix, GET_RESULT_POSTFIX);
        // Both polls carry the id from the create reply
        assert_eq!(calls[1].body["taskId"], "T1");
        assert_eq!(calls[2].body["taskId"], "T1");
        // Two full sleeps: one before the first poll, one between polls
        assert_eq!(calls[1].at - start, policy.sleep_time);
        assert_eq!(calls[2].at - calls[1].at, policy.sleep_time);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_error_returns_failed_without_polling() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "errorId": 1,
            "errorCode": "ERROR_KEY_DENIED_ACCESS"
        }))]);

        let result = assert_ok!(run(&transport, &policy()).await);

        assert_eq!(result.status, TaskStatus::Failed);
        assert_eq!(result.error_code.as_deref(), Some("ERROR_KEY_DENIED_ACCESS"));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_error_overrides_ready_status() {
        // Normalization: a nonzero errorId wins over whatever status was sent
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "errorId": 12,
            "errorCode": "ERROR_CAPTCHA_UNSOLVABLE",
            "status": "ready"
        }))]);

        let result = assert_ok!(run(&transport, &policy()).await);
        assert_eq!(result.status, TaskStatus::Failed);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_error_normalized_to_failed() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"errorId": 0, "status": "idle", "taskId": "T1"})),
            Ok(json!({"errorId": 2, "errorCode": "ERROR_CAPTCHA_UNSOLVABLE", "status": "processing", "taskId": "T1"})),
        ]);

        let result = assert_ok!(run(&transport, &policy()).await);
        assert_eq!(result.status, TaskStatus::Failed);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_poll_waits_full_sleep_time() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"errorId": 0, "status": "processing", "taskId": "T1"})),
            Ok(json!({"errorId": 0, "status": "ready", "taskId": "T1", "solution": {}})),
        ]);
        let policy = policy();

        let start = Instant::now();
        assert_ok!(run(&transport, &policy).await);

        let calls = transport.calls();
        // The create call fires immediately, the first poll only after the
        // full initial wait
        assert_eq!(calls[0].at - start, Duration::ZERO);
        assert_eq!(calls[1].at - start, policy.sleep_time);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_fabricates_unsolvable_envelope() {
        let mut replies =
            vec![Ok(json!({"errorId": 0, "status": "processing", "taskId": "T1"}))];
        for _ in 0..5 {
            replies.push(Ok(
                json!({"errorId": 0, "status": "processing", "taskId": "T1"}),
            ));
        }
        let transport = ScriptedTransport::new(replies);

        let result = assert_ok!(run(&transport, &policy()).await);

        assert_eq!(result.error_id, 1);
        assert_eq!(result.error_code.as_deref(), Some("ERROR_CAPTCHA_UNSOLVABLE"));
        assert_eq!(
            result.error_description.as_deref(),
            Some("Captcha not recognized")
        );
        assert_eq!(result.task_id.as_deref(), Some("T1"));
        assert_eq!(result.status, TaskStatus::Failed);
        assert!(result.solution.is_none());
        // One create plus the full poll budget
        assert_eq!(transport.calls().len(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_transport_failure_propagates() {
        let transport = ScriptedTransport::new(vec![
            Ok(json!({"errorId": 0, "status": "processing", "taskId": "T1"})),
            Err(SolverError::UnexpectedStatus(502)),
        ]);

        let err = run(&transport, &policy()).await.unwrap_err();
        assert!(matches!(err, SolverError::UnexpectedStatus(502)));
        // The loop stops at the failure instead of silently continuing
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_without_task_id_is_invalid_response() {
        let transport =
            ScriptedTransport::new(vec![Ok(json!({"errorId": 0, "status": "processing"}))]);

        let err = run(&transport, &policy()).await.unwrap_err();
        assert!(matches!(err, SolverError::InvalidResponse(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_body_shape() {
        let transport = ScriptedTransport::new(vec![Ok(json!({
            "errorId": 0,
            "status": "ready",
            "taskId": "T1",
            "solution": {}
        }))]);

        assert_ok!(
            run_task(
                &transport,
                &policy(),
                "CAI-test-key",
                json!({"type": "ImageToTextTask", "body": "aGVsbG8="}),
                Some("https://example.com/hook"),
            )
            .await
        );

        let calls = transport.calls();
        let body = &calls[0].body;
        assert_eq!(body["clientKey"], "CAI-test-key");
        assert_eq!(body["task"]["type"], "ImageToTextTask");
        assert_eq!(body["callbackUrl"], "https://example.com/hook");
    }
}
