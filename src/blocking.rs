//! Thread-blocking CapSolver client.
//!
//! Wraps the async client around an owned single-threaded runtime, so the
//! lifecycle engine, its transition rules and its terminal-envelope
//! fabrication are literally the same code as in the async mode; only the
//! suspension strategy differs.

use std::time::Duration;

use tokio::runtime;

use crate::client::CapSolverBuilder as AsyncBuilder;
use crate::error::Result;
use crate::models::{BalanceResponse, CaptchaResponse, FeedbackResult};
use crate::task::CaptchaTask;

/// Builder for creating a blocking CapSolver client.
pub struct CapSolverBuilder {
    inner: AsyncBuilder,
}

impl CapSolverBuilder {
    /// Create a new builder with the required API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            inner: AsyncBuilder::new(api_key),
        }
    }

    /// Override the API base URL.
    pub fn request_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.request_url(url);
        self
    }

    /// Wait between result polls (and before the first one). Default 5 s.
    pub fn sleep_time(mut self, sleep_time: Duration) -> Self {
        self.inner = self.inner.sleep_time(sleep_time);
        self
    }

    /// Maximum number of result polls before a task is reported unsolvable.
    pub fn max_attempts(mut self, max_attempts: usize) -> Self {
        self.inner = self.inner.max_attempts(max_attempts);
        self
    }

    /// Webhook the service calls with the result, in addition to polling.
    pub fn callback_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.callback_url(url);
        self
    }

    /// Route API calls through an HTTP/SOCKS5 proxy.
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.inner = self.inner.proxy(proxy);
        self
    }

    /// Build the blocking CapSolver client.
    pub fn build(self) -> Result<CapSolver> {
        let runtime = runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        Ok(CapSolver {
            inner: self.inner.build()?,
            runtime,
        })
    }
}

/// Blocking client for the CapSolver captcha-solving API.
///
/// Every method blocks the calling thread until the HTTP exchange (and, for
/// [`solve`](Self::solve), the whole poll loop) completes.
///
/// # Example
/// ```ignore
/// use capsolver::blocking::CapSolver;
/// use capsolver::{CaptchaTask, ImageToTextTask};
///
/// let solver = CapSolver::builder("CAI-XXXX").build()?;
/// let result = solver.solve(&CaptchaTask::ImageToText(ImageToTextTask {
///     body: image_base64,
///     module: None,
/// }))?;
/// println!("solved: {:?}", result.solution);
/// ```
pub struct CapSolver {
    inner: crate::CapSolver,
    runtime: runtime::Runtime,
}

impl CapSolver {
    /// Create a builder for the blocking CapSolver client.
    pub fn builder(api_key: impl Into<String>) -> CapSolverBuilder {
        CapSolverBuilder::new(api_key)
    }

    /// Submit a task and block until a terminal envelope is available.
    pub fn solve(&self, task: &CaptchaTask) -> Result<CaptchaResponse> {
        self.runtime.block_on(self.inner.solve(task))
    }

    /// Submit a task without polling for its result.
    pub fn create_task(&self, task: &CaptchaTask) -> Result<CaptchaResponse> {
        self.runtime.block_on(self.inner.create_task(task))
    }

    /// Fetch the current state of a task, one request, no waiting.
    pub fn task_result(&self, task_id: &str) -> Result<CaptchaResponse> {
        self.runtime.block_on(self.inner.task_result(task_id))
    }

    /// Check the account balance.
    pub fn balance(&self) -> Result<BalanceResponse> {
        self.runtime.block_on(self.inner.balance())
    }

    /// Report back whether a returned solution actually worked.
    pub fn feedback(&self, task_id: &str, result: &FeedbackResult) -> Result<CaptchaResponse> {
        self.runtime.block_on(self.inner.feedback(task_id, result))
    }
}
