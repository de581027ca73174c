//! # capsolver-rs
//!
//! Rust client for the [CapSolver](https://api.capsolver.com) captcha-solving
//! API. No solving happens locally: a task describing the challenge is
//! submitted to the service, polled until a remote solver produces a
//! solution, and the terminal result is handed back.
//!
//! ## Features
//!
//! - **Async and blocking**: one task lifecycle engine, awaited on Tokio or
//!   wrapped behind [`blocking::CapSolver`] for synchronous callers.
//! - **Typed tasks**: every supported captcha type is a [`CaptchaTask`]
//!   variant; required fields are validated before anything hits the wire.
//! - **Terminal results, always**: server-side failures and exhausted poll
//!   budgets come back as a `failed` envelope, not as an error or a hang.
//! - **Proxy support**: HTTP and SOCKS5 proxies for the API connection.
//!
//! ## Quick Start
//!
//! ```ignore
//! use capsolver::{CapSolver, CaptchaTask, ReCaptchaV2Task, TaskStatus};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let solver = CapSolver::builder("CAI-XXXX").build()?;
//!
//!     let result = solver
//!         .solve(&CaptchaTask::ReCaptchaV2ProxyLess(ReCaptchaV2Task {
//!             website_url: "https://example.com".into(),
//!             website_key: "6Le-wvkSAAAAAPBMRTvw0Q4Muexq9bi0DJwx_mJ-".into(),
//!             is_invisible: None,
//!             enterprise_payload: None,
//!             proxy: None,
//!         }))
//!         .await?;
//!
//!     if result.status == TaskStatus::Ready {
//!         println!("token: {}", result.solution.unwrap()["gRecaptchaResponse"]);
//!     } else {
//!         println!("failed: {:?}", result.error_code);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Untyped construction
//!
//! When the captcha type is only known at runtime, the factory validates the
//! field map against the chosen type:
//!
//! ```ignore
//! use capsolver::{CaptchaTask, CaptchaType};
//!
//! let captcha_type = CaptchaType::from_name("ReCaptchaV2TaskProxyLess")?;
//! let task = CaptchaTask::from_parts(captcha_type, fields)?;
//! ```

pub mod blocking;
pub mod client;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod task;
pub mod transport;

// Re-exports for convenience
pub use client::{CapSolver, CapSolverBuilder};
pub use error::{Result, SolverError};
pub use lifecycle::PollPolicy;
pub use models::{BalanceResponse, CaptchaResponse, FeedbackResult, TaskStatus};
pub use task::{
    AntiTurnstileTask, CaptchaTask, CaptchaType, DatadomeSliderTask, FuncaptchaTask, GeetestTask,
    HCaptchaTask, ImageToTextTask, MtCaptchaTask, ReCaptchaV2Task, ReCaptchaV3Task,
};
pub use transport::{HttpTransport, Transport, REQUEST_URL, VALID_STATUS_CODES};
