//! Example: Solving a ReCaptcha v2 without a proxy.
//!
//! Run with: CAPSOLVER_API_KEY=CAI-... cargo run --example solve_recaptcha

use capsolver::{CapSolver, CaptchaTask, ReCaptchaV2Task, TaskStatus};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing for debug output (optional)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let api_key = std::env::var("CAPSOLVER_API_KEY")?;
    let solver = CapSolver::builder(api_key).build()?;

    // Google's own demo widget
    let task = CaptchaTask::ReCaptchaV2ProxyLess(ReCaptchaV2Task {
        website_url: "https://www.google.com/recaptcha/api2/demo".into(),
        website_key: "6Le-wvkSAAAAAPBMRTvw0Q4Muexq9bi0DJwx_mJ-".into(),
        is_invisible: None,
        enterprise_payload: None,
        proxy: None,
    });

    let result = solver.solve(&task).await?;

    match result.status {
        TaskStatus::Ready => {
            let solution = result.solution.unwrap();
            println!("Success!");
            println!("  taskId: {}", result.task_id.unwrap_or_default());
            println!("  token:  {}", solution["gRecaptchaResponse"]);
        }
        _ => {
            println!(
                "Failed: {} ({})",
                result.error_code.unwrap_or_default(),
                result.error_description.unwrap_or_default()
            );
        }
    }

    Ok(())
}
