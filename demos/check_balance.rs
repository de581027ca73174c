//! Example: Checking the account balance with the blocking client.
//!
//! Run with: CAPSOLVER_API_KEY=CAI-... cargo run --example check_balance

use capsolver::blocking::CapSolver;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let api_key = std::env::var("CAPSOLVER_API_KEY")?;
    let solver = CapSolver::builder(api_key).build()?;

    let balance = solver.balance()?;
    if balance.error_id == 0 {
        println!("balance: ${}", balance.balance);
    } else {
        println!("error: {}", balance.error_code.unwrap_or_default());
    }

    Ok(())
}
