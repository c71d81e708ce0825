use anyhow::Result;
use dorm::cli::build_cli;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    dorm::cli::handlers::dispatch(&matches).await
}
