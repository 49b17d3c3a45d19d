use anyhow::Result;
use gamemaster::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
