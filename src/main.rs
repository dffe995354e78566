use anyhow::Context;
use clap::Parser;
use rtwqms_processor::cli::{run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run(cli).await.context("rtwqms-processor failed")
}
