use crate::pipeline::launch;
use anyhow::Result;
use clap::Parser;

mod arxiv;
mod cache;
mod cli;
mod config;
mod llm;
mod pipeline;
mod report;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config();

    launch(&config).await
}
