//! Query command handler.
//!
//! Answers a single question from the command line and prints the result.

use clap::Args;
use gridfin_core::{config::AppConfig, AppResult};
use std::path::PathBuf;

/// Ask a question over the ingested financial data
#[derive(Args, Debug)]
pub struct QueryCommand {
    /// The question to ask
    pub query: String,

    /// Records file providing metric definitions (JSON array)
    #[arg(short, long)]
    pub records: Option<PathBuf>,

    /// Output the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl QueryCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing query command");

        let engine = super::build_engine(config, self.records.as_deref())?;
        let result = engine.answer(&self.query).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", result.answer);
        }

        Ok(())
    }
}
