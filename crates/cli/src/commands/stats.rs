//! Stats command handler.
//!
//! Prints vector index statistics.

use clap::Args;
use gridfin_core::{config::AppConfig, AppResult};

/// Show vector index statistics
#[derive(Args, Debug)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatsCommand {
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing stats command");

        let index = super::build_index(config)?;
        let stats = index.describe_stats().await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&stats)?);
            return Ok(());
        }

        println!("Dimension:     {}", stats.dimension);
        println!("Total vectors: {}", stats.total_vector_count);

        if !stats.namespaces.is_empty() {
            println!("Namespaces:");
            let mut namespaces: Vec<_> = stats.namespaces.iter().collect();
            namespaces.sort_by(|a, b| a.0.cmp(b.0));
            for (name, count) in namespaces {
                println!("  {:<16} {}", name, count);
            }
        }

        Ok(())
    }
}
