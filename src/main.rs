use anyhow::{Context, Result};
use lead_counts::logging::init_logging;
use lead_counts::server::{serve, AppContext};
use lead_counts::{ChartSpec, Config, LeadCountPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = Config::default();
    tracing::info!(version = lead_counts::VERSION, "video game character analysis");

    // Any pipeline failure aborts before the server starts
    let output = LeadCountPipeline::run(&config)
        .map_err(|e| {
            tracing::error!(kind = e.kind(), error = %e, "pipeline failed");
            e
        })
        .context("Failed to compute lead counts")?;

    let context = AppContext::new(output, &ChartSpec::lead_counts()).context("Failed to build figure")?;

    serve(context, config.listen_addr)
        .await
        .with_context(|| format!("Failed to serve dashboard on {}", config.listen_addr))?;

    Ok(())
}
