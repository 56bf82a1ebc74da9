// Lead Counts - Terminal preview
// Same pipeline as the dashboard, drawn with ratatui

use anyhow::{Context, Result};
use lead_counts::ui::{run_ui, App};
use lead_counts::{ChartSpec, Config, LeadCountPipeline};

fn main() -> Result<()> {
    let config = Config::default();

    println!("📊 Loading lead counts from {}...", config.characters_path.display());
    let output = LeadCountPipeline::run(&config).context("Failed to compute lead counts")?;
    println!("✓ {} years, {} merged characters\n", output.stats.years, output.stats.merged);

    let mut app = App::new(output.counts, &ChartSpec::lead_counts());
    run_ui(&mut app)?;

    Ok(())
}
