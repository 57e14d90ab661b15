//! Export command - dump a saved agent's value table to CSV

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{agent::SavedAgent, cli::output::format_number};

#[derive(Parser, Debug)]
#[command(about = "Export a value table to CSV")]
pub struct ExportArgs {
    /// Saved agent file produced by `train --output`
    pub agent: PathBuf,

    /// Output CSV path
    #[arg(long, short = 'o')]
    pub output: PathBuf,
}

pub fn execute(args: ExportArgs) -> Result<()> {
    let saved = SavedAgent::load_from_file(&args.agent)?;
    let agent = saved.to_agent()?;

    let mut rows: Vec<_> = agent.values().iter().collect();
    // Best (lowest cost-to-go) states first; position disambiguates for
    // stable output.
    rows.sort_by(|(a_state, a_value), (b_state, b_value)| {
        a_value
            .total_cmp(b_value)
            .then_with(|| a_state.player().cmp(&b_state.player()))
            .then_with(|| {
                a_state
                    .pellets_remaining()
                    .cmp(&b_state.pellets_remaining())
            })
    });

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create CSV file: {}", args.output.display()))?;
    writer.write_record(["player_x", "player_y", "pellets_remaining", "value"])?;
    for (state, value) in &rows {
        writer.write_record([
            state.player().x.to_string(),
            state.player().y.to_string(),
            state.pellets_remaining().to_string(),
            format!("{value:.6}"),
        ])?;
    }
    writer.flush()?;

    println!(
        "Exported {} state value(s) to {}",
        format_number(rows.len()),
        args.output.display()
    );

    Ok(())
}
