//! hm_churn result plotter.
//!
//! Reads the result files of a benchmark run (one subdirectory per hash map
//! variant) and renders the standard set of charts and tables.
//!
//! Pipeline: parse flags → load churnplot.toml → discover variants →
//!           run report stages → print/save summary.

mod cli;
mod config;
mod plot;
mod report;
mod verbose;

use anyhow::Result;
use clap::Parser;
use log::{info, warn};

use churn_analysis::summary;
use churn_data::RunDir;

use config::ReportConfig;
use report::{Outputs, Report};
use verbose::Verbosity;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(Verbosity::from_flags(cli.quiet, cli.verbose));

    let mut config = ReportConfig::load(cli.config.as_deref(), &cli.run_dir)?;
    if let Some(root) = &cli.csv_root {
        config.output.csv_root.clone_from(root);
    }

    let run = RunDir::open(&cli.run_dir)?;
    let outputs = Outputs {
        plots: !cli.no_plots,
        tables: !cli.no_tables,
    };
    let outcome = Report::new(&run, &config, outputs)?.run()?;
    if outcome.failed_charts > 0 {
        warn!("{} chart(s) failed to render", outcome.failed_charts);
    }

    if cli.summary {
        summary::print_summary_table(&outcome.summary);
    }
    if let Some(path) = &cli.json {
        outcome.summary.save_json(path)?;
        info!("summary written to {}", path.display());
    }
    Ok(())
}
