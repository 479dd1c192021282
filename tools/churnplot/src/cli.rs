//! Command-line interface definitions for churnplot.

use clap::Parser;
use std::path::PathBuf;

/// Render charts and tables for an hm_churn benchmark run.
#[derive(Parser)]
#[command(name = "churnplot", version, about)]
pub struct Cli {
    /// Benchmark run directory, one subdirectory per variant.
    #[arg(default_value = "bench_run")]
    pub run_dir: PathBuf,

    /// Configuration file (default: <RUN_DIR>/churnplot.toml if present).
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Root directory for CSV and LaTeX output (overrides the config file).
    #[arg(long)]
    pub csv_root: Option<PathBuf>,

    /// Skip PNG rendering; CSV and LaTeX output is still written.
    #[arg(long)]
    pub no_plots: bool,

    /// Skip the LaTeX tables.
    #[arg(long)]
    pub no_tables: bool,

    /// Print a summary table to the terminal.
    #[arg(long)]
    pub summary: bool,

    /// Write the run summary as JSON.
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Only show warnings and errors.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable debug output with per-stage timings.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["churnplot"]);
        assert_eq!(cli.run_dir, PathBuf::from("bench_run"));
        assert!(cli.config.is_none());
        assert!(!cli.no_plots && !cli.no_tables && !cli.summary);
    }

    #[test]
    fn run_dir_and_flags() {
        let cli = Cli::parse_from([
            "churnplot",
            "runs/2024",
            "--no-plots",
            "--csv-root",
            "out",
            "--json",
            "s.json",
            "-v",
        ]);
        assert_eq!(cli.run_dir, PathBuf::from("runs/2024"));
        assert!(cli.no_plots);
        assert_eq!(cli.csv_root, Some(PathBuf::from("out")));
        assert_eq!(cli.json, Some(PathBuf::from("s.json")));
        assert!(cli.verbose);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["churnplot", "-q", "-v"]).is_err());
    }
}
