//! Log output setup.
//!
//! Three output levels controlled by CLI flags:
//! - **Quiet** (`-q`): warnings and errors only
//! - **Default** (no flag): one line per report stage plus warnings
//! - **Verbose** (`-v`): everything, including skipped inputs and stage timings
//!
//! `RUST_LOG` takes precedence over the flags when set.

use log::{LevelFilter, debug};
use std::io::Write;
use std::time::Instant;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet,
    Default,
    Verbose,
}

impl Verbosity {
    /// Level selected by the `-q`/`-v` flags.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Default
        }
    }

    fn filter(self) -> LevelFilter {
        match self {
            Self::Quiet => LevelFilter::Warn,
            Self::Default => LevelFilter::Info,
            Self::Verbose => LevelFilter::Debug,
        }
    }
}

/// Install the global logger. Safe to call more than once; later calls are
/// ignored.
pub fn init(verbosity: Verbosity) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(verbosity.filter());
    if verbosity < Verbosity::Verbose {
        // Plain lines for normal runs; level and target only when debugging.
        builder.format(|buf, record| match record.level() {
            log::Level::Info => writeln!(buf, "{}", record.args()),
            level => writeln!(buf, "{}: {}", level.as_str().to_lowercase(), record.args()),
        });
    }
    builder.parse_env("RUST_LOG");
    let _ = builder.try_init();
}

/// RAII timer that logs the elapsed duration on drop at debug level.
///
/// ```ignore
/// let _t = Timer::start("latency tables");
/// // ... work ...
/// // logs "latency tables: 42ms" on drop
/// ```
pub struct Timer {
    label: &'static str,
    start: Instant,
}

impl Timer {
    /// Begin timing a labeled operation.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        debug!("{}: {:.1?}", self.label, self.start.elapsed());
    }
}
