//! Benchmark run directories and the variants inside them.

use anyhow::{Context, Result, bail};
use log::debug;
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::params::TestParams;

/// A result file the harness writes into each variant directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataFile {
    /// `test_params.txt`.
    TestParams,
    /// `load.txt`: load phase throughput.
    Load,
    /// `churn_thrput.txt`: churn phase throughput per batch.
    ChurnThroughput,
    /// `churn_latency.txt`: sampled per-operation latencies.
    ChurnLatency,
    /// `churn_metadata.txt`: occupancy and tombstones per churn cycle.
    ChurnMetadata,
    /// `<metric>.txt`: a two-column distribution dumped by the hash map.
    Distribution(String),
}

impl DataFile {
    /// File name inside the variant directory.
    pub fn file_name(&self) -> String {
        match self {
            Self::TestParams => "test_params.txt".into(),
            Self::Load => "load.txt".into(),
            Self::ChurnThroughput => "churn_thrput.txt".into(),
            Self::ChurnLatency => "churn_latency.txt".into(),
            Self::ChurnMetadata => "churn_metadata.txt".into(),
            Self::Distribution(metric) => format!("{metric}.txt"),
        }
    }
}

impl fmt::Display for DataFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name())
    }
}

/// One tested hash map configuration: a subdirectory of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Directory name, used as the series label.
    pub name: String,
    /// Absolute or run-relative path of the variant directory.
    pub dir: PathBuf,
}

impl Variant {
    /// Path of a result file in this variant.
    pub fn path(&self, file: &DataFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Returns `true` if the result file exists as a regular file.
    pub fn has(&self, file: &DataFile) -> bool {
        self.path(file).is_file()
    }

    /// Path of `file` if it exists; logs the skip otherwise.
    pub fn existing(&self, file: &DataFile) -> Option<PathBuf> {
        let path = self.path(file);
        if path.is_file() {
            Some(path)
        } else {
            debug!("{}: no {file}, skipping", self.name);
            None
        }
    }
}

/// A benchmark run directory.
#[derive(Debug, Clone)]
pub struct RunDir {
    /// Path as given on the command line.
    pub root: PathBuf,
    /// Variants sorted by name.
    pub variants: Vec<Variant>,
}

impl RunDir {
    /// Open a run directory and discover its variants.
    ///
    /// Every immediate, non-hidden subdirectory is a variant. Files at the
    /// top level (previous plots, configuration) are ignored.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            bail!("run directory {} does not exist", root.display());
        }

        let mut variants = Vec::new();
        let entries =
            std::fs::read_dir(root).with_context(|| format!("listing {}", root.display()))?;
        for entry in entries {
            let entry = entry.with_context(|| format!("listing {}", root.display()))?;
            let file_type = entry
                .file_type()
                .with_context(|| format!("inspecting {}", entry.path().display()))?;
            if !file_type.is_dir() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                debug!("skipping non-UTF-8 entry {}", entry.path().display());
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            variants.push(Variant {
                name,
                dir: entry.path(),
            });
        }

        if variants.is_empty() {
            bail!("no variant directories found in {}", root.display());
        }
        variants.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            root: root.to_path_buf(),
            variants,
        })
    }

    /// Final path component of the run, used as its display name.
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .map_or_else(|| "run".to_string(), |n| n.to_string_lossy().into_owned())
    }

    /// Relative directory under which the run's tables are written: the run
    /// path with root, prefix, `.` and `..` components removed.
    pub fn table_subdir(&self) -> PathBuf {
        let dir: PathBuf = self
            .root
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part),
                _ => None,
            })
            .collect();
        if dir.as_os_str().is_empty() {
            PathBuf::from("run")
        } else {
            dir
        }
    }

    /// Parameters of the first variant that has a `test_params.txt`.
    pub fn params(&self) -> Result<Option<TestParams>> {
        self.variants
            .iter()
            .find(|v| v.has(&DataFile::TestParams))
            .map(|v| TestParams::read(&v.path(&DataFile::TestParams)))
            .transpose()
    }
}
