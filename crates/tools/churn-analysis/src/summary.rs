//! Run-level summary: terminal table and JSON dump.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

use crate::humanize;
use crate::stats::Summary;

/// Headline numbers for one variant.
#[derive(Debug, Clone, Default, Serialize)]
pub struct VariantSummary {
    /// Variant name.
    pub name: String,
    /// Bytes used, if `test_params.txt` was present.
    pub memory_usage: Option<u64>,
    /// Overall churn throughput (ops/us) per throughput group name.
    pub throughput: BTreeMap<String, f64>,
    /// Latency summary per op.
    pub latency: BTreeMap<String, Summary>,
}

/// Headline numbers for a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Run directory name.
    pub run: String,
    /// Per-variant summaries, in variant order.
    pub variants: Vec<VariantSummary>,
}

impl RunSummary {
    /// Throughput group names present in any variant, sorted.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self
            .variants
            .iter()
            .flat_map(|v| v.throughput.keys().map(String::as_str))
            .collect();
        groups.sort_unstable();
        groups.dedup();
        groups
    }

    /// Write the summary as pretty-printed JSON.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serializing summary to JSON")?;
        std::fs::write(path, json).with_context(|| format!("writing summary to {}", path.display()))
    }
}

/// Print the throughput and latency tables for a run.
pub fn print_summary_table(summary: &RunSummary) {
    if summary.variants.is_empty() {
        println!("  No variants to summarize.");
        return;
    }

    let name_width = summary
        .variants
        .iter()
        .map(|v| v.name.len())
        .max()
        .unwrap_or(7)
        .max(7);
    let groups = summary.groups();
    let group_width = groups.iter().map(|g| g.len()).max().unwrap_or(0).max(10);

    println!();
    println!("  Run: {}", summary.run);
    println!();

    // Throughput table.
    let mut header = format!("  {:<name_width$}  {:>8}", "Variant", "Memory");
    let mut rule = format!("  {:-<name_width$}  {:->8}", "", "");
    for g in &groups {
        let _ = write!(header, "  {g:>group_width$}");
        let _ = write!(rule, "  {:->group_width$}", "");
    }
    println!("{header}");
    println!("{rule}");

    for v in &summary.variants {
        let memory = v.memory_usage.map_or_else(|| "-".to_string(), humanize::bytes);
        let mut line = format!("  {:<name_width$}  {memory:>8}", v.name);
        for g in &groups {
            let cell = v
                .throughput
                .get(*g)
                .map_or_else(|| "-".to_string(), |t| format!("{t:.3}"));
            let _ = write!(line, "  {cell:>group_width$}");
        }
        println!("{line}");
    }
    println!("  (throughput in ops/usec)");

    // Latency table.
    let rows: Vec<(&str, &str, &Summary)> = summary
        .variants
        .iter()
        .flat_map(|v| {
            v.latency
                .iter()
                .map(move |(op, s)| (v.name.as_str(), op.as_str(), s))
        })
        .collect();
    if rows.is_empty() {
        println!();
        return;
    }

    println!();
    println!(
        "  {:<name_width$}  {:<8}  {:>10}  {:>12}  {:>12}  {:>12}",
        "Variant", "Op", "Samples", "Mean", "Median", "Max"
    );
    println!(
        "  {:-<name_width$}  {:-<8}  {:->10}  {:->12}  {:->12}  {:->12}",
        "", "", "", "", "", ""
    );
    for (name, op, s) in rows {
        let median = s
            .percentiles
            .iter()
            .find(|(q, _)| (*q - 0.5).abs() < f64::EPSILON)
            .map_or_else(|| "-".to_string(), |(_, v)| humanize::nanoseconds(*v));
        println!(
            "  {:<name_width$}  {:<8}  {:>10}  {:>12}  {:>12}  {:>12}",
            name,
            op,
            s.count,
            humanize::nanoseconds(s.mean),
            median,
            humanize::nanoseconds(s.max),
        );
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        let mut a = VariantSummary {
            name: "graveyard".into(),
            memory_usage: Some(1 << 20),
            ..VariantSummary::default()
        };
        a.throughput.insert("OVERALL".into(), 12.5);
        a.throughput.insert("DELETE".into(), 10.0);
        a.latency.insert(
            "INSERT".into(),
            Summary::describe(&[10.0, 20.0, 30.0], &[0.5]).unwrap(),
        );

        let mut b = VariantSummary {
            name: "robinhood".into(),
            ..VariantSummary::default()
        };
        b.throughput.insert("MIXED".into(), 3.0);

        RunSummary {
            run: "bench_run".into(),
            variants: vec![a, b],
        }
    }

    #[test]
    fn groups_are_sorted_and_unique() {
        assert_eq!(summary().groups(), ["DELETE", "MIXED", "OVERALL"]);
    }

    #[test]
    fn json_round_trips_through_serde_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        summary().save_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["run"], "bench_run");
        assert_eq!(value["variants"][0]["throughput"]["OVERALL"], 12.5);
        assert_eq!(value["variants"][0]["latency"]["INSERT"]["count"], 3);
        assert!(value["variants"][1]["memory_usage"].is_null());
    }

    #[test]
    fn print_does_not_panic_on_sparse_data() {
        print_summary_table(&summary());
        print_summary_table(&RunSummary::default());
    }
}
