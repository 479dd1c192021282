//! Integration tests for churnplot.
//!
//! These tests invoke the churnplot binary as a subprocess against a small
//! benchmark run written into a temporary directory. Chart rendering needs
//! system fonts, so most tests pass `--no-plots`; the PNG test is ignored.
//!
//! Run the PNG test with: `cargo test --test integration -- --ignored`

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Locate the compiled churnplot binary.
///
/// `cargo test` places the test binary under `target/debug/deps/`. The main
/// binary lives one level up at `target/debug/churnplot`.
fn churnplot_binary() -> PathBuf {
    let mut path = std::env::current_exe().expect("could not determine test binary path");
    path.pop();
    if path.ends_with("deps") {
        path.pop();
    }
    path.push("churnplot");
    path
}

fn write(path: &Path, text: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, text).unwrap();
}

const PARAMS: &str = "67108864\n64\n22\n0\n95\n2\n1000\n0\n50\n";

const THROUGHPUT: &str = "\
churn_cycle ts num_ops duration op
0 1000000 1000 500000 INSERT
0 2000000 1000 250000 DELETE
0 3000000 1000 250000 LOOKUP
1 4000000 1000 500000 INSERT
1 5000000 1000 250000 DELETE
1 6000000 1000 250000 LOOKUP
1 7000000 2000 1000000 MIXED
";

const LATENCY: &str = "\
op latency
INSERT 100
INSERT 120
INSERT 140
DELETE 90
DELETE 95
LOOKUP 60
LOOKUP 70
LOOKUP 8000
MIXED 110
";

const METADATA: &str = "\
churn_cycle ts occupied tombstones
0 1000000 900 100
1 2000000 850 150
";

/// A run with two variants. `linear_probing` lacks latency samples and the
/// cluster length distribution.
struct Fixture {
    dir: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let run = dir.path().join("bench_run");

        let graveyard = run.join("graveyard");
        write(&graveyard.join("test_params.txt"), PARAMS);
        write(&graveyard.join("load.txt"), "x_0 y_0\n0 10.5\n1 9.75\n2 8.0\n");
        write(&graveyard.join("churn_thrput.txt"), THROUGHPUT);
        write(&graveyard.join("churn_latency.txt"), LATENCY);
        write(&graveyard.join("churn_metadata.txt"), METADATA);
        write(&graveyard.join("cluster_len.txt"), "cluster_len count\n3 10\n1 40\n2 20\n");
        write(&graveyard.join("home_slot_dist.txt"), "distance count\n0 500\n1 120\n");

        let linear = run.join("linear_probing");
        write(&linear.join("test_params.txt"), &PARAMS.replacen("67108864", "134217728", 1));
        write(&linear.join("load.txt"), "x_0 y_0\n0 11.0\n1 10.0\n");
        write(&linear.join("churn_thrput.txt"), THROUGHPUT);
        write(&linear.join("churn_metadata.txt"), "");
        write(&linear.join("home_slot_dist.txt"), "distance count\n0 480\n1 140\n");

        Self { dir }
    }

    fn run_dir(&self) -> PathBuf {
        self.dir.path().join("bench_run")
    }

    fn csv_root(&self) -> PathBuf {
        self.dir.path().join("csv")
    }

    /// Output directory for CSV and LaTeX files.
    fn tables(&self) -> PathBuf {
        self.csv_root().join("bench_run")
    }

    /// Run churnplot from the fixture directory with relative paths, the way
    /// it is invoked from a results checkout.
    fn churnplot(&self, extra: &[&str]) -> Output {
        self.churnplot_at("bench_run", extra)
    }

    fn churnplot_at(&self, run: &str, extra: &[&str]) -> Output {
        Command::new(churnplot_binary())
            .current_dir(self.dir.path())
            .arg(run)
            .args(["--csv-root", "csv"])
            .args(extra)
            .output()
            .expect("failed to execute churnplot")
    }
}

fn assert_success(output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "churnplot failed (exit={:?}):\nstdout:\n{stdout}\nstderr:\n{stderr}",
        output.status.code(),
    );
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn writes_tables_and_csv_without_plots() {
    let fixture = Fixture::new();
    let output = fixture.churnplot(&["--no-plots"]);
    assert_success(&output);
    let tables = fixture.tables();

    let mem = read(&tables.join("mem.tex"));
    assert!(mem.contains("\\toprule"), "{mem}");
    assert!(mem.contains("Space Efficiency"), "{mem}");
    assert!(mem.contains("64 MB"), "{mem}");
    assert!(mem.contains("47.50"), "{mem}");
    assert!(mem.contains("linear\\_probing"), "{mem}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Hashmap"), "memory table not printed:\n{stdout}");

    for op in ["DELETE", "INSERT", "LOOKUP"] {
        let tex = read(&tables.join(format!("{op}.tex")));
        assert!(tex.contains("graveyard"), "{op}.tex: {tex}");
        assert!(!tex.contains("linear"), "{op}.tex has a column without samples: {tex}");
        assert!(tex.contains("99.99\\%"), "{op}.tex: {tex}");
    }

    let overall = read(&tables.join("graveyard_OVERALL_throughput.csv"));
    assert!(overall.starts_with("churn_cycle,num_ops,duration,thrput\n"), "{overall}");
    assert_eq!(overall.lines().count(), 3);
    assert!(tables.join("graveyard_MIXED_throughput.csv").exists());
    assert!(!tables.join("graveyard_DELETE_throughput.csv").exists());

    let load = read(&tables.join("graveyard_load_phase.csv"));
    assert!(load.starts_with(",x_0,y_0\n0,0,10.5\n"), "{load}");
    assert!(tables.join("linear_probing_load_phase.csv").exists());

    let cluster = read(&tables.join("graveyard_cluster_len.csv"));
    assert_eq!(cluster, ",cluster_len,count\n1,1,40\n2,2,20\n0,3,10\n");
    assert!(!tables.join("linear_probing_cluster_len.csv").exists());
    assert!(tables.join("linear_probing_home_slot_dist.csv").exists());

    let pngs: Vec<_> = std::fs::read_dir(fixture.run_dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
        .collect();
    assert!(pngs.is_empty(), "--no-plots rendered {} image(s)", pngs.len());
}

#[test]
fn no_tables_skips_latex_only() {
    let fixture = Fixture::new();
    assert_success(&fixture.churnplot(&["--no-plots", "--no-tables"]));
    let tables = fixture.tables();
    assert!(!tables.join("mem.tex").exists());
    assert!(!tables.join("INSERT.tex").exists());
    assert!(tables.join("graveyard_OVERALL_throughput.csv").exists());
}

#[test]
fn json_summary() {
    let fixture = Fixture::new();
    let json_path = fixture.dir.path().join("summary.json");
    let json_arg = json_path.to_str().unwrap();
    assert_success(&fixture.churnplot(&["--no-plots", "--json", json_arg]));

    let value: serde_json::Value = serde_json::from_str(&read(&json_path)).unwrap();
    assert_eq!(value["run"], "bench_run");
    let graveyard = &value["variants"][0];
    assert_eq!(graveyard["name"], "graveyard");
    assert_eq!(graveyard["memory_usage"], 67_108_864);
    let overall = graveyard["throughput"]["OVERALL"].as_f64().unwrap();
    assert!((overall - 3.0).abs() < 1e-9, "OVERALL = {overall}");
    let insert = graveyard["throughput"]["INSERT"].as_f64().unwrap();
    assert!((insert - 2.0).abs() < 1e-9, "INSERT = {insert}");
    assert_eq!(graveyard["latency"]["LOOKUP"]["count"], 3);

    let linear = &value["variants"][1];
    assert_eq!(linear["name"], "linear_probing");
    assert_eq!(linear["latency"], serde_json::json!({}));
}

#[test]
fn summary_table_is_printed() {
    let fixture = Fixture::new();
    let output = fixture.churnplot(&["--no-plots", "--no-tables", "--summary", "-q"]);
    assert_success(&output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Run: bench_run"), "{stdout}");
    assert!(stdout.contains("OVERALL_NO_LOOKUP"), "{stdout}");
    assert!(stdout.contains("linear_probing"), "{stdout}");
}

#[test]
fn nested_run_keeps_its_path_under_csv_root() {
    let fixture = Fixture::new();
    let nested = fixture.dir.path().join("results");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::rename(fixture.run_dir(), nested.join("bench_run")).unwrap();

    let output = fixture.churnplot_at("results/bench_run", &["--no-plots", "--json", "s.json"]);
    assert_success(&output);
    let tables = fixture.csv_root().join("results").join("bench_run");
    assert!(tables.join("mem.tex").exists());
    assert!(tables.join("graveyard_load_phase.csv").exists());
    assert!(!fixture.tables().exists());

    let summary = read(&fixture.dir.path().join("s.json"));
    let value: serde_json::Value = serde_json::from_str(&summary).unwrap();
    assert_eq!(value["run"], "bench_run");
}

#[test]
fn config_in_run_dir_replaces_groups() {
    let fixture = Fixture::new();
    write(
        &fixture.run_dir().join("churnplot.toml"),
        "[[throughput]]\nname = \"WRITES\"\nops = [\"INSERT\", \"DELETE\"]\ncsv = true\n",
    );
    assert_success(&fixture.churnplot(&["--no-plots", "--no-tables"]));
    let tables = fixture.tables();
    assert!(tables.join("graveyard_WRITES_throughput.csv").exists());
    assert!(!tables.join("graveyard_OVERALL_throughput.csv").exists());
}

#[test]
fn invalid_config_fails() {
    let fixture = Fixture::new();
    let config = fixture.dir.path().join("bad.toml");
    write(&config, "[latency]\npercentiles = [2.0]\n");
    let output = fixture.churnplot(&["--no-plots", "-c", config.to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.toml"), "{stderr}");
}

#[test]
fn missing_run_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = Command::new(churnplot_binary())
        .arg(dir.path().join("nope"))
        .output()
        .expect("failed to execute churnplot");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("does not exist"), "{stderr}");
}

#[test]
fn malformed_input_names_the_file() {
    let fixture = Fixture::new();
    write(
        &fixture.run_dir().join("graveyard/churn_latency.txt"),
        "op latency\nINSERT 100\nINSERT\n",
    );
    let output = fixture.churnplot(&["--no-plots"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("churn_latency.txt"), "{stderr}");
    assert!(stderr.contains("line 3"), "{stderr}");
}

#[test]
#[ignore = "needs system fonts"]
fn renders_every_chart() {
    let fixture = Fixture::new();
    write(
        &fixture.run_dir().join("churnplot.toml"),
        "[charts]\ntime-series = true\n",
    );
    let output = fixture.churnplot(&[]);
    assert_success(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("failed to render"), "{stderr}");

    let run = fixture.run_dir();
    for name in [
        "plot_insert.png",
        "plot_churn_OVERALL.png",
        "plot_churn_MIXED.png",
        "plot_churn_xtime_OVERALL.png",
        "plot_churn_tombstones.png",
        "plot_churn_tombstones_ratio.png",
        "plot_churn_latency_INSERT.png",
        "plot_churn_latency_MIXED.png",
        "plot_churn_latency_grouped.png",
        "plot_cluster_len.png",
        "plot_home_slot_dist.png",
        "plot_memory_usage.png",
    ] {
        assert!(run.join(name).exists(), "{name} was not rendered");
    }
    assert!(!run.join("plot_tombstone_dist.png").exists());
}
