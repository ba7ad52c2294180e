use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "halo-atomic workspace automation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the atomic cell benchmarks and summarize them
    Bench {
        /// Run quickly (lower sample size/time)
        #[arg(long, default_value_t = false)]
        quick: bool,

        /// Generate report only (skip running benchmarks)
        #[arg(long, default_value_t = false)]
        report_only: bool,
    },
    /// Run the loom model-checking tests
    Loom {
        /// Upper bound on preemptions explored per execution
        #[arg(long)]
        max_preemptions: Option<usize>,
    },
}

const BENCH: &str = "atomic_benchmark";

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Bench { quick, report_only } => {
            if !report_only {
                run_benchmarks(quick)?;
            }
            generate_report()?;
        }
        Commands::Loom { max_preemptions } => run_loom(max_preemptions)?,
    }

    Ok(())
}

fn run_benchmarks(quick: bool) -> Result<()> {
    println!("Compiling benchmarks...");
    let status = Command::new("cargo")
        .args(["build", "--bench", BENCH, "--release"])
        .status()?;
    if !status.success() {
        anyhow::bail!("Failed to compile {BENCH}");
    }

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.env("CARGO_INCREMENTAL", "0")
        .env("RUSTFLAGS", "-C opt-level=3 -C codegen-units=1")
        .args(["bench", "--bench", BENCH, "--"]);

    if quick {
        cmd.args(["--measurement-time", "0.1", "--noplot", "--sample-size", "10"]);
    }

    let status = cmd.status().context(format!("Failed to run {BENCH}"))?;
    if !status.success() {
        anyhow::bail!("{BENCH} exited with {status}");
    }
    println!("Finished {BENCH} in {:.2?}", start.elapsed());
    Ok(())
}

fn run_loom(max_preemptions: Option<usize>) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.env("RUSTFLAGS", "--cfg loom")
        .args(["test", "--release", "--test", "loom_atomic"]);
    if let Some(bound) = max_preemptions {
        cmd.env("LOOM_MAX_PREEMPTIONS", bound.to_string());
    }

    let status = cmd.status().context("Failed to launch loom tests")?;
    if !status.success() {
        anyhow::bail!("loom tests failed");
    }
    Ok(())
}

fn generate_report() -> Result<()> {
    println!("\n>>> Generating Report...");
    let criterion_dir = Path::new("target/criterion");
    if !criterion_dir.exists() {
        eprintln!("No criterion output found at {}", criterion_dir.display());
        return Ok(());
    }

    let mut results = BTreeMap::new();
    collect_results(criterion_dir, &mut results);

    let report_path = Path::new("benchmark_results/report.md");
    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent)?;
    }

    use std::io::Write;
    let mut file = fs::File::create(report_path)?;

    writeln!(file, "# Atomic Cell Benchmark Report")?;
    writeln!(file)?;
    writeln!(file, "| Benchmark | Ops/s |")?;
    writeln!(file, "|---|---|")?;
    for (name, ops) in &results {
        writeln!(file, "| {name} | {} |", format_ops(*ops))?;
    }

    println!("Report written to {}", report_path.display());
    Ok(())
}

fn format_ops(ops: f64) -> String {
    if ops > 1_000_000.0 {
        format!("{:.2}M", ops / 1_000_000.0)
    } else if ops > 1_000.0 {
        format!("{:.2}K", ops / 1_000.0)
    } else {
        format!("{ops:.0}")
    }
}

/// Walks `target/criterion` and records one throughput figure per benchmark,
/// keyed by its path relative to the criterion root.
fn collect_results(dir: &Path, results: &mut BTreeMap<String, f64>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_results(&path, results);
            continue;
        }
        if path.file_name().and_then(|s| s.to_str()) != Some("estimates.json") {
            continue;
        }

        // Layout: <group>/<bench>[/<param>]/new/estimates.json
        let Some(run_dir) = path.parent() else { continue };
        if run_dir.file_name().and_then(|s| s.to_str()) != Some("new") {
            continue;
        }
        let Some(bench_dir) = run_dir.parent() else { continue };
        let Ok(name) = bench_dir.strip_prefix("target/criterion") else { continue };
        let name = name.display().to_string();
        if name.split('/').any(|part| part == "report") {
            continue;
        }

        let elements = read_json(&bench_dir.join("benchmark.json"))
            .and_then(|json| json.get("throughput")?.get("Elements")?.as_f64());
        let Some(time_ns) = read_json(&path)
            .and_then(|json| json.get("mean")?.get("point_estimate")?.as_f64())
        else {
            continue;
        };
        if time_ns > 0.0 {
            results.insert(name, elements.unwrap_or(1.0) * 1e9 / time_ns);
        }
    }
}

fn read_json(path: &Path) -> Option<serde_json::Value> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}
