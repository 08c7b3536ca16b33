//! pipeline-runner: headless runner for the fraud-scoring pipeline.
//!
//! Usage:
//!   pipeline-runner train   [--data-dir DIR] [--config FILE] [--rows N] [--seed N]
//!   pipeline-runner score   [--data-dir DIR] [--config FILE]
//!   pipeline-runner run     [--data-dir DIR] [--config FILE]
//!   pipeline-runner dashboard [--data-dir DIR] [--ipc-mode]
//!
//! `dashboard --ipc-mode` serves the interactive filter state over
//! newline-delimited JSON on stdin/stdout for a UI harness.

use anyhow::Result;
use fraudsight_core::{
    config::PipelineConfig,
    dashboard::{DashboardState, FraudFilter},
    metrics::EvalMetrics,
    pipeline, scorer, trainer,
    types::ScoredRecord,
};
use std::env;
use std::io::{self, BufRead, Write};
use std::path::Path;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    SetFilter { filter: String, threshold_pct: u8 },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    loaded: usize,
    filtered: usize,
    filter: FraudFilter,
    threshold_pct: u8,
    records: Vec<&'a ScoredRecord>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("run");

    let mut cfg = match args.windows(2).find(|w| w[0] == "--config") {
        Some(w) => PipelineConfig::load(Path::new(&w[1]))?,
        None => match args.windows(2).find(|w| w[0] == "--data-dir") {
            Some(w) => PipelineConfig::with_root(Path::new(&w[1])),
            None => PipelineConfig::default(),
        },
    };
    if let Some(rows) = flag_value(&args, "--rows") {
        cfg.dataset_size = rows;
    }
    if let Some(seed) = flag_value(&args, "--seed") {
        cfg.training_seed = seed;
    }

    match command {
        "train" => {
            let (_, metrics) = trainer::run(&cfg)?;
            print_metrics(&metrics);
        }
        "score" => {
            let model = pipeline::ensure_model(&cfg)?;
            let scored = scorer::run(&cfg, &model)?;
            print_scoring_summary(&cfg, &scored);
        }
        "run" => {
            let scored = pipeline::run(&cfg)?;
            print_scoring_summary(&cfg, &scored);
        }
        "dashboard" => {
            let mut state = DashboardState::load(&cfg.report_path)?;
            if args.iter().any(|a| a == "--ipc-mode") {
                run_ipc_loop(&mut state)?;
            } else {
                print_dashboard(&state);
            }
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!("Commands: train | score | run | dashboard");
            std::process::exit(2);
        }
    }

    Ok(())
}

fn flag_value<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
}

fn run_ipc_loop(state: &mut DashboardState) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut buffer = String::new();
    let mut handle = stdin.lock();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{err_json}")?;
                stdout.flush()?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(state))?)?;
            }
            IpcCommand::SetFilter { filter, threshold_pct } => {
                match FraudFilter::parse(&filter) {
                    Some(parsed) => state.set_filter(parsed, threshold_pct),
                    None => log::warn!("unknown filter label: {filter}"),
                }
                writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(state))?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn build_ui_state(state: &DashboardState) -> UiState<'_> {
    let summary = state.summary();
    UiState {
        loaded: summary.loaded,
        filtered: summary.filtered,
        filter: state.filter,
        threshold_pct: state.threshold_pct,
        records: state.filtered(),
    }
}

fn print_metrics(metrics: &EvalMetrics) {
    println!("=== TRAINING SUMMARY ===");
    println!("  accuracy:   {:.4}", metrics.accuracy);
    match metrics.auc_roc {
        Some(auc) => println!("  AUC-ROC:    {auc:.4}"),
        None => println!("  AUC-ROC:    n/a (single-class test partition)"),
    }
    println!("  confusion (rows actual, cols predicted):");
    println!("    legit: {:>8} {:>8}", metrics.confusion[0][0], metrics.confusion[0][1]);
    println!("    fraud: {:>8} {:>8}", metrics.confusion[1][0], metrics.confusion[1][1]);
    println!(
        "  legit: precision {:.3} recall {:.3} f1 {:.3} (n={})",
        metrics.legit.precision, metrics.legit.recall, metrics.legit.f1, metrics.legit.support
    );
    println!(
        "  fraud: precision {:.3} recall {:.3} f1 {:.3} (n={})",
        metrics.fraud.precision, metrics.fraud.recall, metrics.fraud.f1, metrics.fraud.support
    );
}

fn print_scoring_summary(cfg: &PipelineConfig, scored: &[ScoredRecord]) {
    let flagged = scored.iter().filter(|r| r.is_predicted_fraud == 1).count();
    println!("=== SCORING SUMMARY ===");
    println!("  records scored: {}", scored.len());
    println!("  flagged fraud:  {flagged}");
    println!("  report:         {}", cfg.report_path.display());
    println!("  figures:        {}", cfg.figures_dir.display());
}

fn print_dashboard(state: &DashboardState) {
    let summary = state.summary();
    println!("=== DASHBOARD ===");
    println!("  records loaded:   {}", summary.loaded);
    println!("  records filtered: {}", summary.filtered);
    println!(
        "  filter: {:?} at threshold {}%",
        state.filter, state.threshold_pct
    );
    for record in state.filtered().iter().take(20) {
        println!(
            "  p={:.2} fraud={} claim=${} income=${} | {}",
            record.fraud_probability,
            record.is_predicted_fraud,
            record.claim_amount,
            record.income,
            record.justification
        );
    }
}
