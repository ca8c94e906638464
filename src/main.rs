//! Rust Clearing Engine CLI
//!
//! Command-line interface for reconciling open ledger items from raw
//! export files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --rules rules.toml 0073=exports/fi.txt 499L=exports/de.txt
//! cargo run -- --rules rules.toml --strategy async --max-concurrent 4 0073=exports/fi.txt
//! cargo run -- --rules rules.toml --output-dir reports 0073=exports/fi.txt
//! ```
//!
//! The program reads one raw export file per entity, matches the open
//! items against the configured per-account criteria, and writes one
//! annotated report CSV per entity into the output directory. The actual
//! posting of clearing documents is performed by an external
//! collaborator; this binary reports what would be cleared.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, unreadable rules, unusable rule set, etc.)

use chrono::Local;
use rust_clearing_engine::core::calendar;
use rust_clearing_engine::io::write_items_csv;
use rust_clearing_engine::types::RuleSet;
use rust_clearing_engine::{cli, logging, strategy};
use std::fs::File;
use std::process;
use tracing::{info, warn};

fn main() {
    // Parse command-line arguments using clap
    let args = cli::parse_args();
    logging::init_logger(args.verbose);

    info!("loading clearing rules ...");
    let rules = match RuleSet::load(&args.rules_file) {
        Ok(rules) => rules,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    if rules.is_empty() {
        eprintln!("Error: no active entity in the rule set");
        process::exit(1);
    }

    let exports = match args.entity_exports() {
        Ok(exports) => exports,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    // Create the appropriate run strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_run_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let output = match strategy.run(&exports, &rules) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let posting_date = calendar::clearing_date(Local::now().date_naive(), &rules.holidays);
    info!(
        "clearing date for this run: {}",
        posting_date.format("%d.%m.%Y")
    );
    info!("total items to clear found: {}", output.total_matched());

    // entities that produced no outcome are only visible in the states
    for (entity, state) in output.states.iter() {
        if state.no_open_items {
            warn!("no report for entity '{}': no open items found", entity);
        } else if !state.exported {
            warn!("no report for entity '{}': export was not read", entity);
        }
    }

    for outcome in &output.outcomes {
        let country = rules
            .entities
            .get(&outcome.entity)
            .map(|e| e.country.as_str())
            .unwrap_or("unknown");
        let report_path = args
            .output_dir
            .join(format!("open_items_{}_{}.csv", outcome.entity, country));

        let mut file = match File::create(&report_path) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("Error: cannot create report '{}': {}", report_path.display(), e);
                process::exit(1);
            }
        };
        if let Err(e) = write_items_csv(&outcome.items, &mut file) {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        info!(
            "report for entity '{}' written to '{}'",
            outcome.entity,
            report_path.display()
        );
    }
}
