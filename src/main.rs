//! pool-settlement CLI
//!
//! Work out fair-share settlements for a pool from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Settle a pool from a JSON file
//! pool-settlement settle --input pool.json
//!
//! # Output as JSON
//! pool-settlement settle --input pool.json --format json
//!
//! # Generate a random pool for testing
//! pool-settlement generate --participants 8
//! ```
//!
//! Set `RUST_LOG=debug` to see the engine's working.

use log::{debug, warn};
use pool_settlement::core::currency::DisplayCurrency;
use pool_settlement::core::roster::ParticipantRoster;
use pool_settlement::engine::settlement::{PositionStatus, SettlementEngine};
use pool_settlement::engine::summary::SettlementSummary;
use pool_settlement::simulation::random_pool::{generate_random_pool, PoolConfig};
use rust_decimal::Decimal;
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"pool-settlement — fair-share settlement for shared pools

USAGE:
    pool-settlement <COMMAND> [OPTIONS]

COMMANDS:
    settle      Compute the transfers that settle a pool
    generate    Generate a random pool (for testing)
    help        Show this message

OPTIONS (settle):
    --input <FILE>      Path to JSON pool file
    --format <FORMAT>   Output format: text (default) or json
    --symbol <SYMBOL>   Currency symbol for text output (default: ₹)

OPTIONS (generate):
    --participants <N>  Number of participants (default: 10)
    --output <FILE>     Write to file instead of stdout

EXAMPLES:
    pool-settlement settle --input pool.json
    pool-settlement settle --input pool.json --format json
    pool-settlement settle --input pool.json --symbol '$'
    pool-settlement generate --participants 6 --output pool.json"#
    );
}

/// JSON schema for one input participant.
#[derive(serde::Deserialize, serde::Serialize)]
struct ParticipantInput {
    name: String,
    amount_invested: String,
    amount_won: String,
}

#[derive(serde::Deserialize, serde::Serialize)]
struct PoolFile {
    participants: Vec<ParticipantInput>,
}

/// JSON output schema for a settlement plan.
#[derive(serde::Serialize)]
struct SettlementOutput {
    total_invested: String,
    total_won: String,
    net_result: String,
    fair_investment: String,
    fair_winnings: String,
    balanced: bool,
    positions: Vec<PositionOutput>,
    transfers: Vec<TransferOutput>,
}

#[derive(serde::Serialize)]
struct PositionOutput {
    id: u64,
    name: String,
    net_position: String,
    status: String,
}

#[derive(serde::Serialize)]
struct TransferOutput {
    from: String,
    to: String,
    amount: String,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn take_value(args: &[String], i: usize, flag: &str, what: &str) -> String {
    args.get(i)
        .cloned()
        .unwrap_or_else(|| fail(format!("{} requires {}", flag, what)))
}

fn load_roster(path: &str) -> ParticipantRoster {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| fail(format!("reading file '{}': {}", path, e)));

    let file: PoolFile = serde_json::from_str(&content).unwrap_or_else(|e| {
        eprintln!("Expected format:");
        eprintln!(
            r#"{{
  "participants": [
    {{ "name": "Asha", "amount_invested": "100", "amount_won": "200" }}
  ]
}}"#
        );
        fail(format!("parsing JSON: {}", e))
    });

    let mut roster = ParticipantRoster::new();
    for input in file.participants {
        let invested = parse_amount(&input.amount_invested);
        let won = parse_amount(&input.amount_won);
        roster
            .add(input.name, invested, won)
            .unwrap_or_else(|e| fail(e));
    }
    debug!("loaded {} participants from {}", roster.len(), path);
    roster
}

fn parse_amount(raw: &str) -> Decimal {
    raw.trim()
        .parse()
        .unwrap_or_else(|e| fail(format!("invalid amount '{}': {}", raw, e)))
}

fn cmd_settle(args: &[String]) {
    let mut input_path = None;
    let mut format = "text".to_string();
    let mut currency = DisplayCurrency::default();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--input" => {
                i += 1;
                input_path = Some(take_value(args, i, "--input", "a file path"));
            }
            "--format" => {
                i += 1;
                format = take_value(args, i, "--format", "'text' or 'json'");
            }
            "--symbol" => {
                i += 1;
                currency.symbol = take_value(args, i, "--symbol", "a currency symbol");
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let path = input_path.unwrap_or_else(|| fail("--input <FILE> is required"));
    let roster = load_roster(&path);
    let plan = SettlementEngine::settle(roster.participants()).unwrap_or_else(|e| fail(e));
    if !plan.is_closed() {
        warn!("settlement plan does not close every position");
    }

    match format.as_str() {
        "json" => {
            let totals = plan.totals();
            let output = SettlementOutput {
                total_invested: currency.round(totals.total_invested).to_string(),
                total_won: currency.round(totals.total_won).to_string(),
                net_result: currency.round(totals.net_result()).to_string(),
                fair_investment: currency.round(plan.fair_investment()).to_string(),
                fair_winnings: currency.round(plan.fair_winnings()).to_string(),
                balanced: plan.is_balanced(),
                positions: plan
                    .positions()
                    .iter()
                    .map(|p| PositionOutput {
                        id: p.participant.value(),
                        name: p.name.clone(),
                        net_position: currency.round(p.net_position).to_string(),
                        status: match p.status() {
                            PositionStatus::Pays => "PAYS",
                            PositionStatus::Receives => "RECEIVES",
                            PositionStatus::Even => "EVEN",
                        }
                        .to_string(),
                    })
                    .collect(),
                transfers: plan
                    .transfers()
                    .iter()
                    .map(|t| TransferOutput {
                        from: t.from().name.clone(),
                        to: t.to().name.clone(),
                        amount: format!("{:.2}", t.display_amount()),
                    })
                    .collect(),
            };
            let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));
            println!("{}", json);
        }
        "text" => {
            println!("{}", plan.render(&currency));
            let summary = SettlementSummary::from_plan(&plan);
            println!("{}", summary.render(&currency));
        }
        other => fail(format!("unknown format '{}': expected 'text' or 'json'", other)),
    }
}

fn cmd_generate(args: &[String]) {
    let mut participants = 10usize;
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                participants = args
                    .get(i)
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(|| fail("--participants requires a number"));
            }
            "--output" => {
                i += 1;
                output_path = Some(take_value(args, i, "--output", "a file path"));
            }
            other => fail(format!("unknown option: {}", other)),
        }
        i += 1;
    }

    let config = PoolConfig {
        participant_count: participants,
        ..Default::default()
    };
    let pool = generate_random_pool(&config);

    let output = PoolFile {
        participants: pool
            .iter()
            .map(|p| ParticipantInput {
                name: p.name().to_string(),
                amount_invested: p.amount_invested().to_string(),
                amount_won: p.amount_won().to_string(),
            })
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json).unwrap_or_else(|e| fail(format!("writing '{}': {}", path, e)));
        eprintln!("Generated {} participants → {}", pool.len(), path);
    } else {
        println!("{}", json);
    }
}

fn main() {
    env_logger::init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    match command {
        "settle" => cmd_settle(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
