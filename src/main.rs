//! split-settle CLI
//!
//! Settle a group's shared expenses from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Who pays whom, as text
//! split-settle settle --input trip.json
//!
//! # Pairwise netting, as JSON
//! split-settle settle --input trip.json --strategy pairwise --format json
//!
//! # Inspect the obligation graph before and after reduction
//! split-settle graph --input trip.json --reduced
//!
//! # Generate a random group for testing
//! split-settle generate --participants 8 --expenses 40
//! ```

use split_settle::config::EngineConfig;
use split_settle::core::expense::Expense;
use split_settle::core::money;
use split_settle::core::participant::Participant;
use split_settle::settlement::engine::SettlementEngine;
use split_settle::settlement::netting::NettingStrategy;
use split_settle::simulation::stress_test::{generate_random_group, GroupConfig};
use std::fs;
use std::process;

fn print_usage() {
    eprintln!(
        r#"split-settle — settle shared group expenses

USAGE:
    split-settle <COMMAND> [OPTIONS]

COMMANDS:
    settle      Recommend payments that square the group up
    graph       Show pairwise obligations, optionally reduced
    report      Full settlement report: balances, payments, savings
    generate    Generate a random group (for testing)
    help        Show this message

OPTIONS (settle, graph, report):
    --input <FILE>        Path to JSON group file
    --config <FILE>       Path to JSON engine config
    --format <FORMAT>     Output format: text (default) or json (settle, report)
    --strategy <NAME>     pairwise or aggregate (settle only)
    --reduced             Reduce the graph first (graph only)

OPTIONS (generate):
    --participants <N>    Number of participants (default: 6)
    --expenses <N>        Number of expenses (default: 20)
    --output <FILE>       Write to file instead of stdout

ENVIRONMENT:
    RUST_LOG              Log filter, e.g. RUST_LOG=split_settle=debug

EXAMPLES:
    split-settle settle --input trip.json
    split-settle settle --input trip.json --strategy pairwise --format json
    split-settle graph --input trip.json --reduced
    split-settle report --input trip.json --config engine.json
    split-settle generate --participants 10 --expenses 50 --output trip.json"#
    );
}

/// JSON schema for a group: its members and their expenses.
#[derive(serde::Serialize, serde::Deserialize)]
struct GroupFile {
    participants: Vec<Participant>,
    #[serde(default)]
    expenses: Vec<Expense>,
}

/// Options shared by the commands that read a group.
#[derive(Default)]
struct Options {
    input: Option<String>,
    config: Option<String>,
    format: Option<String>,
    strategy: Option<NettingStrategy>,
    reduced: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    process::exit(1);
}

fn value(args: &[String], i: usize, hint: &str) -> String {
    args.get(i).cloned().unwrap_or_else(|| {
        eprintln!("{} requires {}", args[i - 1], hint);
        process::exit(1);
    })
}

fn parse_options(args: &[String], allowed: &[&str]) -> Options {
    let mut opts = Options::default();
    let mut i = 0;
    while i < args.len() {
        let flag = args[i].as_str();
        if !allowed.contains(&flag) {
            eprintln!("Unknown option: {}", flag);
            process::exit(1);
        }
        match flag {
            "--input" => {
                i += 1;
                opts.input = Some(value(args, i, "a file path"));
            }
            "--config" => {
                i += 1;
                opts.config = Some(value(args, i, "a file path"));
            }
            "--format" => {
                i += 1;
                let format = value(args, i, "'text' or 'json'");
                if format != "text" && format != "json" {
                    fail(format!("unknown format '{}'", format));
                }
                opts.format = Some(format);
            }
            "--strategy" => {
                i += 1;
                let name = value(args, i, "'pairwise' or 'aggregate'");
                opts.strategy = Some(name.parse().unwrap_or_else(|e| fail(e)));
            }
            "--reduced" => opts.reduced = true,
            _ => unreachable!("flag {} is allowed but not handled", flag),
        }
        i += 1;
    }
    opts
}

impl Options {
    fn json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }

    fn engine(&self) -> SettlementEngine {
        let config = match &self.config {
            Some(path) => EngineConfig::load(path).unwrap_or_else(|e| fail(e)),
            None => EngineConfig::default(),
        };
        SettlementEngine::new(config)
    }

    fn group(&self) -> GroupFile {
        let path = self
            .input
            .as_deref()
            .unwrap_or_else(|| fail("--input <FILE> is required"));
        let content = fs::read_to_string(path)
            .unwrap_or_else(|e| fail(format!("cannot read '{}': {}", path, e)));
        serde_json::from_str(&content).unwrap_or_else(|e| {
            eprintln!("Error parsing JSON: {}", e);
            eprintln!("Expected format:");
            eprintln!(
                r#"{{
  "participants": [{{ "id": "a", "displayName": "Ann" }}, {{ "id": "b", "displayName": "Ben" }}],
  "expenses": [
    {{ "payerId": "a", "amount": 30.00, "splitType": "even",
       "splits": [{{ "participantId": "a", "amount": 15.00 }}, {{ "participantId": "b", "amount": 15.00 }}] }}
  ]
}}"#
            );
            process::exit(1);
        })
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|e| fail(e));
    println!("{}", json);
}

fn cmd_settle(args: &[String]) {
    let opts = parse_options(args, &["--input", "--config", "--format", "--strategy"]);
    let engine = opts.engine();
    let group = opts.group();
    let strategy = opts.strategy.unwrap_or(engine.config().strategy);

    let settlements = engine
        .settle_with(&group.participants, &group.expenses, strategy)
        .unwrap_or_else(|e| fail(e));

    if opts.json() {
        print_json(&settlements);
    } else if settlements.is_empty() {
        println!("Everyone is square.");
    } else {
        for s in &settlements {
            println!("{}", s);
        }
        let total: rust_decimal::Decimal = settlements.iter().map(|s| s.amount).sum();
        println!(
            "\n{} transfers, {} in total ({})",
            settlements.len(),
            money::format_amount(total),
            strategy
        );
    }
}

fn cmd_graph(args: &[String]) {
    let opts = parse_options(args, &["--input", "--config", "--format", "--reduced"]);
    let engine = opts.engine();
    let group = opts.group();

    let mut graph = engine
        .obligation_graph(&group.participants, &group.expenses)
        .unwrap_or_else(|e| fail(e));
    let summary = opts
        .reduced
        .then(|| engine.config().reducer().reduce_in_place(&mut graph));

    if opts.json() {
        print_json(&graph);
        return;
    }

    let obligations = graph.obligations();
    if obligations.is_empty() {
        println!("No outstanding obligations.");
    }
    for ob in &obligations {
        println!(
            "  {} owes {} {}",
            ob.debtor(),
            ob.creditor(),
            money::format_amount(ob.amount())
        );
    }
    println!(
        "\n{} obligations, {} gross",
        obligations.len(),
        money::format_amount(graph.gross_total())
    );
    if let Some(summary) = summary {
        println!("Cycles cancelled:  {}", summary.cycles_cancelled);
        println!("Chains collapsed:  {}", summary.chains_collapsed);
    }
}

fn cmd_report(args: &[String]) {
    let opts = parse_options(args, &["--input", "--config", "--format"]);
    let engine = opts.engine();
    let group = opts.group();

    let report = engine
        .report(&group.participants, &group.expenses)
        .unwrap_or_else(|e| fail(e));

    if opts.json() {
        print_json(&report);
    } else {
        println!("{}", report);
    }
}

fn cmd_generate(args: &[String]) {
    let mut config = GroupConfig::default();
    let mut output_path: Option<String> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--participants" => {
                i += 1;
                config.participant_count = value(args, i, "a number")
                    .parse()
                    .unwrap_or_else(|_| fail("--participants requires a number"));
            }
            "--expenses" => {
                i += 1;
                config.expense_count = value(args, i, "a number")
                    .parse()
                    .unwrap_or_else(|_| fail("--expenses requires a number"));
            }
            "--output" => {
                i += 1;
                output_path = Some(value(args, i, "a file path"));
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                process::exit(1);
            }
        }
        i += 1;
    }

    let (participants, expenses) = generate_random_group(&config).unwrap_or_else(|e| fail(e));
    let output = GroupFile {
        participants,
        expenses,
    };
    let json = serde_json::to_string_pretty(&output).unwrap_or_else(|e| fail(e));

    if let Some(path) = output_path {
        fs::write(&path, &json)
            .unwrap_or_else(|e| fail(format!("cannot write '{}': {}", path, e)));
        eprintln!(
            "Generated {} expenses across {} participants → {}",
            output.expenses.len(),
            output.participants.len(),
            path
        );
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
        "graph" => cmd_graph(rest),
        "report" => cmd_report(rest),
        "generate" => cmd_generate(rest),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            process::exit(1);
        }
    }
}
