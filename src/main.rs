//! MooDream Gateway - Entry Point
//!
//! Runs natural language commands through the structure -> verify -> trigger
//! pipeline, either once from the command line or interactively from stdin.

use clap::Parser;
use moodream_gateway::core::error::Result;
use moodream_gateway::{GatewayConfig, KeccakVerifier, Pipeline, PipelineResult};

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Structure, verify, and trigger natural language commands
#[derive(Parser, Debug)]
#[command(name = "moodream")]
#[command(about = "Turn a natural language command into a verified, triggered action")]
struct Args {
    /// TOML configuration file (defaults to LLM_API_KEY and friends from the environment)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fixed seed for the reference verifier, for reproducible proofs
    #[arg(long)]
    seed: Option<String>,

    /// Command to run; omit to read commands from stdin
    command: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodream_gateway=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => GatewayConfig::load(path)?,
        None => GatewayConfig::from_env()?,
    };
    let verifier = match args.seed {
        Some(seed) => KeccakVerifier::with_seed(seed),
        None => KeccakVerifier::new(),
    };

    let rt = Runtime::new()?;
    let pipeline = Pipeline::new(&config, verifier)?;
    tracing::info!(model = %config.llm.model, oracle = %config.oracle.url, "gateway ready");

    if !args.command.is_empty() {
        let command = args.command.join(" ");
        print_result(&rt.block_on(pipeline.run(&command)));
        return Ok(());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        print_result(&rt.block_on(pipeline.run(input)));
    }

    Ok(())
}

fn print_result(result: &PipelineResult) {
    println!("{}", result.status);
    match &result.proof {
        Some(proof) => println!("  Proof: {}", proof),
        None => println!("  Proof: none"),
    }
}
