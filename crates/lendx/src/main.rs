use clap::{Parser, Subcommand};
use colored::Colorize;
use std::process;
use tracing::Level;

mod commands;

/// Exit codes: 0 = OK, 2 = input error, 1 = other.
const EXIT_OTHER: i32 = 1;
const EXIT_INPUT: i32 = 2;

#[derive(Parser)]
#[command(name = "lendx", version, about = "Lending adapter CLI: encode calls and evaluate deposit limits")]
struct Cli {
    /// Protocol variant (v2 | v3)
    #[arg(long, env = "LEND_PROTOCOL", default_value = "v3", global = true)]
    protocol: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode the three deposit instructions
    Deposit {
        /// Underlying token address
        #[arg(long)]
        token: String,
        /// Lending pool address
        #[arg(long)]
        pool: String,
        /// Account credited with the receipt tokens
        #[arg(long)]
        beneficiary: String,
        /// Amount in the token's smallest unit (decimal or 0x-hex)
        #[arg(long)]
        amount: String,
    },
    /// Encode the three withdraw instructions
    Withdraw {
        /// Receipt (lp) token address
        #[arg(long)]
        lp_token: String,
        /// Lending pool address
        #[arg(long)]
        pool: String,
        /// Underlying token address
        #[arg(long)]
        token: String,
        /// Account receiving the underlying
        #[arg(long)]
        beneficiary: String,
        /// Amount of receipt tokens
        #[arg(long)]
        amount: String,
    },
    /// Decode one encoded instruction (hex, or - for stdin)
    Decode {
        #[arg(default_value = "-")]
        code: String,
    },
    /// Evaluate the admissible deposit against an exported limit snapshot
    Limit {
        /// Path to limits JSON file
        #[arg(long)]
        limits: String,
        /// Address-provider registry of the pool
        #[arg(long)]
        registry: String,
        /// Underlying token address
        #[arg(long)]
        token: String,
        /// Current pool value in underlying units
        #[arg(long)]
        pool_value: String,
        /// Requested deposit amount
        #[arg(long)]
        amount: String,
    },
}

fn exit_code_for(err: &str) -> i32 {
    if err.contains("read ")
        || err.contains("parse ")
        || err.contains("invalid ")
        || err.contains("decode")
    {
        EXIT_INPUT
    } else {
        EXIT_OTHER
    }
}

fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();

    let result = commands::protocol(&cli.protocol).and_then(|protocol| match cli.command {
        Commands::Deposit {
            token,
            pool,
            beneficiary,
            amount,
        } => commands::deposit(protocol, &token, &pool, &beneficiary, &amount),
        Commands::Withdraw {
            lp_token,
            pool,
            token,
            beneficiary,
            amount,
        } => commands::withdraw(protocol, &lp_token, &pool, &token, &beneficiary, &amount),
        Commands::Decode { code } => commands::decode(&code),
        Commands::Limit {
            limits,
            registry,
            token,
            pool_value,
            amount,
        } => commands::limit(&limits, &registry, &token, &pool_value, &amount),
    });

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        process::exit(exit_code_for(&e));
    }
}
