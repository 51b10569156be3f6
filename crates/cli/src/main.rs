//! Civic Checkout CLI - Offline tools for the checkout rules.
//!
//! # Usage
//!
//! ```bash
//! # Check and normalize an identity number
//! cc-cli validate 19900101-1234
//!
//! # Evaluate a cart against the built-in rules
//! cc-cli evaluate --cart '[{"product_id": 1, "category_slugs": ["mobilabonnemang"]}]'
//!
//! # Evaluate product ids against a rules file catalog, adjusting rates
//! cc-cli evaluate --cart '[1, 2]' --rules rules.yaml \
//!     --rates '[{"rate_key": "flat_rate:1", "cost": "49.00"}]'
//!
//! # Check a rules file
//! cc-cli rules check rules.yaml
//! ```
//!
//! # Commands
//!
//! - `validate` - Validate and normalize one identity number
//! - `evaluate` - Print the category decision, fields and adjusted rates
//! - `rules check` - Load and validate a rules file

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use civic_checkout::services::FieldProfile;

mod commands;

#[derive(Parser)]
#[command(name = "cc-cli")]
#[command(author, version, about = "Civic Checkout CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and normalize an identity number
    Validate {
        /// Raw number, `YYYYMMDDXXXX` or `YYYYMMDD-XXXX`
        raw: String,
    },
    /// Evaluate a cart against the checkout rules
    Evaluate {
        /// Cart as JSON: line items with category slugs, or product ids
        #[arg(short, long)]
        cart: String,

        /// Rules file (defaults to `CHECKOUT_RULES_PATH`, then built-in rules)
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Field profile override (`always_show_civic`, `conditional`)
        #[arg(short, long)]
        profile: Option<FieldProfile>,

        /// Shipping rates as JSON to adjust for the cart
        #[arg(long)]
        rates: Option<String>,
    },
    /// Work with rules files
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// Load and validate a rules file
    Check {
        /// Path to the YAML rules file
        path: PathBuf,
    },
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Validate { raw } => commands::validate::run(&raw)?,
        Commands::Evaluate {
            cart,
            rules,
            profile,
            rates,
        } => {
            let options = commands::evaluate::EvaluateOptions {
                cart,
                rules,
                profile,
                rates,
            };
            commands::evaluate::run(&options)?;
        }
        Commands::Rules { action } => match action {
            RulesAction::Check { path } => commands::rules::check(&path)?,
        },
    }
    Ok(())
}
