// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// FUND WATERFALL CLI - Distribution runs, carry-forward & fund terms
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;

mod commands;
mod logger;

#[derive(Parser)]
#[command(name = "waterfall-cli")]
#[command(about = "Fund Waterfall CLI - Tiered Capital Distribution", long_about = None)]
#[command(version)]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace). Falls back to WATERFALL_LOG
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one distribution round
    Calculate {
        /// Distribution request (JSON)
        #[arg(short, long)]
        request: PathBuf,

        /// Fund terms (TOML); replaces the request's tiers
        #[arg(short, long, env = "WATERFALL_TERMS")]
        terms: Option<PathBuf>,

        /// Print the raw JSON result instead of tables
        #[arg(long)]
        json: bool,
    },

    /// Fold a round's result into the investors for the next round
    Carry {
        /// Distribution request (JSON) the result was computed from
        #[arg(short, long)]
        request: PathBuf,

        /// Distribution result (JSON)
        #[arg(long)]
        result: PathBuf,

        /// Output file for the next round's investors (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run consecutive rounds, carrying accumulators forward
    Rounds {
        /// Distribution request (JSON) supplying investors and tiers
        #[arg(short, long)]
        request: PathBuf,

        /// Fund terms (TOML); replaces the request's tiers
        #[arg(short, long, env = "WATERFALL_TERMS")]
        terms: Option<PathBuf>,

        /// Cash per round in dollars, comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        amounts: Vec<String>,

        /// Distribution date per round (YYYY-MM-DD), comma separated
        #[arg(short, long, value_delimiter = ',', required = true)]
        dates: Vec<String>,
    },

    /// Fund terms management
    Terms {
        #[command(subcommand)]
        action: TermsCommands,
    },
}

#[derive(Subcommand)]
enum TermsCommands {
    /// Write the standard four-tier template (rates from WATERFALL_* env vars)
    Init {
        /// Output file path
        file: PathBuf,

        /// Fund name
        #[arg(short, long)]
        name: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the tiers of a terms file
    Show {
        /// Terms file path
        file: PathBuf,
    },

    /// Validate a terms file
    Validate {
        /// Terms file path
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    // Keep stdout clean for machine-readable output
    let machine_output = matches!(
        cli.command,
        Commands::Calculate { json: true, .. } | Commands::Carry { output: None, .. }
    );
    if !machine_output {
        print_banner();
    }

    if let Err(e) = run(cli.command) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Calculate {
            request,
            terms,
            json,
        } => commands::calculate::handle(&request, terms.as_deref(), json)?,
        Commands::Carry {
            request,
            result,
            output,
        } => commands::carry::handle(&request, &result, output.as_deref())?,
        Commands::Rounds {
            request,
            terms,
            amounts,
            dates,
        } => commands::rounds::handle(&request, terms.as_deref(), &amounts, &dates)?,
        Commands::Terms { action } => commands::terms::handle(action)?,
    }
    Ok(())
}

fn print_banner() {
    println!(
        "{}",
        "╔═══════════════════════════════════════════════╗".cyan()
    );
    println!(
        "{}",
        "║        FUND WATERFALL - CLI v0.3.0            ║"
            .cyan()
            .bold()
    );
    println!(
        "{}",
        "║   Capital | Preferred | Catch-up | Split      ║".cyan()
    );
    println!(
        "{}",
        "╚═══════════════════════════════════════════════╝".cyan()
    );
    println!();
}

fn print_success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red().bold(), msg);
}

fn print_info(msg: &str) {
    println!("{} {}", "ℹ".blue().bold(), msg);
}

// ─────────────────────────────────────────────────────────────────
// UNIT TESTS
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    // ── CLI Argument Parsing ────────────────────────────────────

    #[test]
    fn test_cli_calculate() {
        let cli = Cli::try_parse_from([
            "waterfall-cli",
            "calculate",
            "--request",
            "/tmp/req.json",
            "--terms",
            "/tmp/fund.toml",
            "--json",
        ]);
        assert!(cli.is_ok(), "Failed to parse: {:?}", cli.err());
        match cli.unwrap().command {
            Commands::Calculate {
                request,
                terms,
                json,
            } => {
                assert_eq!(request, PathBuf::from("/tmp/req.json"));
                assert_eq!(terms, Some(PathBuf::from("/tmp/fund.toml")));
                assert!(json);
            }
            _ => panic!("Expected Calculate"),
        }
    }

    #[test]
    fn test_cli_calculate_requires_request() {
        let cli = Cli::try_parse_from(["waterfall-cli", "calculate"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_carry() {
        let cli = Cli::try_parse_from([
            "waterfall-cli",
            "carry",
            "-r",
            "req.json",
            "--result",
            "res.json",
            "-o",
            "next.json",
        ]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Carry {
                request,
                result,
                output,
            } => {
                assert_eq!(request, PathBuf::from("req.json"));
                assert_eq!(result, PathBuf::from("res.json"));
                assert_eq!(output, Some(PathBuf::from("next.json")));
            }
            _ => panic!("Expected Carry"),
        }
    }

    #[test]
    fn test_cli_rounds_splits_lists() {
        let cli = Cli::try_parse_from([
            "waterfall-cli",
            "rounds",
            "--request",
            "req.json",
            "--amounts",
            "800000,600000",
            "--dates",
            "2024-01-01,2024-07-01",
        ]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Rounds { amounts, dates, .. } => {
                assert_eq!(amounts, vec!["800000", "600000"]);
                assert_eq!(dates, vec!["2024-01-01", "2024-07-01"]);
            }
            _ => panic!("Expected Rounds"),
        }
    }

    #[test]
    fn test_cli_terms_init() {
        let cli = Cli::try_parse_from([
            "waterfall-cli",
            "terms",
            "init",
            "fund.toml",
            "--name",
            "Fund II",
            "--force",
        ]);
        assert!(cli.is_ok());
        match cli.unwrap().command {
            Commands::Terms {
                action: TermsCommands::Init { file, name, force },
            } => {
                assert_eq!(file, PathBuf::from("fund.toml"));
                assert_eq!(name.as_deref(), Some("Fund II"));
                assert!(force);
            }
            _ => panic!("Expected Terms::Init"),
        }
    }

    #[test]
    fn test_cli_terms_show_and_validate() {
        assert!(Cli::try_parse_from(["waterfall-cli", "terms", "show", "fund.toml"]).is_ok());
        assert!(Cli::try_parse_from(["waterfall-cli", "terms", "validate", "fund.toml"]).is_ok());
        assert!(Cli::try_parse_from(["waterfall-cli", "terms", "validate"]).is_err());
    }

    #[test]
    fn test_cli_verbose_count() {
        let cli = Cli::try_parse_from(["waterfall-cli", "-vv", "terms", "show", "f.toml"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_unknown_subcommand() {
        assert!(Cli::try_parse_from(["waterfall-cli", "distribute"]).is_err());
    }
}
