use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use salary_fx::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for salary_fx::AppCommand {
    fn from(cmd: Commands) -> salary_fx::AppCommand {
        match cmd {
            Commands::Rates => salary_fx::AppCommand::Rates,
            Commands::ToWorld { monthly_ils } => salary_fx::AppCommand::ToWorld { monthly_ils },
            Commands::ToIsrael {
                annual_amount,
                currency,
            } => salary_fx::AppCommand::ToIsrael {
                annual_amount,
                currency,
            },
            Commands::Interactive => salary_fx::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display current exchange rates for ILS
    Rates,
    /// Convert a monthly ILS salary to annual USD, EUR and GBP
    ToWorld {
        /// Monthly salary in ILS
        monthly_ils: f64,
    },
    /// Convert an annual USD, EUR or GBP salary to monthly ILS
    ToIsrael {
        /// Annual salary in the chosen currency
        annual_amount: f64,

        /// Currency of the annual salary (USD, EUR or GBP)
        #[arg(long, default_value = "USD")]
        currency: String,
    },
    /// Start a session that reuses cached rates across conversions
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => salary_fx::cli::setup::setup(),
        Some(cmd) => salary_fx::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Application failed");
        eprintln!("{}", salary_fx::cli::ui::error_message(&e));
        std::process::exit(1);
    }
    Ok(())
}
