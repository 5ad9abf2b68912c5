pub mod cli;
pub mod core;
pub mod providers;

use crate::core::{ConversionRequest, SalaryConverter, config::AppConfig};
use crate::providers::{CachingRateProvider, ExchangeRateApiProvider};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Rates,
    ToWorld { monthly_ils: f64 },
    ToIsrael { annual_amount: f64, currency: String },
    Interactive,
}

/// Rate provider and converter wired from one config, shared by every command.
pub struct App {
    pub provider: CachingRateProvider<ExchangeRateApiProvider>,
    pub converter: SalaryConverter,
}

impl App {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source = ExchangeRateApiProvider::new(&config.provider)?;
        Ok(App {
            provider: CachingRateProvider::from_config(source, &config.cache),
            converter: SalaryConverter::new(config.missing_rate),
        })
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Salary converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::from_config(&config)?;

    match command {
        AppCommand::Rates => cli::rates::run(&app.provider).await,
        AppCommand::ToWorld { monthly_ils } => {
            let request = ConversionRequest::israel_to_world(monthly_ils)?;
            cli::convert::run(&app.provider, &app.converter, &request).await
        }
        AppCommand::ToIsrael {
            annual_amount,
            currency,
        } => {
            let request = ConversionRequest::world_to_israel(annual_amount, &currency)?;
            cli::convert::run(&app.provider, &app.converter, &request).await
        }
        AppCommand::Interactive => cli::interactive::run(&app.provider, &app.converter).await,
    }
}
