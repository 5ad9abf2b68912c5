//! Line-based session that keeps one rate cache alive across many conversions.

use super::{convert, rates, ui};
use crate::core::{ConversionRequest, RateSource, SalaryConverter};
use crate::providers::CachingRateProvider;
use anyhow::{Context, Result, anyhow, bail};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  to-world <MONTHLY_ILS>               Convert a monthly ILS salary to annual USD/EUR/GBP
  to-israel <ANNUAL_AMOUNT> [CURRENCY] Convert an annual USD/EUR/GBP salary to monthly ILS
  rates                                Show the current exchange rates
  refresh                              Discard cached rates and fetch again
  help                                 Show this message
  quit                                 Exit";

#[derive(Debug, PartialEq)]
pub enum SessionCommand {
    Convert(ConversionRequest),
    Rates,
    Refresh,
    Help,
    Quit,
}

fn parse_amount(value: Option<&str>) -> Result<f64> {
    let value = value.ok_or_else(|| anyhow!("Missing amount"))?;
    value
        .replace(',', "")
        .parse::<f64>()
        .with_context(|| format!("Invalid amount: {value}"))
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<SessionCommand>> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(None);
    };

    let parsed = match command.to_ascii_lowercase().as_str() {
        "to-world" => SessionCommand::Convert(ConversionRequest::israel_to_world(parse_amount(
            parts.next(),
        )?)?),
        "to-israel" => {
            let amount = parse_amount(parts.next())?;
            let currency = parts.next().unwrap_or("USD");
            SessionCommand::Convert(ConversionRequest::world_to_israel(amount, currency)?)
        }
        "rates" => SessionCommand::Rates,
        "refresh" => SessionCommand::Refresh,
        "help" | "?" => SessionCommand::Help,
        "quit" | "exit" => SessionCommand::Quit,
        other => bail!("Unknown command: {other}. Type 'help' for a list of commands."),
    };

    if let Some(extra) = parts.next() {
        bail!("Unexpected argument: {extra}");
    }
    Ok(Some(parsed))
}

async fn execute<T: RateSource>(
    command: SessionCommand,
    provider: &CachingRateProvider<T>,
    converter: &SalaryConverter,
) -> Result<()> {
    match command {
        SessionCommand::Convert(request) => convert::run(provider, converter, &request).await,
        SessionCommand::Rates => rates::run(provider).await,
        SessionCommand::Refresh => {
            provider.invalidate().await;
            rates::run(provider).await
        }
        SessionCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        SessionCommand::Quit => Ok(()),
    }
}

pub async fn run<T: RateSource>(
    provider: &CachingRateProvider<T>,
    converter: &SalaryConverter,
) -> Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            Ok(None) => continue,
            Ok(Some(SessionCommand::Quit)) => break,
            Ok(Some(command)) => {
                debug!(?command, "Executing session command");
                if let Err(e) = execute(command, provider, converter).await {
                    eprintln!("{}", ui::error_message(&e));
                }
            }
            Err(e) => eprintln!("{}", ui::error_message(&e)),
        }
    }
    Ok(())
}
