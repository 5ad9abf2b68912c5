use super::ui;
use crate::core::{Currency, RateProvider, RateSnapshot};
use anyhow::Result;
use comfy_table::Cell;

pub fn render_rates(rates: &RateSnapshot) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell(&format!("1 {} =", rates.base())),
        ui::header_cell(&format!("{} per unit", rates.base())),
    ]);

    for currency in Currency::ALL {
        let rate = rates.rate(currency);
        table.add_row(vec![
            Cell::new(currency.code()),
            ui::format_optional_cell(rate, |r| format!("{r:.4} {}", currency.symbol())),
            ui::format_optional_cell(rate, |r| format!("{:.4} ₪", 1.0 / r)),
        ]);
    }

    let as_of = rates.published_at().unwrap_or(rates.fetched_at());
    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text("Exchange Rates", ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("Rates as of {}", as_of.format("%Y-%m-%d %H:%M UTC")),
            ui::StyleType::Subtle
        )
    )
}

pub async fn run(provider: &dyn RateProvider) -> Result<()> {
    let rates = ui::fetch_rates(provider).await?;
    println!("{}", render_rates(&rates));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_render_rates() {
        let published = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 1).unwrap();
        let rates = RateSnapshot::from([("USD", 0.27), ("EUR", 0.25)])
            .with_published_at(Some(published));

        let output = render_rates(&rates);
        assert!(output.contains("0.2700 $"));
        assert!(output.contains("4.0000 ₪"));
        assert!(output.contains("GBP"));
        assert!(output.contains("N/A"));
        assert!(output.contains("Rates as of 2026-10-19 00:00 UTC"));
    }
}
