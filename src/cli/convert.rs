use super::ui;
use crate::core::{
    ConversionRequest, ConversionResult, Currency, IsraelSalary, RateProvider, SalaryConverter,
    WorldSalary,
};
use anyhow::Result;
use comfy_table::Cell;

fn degraded_note(currencies: &[Currency]) -> String {
    let codes: Vec<&str> = currencies.iter().map(Currency::code).collect();
    ui::style_text(
        &format!(
            "Note: no exchange rate for {}; amounts shown unconverted.",
            codes.join(", ")
        ),
        ui::StyleType::Error,
    )
}

pub fn render_world(monthly_ils: f64, salary: &WorldSalary) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Currency"),
        ui::header_cell("Annual Salary"),
    ]);
    for currency in Currency::ALL {
        table.add_row(vec![
            Cell::new(currency.code()),
            ui::amount_cell(format!(
                "{}{}",
                currency.symbol(),
                ui::format_amount(salary.get(currency))
            )),
        ]);
    }

    let mut output = format!(
        "Israel 🇮🇱 = {}\n\n{}\n\n{}",
        ui::style_text(&ui::compact_label(monthly_ils), ui::StyleType::TotalValue),
        ui::style_text("Converted Salaries", ui::StyleType::Title),
        table
    );
    if salary.is_degraded() {
        output.push_str(&format!("\n\n{}", degraded_note(&salary.degraded)));
    }
    output
}

pub fn render_israel(annual_amount: f64, currency: Currency, salary: &IsraelSalary) -> String {
    let mut output = format!(
        "{} = {}\n\n{}: {}",
        currency,
        ui::style_text(&ui::compact_label(annual_amount), ui::StyleType::TotalValue),
        ui::style_text("🇮🇱 NIS (Approximate Monthly)", ui::StyleType::TotalLabel),
        ui::style_text(
            &format!("{} ₪", ui::format_amount(salary.monthly_ils)),
            ui::StyleType::TotalValue
        )
    );
    if salary.degraded {
        output.push_str(&format!("\n\n{}", degraded_note(&[currency])));
    }
    output
}

pub fn render(request: &ConversionRequest, result: &ConversionResult) -> String {
    match (request, result) {
        (ConversionRequest::IsraelToWorld { monthly_ils }, ConversionResult::World(salary)) => {
            render_world(*monthly_ils, salary)
        }
        (
            ConversionRequest::WorldToIsrael {
                currency,
                annual_amount,
            },
            ConversionResult::Israel(salary),
        ) => render_israel(*annual_amount, *currency, salary),
        _ => ui::style_text("Invalid salary input", ui::StyleType::Error),
    }
}

pub async fn run(
    provider: &dyn RateProvider,
    converter: &SalaryConverter,
    request: &ConversionRequest,
) -> Result<()> {
    let rates = ui::fetch_rates(provider).await?;
    let result = converter.convert(request, &rates)?;
    println!("{}", render(request, &result));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RateSnapshot;

    fn sample_rates() -> RateSnapshot {
        RateSnapshot::from([("USD", 0.27), ("EUR", 0.25), ("GBP", 0.21)])
    }

    #[test]
    fn test_render_israel_to_world() {
        let converter = SalaryConverter::default();
        let request = ConversionRequest::israel_to_world(15000.0).unwrap();
        let result = converter.convert(&request, &sample_rates()).unwrap();

        let output = render(&request, &result);
        assert!(output.contains("15k"));
        assert!(output.contains("$48,600"));
        assert!(output.contains("€45,000"));
        assert!(output.contains("£37,800"));
        assert!(!output.contains("Note:"));
    }

    #[test]
    fn test_render_world_to_israel() {
        let converter = SalaryConverter::default();
        let request = ConversionRequest::world_to_israel(50000.0, "USD").unwrap();
        let result = converter.convert(&request, &sample_rates()).unwrap();

        let output = render(&request, &result);
        assert!(output.contains("USD"));
        assert!(output.contains("50k"));
        assert!(output.contains("15,432 ₪"));
    }

    #[test]
    fn test_render_flags_degraded_result() {
        let converter = SalaryConverter::default();
        let rates = RateSnapshot::from([("USD", 0.27)]);
        let request = ConversionRequest::israel_to_world(1000.0).unwrap();
        let result = converter.convert(&request, &rates).unwrap();

        let output = render(&request, &result);
        assert!(output.contains("no exchange rate for EUR, GBP"));
        assert!(!output.contains("NaN"));
    }
}
