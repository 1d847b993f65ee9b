use colored::Colorize;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use club_finance_core::classify::VarianceClass;
use club_finance_core::format::{format_currency_with, format_percent, DEFAULT_CURRENCY_SYMBOL};
use club_finance_core::report::{CashBalance, RowKind, SeasonReport, StatementRow};
use club_finance_core::rollup::GroupLevel;

use super::{format_value, result_of};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    let symbol = value
        .pointer("/assumptions/currency_symbol")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_CURRENCY_SYMBOL);
    let result = result_of(value);

    if let Some(rows) = result.get("rows") {
        let rows: Vec<StatementRow> = serde_json::from_value(rows.clone()).unwrap_or_default();
        println!("{}", statement_table(&rows, symbol));
        if let Some(margins) = result.get("margins") {
            print_margins(margins);
        }
        if let Some(cb) = result.get("cash_balance") {
            if let Ok(cb) = serde_json::from_value::<CashBalance>(cb.clone()) {
                print_cash_balance(&cb, symbol);
            }
        }
    } else if let Ok(report) = serde_json::from_value::<SeasonReport>(result.clone()) {
        println!("Season {}", report.season);
        println!("{}", statement_table(&report.statement_rows(GroupLevel::Item), symbol));
        let np = &report.net_profit;
        print_margins(&serde_json::json!({
            "actual": np.margins.actual,
            "budget": np.margins.budget,
            "prior": np.margins.prior,
            "delta_to_budget": np.margin_delta_budget,
            "delta_to_prior": np.margin_delta_prior,
        }));
        print_cash_balance(&report.cash_balance, symbol);
    } else {
        match result {
            Value::Array(arr) => print_array_table(arr, symbol),
            Value::Object(_) => print_flat_object(result),
            other => println!("{}", other),
        }
    }

    print_footer(value);
}

fn statement_table(rows: &[StatementRow], symbol: &str) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["", "Actual", "Budget", "Var (to Budget)", "Prior Year", "Var (to PY)"]);

    let mut section = "";
    for row in rows {
        if row.section != section && row.kind != RowKind::NetProfit {
            section = &row.section;
            builder.push_record([section.to_uppercase(), String::new(), String::new(), String::new(), String::new(), String::new()]);
        }
        let label = match row.kind {
            RowKind::Item => format!("  {}", row.label),
            RowKind::CategoryTotal => row.label.clone(),
            RowKind::TypeTotal => format!("► {}", row.label).bold().to_string(),
            RowKind::NetProfit => row.label.bold().to_string(),
        };
        builder.push_record([
            label,
            format_currency_with(row.actual, symbol),
            format_currency_with(row.budget, symbol),
            variance_cell(row.variance_to_budget, row.variance_to_budget_pct, row.budget_class, symbol),
            format_currency_with(row.prior, symbol),
            variance_cell(row.variance_to_prior, row.variance_to_prior_pct, row.prior_class, symbol),
        ]);
    }
    Table::from(builder)
}

/// Arrow follows the sign, colour follows the classification.
fn variance_cell(amount: Decimal, pct: Option<Decimal>, class: VarianceClass, symbol: &str) -> String {
    let arrow = if amount > Decimal::ZERO {
        " ▲"
    } else if amount < Decimal::ZERO {
        " ▼"
    } else {
        ""
    };
    let text = format!(
        "{}{} ({})",
        format_currency_with(amount, symbol),
        arrow,
        format_percent(pct)
    );
    match class {
        VarianceClass::Favorable => text.green().to_string(),
        VarianceClass::Unfavorable => text.red().to_string(),
        VarianceClass::Neutral => text,
    }
}

fn rate_of(value: &Value) -> Option<Decimal> {
    value.as_str().and_then(|s| Decimal::from_str(s).ok())
}

fn print_margins(margins: &Value) {
    let mut builder = Builder::default();
    builder.push_record(["Net Profit Margin", "Actual", "Budget", "Δ Budget", "Prior Year", "Δ PY"]);
    builder.push_record([
        String::new(),
        format_percent(rate_of(&margins["actual"])),
        format_percent(rate_of(&margins["budget"])),
        format_percent(rate_of(&margins["delta_to_budget"])),
        format_percent(rate_of(&margins["prior"])),
        format_percent(rate_of(&margins["delta_to_prior"])),
    ]);
    println!("{}", Table::from(builder));
}

fn print_cash_balance(cb: &CashBalance, symbol: &str) {
    let movement = format_currency_with(cb.net_movement, symbol);
    let movement = if cb.net_movement < Decimal::ZERO {
        movement.red().to_string()
    } else {
        movement.green().to_string()
    };
    let mut builder = Builder::default();
    builder.push_record(["Cash Balance", ""]);
    builder.push_record(["Opening Balance".to_string(), format_currency_with(cb.opening_balance, symbol)]);
    builder.push_record(["Net Movement".to_string(), movement]);
    builder.push_record(["Closing Balance".to_string(), format_currency_with(cb.closing_balance, symbol)]);
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value], symbol: &str) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        map.get(h.as_str())
                            .map(|v| format_cell(h, v, symbol))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Money and share columns get display formatting; everything else is plain.
fn format_cell(key: &str, value: &Value, symbol: &str) -> String {
    match key {
        "value" => rate_of(value)
            .map(|v| format_currency_with(v, symbol))
            .unwrap_or_else(|| format_value(value)),
        "share" => format_percent(rate_of(value)),
        _ => format_value(value),
    }
}

fn print_footer(value: &Value) {
    if let Some(Value::Array(warnings)) = value.get("warnings") {
        if !warnings.is_empty() {
            println!("\n{}", "Warnings:".yellow());
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = value.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_variance_cell_arrow_follows_sign() {
        colored::control::set_override(false);
        assert_eq!(
            variance_cell(dec!(-1000), Some(dec!(-0.1)), VarianceClass::Favorable, "$"),
            "-$1,000 ▼ (-10.0%)"
        );
        assert_eq!(
            variance_cell(dec!(300), Some(dec!(0.0375)), VarianceClass::Unfavorable, "$"),
            "$300 ▲ (3.8%)"
        );
        assert_eq!(variance_cell(dec!(0), None, VarianceClass::Neutral, "$"), "$0 (—)");
    }

    #[test]
    fn test_format_cell_money_and_share() {
        assert_eq!(format_cell("value", &Value::String("11000".into()), "$"), "$11,000");
        assert_eq!(format_cell("share", &Value::String("0.378".into()), "$"), "37.8%");
        assert_eq!(format_cell("share", &Value::Null, "$"), "—");
        assert_eq!(format_cell("name", &Value::String("Other".into()), "$"), "Other");
    }
}
