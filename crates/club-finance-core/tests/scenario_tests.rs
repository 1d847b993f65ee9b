use club_finance_core::classify::{classify, VarianceClass};
use club_finance_core::format::{format_currency, format_percent, UNDEFINED_MARKER};
use club_finance_core::ingest::RawRecord;
use club_finance_core::report::{analyze_season, SeasonReportInput};
use club_finance_core::rollup::margin;
use club_finance_core::RecordType;
use rust_decimal_macros::dec;

fn raw(ty: &str, category: &str, item: &str, amount: &str, series: &str) -> RawRecord {
    RawRecord {
        year: "2024/25".into(),
        record_type: ty.into(),
        category: category.into(),
        item: item.into(),
        amount: amount.into(),
        is_actual: (series == "actual").to_string(),
        is_budget: (series == "budget").to_string(),
        is_prior_year: (series == "prior").to_string(),
    }
}

fn input(records: Vec<RawRecord>) -> SeasonReportInput {
    SeasonReportInput {
        records,
        ..SeasonReportInput::default()
    }
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_revenue_shortfall_against_budget() {
    let out = analyze_season(&input(vec![
        raw("Revenue", "Sponsorship", "College Grant", "9000", "actual"),
        raw("Revenue", "Sponsorship", "College Grant", "10000", "budget"),
    ]))
    .unwrap();
    let cat = &out.result.revenue.categories[0].subtotal;
    assert_eq!(cat.totals.actual, dec!(9000));
    assert_eq!(cat.totals.budget, dec!(10000));
    assert_eq!(cat.vs_budget.amount, dec!(-1000));
    assert_eq!(cat.vs_budget.class, VarianceClass::Unfavorable);
    assert!(out.warnings.is_empty());
}

#[test]
fn test_expense_underspend_against_budget() {
    let out = analyze_season(&input(vec![
        raw("Expense", "Sponsorship", "College Grant", "9000", "actual"),
        raw("Expense", "Sponsorship", "College Grant", "10000", "budget"),
    ]))
    .unwrap();
    let cat = &out.result.expense.categories[0].subtotal;
    assert_eq!(cat.vs_budget.amount, dec!(-1000));
    assert_eq!(cat.vs_budget.class, VarianceClass::Favorable);
}

#[test]
fn test_duplicate_actual_rows_sum_at_item_level() {
    let out = analyze_season(&input(vec![
        raw("Expense", "Equipment", "Balls", "5000", "actual"),
        raw("Expense", "Equipment", "Balls", "3300", "actual"),
    ]))
    .unwrap();
    let balls = &out.result.expense.categories[0].items[0];
    assert_eq!(balls.label, "Balls");
    assert_eq!(balls.totals.actual, dec!(8300));
    assert_eq!(out.warnings.len(), 1);
    assert!(out.warnings[0].contains("Balls"));
}

#[test]
fn test_zero_revenue_margin_is_fallback_not_zero_percent() {
    let out = analyze_season(&input(vec![
        raw("Revenue", "Bar", "Takings", "0", "actual"),
        raw("Expense", "Bar", "Stock", "0", "actual"),
    ]))
    .unwrap();
    let np = &out.result.net_profit;
    assert_eq!(np.margins.actual, None);
    assert_eq!(format_percent(np.margins.actual), UNDEFINED_MARKER);
    assert_ne!(format_percent(np.margins.actual), "0.0%");
    assert_eq!(format_percent(np.margin_delta_budget), UNDEFINED_MARKER);
}

#[test]
fn test_zero_profit_on_real_revenue_is_zero_percent() {
    assert_eq!(format_percent(margin(dec!(0), dec!(4000))), "0.0%");
}

// ===========================================================================
// Degenerate input
// ===========================================================================

#[test]
fn test_non_numeric_amount_and_unknown_type_surface_as_warnings() {
    let out = analyze_season(&input(vec![
        raw("Revenue", "Bar", "Takings", "TBC", "actual"),
        raw("Transfer", "Bank", "Sweep", "100", "actual"),
        raw("Revenue", "Bar", "Takings", "250", "budget"),
    ]))
    .unwrap();
    assert_eq!(out.warnings.len(), 2);
    let bar = &out.result.revenue.categories[0].subtotal;
    assert_eq!(bar.totals.actual, dec!(0));
    assert_eq!(bar.totals.budget, dec!(250));
    assert_eq!(classify(bar.vs_budget.amount, RecordType::Revenue), VarianceClass::Unfavorable);
    assert!(out.result.expense.categories.is_empty());
}

#[test]
fn test_strict_types_rejects_unknown_type() {
    let mut inp = input(vec![raw("Transfer", "Bank", "Sweep", "100", "actual")]);
    inp.config.strict_types = true;
    assert!(analyze_season(&inp).is_err());
}

#[test]
fn test_empty_input_renders_zero_report() {
    let out = analyze_season(&SeasonReportInput::default()).unwrap();
    let r = &out.result;
    assert!(r.revenue.categories.is_empty());
    assert!(r.expense.categories.is_empty());
    assert_eq!(format_currency(r.net_profit.row.totals.actual), "$0");
    assert_eq!(r.cash_balance.closing_balance, dec!(0));
}

#[test]
fn test_named_season_selects_subset() {
    let mut older = raw("Revenue", "Bar", "Takings", "700", "actual");
    older.year = "2023/24".into();
    let mut inp = input(vec![raw("Revenue", "Bar", "Takings", "900", "actual"), older]);
    inp.season = Some("2023/24".into());
    let out = analyze_season(&inp).unwrap();
    assert_eq!(out.result.season, "2023/24");
    assert_eq!(out.result.revenue.total.totals.actual, dec!(700));
}

#[test]
fn test_input_deserializes_from_json() {
    let json = r#"{
        "records": [
            {"Year": "2024/25", "Type": "Revenue", "Category": "Bar", "Item": "Takings",
             "Amount": 1200, "IsActual": true, "IsBudget": false, "IsPriorYear": false}
        ],
        "config": {"opening_balance": "52067"}
    }"#;
    let inp: SeasonReportInput = serde_json::from_str(json).unwrap();
    let out = analyze_season(&inp).unwrap();
    assert_eq!(out.result.cash_balance.closing_balance, dec!(53267));
}

// ===========================================================================
// Extreme amounts
// ===========================================================================

#[test]
fn test_tiny_revenue_gives_undefined_margin_not_a_crash() {
    let out = analyze_season(&input(vec![
        raw("Revenue", "Bar", "Takings", "0.0000000000000000000000000001", "actual"),
        raw("Expense", "Bar", "Stock", "1000", "actual"),
    ]))
    .unwrap();
    let np = &out.result.net_profit;
    assert_eq!(np.margins.actual, None);
    assert_eq!(format_percent(np.margins.actual), UNDEFINED_MARKER);
    assert_eq!(format_currency(np.row.totals.actual), "-$1,000");
}

#[test]
fn test_huge_amounts_are_reported_not_summed() {
    let out = analyze_season(&input(vec![
        raw("Revenue", "Bar", "Takings", "50000000000000000000000000000", "actual"),
        raw("Revenue", "Bar", "Takings", "50000000000000000000000000000", "actual"),
    ]))
    .unwrap();
    assert_eq!(out.result.revenue.total.totals.actual, dec!(0));
    // two out-of-range amounts plus the duplicate line
    assert_eq!(out.warnings.len(), 3);
    assert!(out.warnings[0].contains("exceeds"));
}

#[test]
fn test_report_warnings_are_scoped_to_the_season() {
    let mut older = raw("Transfer", "Bank", "Sweep", "100", "actual");
    older.year = "2023/24".into();
    let mut older_bar = raw("Revenue", "Bar", "Takings", "700", "actual");
    older_bar.year = "2023/24".into();
    let mut inp = input(vec![
        raw("Revenue", "Bar", "Takings", "TBC", "actual"),
        older,
        older_bar,
    ]);
    let current = analyze_season(&inp).unwrap();
    assert_eq!(current.warnings.len(), 1);
    assert!(current.warnings[0].contains("TBC"));

    inp.season = Some("2023/24".into());
    let previous = analyze_season(&inp).unwrap();
    assert_eq!(previous.warnings.len(), 1);
    assert!(previous.warnings[0].contains("Transfer"));
}
