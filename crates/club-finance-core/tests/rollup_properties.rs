use club_finance_core::grouping::{categories_of, items_of};
use club_finance_core::ingest::Ingested;
use club_finance_core::records::{FinancialRecord, RecordStore};
use club_finance_core::report::{build_season_report, season_report};
use club_finance_core::rollup::{net_profit, rollup, series_total, GroupLevel, Totals};
use club_finance_core::{config::ReportConfig, Money, RecordType, Series};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn rec(ty: RecordType, category: &str, item: &str, amount: Money, flags: (bool, bool, bool)) -> FinancialRecord {
    FinancialRecord {
        season: "2024/25".into(),
        record_type: ty,
        category: category.into(),
        item: item.into(),
        amount,
        is_actual: flags.0,
        is_budget: flags.1,
        is_prior_year: flags.2,
    }
}

const A: (bool, bool, bool) = (true, false, false);
const B: (bool, bool, bool) = (false, true, false);
const P: (bool, bool, bool) = (false, false, true);

/// A season shaped like a club P&L, including duplicates, a multi-flag row
/// and a category that only exists in the budget.
fn club_season() -> Vec<FinancialRecord> {
    use RecordType::{Expense, Revenue};
    vec![
        rec(Revenue, "Sponsorships", "Mazenod College", dec!(9000), A),
        rec(Revenue, "Sponsorships", "Mazenod College", dec!(10000), B),
        rec(Revenue, "Sponsorships", "Mazenod College", dec!(10000), P),
        rec(Revenue, "Sponsorships", "Local Business", dec!(2500), A),
        rec(Revenue, "Sponsorships", "Local Business", dec!(4000), B),
        rec(Revenue, "Subscription Fees", "Seniors", dec!(14250.50), A),
        rec(Revenue, "Subscription Fees", "Seniors", dec!(16000), B),
        rec(Revenue, "Subscription Fees", "Seniors", dec!(17100), P),
        rec(Revenue, "Social Functions", "Reverse Raffle", dec!(6700), A),
        rec(Revenue, "Social Functions", "Reverse Raffle", dec!(5000), (false, true, true)),
        rec(Revenue, "Bar & Food", "Bar", dec!(7300), A),
        rec(Revenue, "Bar & Food", "Bar", dec!(9500), B),
        rec(Revenue, "Bar & Food", "Bar", dec!(9100), P),
        rec(Expense, "Player Payments", "Coach", dec!(9000), A),
        rec(Expense, "Player Payments", "Coach", dec!(8000), B),
        rec(Expense, "Player Payments", "Overseas Players", dec!(12418), A),
        rec(Expense, "Player Payments", "Overseas Players", dec!(9700), B),
        rec(Expense, "Equipment", "Balls", dec!(5000), A),
        rec(Expense, "Equipment", "Balls", dec!(3300), A),
        rec(Expense, "Equipment", "Balls", dec!(8300), B),
        rec(Expense, "Equipment", "Balls", dec!(8250), P),
        rec(Expense, "Equipment", "Uniforms", dec!(11050), A),
        rec(Expense, "Equipment", "Uniforms", dec!(11000), B),
        rec(Expense, "Game Day", "Ground Hire", dec!(1400), A),
        rec(Expense, "Game Day", "Ground Hire", dec!(6000), B),
        rec(Expense, "Game Day", "Ground Hire", dec!(6000), P),
        rec(Expense, "Clubrooms", "Renovation", dec!(2800), B),
    ]
}

// ===========================================================================
// Additivity
// ===========================================================================

#[test]
fn test_item_totals_sum_to_category_totals() {
    let records = club_season();
    let report = season_report(&records, "2024/25", &ReportConfig::default());
    for section in [&report.revenue, &report.expense] {
        for cat in &section.categories {
            let items: Totals = cat.items.iter().map(|r| r.totals).sum();
            assert_eq!(items, cat.subtotal.totals, "category {}", cat.category);
        }
    }
}

#[test]
fn test_category_totals_sum_to_type_totals() {
    let records = club_season();
    let report = season_report(&records, "2024/25", &ReportConfig::default());
    for section in [&report.revenue, &report.expense] {
        let cats: Totals = section.categories.iter().map(|c| c.subtotal.totals).sum();
        assert_eq!(cats, section.total.totals);
    }
}

#[test]
fn test_type_level_rollup_matches_series_totals() {
    let records = club_season();
    for kt in rollup(&records, GroupLevel::Type) {
        let rt = kt.key.record_type();
        for series in Series::ALL {
            assert_eq!(kt.totals.get(series), series_total(&records, rt, series));
        }
    }
}

#[test]
fn test_grouping_covers_every_record() {
    let records = club_season();
    let mut counted = 0;
    for rt in RecordType::ALL {
        for cat in categories_of(&records, rt) {
            for item in items_of(&records, cat, rt) {
                counted += records
                    .iter()
                    .filter(|r| r.record_type == rt && r.category == cat && r.item == item)
                    .count();
            }
        }
    }
    assert_eq!(counted, records.len());
}

// ===========================================================================
// Profit identity and variances
// ===========================================================================

#[test]
fn test_profit_identity_for_every_series() {
    let records = club_season();
    let report = season_report(&records, "2024/25", &ReportConfig::default());
    for series in Series::ALL {
        let rev = series_total(&records, RecordType::Revenue, series);
        let exp = series_total(&records, RecordType::Expense, series);
        assert_eq!(report.net_profit.row.totals.get(series), rev - exp);
    }
}

#[test]
fn test_known_totals() {
    let records = club_season();
    let report = season_report(&records, "2024/25", &ReportConfig::default());
    assert_eq!(
        report.revenue.total.totals,
        Totals::new(dec!(39750.50), dec!(44500), dec!(41200))
    );
    assert_eq!(
        report.expense.total.totals,
        Totals::new(dec!(42168), dec!(45800), dec!(14250))
    );
    assert_eq!(
        report.net_profit.row.totals,
        net_profit(&report.revenue.total.totals, &report.expense.total.totals)
    );
    assert_eq!(report.net_profit.row.totals.actual, dec!(-2417.50));
}

#[test]
fn test_budget_only_category_has_full_negative_variance() {
    let records = club_season();
    let report = season_report(&records, "2024/25", &ReportConfig::default());
    let reno = report
        .expense
        .categories
        .iter()
        .find(|c| c.category == "Clubrooms")
        .unwrap();
    assert_eq!(reno.subtotal.totals.actual, dec!(0));
    assert_eq!(reno.subtotal.vs_budget.amount, dec!(-2800));
}

// ===========================================================================
// Idempotence
// ===========================================================================

#[test]
fn test_rebuilding_on_unchanged_snapshot_is_identical() {
    let ingested = Ingested {
        store: RecordStore::new(club_season()),
        anomalies: Vec::new(),
    };
    let cfg = ReportConfig::default();
    let first = build_season_report(&ingested, None, &cfg).unwrap();
    let second = build_season_report(&ingested, None, &cfg).unwrap();
    assert_eq!(first.result, second.result);
    assert_eq!(
        serde_json::to_string(&first.result).unwrap(),
        serde_json::to_string(&second.result).unwrap()
    );
}
