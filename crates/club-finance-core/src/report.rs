use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::classify::{classify_with, Polarity, VarianceClass};
use crate::config::ReportConfig;
use crate::error::ClubFinanceError;
use crate::grouping::{categories_of, items_of};
use crate::ingest::{ingest, Ingested, RawRecord};
use crate::records::{FinancialRecord, RecordStore};
use crate::rollup::{
    net_profit, totals_for, variance_pct, GroupKey, GroupLevel, Margins, Totals,
};
use crate::types::{with_metadata, Comparison, ComputationOutput, Money, Rate, RecordType};
use crate::ClubFinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A variance against one comparison series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarianceLine {
    /// actual - comparison
    pub amount: Money,
    /// amount / comparison, undefined when the comparison is zero
    pub pct: Option<Rate>,
    pub class: VarianceClass,
}

impl VarianceLine {
    pub fn new(totals: &Totals, comparison: Comparison, polarity: Polarity) -> Self {
        let amount = totals.variance(comparison);
        Self {
            amount,
            pct: variance_pct(amount, totals.get(comparison.series())),
            class: classify_with(amount, polarity),
        }
    }
}

/// Totals and both variances for one line of the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollupRow {
    pub label: String,
    pub totals: Totals,
    pub vs_budget: VarianceLine,
    pub vs_prior: VarianceLine,
}

impl RollupRow {
    pub fn new(label: impl Into<String>, totals: Totals, polarity: Polarity) -> Self {
        Self {
            label: label.into(),
            vs_budget: VarianceLine::new(&totals, Comparison::Budget, polarity),
            vs_prior: VarianceLine::new(&totals, Comparison::PriorYear, polarity),
            totals,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub items: Vec<RollupRow>,
    pub subtotal: RollupRow,
}

/// Every category of one type plus the type's grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSection {
    pub record_type: RecordType,
    pub categories: Vec<CategoryBreakdown>,
    pub total: RollupRow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetProfit {
    pub row: RollupRow,
    pub margins: Margins,
    /// actual margin - budget margin
    pub margin_delta_budget: Option<Rate>,
    /// actual margin - prior-year margin
    pub margin_delta_prior: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashBalance {
    pub opening_balance: Money,
    /// Actual net profit for the season
    pub net_movement: Money,
    pub closing_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonReport {
    pub season: String,
    pub revenue: TypeSection,
    pub expense: TypeSection,
    pub net_profit: NetProfit,
    pub cash_balance: CashBalance,
}

/// Which part of the statement a flattened row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowKind {
    Item,
    CategoryTotal,
    TypeTotal,
    NetProfit,
}

/// One printable line of the statement, in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub section: String,
    pub kind: RowKind,
    pub label: String,
    pub actual: Money,
    pub budget: Money,
    pub variance_to_budget: Money,
    pub variance_to_budget_pct: Option<Rate>,
    pub budget_class: VarianceClass,
    pub prior: Money,
    pub variance_to_prior: Money,
    pub variance_to_prior_pct: Option<Rate>,
    pub prior_class: VarianceClass,
}

impl StatementRow {
    fn from_row(section: &str, kind: RowKind, row: &RollupRow) -> Self {
        Self {
            section: section.to_string(),
            kind,
            label: row.label.clone(),
            actual: row.totals.actual,
            budget: row.totals.budget,
            variance_to_budget: row.vs_budget.amount,
            variance_to_budget_pct: row.vs_budget.pct,
            budget_class: row.vs_budget.class,
            prior: row.totals.prior,
            variance_to_prior: row.vs_prior.amount,
            variance_to_prior_pct: row.vs_prior.pct,
            prior_class: row.vs_prior.class,
        }
    }
}

/// Input for a full season report straight from raw table rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeasonReportInput {
    pub records: Vec<RawRecord>,
    /// Defaults to the first season in the table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    #[serde(default)]
    pub config: ReportConfig,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Items, category subtotals and the grand total for one type.
pub fn type_section(records: &[FinancialRecord], record_type: RecordType) -> TypeSection {
    let polarity = Polarity::from(record_type);

    let categories = categories_of(records, record_type)
        .into_iter()
        .map(|category| {
            let items = items_of(records, category, record_type)
                .into_iter()
                .map(|item| {
                    let key = GroupKey::Item {
                        record_type,
                        category: category.to_string(),
                        item: item.to_string(),
                    };
                    RollupRow::new(item, totals_for(records, &key), polarity)
                })
                .collect();
            let key = GroupKey::Category {
                record_type,
                category: category.to_string(),
            };
            CategoryBreakdown {
                category: category.to_string(),
                items,
                subtotal: RollupRow::new(
                    format!("Total {}", category),
                    totals_for(records, &key),
                    polarity,
                ),
            }
        })
        .collect();

    let total = totals_for(records, &GroupKey::Type { record_type });
    TypeSection {
        record_type,
        categories,
        total: RollupRow::new(format!("Total {}", record_type), total, polarity),
    }
}

fn net_profit_of(revenue: &TypeSection, expense: &TypeSection) -> NetProfit {
    let profit = net_profit(&revenue.total.totals, &expense.total.totals);
    let margins = Margins::from_totals(&profit, &revenue.total.totals);
    NetProfit {
        row: RollupRow::new("Net Profit", profit, Polarity::HigherIsBetter),
        margin_delta_budget: margins.delta(Comparison::Budget),
        margin_delta_prior: margins.delta(Comparison::PriorYear),
        margins,
    }
}

/// Pure rollup of one season's records.
pub fn season_report(records: &[FinancialRecord], season: &str, config: &ReportConfig) -> SeasonReport {
    let revenue = type_section(records, RecordType::Revenue);
    let expense = type_section(records, RecordType::Expense);
    let net_profit = net_profit_of(&revenue, &expense);
    let net_movement = net_profit.row.totals.actual;

    SeasonReport {
        season: season.to_string(),
        cash_balance: CashBalance {
            opening_balance: config.opening_balance,
            net_movement,
            closing_balance: config.opening_balance.saturating_add(net_movement),
        },
        revenue,
        expense,
        net_profit,
    }
}

/// Picks the requested season (or the first one) and rolls it up.
///
/// An empty store yields an all-zero report; naming a season the store does
/// not contain is an error.
pub fn resolve_season(store: &RecordStore, season: Option<&str>) -> ClubFinanceResult<String> {
    match season {
        Some(s) if store.is_empty() || store.seasons().contains(&s) => Ok(s.to_string()),
        Some(s) => Err(ClubFinanceError::SeasonNotFound(s.to_string())),
        None => Ok(store.default_season().unwrap_or_default().to_string()),
    }
}

/// Rolls up one season of an ingested table. Only anomalies from that
/// season's rows become warnings.
pub fn build_season_report(
    ingested: &Ingested,
    season: Option<&str>,
    config: &ReportConfig,
) -> ClubFinanceResult<ComputationOutput<SeasonReport>> {
    let start = Instant::now();
    let season = resolve_season(&ingested.store, season)?;
    let snapshot = ingested.store.for_season(&season);
    let warnings = ingested.warnings_for(&season);
    let report = season_report(snapshot.records(), &season, config);

    debug!(
        season = %season,
        records = snapshot.len(),
        revenue_categories = report.revenue.categories.len(),
        expense_categories = report.expense.categories.len(),
        "season report built"
    );

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Season P&L rollup: item -> category -> type -> net profit, variance to budget and prior year",
        &serde_json::json!({
            "season": season,
            "records": snapshot.len(),
            "opening_balance": config.opening_balance,
            "currency_symbol": config.currency_symbol,
            "duplicate_series": "summed",
            "margin_on_zero_revenue": "undefined",
        }),
        warnings,
        elapsed,
        report,
    ))
}

/// Ingest raw rows, then build the report.
pub fn analyze_season(input: &SeasonReportInput) -> ClubFinanceResult<ComputationOutput<SeasonReport>> {
    let ingested = ingest(&input.records, &input.config.ingest_options())?;
    build_season_report(&ingested, input.season.as_deref(), &input.config)
}

impl SeasonReport {
    pub fn section(&self, record_type: RecordType) -> &TypeSection {
        match record_type {
            RecordType::Revenue => &self.revenue,
            RecordType::Expense => &self.expense,
        }
    }

    /// Flattens the report into display order down to `level`: items (if
    /// requested), category subtotals, type totals, then net profit.
    pub fn statement_rows(&self, level: GroupLevel) -> Vec<StatementRow> {
        let mut rows = Vec::new();
        for section in [&self.revenue, &self.expense] {
            let name = section.record_type.as_str();
            if level != GroupLevel::Type {
                for cat in &section.categories {
                    if level == GroupLevel::Item {
                        rows.extend(
                            cat.items
                                .iter()
                                .map(|r| StatementRow::from_row(name, RowKind::Item, r)),
                        );
                    }
                    rows.push(StatementRow::from_row(name, RowKind::CategoryTotal, &cat.subtotal));
                }
            }
            rows.push(StatementRow::from_row(name, RowKind::TypeTotal, &section.total));
        }
        rows.push(StatementRow::from_row("Net", RowKind::NetProfit, &self.net_profit.row));
        rows
    }
}
