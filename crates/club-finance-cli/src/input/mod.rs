pub mod file;
pub mod stdin;

use club_finance_core::config::ReportConfig;
use club_finance_core::ingest::{ingest, Ingested, RawRecord};
use std::io::Read;
use tracing::info;

/// Header names of the season table, in `RawRecord` field order.
const COLUMNS: [&str; 8] = [
    "Year",
    "Type",
    "Category",
    "Item",
    "Amount",
    "IsActual",
    "IsBudget",
    "IsPriorYear",
];

/// Read CSV rows by header name, keeping every cell as its literal text.
/// Column order does not matter, unknown columns are ignored and missing
/// ones read as empty.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<RawRecord>, Box<dyn std::error::Error>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let [year, record_type, category, item, amount, is_actual, is_budget, is_prior_year] =
        COLUMNS.map(|name| headers.iter().position(|h| h == name));

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        // +2: 1-indexed plus header row
        let record = result.map_err(|e| format!("Failed to parse CSV line {}: {}", i + 2, e))?;
        let cell = |column: Option<usize>| {
            column
                .and_then(|c| record.get(c))
                .unwrap_or_default()
                .to_string()
        };
        rows.push(RawRecord {
            year: cell(year),
            record_type: cell(record_type),
            category: cell(category),
            item: cell(item),
            amount: cell(amount),
            is_actual: cell(is_actual),
            is_budget: cell(is_budget),
            is_prior_year: cell(is_prior_year),
        });
    }
    Ok(rows)
}

/// Raw rows from `--input <file.csv>` or piped stdin.
pub fn read_rows(path: Option<&str>) -> Result<Vec<RawRecord>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_csv(path)
    } else if let Some(text) = stdin::read_stdin()? {
        parse_csv(text.as_bytes())
    } else {
        Err("--input <file.csv> or stdin required".into())
    }
}

/// Config file (if any), then ingestion of the season table.
pub fn load(
    path: Option<&str>,
    config_path: Option<&str>,
) -> Result<(Ingested, ReportConfig), Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(p) => file::read_config(p)?,
        None => ReportConfig::default(),
    };
    let rows = read_rows(path)?;
    let ingested = ingest(&rows, &config.ingest_options())?;
    info!(
        rows = rows.len(),
        seasons = ingested.store.seasons().len(),
        anomalies = ingested.anomalies.len(),
        "season table loaded"
    );
    Ok((ingested, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_csv_by_header_name() {
        let text = "\
Year,Type,Category,Item,Amount,IsActual,IsBudget,IsPriorYear
2024/25,Revenue,Sponsorships,Mazenod College,9000,TRUE,FALSE,FALSE
2024/25,Expense,Equipment,Balls,n/a,false,true,false
";
        let rows = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item, "Mazenod College");
        assert_eq!(rows[0].amount, "9000");
        assert_eq!(rows[0].is_actual, "TRUE");
        assert_eq!(rows[1].amount, "n/a");
        assert_eq!(rows[1].is_budget, "true");
    }

    #[test]
    fn test_parse_csv_tolerates_reordered_and_missing_columns() {
        let text = "Amount,Type,Item,Category,IsActual\n 12.5 ,Revenue,Bar,Bar & Food,1\n";
        let rows = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(rows[0].amount, "12.5");
        assert_eq!(rows[0].category, "Bar & Food");
        assert_eq!(rows[0].is_actual, "1");
        assert!(rows[0].year.is_empty());
        assert!(rows[0].is_prior_year.is_empty());
    }

    #[test]
    fn test_parse_csv_keeps_cell_text_verbatim() {
        let text = "\
Year,Type,Category,Item,Amount,IsActual,IsBudget,IsPriorYear
2024,Revenue,Raffles,007,12345678901234567.89,TRUE,FALSE,FALSE
2024,Revenue,Raffles,Grand Prize,100000000000000000000,1,0,0
";
        let rows = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item, "007");
        assert_eq!(rows[0].amount, "12345678901234567.89");
        assert_eq!(rows[1].amount, "100000000000000000000");
        assert_eq!(rows[1].is_actual, "1");
    }

    #[test]
    fn test_high_precision_amount_survives_ingestion() {
        let text = "Year,Type,Category,Item,Amount,IsActual\n2024,Revenue,Raffles,007,12345678901234.56,TRUE\n";
        let rows = parse_csv(text.as_bytes()).unwrap();
        let ingested = ingest(&rows, &ReportConfig::default().ingest_options()).unwrap();
        let record = &ingested.store.records()[0];
        assert_eq!(record.item, "007");
        assert_eq!(record.amount, dec!(12345678901234.56));
        assert!(ingested.anomalies.is_empty());
    }

    #[test]
    fn test_parse_csv_quoted_amount_with_separator() {
        let text = "Year,Type,Category,Item,Amount,IsActual\n2024/25,Expense,Other,Clubrooms,\"3,050\",TRUE\n";
        let rows = parse_csv(text.as_bytes()).unwrap();
        assert_eq!(rows[0].amount, "3,050");
    }
}
