use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use club_finance_core::classify::classify;
use club_finance_core::format::format_currency_with;
use club_finance_core::RecordType;

use super::TypeArg;
use crate::input;

/// Arguments for classifying one variance
#[derive(Args)]
pub struct ClassifyArgs {
    /// Signed variance (actual - comparison)
    #[arg(long, allow_hyphen_values = true)]
    pub variance: Decimal,

    #[arg(long, value_enum)]
    pub r#type: TypeArg,
}

pub fn run_classify(args: ClassifyArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let config = match config_path {
        Some(p) => input::file::read_config(p)?,
        None => Default::default(),
    };
    let record_type: RecordType = args.r#type.into();
    let class = classify(args.variance, record_type);
    Ok(json!({
        "result": {
            "variance": args.variance,
            "type": record_type,
            "class": class,
            "formatted": format_currency_with(args.variance, &config.currency_symbol),
        }
    }))
}
