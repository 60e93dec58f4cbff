//! CSV export of the transaction list.
//!
//! Text columns are always wrapped in double quotes with inner quotes
//! doubled; the amount is written bare. Rows are separated by `\n` and the
//! output has no trailing newline.

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use tracing::info;

use crate::{EngineError, ResultEngine, Transaction, util::DATE_FORMAT};

pub const EXPORT_HEADER: [&str; 7] = [
    "Date",
    "Merchant",
    "Category",
    "Description",
    "Amount",
    "Currency",
    "Is Recurring",
];

pub const DEFAULT_EXPORT_PREFIX: &str = "fluxboard_transactions";

/// `<prefix>_<YYYY-MM-DD>.csv`
pub fn export_file_name(prefix: &str, day: NaiveDate) -> String {
    format!("{prefix}_{}.csv", day.format(DATE_FORMAT))
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Renders `transactions` in export format.
pub fn to_csv(transactions: &[Transaction]) -> ResultEngine<String> {
    // Text columns are pre-quoted, so the writer must not quote again.
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(vec![]);

    writer.write_record(EXPORT_HEADER)?;
    for tx in transactions {
        writer.write_record([
            tx.date.clone(),
            quoted(&tx.merchant),
            quoted(&tx.category),
            quoted(&tx.description),
            tx.amount.to_plain_string(),
            tx.currency.code().to_string(),
            if tx.is_recurring { "Yes" } else { "No" }.to_string(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| EngineError::Io(err.into_error()))?;
    let mut text =
        String::from_utf8(bytes).map_err(|err| EngineError::InvalidFile(err.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Writes the export file into `dir`, creating the directory if needed.
///
/// An empty list is a no-op and returns `Ok(None)`.
pub fn export_to_dir(
    transactions: &[Transaction],
    dir: &Path,
    prefix: &str,
    day: NaiveDate,
) -> ResultEngine<Option<PathBuf>> {
    if transactions.is_empty() {
        return Ok(None);
    }
    let content = to_csv(transactions)?;
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(prefix, day));
    fs::write(&path, content)?;
    info!(path = %path.display(), rows = transactions.len(), "transactions exported");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Currency, Money};

    fn tx(merchant: &str, description: &str, cents: i64, recurring: bool) -> Transaction {
        Transaction {
            id: "t1".to_string(),
            account_id: "1".to_string(),
            date: "2024-05-20".to_string(),
            amount: Money::new(cents),
            currency: Currency::Usd,
            category: "Groceries".to_string(),
            merchant: merchant.to_string(),
            description: description.to_string(),
            is_recurring: recurring,
        }
    }

    #[test]
    fn quotes_text_and_leaves_amount_bare() {
        let csv = to_csv(&[
            tx("Whole Foods", "Weekly groceries", -12050, false),
            tx("Employer Inc", "", 350000, true),
        ])
        .unwrap();
        assert_eq!(
            csv,
            "Date,Merchant,Category,Description,Amount,Currency,Is Recurring\n\
             2024-05-20,\"Whole Foods\",\"Groceries\",\"Weekly groceries\",-120.5,USD,No\n\
             2024-05-20,\"Employer Inc\",\"Groceries\",\"\",3500,USD,Yes"
        );
    }

    #[test]
    fn doubles_inner_quotes() {
        let csv = to_csv(&[tx("Joe's \"Deli\", Inc.", "", -999, false)]).unwrap();
        assert!(csv.contains("\"Joe's \"\"Deli\"\", Inc.\""));
    }

    #[test]
    fn file_name_uses_prefix_and_day() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        assert_eq!(
            export_file_name(DEFAULT_EXPORT_PREFIX, day),
            "fluxboard_transactions_2024-05-20.csv"
        );
    }

    #[test]
    fn empty_export_writes_nothing() {
        let dir = std::env::temp_dir().join(format!("fluxboard-empty-{}", std::process::id()));
        let day = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        assert_eq!(export_to_dir(&[], &dir, "x", day), Ok(None));
        assert!(!dir.exists());
    }
}
