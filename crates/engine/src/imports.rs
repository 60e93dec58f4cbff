//! CSV import in the export format.

use std::{fs, path::Path, str::FromStr};

use csv::{ReaderBuilder, StringRecord};

use crate::{
    Currency, EngineError, Money, ResultEngine, TransactionDraft, exports::EXPORT_HEADER,
};

pub const INVALID_FILE_TYPE: &str = "Invalid file type. Please upload a CSV file.";

/// Outcome of a successful import.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImportReport {
    pub count: usize,
}

/// Reads a `.csv` file and parses its rows into drafts.
pub fn read_csv_file(path: &Path) -> ResultEngine<Vec<TransactionDraft>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(EngineError::InvalidFile(INVALID_FILE_TYPE.to_string()));
    }
    let content = fs::read_to_string(path)?;
    parse_csv(&content)
}

/// Parses export-format CSV text. The header row is required.
///
/// Amounts are taken as signed, the way they were exported. Any bad row
/// fails the whole parse with the row's line number.
pub fn parse_csv(content: &str) -> ResultEngine<Vec<TransactionDraft>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?;
    let matches_header = headers.len() == EXPORT_HEADER.len()
        && headers
            .iter()
            .zip(EXPORT_HEADER)
            .all(|(got, want)| got.trim().eq_ignore_ascii_case(want));
    if !matches_header {
        return Err(EngineError::InvalidFile(format!(
            "unexpected CSV header, expected: {}",
            EXPORT_HEADER.join(",")
        )));
    }

    let mut drafts = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| match err.position() {
            Some(pos) => EngineError::InvalidRow {
                line: pos.line(),
                message: err.to_string(),
            },
            None => EngineError::Csv(err),
        })?;
        let line = record.position().map_or(0, |pos| pos.line());
        let draft = parse_record(&record).map_err(|err| EngineError::InvalidRow {
            line,
            message: err.to_string(),
        })?;
        drafts.push(draft);
    }
    Ok(drafts)
}

fn parse_record(record: &StringRecord) -> ResultEngine<TransactionDraft> {
    let field = |idx: usize| record.get(idx).unwrap_or("").trim();

    let is_recurring = match field(6).to_ascii_lowercase().as_str() {
        "yes" | "true" => true,
        "no" | "false" | "" => false,
        other => {
            return Err(EngineError::Validation(format!(
                "invalid recurring flag: {other}"
            )));
        }
    };
    let currency = match field(5) {
        "" => Currency::default(),
        code => Currency::try_from(code)?,
    };

    let draft = TransactionDraft {
        date: field(0).to_string(),
        merchant: field(1).to_string(),
        category: field(2).to_string(),
        description: field(3).to_string(),
        amount: Money::from_str(field(4))?,
        currency,
        is_recurring,
    };
    draft.normalized()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    const HEADER: &str = "Date,Merchant,Category,Description,Amount,Currency,Is Recurring";

    #[test]
    fn rejects_non_csv_extension() {
        let err = read_csv_file(&PathBuf::from("statement.xlsx")).unwrap_err();
        assert_eq!(err, EngineError::InvalidFile(INVALID_FILE_TYPE.to_string()));
        assert_eq!(err.to_string(), INVALID_FILE_TYPE);
    }

    #[test]
    fn parses_rows_in_file_order() {
        let content = format!(
            "{HEADER}\n2024-05-20,\"Whole Foods\",\"Groceries\",\"\",-120.5,USD,No\n\
             2024-05-15,\"Employer Inc\",\"Income\",\"Salary\",3500,usd,Yes"
        );
        let drafts = parse_csv(&content).unwrap();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].merchant, "Whole Foods");
        assert_eq!(drafts[0].amount, Money::new(-12050));
        assert!(drafts[1].is_recurring);
        assert_eq!(drafts[1].amount, Money::new(350000));
    }

    #[test]
    fn bad_row_names_its_line() {
        let content = format!(
            "{HEADER}\n2024-05-20,\"A\",\"Dining\",\"\",-1,USD,No\n2024-05-21,\"B\",\"Dining\",\"\",lots,USD,No"
        );
        let err = parse_csv(&content).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRow { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = parse_csv("2024-05-20,\"A\",\"Dining\",\"\",-1,USD,No").unwrap_err();
        assert!(matches!(err, EngineError::InvalidFile(_)));
    }
}
