use chrono::NaiveDate;
use serde::Serialize;
use spendsync_core::{Direction, Period, Provider};
use thiserror::Error;

/// Candidate transaction pulled out of statement lines, before categorization.
///
/// The amount is kept as raw text; converting it is the assembler's job so a
/// bad amount drops exactly one record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fragment {
    pub provider: Provider,
    pub date: NaiveDate,
    /// Date text exactly as it appeared in the statement
    pub date_token: String,
    /// Merchant or counterparty, with "Paid to"/"Received from" removed
    pub description: String,
    pub note: String,
    pub amount_text: String,
    pub direction: Direction,
    /// First and last line index consumed (inclusive)
    pub lines: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    #[error("unparseable date '{token}' on line {line}")]
    Date { token: String, line: usize },
}

/// A provider-specific way of reading statement lines.
pub trait StatementLayout: Send + Sync {
    fn provider(&self) -> Provider;

    /// Extract the fragments dated inside `period`.
    ///
    /// `lines` are trimmed and non-empty (see [`prepare_lines`]). Malformed
    /// rows are logged and skipped; this never fails.
    fn scan(&self, lines: &[String], period: Period) -> Vec<Fragment>;
}

/// Split extracted text into trimmed, non-empty lines
pub fn prepare_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_lines_trims_and_drops_blanks() {
        let lines = prepare_lines("  01Oct,2025 \r\n\n   \n05:04AM\n\tPaidtoSwiggy\n");
        assert_eq!(lines, vec!["01Oct,2025", "05:04AM", "PaidtoSwiggy"]);
        assert!(prepare_lines("").is_empty());
    }
}
