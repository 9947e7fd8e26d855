//! spendsync-core: record types, target periods and amount parsing shared by
//! the statement parsers and the categorizer

pub mod money;
pub mod period;
pub mod record;

pub use money::{AmountError, has_amount_token, parse_amount};
pub use period::{Period, PeriodError, format_date};
pub use record::{Category, DATE_FORMAT, Direction, Provider, TransactionRecord};

/// Text normalization used for keyword matching
pub mod text {
    /// Lower-case and drop all whitespace.
    ///
    /// Statement text extracted from PDFs loses spaces unpredictably
    /// ("PaidtoSwiggy", "Paid to Swiggy"), so both sides of every keyword
    /// comparison go through this.
    pub fn squash(s: &str) -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Collapse runs of whitespace into single spaces and trim
    pub fn collapse_whitespace(s: &str) -> String {
        s.split_whitespace().collect::<Vec<_>>().join(" ")
    }

}
