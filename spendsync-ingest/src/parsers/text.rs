//! Line cleanup shared by the provider layouts.

use anyhow::Result;
use regex::Regex;
use spendsync_core::Direction;
use spendsync_core::text::{collapse_whitespace, squash};

/// Leading verbs that mark money coming in, matched against squashed text
const CREDIT_VERBS: &[&str] = &["received", "credited"];

pub(crate) struct TextRules {
    verb_re: Regex,
    paid_by_re: Regex,
    time_re: Regex,
    amount_re: Regex,
}

impl TextRules {
    pub(crate) fn new() -> Result<Self> {
        Ok(Self {
            verb_re: Regex::new(r"(?i)^(?:paid\s*to|received\s*from|sent\s*to)\s*")?,
            paid_by_re: Regex::new(r"(?i)paid\s*by\s*.*$")?,
            time_re: Regex::new(r"(?i)^\d{1,2}:\d{2}(?::\d{2})?\s*(?:am|pm)?$")?,
            amount_re: Regex::new(r"₹\s*[+\-]?[\d,.]*")?,
        })
    }

    /// Remove a leading "Paid to" / "Received from" and a trailing
    /// "Paid by <bank account>"
    pub(crate) fn merchant(&self, text: &str) -> String {
        let text = self.verb_re.replace(text.trim(), "");
        let text = self.paid_by_re.replace(&text, "");
        collapse_whitespace(&text)
    }

    pub(crate) fn without_amounts(&self, text: &str) -> String {
        self.amount_re.replace_all(text, " ").into_owned()
    }

    pub(crate) fn is_time(&self, line: &str) -> bool {
        self.time_re.is_match(line.trim())
    }

    /// Statement chrome that never names a merchant
    pub(crate) fn is_boilerplate(&self, line: &str) -> bool {
        let s = squash(line);
        s.starts_with("upitransactionid")
            || s.starts_with("paidby")
            || s == "debit"
            || s == "credit"
            || self.is_time(line)
    }
}

/// Direction from the leading verb of a GPay row's lines.
///
/// A line counts as a credit only when it starts with a credit verb
/// ("Receivedfrom...", "Received in ..."), so merchant names are ignored.
pub(crate) fn direction_from_verbs<'a>(lines: impl IntoIterator<Item = &'a str>) -> Direction {
    let credit = lines.into_iter().any(|line| {
        let s = squash(line);
        CREDIT_VERBS.iter().any(|verb| s.starts_with(verb))
    });
    if credit {
        Direction::Credit
    } else {
        Direction::Debit
    }
}
