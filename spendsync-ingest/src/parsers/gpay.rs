//! GPay (UPI wallet) statement layout
//!
//! Expected text rows after PDF-to-text, one field per line:
//!   01Oct,2025
//!   05:04AM
//!   PaidtoSwiggy
//!   UPI Transaction ID: 527412345678
//!   Paid by HDFC Bank 4456
//!   ₹350
//!
//! Older exports write the date as `01 Oct, 2025` or `01Oct,25`, and some put
//! the counterparty on the amount line (`01Oct,2025 PaidtoMyGate ₹4,800`).

use anyhow::Result;
use chrono::NaiveDate;
use regex::{Captures, Regex};
use spendsync_core::text::collapse_whitespace;
use spendsync_core::{Period, Provider, has_amount_token};
use tracing::{debug, warn};

use super::text::{TextRules, direction_from_verbs};
use crate::types::{Fragment, ScanError, StatementLayout};

/// Lines searched after a date line for its amount
pub const DEFAULT_LOOKAHEAD: usize = 7;

pub struct GPayLayout {
    date_patterns: Vec<Regex>,
    rules: TextRules,
    lookahead: usize,
}

impl GPayLayout {
    pub fn new() -> Result<Self> {
        Self::with_lookahead(DEFAULT_LOOKAHEAD)
    }

    pub fn with_lookahead(lookahead: usize) -> Result<Self> {
        // Tried in order: 01Oct,2025 / 01 Oct, 2025 / 01Oct,25
        let date_patterns = vec![
            Regex::new(r"\b(?P<day>\d{1,2})(?P<mon>[A-Za-z]{3}),(?P<year>\d{4})")?,
            Regex::new(r"\b(?P<day>\d{1,2})\s+(?P<mon>[A-Za-z]{3}),\s+(?P<year>\d{4})")?,
            Regex::new(r"\b(?P<day>\d{1,2})(?P<mon>[A-Za-z]{3}),(?P<year>\d{2})\b")?,
        ];
        Ok(Self {
            date_patterns,
            rules: TextRules::new()?,
            lookahead: lookahead.max(1),
        })
    }

    fn date_captures<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        self.date_patterns.iter().find_map(|re| re.captures(line))
    }

    fn has_date(&self, line: &str) -> bool {
        self.date_patterns.iter().any(|re| re.is_match(line))
    }

    fn without_dates(&self, line: &str) -> String {
        let mut out = line.to_string();
        for re in &self.date_patterns {
            out = re.replace_all(&out, " ").into_owned();
        }
        out
    }

    /// Index of the line holding the amount for the date on line `i`.
    ///
    /// Another date line before any amount means this date has no amount of
    /// its own.
    fn find_amount_line(&self, lines: &[String], i: usize) -> Option<usize> {
        if has_amount_token(&lines[i]) {
            return Some(i);
        }
        for j in (i + 1..lines.len()).take(self.lookahead) {
            if has_amount_token(&lines[j]) {
                return Some(j);
            }
            if self.has_date(&lines[j]) {
                return None;
            }
        }
        None
    }

    fn build_fragment(
        &self,
        lines: &[String],
        i: usize,
        j: usize,
        date_token: String,
        date: NaiveDate,
    ) -> Fragment {
        let amount_line = &lines[j];
        let amount_rest = collapse_whitespace(&self.rules.without_amounts(&self.without_dates(amount_line)));

        // Detail lines sit between the date and the amount; the date line can
        // carry text of its own too.
        let mut details: Vec<String> = Vec::new();
        if j > i {
            let date_rest = collapse_whitespace(&self.without_dates(&lines[i]));
            if !date_rest.is_empty() {
                details.push(date_rest);
            }
            details.extend(
                lines[i + 1..j]
                    .iter()
                    .filter(|l| !self.rules.is_time(l))
                    .cloned(),
            );
        }

        let mut description = self.rules.merchant(&amount_rest);
        if description.chars().count() < 2 {
            description = details
                .iter()
                .filter(|l| !self.rules.is_boilerplate(l))
                .map(|l| self.rules.merchant(l))
                .find(|m| m.chars().count() >= 2)
                .unwrap_or_else(|| "Unknown".to_string());
        }

        // Only the leading verb of each line counts, never merchant text
        let direction = direction_from_verbs(
            std::iter::once(amount_rest.as_str()).chain(details.iter().map(String::as_str)),
        );

        let note = if amount_rest.is_empty() {
            details
                .iter()
                .filter(|l| !self.rules.is_boilerplate(l))
                .cloned()
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            amount_rest
        };

        Fragment {
            provider: Provider::GPay,
            date,
            date_token,
            description,
            note,
            amount_text: amount_line.clone(),
            direction,
            lines: (i, j),
        }
    }
}

/// Turn day/month/year captures into a date; two-digit years are 20YY
fn parse_date_captures(caps: &Captures<'_>, line: usize) -> Result<NaiveDate, ScanError> {
    let token = caps[0].to_string();
    let year = match caps["year"].len() {
        2 => format!("20{}", &caps["year"]),
        _ => caps["year"].to_string(),
    };
    let normalized = format!("{:0>2} {} {}", &caps["day"], &caps["mon"], year);
    NaiveDate::parse_from_str(&normalized, "%d %b %Y").map_err(|_| ScanError::Date { token, line })
}

impl StatementLayout for GPayLayout {
    fn provider(&self) -> Provider {
        Provider::GPay
    }

    fn scan(&self, lines: &[String], period: Period) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Some(caps) = self.date_captures(&lines[i]) else {
                i += 1;
                continue;
            };

            let date = match parse_date_captures(&caps, i) {
                Ok(d) => d,
                Err(e) => {
                    warn!(provider = "GPay", %e, "skipping malformed date");
                    i += 1;
                    continue;
                }
            };

            if !period.contains(date) {
                debug!(line = i, %date, "outside target period");
                i += 1;
                continue;
            }

            let Some(j) = self.find_amount_line(lines, i) else {
                debug!(line = i, token = &caps[0], "no amount within lookahead");
                i += 1;
                continue;
            };

            let fragment = self.build_fragment(lines, i, j, caps[0].to_string(), date);
            debug!(
                lines = ?fragment.lines,
                merchant = %fragment.description,
                amount = %fragment.amount_text,
                "gpay fragment"
            );
            out.push(fragment);
            i = j + 1;
        }

        out
    }
}
