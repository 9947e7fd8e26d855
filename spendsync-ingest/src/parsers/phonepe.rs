//! PhonePe statement layout
//!
//! Expected extracted-text rows, one transaction per line:
//!   Oct 29, 2025 Paid to ANNAPOORNA MESS DEBIT ₹120
//!   29 Oct 2025 Received from Ravi Kumar Credit ₹2,000.00
//!
//! Some exports break a row over four lines instead:
//!   Oct 29, 2025
//!   Paid to ANNAPOORNA MESS
//!   DEBIT
//!   ₹120

use anyhow::Result;
use chrono::NaiveDate;
use regex::Regex;
use spendsync_core::text::{collapse_whitespace, squash};
use spendsync_core::{Direction, Period, Provider};
use tracing::{debug, warn};

use super::text::TextRules;
use crate::types::{Fragment, ScanError, StatementLayout};

/// `Oct 29, 2025` or `29 Oct 2025` (full month names accepted)
const DATE: &str = r"[A-Za-z]{3,9}\s+\d{1,2},\s*\d{4}|\d{1,2}\s+[A-Za-z]{3,9},?\s+\d{4}";

const DATE_FORMATS: &[&str] = &["%b %d, %Y", "%d %b %Y", "%d %b, %Y"];

pub struct PhonePeLayout {
    row_re: Regex,
    date_re: Regex,
    rules: TextRules,
}

/// A row recognized by either format, before the period check
struct Row<'a> {
    date_token: &'a str,
    description: &'a str,
    marker: &'a str,
    amount: &'a str,
    span: (usize, usize),
}

impl PhonePeLayout {
    pub fn new() -> Result<Self> {
        // Greedy description: the marker is the last DEBIT/CREDIT directly
        // followed by the rupee amount, so merchant names may contain either word
        let row_re = Regex::new(&format!(
            r"(?P<date>{DATE})\s+(?P<desc>.+)\s+(?P<marker>(?i:debit|credit))\s+(?P<amount>[+\-]?₹.*)$"
        ))?;
        let date_re = Regex::new(&format!(r"(?P<date>{DATE})"))?;
        Ok(Self {
            row_re,
            date_re,
            rules: TextRules::new()?,
        })
    }

    fn single_line<'a>(&self, lines: &'a [String], i: usize) -> Option<Row<'a>> {
        let caps = self.row_re.captures(&lines[i])?;
        Some(Row {
            date_token: caps.name("date")?.as_str(),
            description: caps.name("desc")?.as_str(),
            marker: caps.name("marker")?.as_str(),
            amount: caps.name("amount")?.as_str(),
            span: (i, i),
        })
    }

    /// Date, description, DEBIT/CREDIT and amount on four consecutive lines
    fn block<'a>(&self, lines: &'a [String], i: usize) -> Option<Row<'a>> {
        let [date_line, desc_line, marker_line, amount_line] = lines.get(i..i + 4)? else {
            return None;
        };
        let date = self.date_re.captures(date_line)?.name("date")?.as_str();
        let marker = squash(marker_line);
        if marker != "debit" && marker != "credit" {
            return None;
        }
        if !amount_line.chars().any(|c| c.is_ascii_digit() || c == spendsync_core::money::RUPEE) {
            return None;
        }
        Some(Row {
            date_token: date,
            description: desc_line,
            marker: marker_line,
            amount: amount_line,
            span: (i, i + 3),
        })
    }

    fn fragment(&self, row: &Row<'_>, date: NaiveDate) -> Fragment {
        let direction = if squash(row.marker) == "credit" {
            Direction::Credit
        } else {
            Direction::Debit
        };
        let mut description = self.rules.merchant(row.description);
        if description.is_empty() {
            description = "Unknown".to_string();
        }
        Fragment {
            provider: Provider::PhonePe,
            date,
            date_token: row.date_token.to_string(),
            description,
            note: collapse_whitespace(row.description),
            amount_text: row.amount.trim().to_string(),
            direction,
            lines: row.span,
        }
    }
}

fn parse_date(token: &str, line: usize) -> Result<NaiveDate, ScanError> {
    let normalized = collapse_whitespace(token);
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(&normalized, f).ok())
        .ok_or_else(|| ScanError::Date {
            token: token.to_string(),
            line,
        })
}

impl StatementLayout for PhonePeLayout {
    fn provider(&self) -> Provider {
        Provider::PhonePe
    }

    fn scan(&self, lines: &[String], period: Period) -> Vec<Fragment> {
        let mut out = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Some(row) = self.single_line(lines, i).or_else(|| self.block(lines, i)) else {
                i += 1;
                continue;
            };

            let date = match parse_date(row.date_token, i) {
                Ok(d) => d,
                Err(e) => {
                    warn!(provider = "PhonePe", %e, "skipping malformed date");
                    i += 1;
                    continue;
                }
            };

            if !period.contains(date) {
                debug!(line = i, %date, "outside target period");
                i += 1;
                continue;
            }

            let fragment = self.fragment(&row, date);
            debug!(
                lines = ?fragment.lines,
                merchant = %fragment.description,
                amount = %fragment.amount_text,
                "phonepe fragment"
            );
            out.push(fragment);
            i = row.span.1 + 1;
        }

        out
    }
}
