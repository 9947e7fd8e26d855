//! Per-category totals for an extracted month.

use rust_decimal::Decimal;
use serde::Serialize;
use spendsync_core::{Category, TransactionRecord};
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub count: usize,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Largest total first
    pub by_category: Vec<CategoryTotal>,
    pub expenses: Decimal,
    pub income: Decimal,
    pub count: usize,
}

impl Summary {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut groups: HashMap<Category, (usize, Decimal)> = HashMap::new();
        let mut expenses = Decimal::ZERO;
        let mut income = Decimal::ZERO;

        for r in records {
            let entry = groups.entry(r.category).or_insert((0, Decimal::ZERO));
            entry.0 += 1;
            entry.1 += r.amount;
            if r.is_income() {
                income += r.amount;
            } else {
                expenses += r.amount;
            }
        }

        let mut by_category: Vec<CategoryTotal> = groups
            .into_iter()
            .map(|(category, (count, total))| CategoryTotal {
                category,
                count,
                total,
            })
            .collect();
        by_category.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.name().cmp(b.category.name()))
        });

        Self {
            by_category,
            expenses,
            income,
            count: records.len(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Transaction summary by category:")?;
        for c in &self.by_category {
            writeln!(f, "  {}: ₹{} ({})", c.category, format_inr(c.total), c.count)?;
        }
        writeln!(f)?;
        writeln!(f, "  EXPENSES: ₹{}", format_inr(self.expenses))?;
        writeln!(f, "  INCOME: ₹{}", format_inr(self.income))?;
        write!(f, "  TRANSACTIONS: {}", self.count)
    }
}

/// Group records by category; shorthand for [`Summary::from_records`]
pub fn summarize(records: &[TransactionRecord]) -> Summary {
    Summary::from_records(records)
}

/// Two decimals with comma thousands separators: 12345.5 -> "12,345.50"
pub fn format_inr(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (int_part, frac) = unsigned.split_once('.').unwrap_or((unsigned, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped}.{frac}")
}
