//! Transaction record types shared by the parser, categorizer and sinks

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Canonical output date format (DD/MM/YYYY)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Statement provider a record was extracted from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Provider {
    /// UPI wallet statement: date, time, details and amount on separate lines
    #[serde(rename = "GPay")]
    GPay,
    /// Payment-app statement: one row per transaction with a DEBIT/CREDIT column
    #[serde(rename = "PhonePe")]
    PhonePe,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::GPay => "GPay",
            Provider::PhonePe => "PhonePe",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether money left (debit) or entered (credit) the account.
///
/// Serialized as the expense tracker's transaction type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "Expenses")]
    Debit,
    #[serde(rename = "Income")]
    Credit,
}

impl Direction {
    pub fn is_credit(&self) -> bool {
        matches!(self, Direction::Credit)
    }

    /// Transaction type label used by the downstream tracker
    pub fn transaction_type(&self) -> &'static str {
        match self {
            Direction::Debit => "Expenses",
            Direction::Credit => "Income",
        }
    }
}

/// Fixed set of categories a record can be filed under
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    #[serde(rename = "Food & Drink")]
    FoodAndDrink,
    #[serde(rename = "Groceries")]
    Groceries,
    #[serde(rename = "Shopping")]
    Shopping,
    #[serde(rename = "Transport")]
    Transport,
    #[serde(rename = "Bills & Fees")]
    BillsAndFees,
    #[serde(rename = "Healthcare")]
    Healthcare,
    #[serde(rename = "Education")]
    Education,
    #[serde(rename = "Entertainment")]
    Entertainment,
    #[serde(rename = "Sport & Hobbies")]
    SportAndHobbies,
    #[serde(rename = "Beauty")]
    Beauty,
    #[serde(rename = "Gifts")]
    Gifts,
    #[serde(rename = "Other")]
    Other,
    /// Known recurring payment; never emitted
    #[serde(rename = "SKIP")]
    Skip,
}

impl Category {
    /// Categories offered for expenses
    pub const EXPENSE: [Category; 11] = [
        Category::FoodAndDrink,
        Category::Shopping,
        Category::Transport,
        Category::BillsAndFees,
        Category::Healthcare,
        Category::Education,
        Category::Entertainment,
        Category::SportAndHobbies,
        Category::Beauty,
        Category::Groceries,
        Category::Other,
    ];

    /// Categories offered for income
    pub const INCOME: [Category; 2] = [Category::Gifts, Category::Other];

    /// Category every credit is filed under
    pub const INCOME_DEFAULT: Category = Category::Gifts;

    pub fn name(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "Food & Drink",
            Category::Groceries => "Groceries",
            Category::Shopping => "Shopping",
            Category::Transport => "Transport",
            Category::BillsAndFees => "Bills & Fees",
            Category::Healthcare => "Healthcare",
            Category::Education => "Education",
            Category::Entertainment => "Entertainment",
            Category::SportAndHobbies => "Sport & Hobbies",
            Category::Beauty => "Beauty",
            Category::Gifts => "Gifts",
            Category::Other => "Other",
            Category::Skip => "SKIP",
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Category::Skip)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    /// Case-insensitive match on the display name ("food & drink", "SKIP", ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::EXPENSE
            .iter()
            .chain([Category::Gifts, Category::Skip].iter())
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| anyhow::anyhow!("unknown category: {wanted}"))
    }
}

/// A categorized money movement ready for output.
///
/// Serializes to the interchange JSON shape: `date` as DD/MM/YYYY, `label` as
/// an empty string when absent, `amount` as a decimal string and the
/// direction as `transaction_type`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TransactionRecord {
    #[serde(serialize_with = "serialize_date")]
    pub date: NaiveDate,
    pub merchant: String,
    pub category: Category,
    #[serde(serialize_with = "serialize_label")]
    pub label: Option<String>,
    /// Always non-negative; the sign lives in `direction`
    pub amount: Decimal,
    pub currency: String,
    pub note: String,
    #[serde(rename = "transaction_type")]
    pub direction: Direction,
    pub source: Provider,
}

impl TransactionRecord {
    pub fn is_income(&self) -> bool {
        self.direction.is_credit()
    }

    pub fn is_expense(&self) -> bool {
        !self.direction.is_credit()
    }

    /// Date in the canonical DD/MM/YYYY form
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// Amount with the sign applied: negative for expenses
    pub fn signed_amount(&self) -> Decimal {
        match self.direction {
            Direction::Debit => -self.amount,
            Direction::Credit => self.amount,
        }
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&date.format(DATE_FORMAT))
}

fn serialize_label<S: Serializer>(label: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(label.as_deref().unwrap_or(""))
}
