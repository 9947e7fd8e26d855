//! Statement pipeline: scan each source, categorize, filter and merge into
//! the final ordered transaction list for one target month.

use anyhow::Result;
use serde::Serialize;
use spendsync_core::{Period, Provider, TransactionRecord, parse_amount};
use spendsync_ingest::{Fragment, ScanOptions, StatementLayout, layout_for, scan_text};
use tracing::{debug, info, warn};

use crate::category_rules::{Categorized, CategoryRules};

/// Extracted statement text from one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementSource {
    pub provider: Provider,
    pub text: String,
}

impl StatementSource {
    pub fn new(provider: Provider, text: impl Into<String>) -> Self {
        Self {
            provider,
            text: text.into(),
        }
    }
}

/// Why fragments did not become records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub fragments: usize,
    pub skipped: usize,
    pub out_of_period: usize,
    pub bad_amount: usize,
    pub accepted: usize,
}

/// Output of one run
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub period: Period,
    pub records: Vec<TransactionRecord>,
    pub stats: ExtractionStats,
}

impl Extraction {
    /// No transactions for the period; a normal outcome
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub struct Pipeline {
    period: Period,
    rules: CategoryRules,
    currency: String,
    layouts: Vec<Box<dyn StatementLayout>>,
}

impl Pipeline {
    pub fn new(period: Period, rules: CategoryRules, options: ScanOptions) -> Result<Self> {
        let layouts = [Provider::GPay, Provider::PhonePe]
            .into_iter()
            .map(|p| layout_for(p, options))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            period,
            rules,
            currency: "INR".to_string(),
            layouts,
        })
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    fn layout(&self, provider: Provider) -> Option<&dyn StatementLayout> {
        self.layouts
            .iter()
            .find(|l| l.provider() == provider)
            .map(|l| l.as_ref())
    }

    /// Run every source and merge the results.
    ///
    /// Records are stable-sorted by date, so same-day records keep source
    /// order and, within a source, statement order.
    pub fn run(&self, sources: &[StatementSource]) -> Extraction {
        let mut stats = ExtractionStats::default();
        let mut records = Vec::new();

        for source in sources {
            let Some(layout) = self.layout(source.provider) else {
                warn!(provider = %source.provider, "no layout registered");
                continue;
            };
            let fragments = scan_text(layout, &source.text, self.period);
            records.extend(self.assemble(fragments, &mut stats));
        }

        records.sort_by_key(|r| r.date);

        info!(
            period = %self.period,
            accepted = stats.accepted,
            skipped = stats.skipped,
            bad_amount = stats.bad_amount,
            "extraction finished"
        );

        Extraction {
            period: self.period,
            records,
            stats,
        }
    }

    /// Turn fragments into records, dropping SKIP, out-of-period and
    /// unparseable-amount fragments.
    pub fn assemble(
        &self,
        fragments: Vec<Fragment>,
        stats: &mut ExtractionStats,
    ) -> Vec<TransactionRecord> {
        let mut out = Vec::with_capacity(fragments.len());

        for f in fragments {
            stats.fragments += 1;

            if !self.period.contains(f.date) {
                stats.out_of_period += 1;
                continue;
            }

            let Categorized { category, label } = self.rules.categorize(&f.description, f.direction);
            if category.is_skip() {
                debug!(merchant = %f.description, "skipping recurring payment");
                stats.skipped += 1;
                continue;
            }

            let amount = match parse_amount(&f.amount_text) {
                Ok(a) => a,
                Err(e) => {
                    warn!(
                        provider = %f.provider,
                        lines = ?f.lines,
                        merchant = %f.description,
                        %e,
                        "dropping fragment with bad amount"
                    );
                    stats.bad_amount += 1;
                    continue;
                }
            };

            stats.accepted += 1;
            out.push(TransactionRecord {
                date: f.date,
                merchant: f.description,
                category,
                label,
                amount,
                currency: self.currency.clone(),
                note: f.note,
                direction: f.direction,
                source: f.provider,
            });
        }

        out
    }
}
