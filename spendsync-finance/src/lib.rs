//! spendsync-finance: category rules, the statement pipeline, summaries and
//! output sinks

pub mod category_rules;
pub mod pipeline;
pub mod sink;
pub mod summary;

pub use category_rules::{BrandLabel, Categorized, CategoryRule, CategoryRules};
pub use pipeline::{Extraction, ExtractionStats, Pipeline, StatementSource};
pub use sink::{
    CsvSink, JsonLinesSink, MemoryLedger, RecordFailure, RunSummary, SinkError, TransactionSink,
    replay_all,
};
pub use summary::{CategoryTotal, Summary, format_inr, summarize};
