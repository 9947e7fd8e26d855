//! Downstream consumers for extracted records.
//!
//! Each record is handed over with one blocking call that returns a typed
//! result. [`replay_all`] keeps going after a failed record and reports every
//! outcome in a [`RunSummary`].

use serde::Serialize;
use spendsync_core::TransactionRecord;
use std::collections::BTreeMap;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("no ledger entry with id {0}")]
    NotFound(u64),
    #[error("record rejected: {0}")]
    Rejected(String),
}

/// Something that accepts records one at a time
pub trait TransactionSink {
    fn push(&mut self, record: &TransactionRecord) -> Result<(), SinkError>;

    /// Flush buffered output. Called once after the last record.
    fn finish(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordFailure {
    pub index: usize,
    pub merchant: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failures: Vec<RecordFailure>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Push every record, then finish the sink.
///
/// A failing record is logged and recorded; the rest are still attempted.
/// Only a failing `finish` aborts the run.
pub fn replay_all(
    sink: &mut dyn TransactionSink,
    records: &[TransactionRecord],
) -> Result<RunSummary, SinkError> {
    let mut summary = RunSummary::default();

    for (index, record) in records.iter().enumerate() {
        summary.attempted += 1;
        match sink.push(record) {
            Ok(()) => summary.succeeded += 1,
            Err(e) => {
                warn!(index, merchant = %record.merchant, %e, "sink rejected record");
                summary.failures.push(RecordFailure {
                    index,
                    merchant: record.merchant.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    sink.finish()?;
    debug!(
        attempted = summary.attempted,
        succeeded = summary.succeeded,
        "replay finished"
    );
    Ok(summary)
}

/// One JSON object per line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TransactionSink for JsonLinesSink<W> {
    fn push(&mut self, record: &TransactionRecord) -> Result<(), SinkError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Header row followed by one row per record
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(writer),
        }
    }

    pub fn into_inner(self) -> Result<W, SinkError> {
        self.writer
            .into_inner()
            .map_err(|e| SinkError::Io(e.into_error()))
    }
}

impl<W: Write> TransactionSink for CsvSink<W> {
    fn push(&mut self, record: &TransactionRecord) -> Result<(), SinkError> {
        self.writer.serialize(record)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// In-memory record store with ids owned by the instance.
///
/// Used for dry runs; nothing is persisted.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: BTreeMap<u64, TransactionRecord>,
    next_id: u64,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: TransactionRecord) -> u64 {
        self.next_id += 1;
        self.entries.insert(self.next_id, record);
        self.next_id
    }

    pub fn get(&self, id: u64) -> Option<&TransactionRecord> {
        self.entries.get(&id)
    }

    pub fn update(&mut self, id: u64, record: TransactionRecord) -> Result<(), SinkError> {
        let slot = self.entries.get_mut(&id).ok_or(SinkError::NotFound(id))?;
        *slot = record;
        Ok(())
    }

    pub fn remove(&mut self, id: u64) -> Result<TransactionRecord, SinkError> {
        self.entries.remove(&id).ok_or(SinkError::NotFound(id))
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &TransactionRecord)> {
        self.entries.iter().map(|(id, r)| (*id, r))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TransactionSink for MemoryLedger {
    fn push(&mut self, record: &TransactionRecord) -> Result<(), SinkError> {
        if record.amount.is_sign_negative() {
            return Err(SinkError::Rejected(format!(
                "negative amount {} for {}",
                record.amount, record.merchant
            )));
        }
        self.insert(record.clone());
        Ok(())
    }
}
