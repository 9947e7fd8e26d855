//! spendsync-ingest: statement text scanning and provider-specific layouts.

pub mod types;
pub mod parsers;

pub use parsers::{ScanOptions, layout_for};
pub use types::{Fragment, ScanError, StatementLayout, prepare_lines};

use spendsync_core::Period;
use tracing::info;

/// Scan raw extracted text with a layout.
///
/// Empty or unreadable text gives an empty result, never an error.
pub fn scan_text(layout: &dyn StatementLayout, text: &str, period: Period) -> Vec<Fragment> {
    let lines = prepare_lines(text);
    if lines.is_empty() {
        info!(provider = %layout.provider(), "no text to scan");
        return Vec::new();
    }
    let fragments = layout.scan(&lines, period);
    info!(
        provider = %layout.provider(),
        lines = lines.len(),
        fragments = fragments.len(),
        %period,
        "scanned statement"
    );
    fragments
}
