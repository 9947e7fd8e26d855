//! Provider-specific statement layouts

pub mod gpay;
pub mod phonepe;
mod text;

use anyhow::Result;
use spendsync_core::Provider;

pub use gpay::{DEFAULT_LOOKAHEAD, GPayLayout};
pub use phonepe::PhonePeLayout;

use crate::types::StatementLayout;

/// Knobs shared by the layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Max lines searched after a GPay date line for its amount
    pub lookahead: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

/// Layout strategy for a provider
pub fn layout_for(provider: Provider, options: ScanOptions) -> Result<Box<dyn StatementLayout>> {
    Ok(match provider {
        Provider::GPay => Box::new(GPayLayout::with_lookahead(options.lookahead)?),
        Provider::PhonePe => Box::new(PhonePeLayout::new()?),
    })
}
