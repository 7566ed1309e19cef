//! Saldo Core Library
//!
//! Shared functionality for the saldo installment-statement service:
//! - Workbook decoding for uploaded statement exports
//! - Per-card aggregation of installment rows
//! - Pluggable advisory backends (OpenAI, mock)

pub mod advisor;
pub mod aggregate;
pub mod error;
pub mod models;
pub mod sheet;

/// Test utilities including a mock OpenAI server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use advisor::{
    annotate_summaries, AdvisorBackend, AdvisorClient, MockBackend, OpenAiBackend, FALLBACK_ADVICE,
};
pub use aggregate::{aggregate_cards, parse_amount};
pub use error::{Error, Result};
pub use models::{CardSummary, Installment};
pub use sheet::{extract_rows, Row};
