#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc,
    clippy::module_name_repetitions
)]

//! Behavioral pattern pipeline for on-chain accounts.
//!
//! Transactions are split into activity sessions, summarized into a bounded
//! digest, handed to a text-completion oracle for pattern extraction, stored
//! per address, and later matched against fresh activity.

pub mod analyzer;
pub mod digest;
pub mod extraction;
pub mod ledger;
pub mod matcher;
pub mod oracle;
pub mod session;
pub mod store;
pub mod types;

pub use analyzer::{AnalyzerConfig, PatternAnalyzer};
pub use digest::{Digest, iso_timestamp, summarize};
pub use extraction::engine::{
    ExtractionConfig, PatternExtractor, build_prompt, fallback_pattern, insufficient_data_pattern,
};
pub use extraction::response::{ParsedResponse, parse_response};
pub use ledger::{BalanceSource, TransactionSource};
pub use matcher::{LargeTransferStrategy, MatchStrategy};
pub use oracle::{DisabledOracle, OracleError, OracleRequest, PatternOracle};
pub use session::{DEFAULT_SESSION_GAP_MS, SegmentError, Session, segment, sort_newest_first};
pub use store::{PatternStore, StoreError};
pub use types::{MatchVerdict, Pattern, PatternDetails, PatternType, Transaction, percent};
