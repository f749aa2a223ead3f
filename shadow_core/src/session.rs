//! Session segmentation.
//!
//! A session is a maximal run of transactions with no inactivity gap longer
//! than the threshold. Input must be ordered newest first; the segmenter walks
//! backwards in time and keeps `start_time` as the moving boundary.

use serde::Serialize;
use thiserror::Error;

use crate::types::Transaction;

/// Default inactivity gap: 24 hours in milliseconds.
pub const DEFAULT_SESSION_GAP_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SegmentError {
    #[error("session gap must be positive, got {0}ms")]
    InvalidGap(i64),

    #[error("transactions must be sorted newest first: {newer} follows {older}")]
    NotDescending { older: i64, newer: i64 },
}

/// A contiguous run of activity.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub start_time: i64,
    pub end_time: i64,
    pub transactions: Vec<Transaction>,
    pub total_value: f64,
}

impl Session {
    fn open(tx: &Transaction, timestamp: i64) -> Self {
        Self {
            start_time: timestamp,
            end_time: timestamp,
            transactions: vec![tx.clone()],
            total_value: tx.amount(),
        }
    }

    fn absorb(&mut self, tx: &Transaction, timestamp: i64) {
        self.start_time = self.start_time.min(timestamp);
        self.end_time = self.end_time.max(timestamp);
        self.transactions.push(tx.clone());
        self.total_value += tx.amount();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Wall-clock span of the session in milliseconds.
    #[must_use]
    pub const fn duration_ms(&self) -> i64 {
        self.end_time - self.start_time
    }
}

/// Split newest-first transactions into sessions.
///
/// Transactions without a timestamp are skipped. Two transactions exactly
/// `gap_ms` apart belong to the same session.
///
/// # Errors
/// Returns [`SegmentError::InvalidGap`] for a non-positive gap and
/// [`SegmentError::NotDescending`] when a timestamp is newer than the one
/// before it.
pub fn segment(transactions: &[Transaction], gap_ms: i64) -> Result<Vec<Session>, SegmentError> {
    if gap_ms <= 0 {
        return Err(SegmentError::InvalidGap(gap_ms));
    }

    let mut sessions = Vec::new();
    let mut current: Option<Session> = None;
    let mut previous: Option<i64> = None;

    for tx in transactions {
        let Some(ts) = tx.timestamp else {
            continue;
        };

        if let Some(older) = previous {
            if ts > older {
                return Err(SegmentError::NotDescending { older, newer: ts });
            }
        }
        previous = Some(ts);

        match current.as_mut() {
            None => current = Some(Session::open(tx, ts)),
            Some(session) if session.start_time.abs_diff(ts) <= gap_ms.unsigned_abs() => {
                session.absorb(tx, ts);
            }
            Some(_) => {
                sessions.extend(current.replace(Session::open(tx, ts)));
            }
        }
    }

    sessions.extend(current);
    Ok(sessions)
}

/// Stable sort newest first; transactions without a timestamp go last.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}
