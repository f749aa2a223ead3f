//! Pattern extraction from activity digests.
//!
//! `engine` drives the oracle; `response` turns its text into patterns.

pub mod engine;
pub mod response;
