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
    clippy::missing_errors_doc
)]

mod anthropic;
mod etherscan;
pub mod retry;
mod rpc;
pub mod units;

pub use anthropic::AnthropicOracle;
pub use etherscan::EtherscanClient;
pub use rpc::RpcBalanceClient;
