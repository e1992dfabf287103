//! Async HTTP clients for the upstream SPDX data sources.
//!
//! List endpoints fail hard. Per-entry endpoints return `Ok(None)` when the
//! entry is not found and `Err` on network or decoding failures.

pub mod fsf;
pub mod spdx;

pub(crate) const USER_AGENT: &str = concat!(
    "spdx-dataset/",
    env!("CARGO_PKG_VERSION"),
    " (license dataset builder)"
);
