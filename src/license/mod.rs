//! Derived license metadata computed from an SPDX identifier.
//!
//! - [`spdx`] — splits an identifier into family, version and version modifier.
//! - [`classifier`] — the usage table and its substring fallbacks.
//! - [`fsf`] — turns FSF API tags into a GPL compatibility summary.

pub mod classifier;
pub mod fsf;
pub mod spdx;
