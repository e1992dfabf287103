//! Renderers for dataset entries and build results.
//!
//! - [`markdown`] — the self-contained page stored in each row's `page_markdown`.
//! - [`terminal`] — colored summary box and family table; respects `--verbose` / `--quiet`.

pub mod markdown;
pub mod terminal;
