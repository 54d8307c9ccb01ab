//! Pipeline stages for batch conversion.
//!
//! Each submodule implements exactly one step, so each is testable on its
//! own.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ layout ──▶ invoke
//! (walkdir)    (paths)    (subprocess + timeout)
//! ```
//!
//! 1. [`discover`] — list every `.pdf` under the input root
//! 2. [`layout`]   — map an input path to its Markdown output path
//! 3. [`invoke`]   — run the external converter for one file

pub mod discover;
pub mod invoke;
pub mod layout;
