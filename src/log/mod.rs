//! History Log Module
//!
//! Bounded, deduplicating history persisted to a single text file.
//!
//! ## Responsibilities
//! - Load the entries written by a previous session
//! - Queue new entries in memory, rejecting duplicates when configured
//! - Flush the queue under a capacity bound, evicting old entries
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────┐
//! │ entry 1 (oldest)                   \n   │
//! │ entry 2                            \n   │
//! │ entry 3 ␟ modifier                 \n   │
//! │ ...                                     │
//! │ entry N (newest)                   \n   │
//! └─────────────────────────────────────────┘
//! ```
//! One entry per line, UTF-8, no header. A non-empty modifier is stored after
//! a U+001F unit separator (`␟`). Keys with a modifier, or whose entry holds a
//! `␟` itself, have `\` and `␟` escaped on both sides of the separator.
//!
//! ## Flush
//! ```text
//! e = |existing|, p = |pending|, C = capacity
//!
//! p == 0      → nothing
//! e + p <= C  → append pending
//! e + p >  C  → rewrite: existing[max(0, e-p)..] ++ pending[max(0, p-C)..]
//! ```

mod key;
mod loaded;
mod flush;
mod store;

pub use key::{EntryKey, ESCAPE, MODIFIER_SEPARATOR};
pub use loaded::LoadedState;
pub use flush::{FlushMode, FlushPlan, FlushSummary, LINE_ENDING};
pub use store::LogStore;
