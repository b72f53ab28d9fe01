//! # histlog
//!
//! A bounded, deduplicating history log persisted to a single text file:
//! - Entries queued in memory, written in one batch on flush
//! - Optional duplicate rejection on entry + modifier
//! - Capacity bound with eviction of old and surplus new entries
//! - Flush notifications through an explicit event registry
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         LogStore                             │
//! │        add / contains / remove  ·  flush  ·  accessors       │
//! └──────┬──────────────────────┬───────────────────────┬───────┘
//!        │                      │                       │
//!        ▼                      ▼                       ▼
//!  ┌─────────────┐      ┌──────────────┐        ┌──────────────┐
//!  │ LoadedState │      │   Pending    │        │  Membership  │
//!  │ (from file) │      │   (queue)    │        │ (dedup set)  │
//!  └──────┬──────┘      └──────┬───────┘        └──────────────┘
//!         └─────────┬──────────┘
//!                   ▼
//!           ┌──────────────┐          ┌──────────────┐
//!           │  FlushPlan   │ ───────► │ EventRegistry│
//!           │append/rewrite│          │  (optional)  │
//!           └──────────────┘          └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use histlog::{HistoryConfig, LogStore};
//!
//! # fn main() -> histlog::Result<()> {
//! let config = HistoryConfig::builder()
//!     .dir("/tmp/app")
//!     .file_name("seen.txt")
//!     .capacity(500)
//!     .build();
//!
//! let mut log = LogStore::open(config)?;
//! if !log.contains_with("song.mp3", 1_700_000_000u64) {
//!     log.add_with("song.mp3", 1_700_000_000u64);
//! }
//! log.flush()?;
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod log;
pub mod events;
pub mod checksum;
pub mod scheduler;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{HistoryError, Result};
pub use config::HistoryConfig;
pub use log::{EntryKey, FlushMode, FlushSummary, LogStore};
pub use events::{Event, EventKind, EventRegistry, SubscriberId};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of histlog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
