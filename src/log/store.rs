//! Log store
//!
//! Owns the loaded history, the pending queue and the duplicate index, and
//! reconciles them with the backing file on flush.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::checksum;
use crate::config::HistoryConfig;
use crate::error::{HistoryError, Result};
use crate::events::{Event, EventRegistry};

use super::flush::{self, FlushMode, FlushPlan, FlushSummary};
use super::{EntryKey, LoadedState};

/// Bounded, deduplicating history backed by one text file
///
/// ## Lifecycle
/// 1. `open` validates the config and loads the backing file
/// 2. `add` / `add_with` queue entries in memory (no I/O)
/// 3. `flush` writes the queue under the capacity bound and clears it
///
/// A store assumes it is the only writer of its file. Open a new store to
/// see entries written by another session.
pub struct LogStore {
    /// Store configuration (validated)
    config: HistoryConfig,

    /// Full path of the backing file
    path: PathBuf,

    /// Entries on disk as of open (or the last successful flush)
    loaded: LoadedState,

    /// Stored lines added since, oldest first
    pending: Vec<String>,

    /// Keys of `loaded` and `pending`; empty when duplicates are allowed
    membership: HashSet<EntryKey>,

    /// Optional sink for flush notifications
    events: Option<Arc<EventRegistry>>,
}

impl LogStore {
    /// Open the history described by `config`
    ///
    /// Fails with a configuration error for an unusable config and with a
    /// load error if the file exists but cannot be read.
    pub fn open(config: HistoryConfig) -> Result<Self> {
        config.validate()?;

        let path = config.log_path();
        let loaded = LoadedState::load(&path)?;

        let membership = if config.allow_duplicates {
            HashSet::new()
        } else {
            loaded.keys().collect()
        };

        tracing::debug!(
            "Loaded {} entries from {} (capacity={}, allow_duplicates={})",
            loaded.len(),
            path.display(),
            config.capacity,
            config.allow_duplicates
        );

        Ok(Self {
            config,
            path,
            loaded,
            pending: Vec::new(),
            membership,
            events: None,
        })
    }

    /// Open with a directory (convenience method)
    ///
    /// Uses the default file name, capacity and duplicate policy
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(HistoryConfig::builder().dir(dir.as_ref()).build())
    }

    /// Publish `Event::Flushed` to `registry` after every write
    pub fn with_events(mut self, registry: Arc<EventRegistry>) -> Self {
        self.events = Some(registry);
        self
    }

    // =========================================================================
    // Queueing
    // =========================================================================

    /// Queue an entry without modifier
    ///
    /// Returns whether the entry was queued (`false` for a rejected duplicate).
    pub fn add(&mut self, entry: &str) -> bool {
        self.add_key(EntryKey::plain(entry))
    }

    /// Queue an entry versioned by `modifier` (e.g. a modification time)
    pub fn add_with(&mut self, entry: &str, modifier: impl fmt::Display) -> bool {
        self.add_key(EntryKey::with_modifier(entry, modifier))
    }

    /// Queue a prepared key
    pub fn add_key(&mut self, key: EntryKey) -> bool {
        if self.config.allow_duplicates {
            self.pending.push(key.to_line());
            return true;
        }

        if self.membership.contains(&key) {
            return false;
        }
        self.pending.push(key.to_line());
        self.membership.insert(key);
        true
    }

    /// Withdraw the first queued occurrence of an entry before it is flushed
    ///
    /// Loaded history is never edited; only pending entries can be removed.
    pub fn remove(&mut self, entry: &str) -> bool {
        self.remove_key(&EntryKey::plain(entry))
    }

    /// Withdraw a queued entry with modifier
    pub fn remove_with(&mut self, entry: &str, modifier: impl fmt::Display) -> bool {
        self.remove_key(&EntryKey::with_modifier(entry, modifier))
    }

    /// Withdraw the first queued occurrence of `key`
    pub fn remove_key(&mut self, key: &EntryKey) -> bool {
        let Some(pos) = self
            .pending
            .iter()
            .position(|line| EntryKey::from_line(line) == *key)
        else {
            return false;
        };
        self.pending.remove(pos);

        if !self.config.allow_duplicates && !self.scan(key) {
            self.membership.remove(key);
        }
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Whether an entry without modifier is loaded or pending
    pub fn contains(&self, entry: &str) -> bool {
        self.contains_key(&EntryKey::plain(entry))
    }

    /// Whether an entry with modifier is loaded or pending
    pub fn contains_with(&self, entry: &str, modifier: impl fmt::Display) -> bool {
        self.contains_key(&EntryKey::with_modifier(entry, modifier))
    }

    /// Alias of `contains_with`
    pub fn is_in_history(&self, entry: &str, modifier: impl fmt::Display) -> bool {
        self.contains_with(entry, modifier)
    }

    /// Whether `key` is loaded or pending
    ///
    /// O(1) through the membership set when duplicates are rejected, a
    /// linear scan otherwise.
    pub fn contains_key(&self, key: &EntryKey) -> bool {
        if self.config.allow_duplicates {
            self.scan(key)
        } else {
            self.membership.contains(key)
        }
    }

    fn scan(&self, key: &EntryKey) -> bool {
        self.loaded
            .lines()
            .iter()
            .chain(self.pending.iter())
            .any(|line| EntryKey::from_line(line) == *key)
    }

    // =========================================================================
    // Flush
    // =========================================================================

    /// Write pending entries to the backing file
    ///
    /// Steps:
    /// 1. Plan append or rewrite from the entry counts and capacity
    /// 2. Write (a rewrite goes through a temp file and rename)
    /// 3. Adopt the written lines as the loaded state, clear pending
    ///
    /// On failure pending entries are kept so the flush can be retried.
    pub fn flush(&mut self) -> Result<FlushSummary> {
        let plan = FlushPlan::compute(self.loaded.len(), self.pending.len(), self.config.capacity);

        let (summary, written) = match plan {
            FlushPlan::Skip => return Ok(FlushSummary::skipped()),
            FlushPlan::Append => {
                self.write(|path, loaded, pending| {
                    flush::append_lines(path, pending, !loaded.is_terminated())
                })?;

                let mut lines = self.loaded.lines().to_vec();
                lines.extend(self.pending.iter().cloned());
                let summary = FlushSummary {
                    mode: FlushMode::Appended,
                    written: self.pending.len(),
                    dropped_existing: 0,
                    dropped_pending: 0,
                };
                (summary, lines)
            }
            FlushPlan::Rewrite {
                skip_existing,
                skip_pending,
            } => {
                self.write(|path, loaded, pending| {
                    flush::rewrite_lines(path, &loaded.lines()[skip_existing..], &pending[skip_pending..])
                })?;

                let mut lines = self.loaded.lines()[skip_existing..].to_vec();
                lines.extend(self.pending[skip_pending..].iter().cloned());
                let summary = FlushSummary {
                    mode: FlushMode::Rewritten,
                    written: self.pending.len() - skip_pending,
                    dropped_existing: skip_existing,
                    dropped_pending: skip_pending,
                };
                (summary, lines)
            }
        };

        self.loaded = LoadedState::from_written(written);
        self.pending.clear();
        if !self.config.allow_duplicates {
            self.membership = self.loaded.keys().collect();
        }

        tracing::info!(
            "Flushed {} entries to {} ({:?}, dropped {} existing, {} pending)",
            summary.written,
            self.path.display(),
            summary.mode,
            summary.dropped_existing,
            summary.dropped_pending
        );

        if let Some(events) = &self.events {
            events.publish(&Event::Flushed(summary));
        }

        Ok(summary)
    }

    /// Run a file write, mapping any I/O failure to a flush error
    fn write<F>(&self, op: F) -> Result<()>
    where
        F: FnOnce(&Path, &LoadedState, &[String]) -> std::io::Result<()>,
    {
        let result = fs::create_dir_all(&self.config.dir)
            .and_then(|()| op(&self.path, &self.loaded, &self.pending));

        result.map_err(|source| {
            tracing::error!("Flush of {} failed: {}", self.path.display(), source);
            HistoryError::Flush {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// CRC32 of the backing file, `None` if it has not been written yet
    pub fn checksum(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        checksum::crc32_hex(&self.path).map(Some)
    }

    // =========================================================================
    // Accessors (for testing and introspection)
    // =========================================================================

    /// File name of the log
    pub fn name(&self) -> &str {
        &self.config.file_name
    }

    /// Full path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entries on disk as of open (or the last successful flush), oldest first
    pub fn existing(&self) -> &[String] {
        self.loaded.lines()
    }

    /// Entries queued since, oldest first
    pub fn pending(&self) -> &[String] {
        &self.pending
    }

    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    pub fn allow_duplicates(&self) -> bool {
        self.config.allow_duplicates
    }

    /// Loaded plus pending entries
    pub fn len(&self) -> usize {
        self.loaded.len() + self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }
}

impl fmt::Debug for LogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogStore")
            .field("path", &self.path)
            .field("capacity", &self.config.capacity)
            .field("allow_duplicates", &self.config.allow_duplicates)
            .field("existing", &self.loaded.len())
            .field("pending", &self.pending.len())
            .finish()
    }
}
