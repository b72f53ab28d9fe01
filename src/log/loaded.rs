//! Loaded state
//!
//! Snapshot of the entries found in the backing file when a store is opened.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{HistoryError, Result};

use super::EntryKey;

/// Entries read from the backing file, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedState {
    /// One stored line per entry, in file order
    lines: Vec<String>,

    /// Whether the file ends with a line terminator (or is empty)
    ///
    /// An unterminated last line must be closed before appending, otherwise
    /// the first appended entry would be glued onto it.
    terminated: bool,
}

impl LoadedState {
    /// Read the backing file
    ///
    /// A missing file is an empty history. Any other read failure
    /// (permissions, not UTF-8, a directory in the way) is a load error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::empty()),
            Err(source) => {
                return Err(HistoryError::Load {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        // `str::lines` strips both "\n" and "\r\n"
        let lines = contents.lines().map(str::to_owned).collect();
        let terminated = contents.is_empty() || contents.ends_with('\n');

        Ok(Self { lines, terminated })
    }

    /// A history with no entries
    pub fn empty() -> Self {
        Self {
            lines: Vec::new(),
            terminated: true,
        }
    }

    /// State matching a file freshly written with `lines`
    pub(crate) fn from_written(lines: Vec<String>) -> Self {
        Self {
            lines,
            terminated: true,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Decoded keys in file order
    pub fn keys(&self) -> impl Iterator<Item = EntryKey> + '_ {
        self.lines.iter().map(|line| EntryKey::from_line(line))
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }
}

impl Default for LoadedState {
    fn default() -> Self {
        Self::empty()
    }
}
