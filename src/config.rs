//! Configuration for a history log
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

use crate::error::{HistoryError, Result};

/// Default file name of the backing log file
pub const DEFAULT_LOG_NAME: &str = ".log.txt";

/// Default maximum number of entries kept on disk
pub const DEFAULT_CAPACITY: usize = 1000;

/// Characters that are not allowed in file names on common platforms
const INVALID_FILE_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '<', '>', '|'];

/// Configuration for a single history log file
#[derive(Debug, Clone)]
pub struct HistoryConfig {
    // -------------------------------------------------------------------------
    // Location
    // -------------------------------------------------------------------------
    /// Directory holding the log file
    pub dir: PathBuf,

    /// Name of the log file inside `dir`
    pub file_name: String,

    // -------------------------------------------------------------------------
    // Retention
    // -------------------------------------------------------------------------
    /// Max number of entries the file may hold after a flush
    pub capacity: usize,

    /// Whether the same entry (and modifier) may be recorded more than once
    pub allow_duplicates: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: DEFAULT_LOG_NAME.to_string(),
            capacity: DEFAULT_CAPACITY,
            allow_duplicates: false,
        }
    }
}

impl HistoryConfig {
    /// Create a new config builder
    pub fn builder() -> HistoryConfigBuilder {
        HistoryConfigBuilder::default()
    }

    /// Full path of the backing file (`dir` + `file_name`)
    pub fn log_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Reject configurations a store cannot be opened with
    pub fn validate(&self) -> Result<()> {
        if self.dir.as_os_str().is_empty() {
            return Err(HistoryError::Config("directory path is empty".to_string()));
        }
        if self.file_name.is_empty() {
            return Err(HistoryError::Config("file name is empty".to_string()));
        }
        if Path::new(&self.file_name).file_name().map(|n| n.len()) != Some(self.file_name.len()) {
            return Err(HistoryError::Config(format!(
                "file name must not contain a path: {:?}",
                self.file_name
            )));
        }
        if self.capacity < 1 {
            return Err(HistoryError::Config(
                "capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for HistoryConfig
#[derive(Default)]
pub struct HistoryConfigBuilder {
    config: HistoryConfig,
}

impl HistoryConfigBuilder {
    /// Set the directory holding the log file
    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dir = path.into();
        self
    }

    /// Set the log file name
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    /// Set the maximum number of retained entries
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.config.capacity = capacity;
        self
    }

    /// Allow or reject duplicate entries
    pub fn allow_duplicates(mut self, allow: bool) -> Self {
        self.config.allow_duplicates = allow;
        self
    }

    pub fn build(self) -> HistoryConfig {
        self.config
    }
}

/// Replace every run of characters invalid in file names with `replacement`
///
/// `a/b\\c` with `"_"` becomes `a_b_c`; `a//b` becomes `a_b`.
pub fn sanitize_file_name(text: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if INVALID_FILE_NAME_CHARS.contains(&c) {
            if !in_run {
                out.push_str(replacement);
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}
