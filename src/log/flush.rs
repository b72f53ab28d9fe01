//! Flush planning and file writes
//!
//! Decides how pending entries reach the backing file, then performs the
//! append or the rewrite.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Line terminator written after every entry
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";

/// Line terminator written after every entry
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// What a flush will do to the backing file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushPlan {
    /// Nothing pending, file untouched
    Skip,

    /// Everything fits: append pending after the existing lines
    Append,

    /// Over capacity: rewrite the file from the surviving tails
    Rewrite {
        /// Leading existing entries dropped
        skip_existing: usize,
        /// Leading pending entries dropped
        skip_pending: usize,
    },
}

impl FlushPlan {
    /// Plan a flush of `pending` entries on top of `existing` ones
    ///
    /// Over capacity, existing history keeps a tail as long as the pending
    /// batch, and pending keeps its newest `capacity` entries. The result may
    /// hold fewer than `capacity` entries when existing history is long and
    /// the batch is short.
    pub fn compute(existing: usize, pending: usize, capacity: usize) -> Self {
        if pending == 0 {
            return FlushPlan::Skip;
        }
        if existing + pending <= capacity {
            return FlushPlan::Append;
        }
        FlushPlan::Rewrite {
            skip_existing: existing.saturating_sub(pending),
            skip_pending: pending.saturating_sub(capacity),
        }
    }
}

/// How a flush touched the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushMode {
    Skipped,
    Appended,
    Rewritten,
}

/// Outcome of a flush
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushSummary {
    pub mode: FlushMode,

    /// Pending entries written to the file
    pub written: usize,

    /// Existing entries evicted by a rewrite
    pub dropped_existing: usize,

    /// Pending entries discarded because the batch exceeded capacity
    pub dropped_pending: usize,
}

impl FlushSummary {
    pub(crate) fn skipped() -> Self {
        Self {
            mode: FlushMode::Skipped,
            written: 0,
            dropped_existing: 0,
            dropped_pending: 0,
        }
    }
}

// =============================================================================
// File Writes
// =============================================================================

/// Append `lines` to the end of the file, creating it if missing
///
/// With `close_last_line`, a terminator is written first to finish an
/// unterminated last line.
pub(crate) fn append_lines(path: &Path, lines: &[String], close_last_line: bool) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    if close_last_line {
        writer.write_all(LINE_ENDING.as_bytes())?;
    }
    write_lines(&mut writer, lines)?;

    finish(writer)
}

/// Replace the file with `head` followed by `tail`
///
/// Lines go to a sibling temp file which is synced and renamed over the
/// target, so a failure leaves the previous file in place.
pub(crate) fn rewrite_lines(path: &Path, head: &[String], tail: &[String]) -> io::Result<()> {
    let tmp_path = temp_path(path);

    let result = (|| {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)?;
        let mut writer = BufWriter::new(file);
        write_lines(&mut writer, head)?;
        write_lines(&mut writer, tail)?;
        finish(writer)?;
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(LINE_ENDING.as_bytes())?;
    }
    Ok(())
}

fn finish(writer: BufWriter<File>) -> io::Result<()> {
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// `<dir>/<name>.tmp` next to the target file
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
