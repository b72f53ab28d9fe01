//! Entry keys
//!
//! An entry and its optional modifier form a composite key. On disk the pair
//! is one line:
//!
//! ```text
//! plain key                     entry                      (stored as-is)
//! modifier, or ␟ in the entry   escape(entry) ␟ escape(modifier)
//!
//! escape:  \ -> \\    ␟ -> \s
//! ```
//!
//! A line without a raw separator is always a plain entry, and an encoded line
//! has exactly one raw separator, so every key has a distinct line.

use std::fmt;

/// Separates an entry from its modifier in a stored line (ASCII unit separator)
pub const MODIFIER_SEPARATOR: char = '\u{1F}';

/// Escape character inside encoded lines
pub const ESCAPE: char = '\\';

/// Follows `ESCAPE` in place of a separator that is part of the text
const ESCAPED_SEPARATOR: char = 's';

/// Composite lookup key of an entry and its modifier
///
/// Keeping the two parts apart means `("ab", "c")` and `("a", "bc")` are
/// different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey {
    entry: String,
    modifier: String,
}

impl EntryKey {
    /// Create a key from an entry and a modifier (may be empty)
    pub fn new(entry: impl Into<String>, modifier: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            modifier: modifier.into(),
        }
    }

    /// Create a key from an entry and any displayable modifier
    ///
    /// `EntryKey::with_modifier("song.mp3", 1700000000u64)`
    pub fn with_modifier(entry: impl Into<String>, modifier: impl fmt::Display) -> Self {
        Self::new(entry, modifier.to_string())
    }

    /// Key of a plain entry without modifier
    pub fn plain(entry: impl Into<String>) -> Self {
        Self::new(entry, String::new())
    }

    /// Decode a stored line
    ///
    /// Lines with no separator are plain entries and are taken verbatim.
    /// Otherwise the line splits at the first separator and both halves are
    /// unescaped. Unknown escapes are kept as written.
    pub fn from_line(line: &str) -> Self {
        match line.split_once(MODIFIER_SEPARATOR) {
            Some((entry, modifier)) => Self::new(unescape(entry), unescape(modifier)),
            None => Self::plain(line),
        }
    }

    /// Encode as a stored line (without line terminator)
    pub fn to_line(&self) -> String {
        if self.modifier.is_empty() && !self.entry.contains(MODIFIER_SEPARATOR) {
            return self.entry.clone();
        }

        let mut line = String::with_capacity(self.entry.len() + 1 + self.modifier.len());
        escape_into(&mut line, &self.entry);
        line.push(MODIFIER_SEPARATOR);
        escape_into(&mut line, &self.modifier);
        line
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn modifier(&self) -> &str {
        &self.modifier
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier.is_empty() {
            write!(f, "{}", self.entry)
        } else {
            write!(f, "{} [{}]", self.entry, self.modifier)
        }
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            ESCAPE => {
                out.push(ESCAPE);
                out.push(ESCAPE);
            }
            MODIFIER_SEPARATOR => {
                out.push(ESCAPE);
                out.push(ESCAPED_SEPARATOR);
            }
            c => out.push(c),
        }
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c != ESCAPE {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(ESCAPE) => out.push(ESCAPE),
            Some(ESCAPED_SEPARATOR) => out.push(MODIFIER_SEPARATOR),
            Some(other) => {
                out.push(ESCAPE);
                out.push(other);
            }
            None => out.push(ESCAPE),
        }
    }

    out
}
