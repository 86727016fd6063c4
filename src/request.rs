//! The code and number range a run generates labels for.
//!
//! Raw answers are corrected rather than rejected: a blank code becomes
//! `HP`, a bound is read from its leading integer (`"3.7"` is 3) and falls
//! back to the default when there is none, and an inverted range is swapped.

use std::io::{self, BufRead, Write};

pub const DEFAULT_CODE: &str = "HP";
pub const DEFAULT_START: i64 = 1;
pub const DEFAULT_END: i64 = 20;

/// A validated label range. `start <= end` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub code: String,
    pub start: i64,
    pub end: i64,
}

impl Default for RunRequest {
    fn default() -> Self {
        Self {
            code: DEFAULT_CODE.to_string(),
            start: DEFAULT_START,
            end: DEFAULT_END,
        }
    }
}

impl RunRequest {
    /// Build a request from raw user input. `None` means the value was not
    /// given at all.
    pub fn resolve(code: Option<&str>, start: Option<&str>, end: Option<&str>) -> Self {
        let code = match code.map(str::trim) {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CODE.to_string(),
        };
        let start = parse_bound(start, DEFAULT_START);
        let end = parse_bound(end, DEFAULT_END);
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        Self { code, start, end }
    }

    /// `"<code>-<n>"` for every number in the range, ascending.
    pub fn labels(&self) -> impl Iterator<Item = String> + '_ {
        (self.start..=self.end).map(move |n| format!("{}-{}", self.code, n))
    }

    /// Number of labels, saturating at `usize::MAX` for ranges wider than
    /// the address space.
    pub fn count(&self) -> usize {
        let span = i128::from(self.end) - i128::from(self.start) + 1;
        usize::try_from(span).unwrap_or(usize::MAX)
    }
}

/// Read an optional sign and the digits that follow it, ignoring anything
/// after them. No digits, or a value outside `i64`, gives `default`.
fn parse_bound(raw: Option<&str>, default: i64) -> i64 {
    let Some(s) = raw.map(str::trim_start) else {
        return default;
    };
    let unsigned = s.strip_prefix(['+', '-']).unwrap_or(s);
    let digits = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    if digits == 0 {
        return default;
    }
    let sign_len = s.len() - unsigned.len();
    s[..sign_len + digits].parse().unwrap_or(default)
}

/// Print `question` and read one line of answer, without the line ending.
pub fn ask<R: BufRead, W: Write>(reader: &mut R, writer: &mut W, question: &str) -> io::Result<String> {
    write!(writer, "{question}")?;
    writer.flush()?;
    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
