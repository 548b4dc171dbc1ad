//! Input location collection.
//!
//! Locations arrive either as a single space-separated `--in` argument or as
//! newline-delimited records on standard input. Order is preserved and
//! duplicates are not filtered; the engine sees exactly what the caller gave.

use std::io::BufRead;

use crate::error::{Error, Result};

/// Split an inline location argument on single spaces.
///
/// Empty fields are preserved (`"a  b"` → `["a", "", "b"]`), matching a
/// plain single-character split with no trimming.
pub fn split_inline(arg: &str) -> Vec<String> {
    arg.split(' ').map(str::to_string).collect()
}

/// Read newline-delimited location records until end-of-stream.
///
/// Exactly one trailing `\n` is stripped from each record; empty records are
/// kept. A final record with no terminating delimiter is discarded. An empty
/// stream yields an empty list. Any read error other than clean end-of-stream
/// is fatal.
pub fn read_locations<R: BufRead>(mut reader: R) -> Result<Vec<String>> {
    let mut locations = Vec::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf).map_err(Error::Input)?;
        if n == 0 {
            break;
        }
        if buf.last() != Some(&b'\n') {
            // End-of-stream mid-record: the unterminated tail is dropped.
            break;
        }
        buf.pop();
        locations.push(String::from_utf8_lossy(&buf).into_owned());
    }
    Ok(locations)
}
