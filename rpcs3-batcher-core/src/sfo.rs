//! PARAM.SFO (PSF) metadata parser.
//!
//! Supports:
//! - UTF-8 string values (formats 0x0004 and 0x0204)
//! - u32 integer values (format 0x0404), rendered as decimal strings
//!
//! The format is a small key/value container: a 20-byte header, a table
//! of 16-byte entries, a key table of NUL-terminated names, and a data
//! table holding the values. All multi-byte fields are little-endian.
//!
//! Parsing is deliberately tolerant: a malformed entry is skipped, not
//! fatal. Only a missing header (short buffer, wrong magic) fails the
//! whole parse. Every read is bounds-checked before indexing.

use serde::{Deserialize, Serialize};

use crate::error::SfoError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// `"\0PSF"` read as a little-endian u32.
pub const SFO_MAGIC: u32 = 0x4653_5000;

const HEADER_SIZE: usize = 20;
const ENTRY_SIZE: usize = 16;

/// Data format: UTF-8 string, not necessarily NUL-terminated.
const FMT_UTF8_SPECIAL: u16 = 0x0004;
/// Data format: NUL-terminated UTF-8 string.
const FMT_UTF8: u16 = 0x0204;
/// Data format: little-endian u32.
const FMT_U32: u16 = 0x0404;

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// The decoded contents of a PARAM.SFO file.
///
/// Keys keep the order they appear in the entry table. Duplicate keys
/// follow a first-wins policy: later occurrences are silently dropped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SfoDocument {
    entries: Vec<(String, String)>,
    skipped_entries: usize,
}

impl SfoDocument {
    /// Look up a value by key (exact match, keys are uppercase ASCII
    /// identifiers like `TITLE` or `TITLE_ID`).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over key/value pairs in entry-table order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries that were dropped because their offsets or
    /// lengths fell outside the buffer. Useful for diagnostics; a
    /// nonzero count does not make the document invalid.
    pub fn skipped_entries(&self) -> usize {
        self.skipped_entries
    }

    /// First-wins insert. Duplicate keys are dropped, never overwritten.
    fn insert_if_absent(&mut self, key: String, value: String) {
        if !self.entries.iter().any(|(k, _)| *k == key) {
            self.entries.push((key, value));
        }
    }
}

// ---------------------------------------------------------------------------
// Bounds-checked little-endian reads
// ---------------------------------------------------------------------------

fn read_u16_le(buf: &[u8], offset: usize) -> Option<u16> {
    let bytes = buf.get(offset..offset.checked_add(2)?)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

fn read_u32_le(buf: &[u8], offset: usize) -> Option<u32> {
    let bytes = buf.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Read a NUL-terminated UTF-8 string starting at `offset`.
/// Runs to the end of the buffer if no NUL is found.
fn read_nul_terminated(buf: &[u8], offset: usize) -> Option<String> {
    let tail = buf.get(offset..)?;
    let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    Some(String::from_utf8_lossy(&tail[..end]).into_owned())
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Parse an SFO byte buffer into a key/value document.
///
/// Fails only when the header itself is unusable (buffer shorter than
/// 20 bytes, or wrong magic). Individual entries that point outside the
/// buffer are skipped and counted in
/// [`SfoDocument::skipped_entries`].
pub fn parse_sfo(buf: &[u8]) -> Result<SfoDocument, SfoError> {
    if buf.len() < HEADER_SIZE {
        return Err(SfoError::Truncated {
            expected: HEADER_SIZE,
            actual: buf.len(),
        });
    }

    // The header reads below cannot fail after the length check.
    let magic = read_u32_le(buf, 0).unwrap_or(0);
    if magic != SFO_MAGIC {
        return Err(SfoError::BadMagic { found: magic });
    }

    let key_table_start = read_u32_le(buf, 8).unwrap_or(0) as usize;
    let data_table_start = read_u32_le(buf, 12).unwrap_or(0) as usize;
    let entry_count = read_u32_le(buf, 16).unwrap_or(0) as usize;

    let mut doc = SfoDocument::default();

    for i in 0..entry_count {
        let entry_offset = HEADER_SIZE + i * ENTRY_SIZE;
        let Some(entry) = decode_entry(buf, entry_offset, key_table_start, data_table_start) else {
            doc.skipped_entries += 1;
            continue;
        };
        let (key, value) = entry;
        doc.insert_if_absent(key, value);
    }

    Ok(doc)
}

/// Decode one 16-byte entry. Returns `None` when any offset or length
/// falls outside the buffer, or the key is empty.
fn decode_entry(
    buf: &[u8],
    entry_offset: usize,
    key_table_start: usize,
    data_table_start: usize,
) -> Option<(String, String)> {
    let key_offset = read_u16_le(buf, entry_offset)? as usize;
    let data_format = read_u16_le(buf, entry_offset + 2)?;
    let data_length = read_u32_le(buf, entry_offset + 4)? as usize;
    let data_offset = read_u32_le(buf, entry_offset + 12)? as usize;

    let key = read_nul_terminated(buf, key_table_start.checked_add(key_offset)?)?;
    if key.is_empty() {
        return None;
    }

    let value_start = data_table_start.checked_add(data_offset)?;
    let value = match data_format {
        FMT_UTF8_SPECIAL | FMT_UTF8 => read_string_value(buf, value_start, data_length)?,
        FMT_U32 => read_u32_le(buf, value_start)?.to_string(),
        // Unknown format: keep the key with an empty value so the
        // first-wins policy still sees it.
        _ => String::new(),
    };

    Some((key, value))
}

/// Read a string value: length is the smaller of the declared data
/// length and the distance to the next NUL, clamped to the buffer.
/// Trailing NULs are trimmed.
fn read_string_value(buf: &[u8], offset: usize, data_length: usize) -> Option<String> {
    let tail = buf.get(offset..)?;
    let nul_distance = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
    let len = data_length.min(nul_distance).min(tail.len());
    let s = String::from_utf8_lossy(&tail[..len]);
    Some(s.trim_end_matches('\0').to_string())
}

#[cfg(test)]
#[path = "tests/sfo_tests.rs"]
mod tests;
