use thiserror::Error;

/// Errors that can occur while parsing a PARAM.SFO buffer.
///
/// Both variants are fatal to the parse as a whole. Entries with
/// out-of-range offsets are not errors — they are skipped individually
/// and counted on [`SfoDocument`](crate::SfoDocument).
#[derive(Debug, Error)]
pub enum SfoError {
    /// The buffer does not start with the PSF magic number
    #[error("not an SFO file: bad magic {found:#010x}")]
    BadMagic { found: u32 },

    /// The buffer is too small to contain an SFO header
    #[error("SFO buffer truncated: expected at least {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
}
