//! Core logic for rpcs3-batcher: SFO metadata parsing and filename
//! sanitization.
//!
//! Everything in this crate is pure — no filesystem access, no global
//! state. The scanning and script-writing layers live in
//! `rpcs3-batcher-lib`.

pub mod error;
pub mod sanitize;
pub mod sfo;

pub use error::SfoError;
pub use sanitize::sanitize_file_name;
pub use sfo::{SfoDocument, parse_sfo};
