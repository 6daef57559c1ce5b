//! Scanning and script-generation library for rpcs3-batcher.
//!
//! The CLI is a thin shell over [`process::process_root`], which walks
//! a folder of PS3 game installs, reads each game's PARAM.SFO, and
//! writes one Windows batch launcher per game. Pure parsing and name
//! cleanup live in `rpcs3-batcher-core`.

pub mod error;
pub mod process;
pub mod scanner;
pub mod script;
pub mod settings;

pub use error::{ProcessError, ScriptError};
pub use process::{ProcessEvent, ProcessOptions, RunSummary, SkipReason, process_root};
pub use scanner::{CandidateFolder, GameFolderKind, ScanOutcome, scan_game_folders};
pub use script::write_launch_script;

// Re-export the core types callers usually need alongside this crate.
pub use rpcs3_batcher_core::{SfoDocument, SfoError, parse_sfo, sanitize_file_name};
