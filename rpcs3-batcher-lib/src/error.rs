use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a whole `process_root` run.
///
/// Everything else (unreadable SFO, malformed metadata, a single
/// script that fails to write) is reported per folder through
/// [`ProcessEvent`](crate::ProcessEvent) and never stops the batch.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The games root does not exist or is not a directory
    #[error("games folder not found: {0}")]
    InvalidRoot(PathBuf),

    /// The emulator executable does not exist or is not a file
    #[error("emulator executable not found: {0}")]
    InvalidExecutable(PathBuf),

    /// I/O error while listing the games root
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A launcher script could not be written.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to write launch script {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The executable path has no parent directory to `cd` into
    #[error("cannot determine working directory for {0}")]
    NoWorkingDirectory(PathBuf),
}
