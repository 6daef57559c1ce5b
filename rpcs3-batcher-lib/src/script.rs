//! Launcher-script generator.
//!
//! Emits a two-line Windows batch file per game: switch to the
//! emulator's directory, then start it headless with the game's
//! EBOOT.BIN as the only argument. Existing files at the target path
//! are overwritten — duplicate display names are the caller's problem
//! to resolve (or accept).

use std::path::{Path, PathBuf};

use crate::error::ScriptError;

/// File extension of generated launchers. Fixed by design; frontends
/// that import these expect `.bat`.
pub const SCRIPT_EXTENSION: &str = "bat";

/// Render the script body for a launcher.
///
/// Exactly two lines, both paths quoted:
///
/// ```text
/// cd /d "<emulator dir>"
/// start "" "<emulator>" --no-gui "<eboot>"
/// ```
pub fn render_script(executable: &Path, payload: &Path) -> Result<String, ScriptError> {
    let working_dir = executable
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or_else(|| ScriptError::NoWorkingDirectory(executable.to_path_buf()))?;

    Ok(format!(
        "cd /d \"{}\"\r\nstart \"\" \"{}\" --no-gui \"{}\"\r\n",
        working_dir.display(),
        executable.display(),
        payload.display(),
    ))
}

/// Write the launcher script `<output_dir>/<base_name>.bat`.
///
/// Overwrites any existing file at that path and returns the path
/// written. Fails with the target path and the underlying I/O cause;
/// no retries.
pub fn write_launch_script(
    executable: &Path,
    payload: &Path,
    output_dir: &Path,
    base_name: &str,
) -> Result<PathBuf, ScriptError> {
    let path = output_dir.join(format!("{base_name}.{SCRIPT_EXTENSION}"));
    let body = render_script(executable, payload)?;

    std::fs::write(&path, body).map_err(|source| ScriptError::WriteFailed {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
