//! Scan-and-generate orchestrator.
//!
//! Walks one root folder, parses each accepted game's PARAM.SFO,
//! derives a display name (TITLE, else TITLE_ID, else the folder
//! name), and writes a launcher script per game. Per-folder failures
//! are isolated: one bad folder never aborts its siblings. Every
//! non-fatal problem is surfaced through exactly one [`ProcessEvent`].

use std::fmt;
use std::path::{Path, PathBuf};

use rpcs3_batcher_core::{parse_sfo, sanitize_file_name};

use crate::error::ProcessError;
use crate::scanner::{GameFolderKind, scan_game_folders};
use crate::script::write_launch_script;

/// Options controlling a `process_root` run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Where to write the scripts. Defaults to the scanned root; the
    /// HDD pass of the original workflow writes into the disc folder.
    pub output_dir: Option<PathBuf>,
    /// Report what would be written without touching the filesystem.
    pub dry_run: bool,
}

/// Why a folder produced no script.
#[derive(Debug, Clone)]
pub enum SkipReason {
    /// PARAM.SFO present but no executable stub.
    MissingStub,
    /// Metadata file exists but could not be read.
    UnreadableMetadata(String),
    /// Metadata file read but did not parse.
    InvalidMetadata(String),
    /// The script write itself failed.
    WriteFailed(String),
}

/// Progress events, one per log-worthy occurrence. `Display` renders
/// each as a single human-readable log line, so callers that only
/// want a stream of strings can format and forget.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    ScanStarted {
        root: PathBuf,
        kind: GameFolderKind,
    },
    ScriptCreated {
        path: PathBuf,
    },
    /// Dry-run stand-in for `ScriptCreated`.
    WouldCreate {
        path: PathBuf,
    },
    FolderSkipped {
        folder: String,
        reason: SkipReason,
    },
    /// The SFO parsed, but some entries pointed outside the buffer.
    MetadataEntriesDropped {
        folder: String,
        count: usize,
    },
}

impl fmt::Display for ProcessEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessEvent::ScanStarted { root, kind } => {
                write!(
                    f,
                    "Scanning {} for {} games",
                    root.display(),
                    kind.display_name()
                )
            }
            ProcessEvent::ScriptCreated { path } => {
                write!(f, "Batch file created: {}", path.display())
            }
            ProcessEvent::WouldCreate { path } => {
                write!(f, "Would create: {}", path.display())
            }
            ProcessEvent::FolderSkipped { folder, reason } => match reason {
                SkipReason::MissingStub => {
                    write!(f, "No EBOOT.BIN in {folder}, skipping")
                }
                SkipReason::UnreadableMetadata(e) => {
                    write!(f, "Could not read PARAM.SFO for {folder}, skipping ({e})")
                }
                SkipReason::InvalidMetadata(e) => {
                    write!(f, "Invalid PARAM.SFO for {folder}, skipping ({e})")
                }
                SkipReason::WriteFailed(e) => {
                    write!(f, "Failed to create batch file for {folder}: {e}")
                }
            },
            ProcessEvent::MetadataEntriesDropped { folder, count } => {
                write!(f, "{folder}: {count} malformed PARAM.SFO entries ignored")
            }
        }
    }
}

/// Tally of a completed run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    /// Immediate subdirectories examined, accepted or not.
    pub folders_scanned: usize,
    /// Launcher scripts written (or, in a dry run, that would be).
    pub files_created: usize,
    /// Folders skipped for a reportable reason plus failed writes.
    pub failures: usize,
}

/// Scan `root` for game folders of the given layout and write one
/// launcher script per game.
///
/// Precondition failures (`executable` not a file, `root` not a
/// directory) abort before any scanning. Everything after that is
/// per-folder: failures are reported through `progress` and counted,
/// never propagated.
///
/// Two games whose titles sanitize to the same name write to the same
/// path; the later one wins. This mirrors the original tool and is
/// deliberate.
pub fn process_root(
    executable: &Path,
    root: &Path,
    kind: GameFolderKind,
    options: &ProcessOptions,
    progress: &dyn Fn(ProcessEvent),
) -> Result<RunSummary, ProcessError> {
    if !executable.is_file() {
        return Err(ProcessError::InvalidExecutable(executable.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ProcessError::InvalidRoot(root.to_path_buf()));
    }

    let output_dir = options.output_dir.as_deref().unwrap_or(root);

    progress(ProcessEvent::ScanStarted {
        root: root.to_path_buf(),
        kind,
    });

    let outcome = scan_game_folders(root, kind)?;
    let mut summary = RunSummary {
        folders_scanned: outcome.folders_scanned,
        ..Default::default()
    };

    for folder in outcome.missing_stub {
        summary.failures += 1;
        progress(ProcessEvent::FolderSkipped {
            folder,
            reason: SkipReason::MissingStub,
        });
    }

    for candidate in &outcome.candidates {
        let folder = candidate.folder_name().to_string();

        let bytes = match std::fs::read(&candidate.sfo_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("{}: unreadable PARAM.SFO: {e}", candidate.sfo_path.display());
                summary.failures += 1;
                progress(ProcessEvent::FolderSkipped {
                    folder,
                    reason: SkipReason::UnreadableMetadata(e.to_string()),
                });
                continue;
            }
        };

        let doc = match parse_sfo(&bytes) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("{}: {e}", candidate.sfo_path.display());
                summary.failures += 1;
                progress(ProcessEvent::FolderSkipped {
                    folder,
                    reason: SkipReason::InvalidMetadata(e.to_string()),
                });
                continue;
            }
        };

        if doc.skipped_entries() > 0 {
            progress(ProcessEvent::MetadataEntriesDropped {
                folder: folder.clone(),
                count: doc.skipped_entries(),
            });
        }

        let base_name = sanitize_file_name(&display_name(&doc, &folder));

        if options.dry_run {
            summary.files_created += 1;
            progress(ProcessEvent::WouldCreate {
                path: output_dir.join(format!("{base_name}.bat")),
            });
            continue;
        }

        match write_launch_script(executable, &candidate.eboot_path, output_dir, &base_name) {
            Ok(path) => {
                summary.files_created += 1;
                progress(ProcessEvent::ScriptCreated { path });
            }
            Err(e) => {
                log::warn!("{folder}: {e}");
                summary.failures += 1;
                progress(ProcessEvent::FolderSkipped {
                    folder,
                    reason: SkipReason::WriteFailed(e.to_string()),
                });
            }
        }
    }

    Ok(summary)
}

/// TITLE, else TITLE_ID (uppercased, as title IDs conventionally are),
/// else the folder's own name.
fn display_name(doc: &rpcs3_batcher_core::SfoDocument, folder_name: &str) -> String {
    if let Some(title) = doc.get("TITLE").filter(|t| !t.is_empty()) {
        return title.to_string();
    }
    if let Some(id) = doc.get("TITLE_ID").filter(|id| !id.is_empty()) {
        return id.to_uppercase();
    }
    folder_name.to_string()
}

#[cfg(test)]
#[path = "tests/process_tests.rs"]
mod tests;
