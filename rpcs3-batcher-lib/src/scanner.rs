//! Game-folder scanner.
//!
//! Classifies the immediate subdirectories of a root folder against the
//! two PS3 install layouts:
//!
//! - disc rips:      `<game>/PS3_GAME/USRDIR/EBOOT.BIN` + `<game>/PS3_GAME/PARAM.SFO`
//! - installed games: `<game>/USRDIR/EBOOT.BIN` + `<game>/PARAM.SFO`
//!
//! Presence of both files is the sole admission test; the stub's
//! contents are never inspected. Listings are sorted so results are
//! deterministic across filesystems.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

/// Fixed name of the executable stub that marks a launchable install.
pub const EBOOT_STUB: &str = "EBOOT.BIN";
/// Fixed name of the metadata file next to it.
pub const PARAM_SFO: &str = "PARAM.SFO";

/// The two supported folder layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameFolderKind {
    /// Optical-disc rip: game files under `PS3_GAME/`.
    DiscGame,
    /// Installed-to-storage title (dev_hdd0/game): game files at the top level.
    HddGame,
}

impl GameFolderKind {
    /// Path of the executable stub inside a candidate folder.
    pub fn eboot_path(self, folder: &Path) -> PathBuf {
        match self {
            GameFolderKind::DiscGame => folder.join("PS3_GAME").join("USRDIR").join(EBOOT_STUB),
            GameFolderKind::HddGame => folder.join("USRDIR").join(EBOOT_STUB),
        }
    }

    /// Path of the metadata file inside a candidate folder.
    pub fn sfo_path(self, folder: &Path) -> PathBuf {
        match self {
            GameFolderKind::DiscGame => folder.join("PS3_GAME").join(PARAM_SFO),
            GameFolderKind::HddGame => folder.join(PARAM_SFO),
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GameFolderKind::DiscGame => "disc",
            GameFolderKind::HddGame => "hdd",
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown folder layout '{0}' (expected 'disc' or 'hdd')")]
pub struct GameFolderKindParseError(String);

impl FromStr for GameFolderKind {
    type Err = GameFolderKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disc" | "discgame" => Ok(GameFolderKind::DiscGame),
            "hdd" | "hddgame" | "installed" => Ok(GameFolderKind::HddGame),
            other => Err(GameFolderKindParseError(other.to_string())),
        }
    }
}

/// A subdirectory that passed the layout check, with both required
/// paths already resolved.
#[derive(Debug, Clone)]
pub struct CandidateFolder {
    pub folder: PathBuf,
    pub kind: GameFolderKind,
    pub eboot_path: PathBuf,
    pub sfo_path: PathBuf,
}

impl CandidateFolder {
    /// The folder's own name, used as the last-resort display name.
    pub fn folder_name(&self) -> &str {
        self.folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?")
    }
}

/// The result of scanning one root folder.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Every immediate subdirectory examined, accepted or not.
    pub folders_scanned: usize,
    /// Subdirectories with both required files, sorted by path.
    pub candidates: Vec<CandidateFolder>,
    /// Subdirectories that look half-installed: metadata present but
    /// no executable stub. These get a skip log line; folders with
    /// neither file are silently excluded.
    pub missing_stub: Vec<String>,
}

/// Scan the immediate subdirectories of `root` for game folders of the
/// given layout.
///
/// Each call re-lists the directory; nothing is cached. Only listing
/// the root itself can fail — unreadable or missing files inside a
/// subdirectory simply disqualify that subdirectory.
pub fn scan_game_folders(root: &Path, kind: GameFolderKind) -> std::io::Result<ScanOutcome> {
    let mut subdirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    subdirs.sort();

    let mut outcome = ScanOutcome {
        folders_scanned: subdirs.len(),
        ..Default::default()
    };

    for folder in subdirs {
        let eboot_path = kind.eboot_path(&folder);
        let sfo_path = kind.sfo_path(&folder);

        match (eboot_path.is_file(), sfo_path.is_file()) {
            (true, true) => outcome.candidates.push(CandidateFolder {
                folder,
                kind,
                eboot_path,
                sfo_path,
            }),
            (false, true) => {
                let name = folder
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("?")
                    .to_string();
                log::debug!("{name}: {PARAM_SFO} present but no {EBOOT_STUB}");
                outcome.missing_stub.push(name);
            }
            // Not a game folder for this layout at all.
            _ => {}
        }
    }

    Ok(outcome)
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
