use super::*;
use std::cell::RefCell;
use std::fs;
use std::path::Path;

use crate::scanner::{EBOOT_STUB, PARAM_SFO};

/// Minimal well-formed SFO with string entries.
fn make_sfo(entries: &[(&str, &str)]) -> Vec<u8> {
    const HEADER_SIZE: usize = 20;
    const ENTRY_SIZE: usize = 16;

    let mut key_table: Vec<u8> = Vec::new();
    let mut data_table: Vec<u8> = Vec::new();
    let mut entry_table: Vec<u8> = Vec::new();

    for (key, value) in entries {
        let key_offset = key_table.len() as u16;
        key_table.extend_from_slice(key.as_bytes());
        key_table.push(0);

        let data_offset = data_table.len() as u32;
        data_table.extend_from_slice(value.as_bytes());
        data_table.push(0);

        entry_table.extend_from_slice(&key_offset.to_le_bytes());
        entry_table.extend_from_slice(&0x0204u16.to_le_bytes());
        entry_table.extend_from_slice(&(value.len() as u32 + 1).to_le_bytes());
        entry_table.extend_from_slice(&(value.len() as u32 + 1).to_le_bytes());
        entry_table.extend_from_slice(&data_offset.to_le_bytes());
    }

    let key_table_start = (HEADER_SIZE + entries.len() * ENTRY_SIZE) as u32;
    let data_table_start = key_table_start + key_table.len() as u32;

    let mut buf = Vec::new();
    buf.extend_from_slice(&0x4653_5000u32.to_le_bytes());
    buf.extend_from_slice(&0x0101u32.to_le_bytes());
    buf.extend_from_slice(&key_table_start.to_le_bytes());
    buf.extend_from_slice(&data_table_start.to_le_bytes());
    buf.extend_from_slice(&(entries.len() as u32).to_le_bytes());
    buf.extend_from_slice(&entry_table);
    buf.extend_from_slice(&key_table);
    buf.extend_from_slice(&data_table);
    buf
}

fn make_hdd_game(root: &Path, folder: &str, sfo: &[u8]) {
    let usrdir = root.join(folder).join("USRDIR");
    fs::create_dir_all(&usrdir).unwrap();
    fs::write(usrdir.join(EBOOT_STUB), b"stub").unwrap();
    fs::write(root.join(folder).join(PARAM_SFO), sfo).unwrap();
}

fn make_exe(dir: &Path) -> std::path::PathBuf {
    let exe = dir.join("rpcs3.exe");
    fs::write(&exe, b"exe").unwrap();
    exe
}

/// Run `process_root` collecting events as rendered log lines.
fn run(
    exe: &Path,
    root: &Path,
    kind: GameFolderKind,
    options: &ProcessOptions,
) -> (RunSummary, Vec<String>) {
    let lines: RefCell<Vec<String>> = RefCell::new(Vec::new());
    let summary = process_root(exe, root, kind, options, &|event| {
        lines.borrow_mut().push(event.to_string());
    })
    .unwrap();
    (summary, lines.into_inner())
}

#[test]
fn test_single_hdd_game_creates_script() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    make_hdd_game(
        dir.path(),
        "NPUB30024",
        &make_sfo(&[("TITLE", "Test Game"), ("TITLE_ID", "NPUB30024")]),
    );

    let (summary, lines) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());

    assert_eq!(summary.folders_scanned, 1);
    assert_eq!(summary.files_created, 1);
    assert_eq!(summary.failures, 0);

    let script = dir.path().join("Test Game.bat");
    assert!(script.is_file());
    let body = fs::read_to_string(&script).unwrap();
    let eboot = dir.path().join("NPUB30024").join("USRDIR").join(EBOOT_STUB);
    assert!(body.contains("--no-gui"));
    assert!(body.contains(&format!("\"{}\"", eboot.display())));

    assert!(lines.iter().any(|l| l.contains("Batch file created")));
}

#[test]
fn test_title_id_fallback_when_no_title() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    make_hdd_game(dir.path(), "folder", &make_sfo(&[("TITLE_ID", "blus30443")]));

    let (summary, _) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());
    assert_eq!(summary.files_created, 1);
    // TITLE_ID is uppercased, then letter/digit spacing applies.
    assert!(dir.path().join("BLUS 30443.bat").is_file());
}

#[test]
fn test_folder_name_fallback_when_no_metadata_keys() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    make_hdd_game(dir.path(), "mystery game", &make_sfo(&[("VERSION", "01.00")]));

    let (summary, _) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());
    assert_eq!(summary.files_created, 1);
    assert!(dir.path().join("Mystery Game.bat").is_file());
}

#[test]
fn test_missing_stub_yields_skip_line_and_no_script() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    let game = dir.path().join("HalfInstalled");
    fs::create_dir_all(&game).unwrap();
    fs::write(game.join(PARAM_SFO), make_sfo(&[("TITLE", "x")])).unwrap();

    let (summary, lines) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());
    assert_eq!(summary.folders_scanned, 1);
    assert_eq!(summary.files_created, 0);
    assert_eq!(summary.failures, 1);
    let skips: Vec<&String> = lines.iter().filter(|l| l.contains("skipping")).collect();
    assert_eq!(skips.len(), 1);
    assert!(skips[0].contains("No EBOOT.BIN in HalfInstalled"));
}

#[test]
fn test_empty_folder_counted_but_silent() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    fs::create_dir_all(dir.path().join("random-stuff")).unwrap();

    let (summary, lines) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());
    assert_eq!(summary.folders_scanned, 1);
    assert_eq!(summary.files_created, 0);
    assert_eq!(summary.failures, 0);
    assert!(!lines.iter().any(|l| l.contains("skipping")));
}

#[test]
fn test_corrupt_sfo_skips_folder_not_run() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    make_hdd_game(dir.path(), "broken", b"not an sfo at all");
    make_hdd_game(dir.path(), "working", &make_sfo(&[("TITLE", "Good Game")]));

    let (summary, lines) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());
    assert_eq!(summary.folders_scanned, 2);
    assert_eq!(summary.files_created, 1);
    assert_eq!(summary.failures, 1);
    assert!(dir.path().join("Good Game.bat").is_file());
    assert!(lines.iter().any(|l| l.contains("Invalid PARAM.SFO for broken")));
}

#[test]
fn test_duplicate_sanitized_names_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    // Both titles sanitize to "Same Game"; lexicographic folder order
    // means "b" is processed second and wins.
    make_hdd_game(dir.path(), "a", &make_sfo(&[("TITLE", "same game")]));
    make_hdd_game(dir.path(), "b", &make_sfo(&[("TITLE", "Same Game")]));

    let (summary, _) = run(&exe, dir.path(), GameFolderKind::HddGame, &Default::default());
    assert_eq!(summary.files_created, 2);

    let body = fs::read_to_string(dir.path().join("Same Game.bat")).unwrap();
    let winner = dir.path().join("b").join("USRDIR").join(EBOOT_STUB);
    assert!(body.contains(&format!("\"{}\"", winner.display())));
}

#[test]
fn test_output_dir_override() {
    let dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    make_hdd_game(dir.path(), "g", &make_sfo(&[("TITLE", "Elsewhere")]));

    let options = ProcessOptions {
        output_dir: Some(out.path().to_path_buf()),
        dry_run: false,
    };
    let (summary, _) = run(&exe, dir.path(), GameFolderKind::HddGame, &options);
    assert_eq!(summary.files_created, 1);
    assert!(out.path().join("Elsewhere.bat").is_file());
    assert!(!dir.path().join("Elsewhere.bat").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());
    make_hdd_game(dir.path(), "g", &make_sfo(&[("TITLE", "Phantom")]));

    let options = ProcessOptions {
        dry_run: true,
        ..Default::default()
    };
    let (summary, lines) = run(&exe, dir.path(), GameFolderKind::HddGame, &options);
    assert_eq!(summary.files_created, 1);
    assert!(!dir.path().join("Phantom.bat").exists());
    assert!(lines.iter().any(|l| l.starts_with("Would create:")));
}

#[test]
fn test_invalid_executable_aborts_before_scanning() {
    let dir = tempfile::tempdir().unwrap();
    make_hdd_game(dir.path(), "g", &make_sfo(&[("TITLE", "x")]));

    let result = process_root(
        Path::new("/no/such/rpcs3.exe"),
        dir.path(),
        GameFolderKind::HddGame,
        &Default::default(),
        &|_| {},
    );
    assert!(matches!(result, Err(ProcessError::InvalidExecutable(_))));
}

#[test]
fn test_invalid_root_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let exe = make_exe(dir.path());

    let result = process_root(
        &exe,
        &dir.path().join("missing"),
        GameFolderKind::HddGame,
        &Default::default(),
        &|_| {},
    );
    assert!(matches!(result, Err(ProcessError::InvalidRoot(_))));
}
