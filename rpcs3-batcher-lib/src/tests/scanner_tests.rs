use super::*;
use std::fs;
use std::path::Path;

fn make_disc_game(root: &Path, name: &str) {
    let usrdir = root.join(name).join("PS3_GAME").join("USRDIR");
    fs::create_dir_all(&usrdir).unwrap();
    fs::write(usrdir.join(EBOOT_STUB), b"stub").unwrap();
    fs::write(root.join(name).join("PS3_GAME").join(PARAM_SFO), b"sfo").unwrap();
}

fn make_hdd_game(root: &Path, name: &str) {
    let usrdir = root.join(name).join("USRDIR");
    fs::create_dir_all(&usrdir).unwrap();
    fs::write(usrdir.join(EBOOT_STUB), b"stub").unwrap();
    fs::write(root.join(name).join(PARAM_SFO), b"sfo").unwrap();
}

#[test]
fn test_disc_layout_accepted() {
    let dir = tempfile::tempdir().unwrap();
    make_disc_game(dir.path(), "Demon's Souls");

    let outcome = scan_game_folders(dir.path(), GameFolderKind::DiscGame).unwrap();
    assert_eq!(outcome.folders_scanned, 1);
    assert_eq!(outcome.candidates.len(), 1);

    let c = &outcome.candidates[0];
    assert_eq!(c.folder_name(), "Demon's Souls");
    assert!(c.eboot_path.ends_with("PS3_GAME/USRDIR/EBOOT.BIN"));
    assert!(c.sfo_path.ends_with("PS3_GAME/PARAM.SFO"));
}

#[test]
fn test_hdd_layout_accepted() {
    let dir = tempfile::tempdir().unwrap();
    make_hdd_game(dir.path(), "NPUB30024");

    let outcome = scan_game_folders(dir.path(), GameFolderKind::HddGame).unwrap();
    assert_eq!(outcome.candidates.len(), 1);
    assert!(outcome.candidates[0].eboot_path.ends_with("USRDIR/EBOOT.BIN"));
}

#[test]
fn test_layouts_do_not_cross_match() {
    let dir = tempfile::tempdir().unwrap();
    make_disc_game(dir.path(), "DiscTitle");

    let outcome = scan_game_folders(dir.path(), GameFolderKind::HddGame).unwrap();
    assert_eq!(outcome.folders_scanned, 1);
    assert!(outcome.candidates.is_empty());
    // A disc rip has no top-level PARAM.SFO, so the HDD scan treats it
    // as a plain non-game folder, not a broken one.
    assert!(outcome.missing_stub.is_empty());
}

#[test]
fn test_missing_stub_reported() {
    let dir = tempfile::tempdir().unwrap();
    let game = dir.path().join("HalfInstalled").join("PS3_GAME");
    fs::create_dir_all(&game).unwrap();
    fs::write(game.join(PARAM_SFO), b"sfo").unwrap();

    let outcome = scan_game_folders(dir.path(), GameFolderKind::DiscGame).unwrap();
    assert!(outcome.candidates.is_empty());
    assert_eq!(outcome.missing_stub, ["HalfInstalled"]);
}

#[test]
fn test_unrelated_folders_silently_excluded() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("screenshots")).unwrap();
    fs::write(dir.path().join("notes.txt"), b"x").unwrap();

    let outcome = scan_game_folders(dir.path(), GameFolderKind::DiscGame).unwrap();
    // Plain files are not subdirectories and are not counted.
    assert_eq!(outcome.folders_scanned, 1);
    assert!(outcome.candidates.is_empty());
    assert!(outcome.missing_stub.is_empty());
}

#[test]
fn test_candidates_sorted() {
    let dir = tempfile::tempdir().unwrap();
    make_disc_game(dir.path(), "zelda-like");
    make_disc_game(dir.path(), "Apple Game");
    make_disc_game(dir.path(), "midtown");

    let outcome = scan_game_folders(dir.path(), GameFolderKind::DiscGame).unwrap();
    let names: Vec<&str> = outcome.candidates.iter().map(|c| c.folder_name()).collect();
    assert_eq!(names, ["Apple Game", "midtown", "zelda-like"]);
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(scan_game_folders(&missing, GameFolderKind::DiscGame).is_err());
}

#[test]
fn test_kind_from_str() {
    assert_eq!("disc".parse::<GameFolderKind>().unwrap(), GameFolderKind::DiscGame);
    assert_eq!("HDD".parse::<GameFolderKind>().unwrap(), GameFolderKind::HddGame);
    assert!("ps4".parse::<GameFolderKind>().is_err());
}
