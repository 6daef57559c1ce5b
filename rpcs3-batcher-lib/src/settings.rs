//! Shared application settings (emulator path, games root).
//!
//! The settings file is `~/.config/rpcs3-batcher/settings.toml`. CLI
//! arguments always win; saved values are the fallback so repeat runs
//! don't need the same flags every time.

use std::io;
use std::path::{Path, PathBuf};

/// Canonical path to the settings file.
pub fn settings_path() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("rpcs3-batcher").join("settings.toml")
}

/// Resolve the emulator executable: CLI override, else saved value.
pub fn resolve_executable(cli_override: Option<PathBuf>) -> Option<PathBuf> {
    cli_override.or_else(|| load_path_key("rpcs3_path"))
}

/// Resolve the games root: CLI override, else saved value, else the
/// current working directory.
pub fn resolve_root(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| load_path_key("games_root"))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

pub fn save_executable(path: &Path) -> io::Result<()> {
    save_path_key("rpcs3_path", path)
}

pub fn save_root(path: &Path) -> io::Result<()> {
    save_path_key("games_root", path)
}

/// Load the full settings file as a pretty-printed TOML string for display.
pub fn load_settings_string() -> Option<String> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    toml::to_string_pretty(&doc).ok()
}

/// Read `paths.<key>` from the settings file, if set.
fn load_path_key(key: &str) -> Option<PathBuf> {
    let contents = std::fs::read_to_string(settings_path()).ok()?;
    let doc: toml::Value = contents.parse().ok()?;
    let value = doc.get("paths")?.get(key)?.as_str()?;
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

/// Save `paths.<key>` in the settings file.
///
/// Uses `toml::Value` for a surgical update so unrelated fields are
/// preserved, and writes via a temp file so a crash can't leave a
/// half-written settings file.
fn save_path_key(key: &str, path: &Path) -> io::Result<()> {
    let settings = settings_path();
    let mut doc: toml::Value = if let Ok(contents) = std::fs::read_to_string(&settings) {
        contents
            .parse()
            .unwrap_or_else(|_| toml::Value::Table(Default::default()))
    } else {
        toml::Value::Table(Default::default())
    };

    let table = doc
        .as_table_mut()
        .ok_or_else(|| io::Error::other("settings.toml root is not a table"))?;
    let paths = table
        .entry("paths")
        .or_insert_with(|| toml::Value::Table(Default::default()));
    let paths_table = paths
        .as_table_mut()
        .ok_or_else(|| io::Error::other("[paths] is not a table"))?;

    paths_table.insert(
        key.to_string(),
        toml::Value::String(path.to_string_lossy().into_owned()),
    );

    if let Some(parent) = settings.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let serialized = toml::to_string_pretty(&doc).map_err(io::Error::other)?;
    let tmp = settings.with_extension("toml.tmp");
    std::fs::write(&tmp, &serialized)?;
    std::fs::rename(&tmp, &settings)?;

    Ok(())
}
