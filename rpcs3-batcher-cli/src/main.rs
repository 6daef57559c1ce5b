//! rpcs3-batcher CLI
//!
//! Command-line interface for generating Windows batch launchers for
//! PS3 games: one `.bat` per game folder, pointing RPCS3 at the game's
//! EBOOT.BIN in no-GUI mode.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use rpcs3_batcher_lib::{
    GameFolderKind, ProcessEvent, ProcessOptions, RunSummary, process_root, settings,
};

#[derive(Parser)]
#[command(name = "rpcs3-batcher")]
#[command(about = "Create batch file launchers for PS3 games", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan game folders and create one .bat launcher per game
    Create {
        /// Path to the RPCS3 executable (defaults to the saved path)
        #[arg(short, long)]
        rpcs3: Option<PathBuf>,

        /// Root folder containing disc game folders (defaults to the
        /// saved path, then the current directory)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Where to write the .bat files (defaults to the root folder)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Scan a single layout only: 'disc' or 'hdd'. By default both
        /// are scanned — RPCS3's dev_hdd0/game as installed titles,
        /// then the root as disc rips.
        #[arg(short, long)]
        kind: Option<GameFolderKind>,

        /// Show what would be created without writing anything
        #[arg(short = 'n', long)]
        dry_run: bool,

        /// Remember the rpcs3/root paths for next time
        #[arg(long)]
        save: bool,
    },

    /// Manage saved paths
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the saved settings
    Show,

    /// Save the RPCS3 executable path
    SetRpcs3 { path: PathBuf },

    /// Save the games root path
    SetRoot { path: PathBuf },

    /// Print the settings file path
    Path,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Create {
            rpcs3,
            root,
            out,
            kind,
            dry_run,
            save,
        } => run_create(rpcs3, root, out, kind, dry_run, save),
        Commands::Config { action } => match action {
            ConfigAction::Show => run_config_show(),
            ConfigAction::SetRpcs3 { path } => run_config_set(settings::save_executable(&path)),
            ConfigAction::SetRoot { path } => run_config_set(settings::save_root(&path)),
            ConfigAction::Path => println!("{}", settings::settings_path().display()),
        },
    }
}

/// Run the create command.
fn run_create(
    rpcs3: Option<PathBuf>,
    root: Option<PathBuf>,
    out: Option<PathBuf>,
    kind: Option<GameFolderKind>,
    dry_run: bool,
    save: bool,
) {
    let Some(executable) = settings::resolve_executable(rpcs3) else {
        eprintln!(
            "{} No RPCS3 executable given. Pass --rpcs3 or save one with 'rpcs3-batcher config set-rpcs3'.",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        );
        std::process::exit(1);
    };
    let root = settings::resolve_root(root);
    let output_dir = out.unwrap_or_else(|| root.clone());

    if save {
        if let Err(e) = settings::save_executable(&executable) {
            eprintln!("Warning: could not save rpcs3 path: {e}");
        }
        if let Err(e) = settings::save_root(&root) {
            eprintln!("Warning: could not save games root: {e}");
        }
    }

    println!(
        "Scanning games in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        println!(
            "{}",
            "Dry run: no files will be written".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    println!();

    let options = ProcessOptions {
        output_dir: Some(output_dir),
        dry_run,
    };

    let mut total = RunSummary::default();
    let mut passes: Vec<(PathBuf, GameFolderKind)> = Vec::new();

    match kind {
        Some(kind) => passes.push((root, kind)),
        None => {
            // Mirror the original workflow: installed titles first
            // (inside the emulator's virtual HDD), then disc rips.
            if let Some(hdd_root) = rpcs3_hdd_game_dir(&executable) {
                passes.push((hdd_root, GameFolderKind::HddGame));
            }
            passes.push((root, GameFolderKind::DiscGame));
        }
    }

    for (scan_root, scan_kind) in passes {
        match run_pass(&executable, &scan_root, scan_kind, &options) {
            Ok(summary) => {
                total.folders_scanned += summary.folders_scanned;
                total.files_created += summary.files_created;
                total.failures += summary.failures;
            }
            Err(e) => {
                eprintln!(
                    "{} {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
                std::process::exit(1);
            }
        }
        println!();
    }

    print_summary(&total, dry_run);
}

/// The dev_hdd0/game directory next to the RPCS3 executable, if present.
fn rpcs3_hdd_game_dir(executable: &Path) -> Option<PathBuf> {
    let dir = executable.parent()?.join("dev_hdd0").join("game");
    dir.is_dir().then_some(dir)
}

/// Run one scan pass with a spinner, printing each event line.
fn run_pass(
    executable: &Path,
    root: &Path,
    kind: GameFolderKind,
    options: &ProcessOptions,
) -> Result<RunSummary, rpcs3_batcher_lib::ProcessError> {
    log::debug!(
        "pass: root={} kind={} dry_run={}",
        root.display(),
        kind.display_name(),
        options.dry_run,
    );

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap()
            .tick_chars("/-\\|"),
    );

    let progress = |event: ProcessEvent| {
        match &event {
            ProcessEvent::ScanStarted { .. } => {
                pb.set_message(event.to_string());
            }
            ProcessEvent::ScriptCreated { .. } | ProcessEvent::WouldCreate { .. } => {
                pb.println(format!(
                    "  {} {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    event,
                ));
            }
            ProcessEvent::FolderSkipped { .. } | ProcessEvent::MetadataEntriesDropped { .. } => {
                pb.println(format!(
                    "  {} {}",
                    "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                    event,
                ));
            }
        }
        pb.tick();
    };

    let result = process_root(executable, root, kind, options, &progress);
    pb.finish_and_clear();

    if let Ok(summary) = &result {
        println!(
            "{} {}",
            format!("{} game folders scanned", summary.folders_scanned)
                .if_supports_color(Stdout, |t| t.bold()),
            format!("({} layout)", kind.display_name()).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    result
}

/// Print the overall summary.
fn print_summary(total: &RunSummary, dry_run: bool) {
    println!("{}", "Summary:".if_supports_color(Stdout, |t| t.bold()));
    println!(
        "  {} {} batch files {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        total.files_created,
        if dry_run { "would be created" } else { "created" },
    );
    if total.failures > 0 {
        println!(
            "  {} {} folders skipped",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            total.failures,
        );
    }
    if total.files_created == 0 {
        println!(
            "{}",
            "No game folders with EBOOT.BIN and PARAM.SFO were found."
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
}

/// Show saved settings.
fn run_config_show() {
    match settings::load_settings_string() {
        Some(contents) => print!("{contents}"),
        None => {
            println!(
                "{}",
                "No settings saved yet.".if_supports_color(Stdout, |t| t.dimmed()),
            );
            println!("Run 'rpcs3-batcher config set-rpcs3 <path>' to get started.");
        }
    }
}

/// Report the result of a config mutation.
fn run_config_set(result: std::io::Result<()>) {
    match result {
        Ok(()) => {
            println!(
                "{} Saved to {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                settings::settings_path().display(),
            );
        }
        Err(e) => {
            eprintln!(
                "{} Failed to save settings: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                e,
            );
            std::process::exit(1);
        }
    }
}
