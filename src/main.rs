//! OUTGUARD CLI
//!
//! Command-line control surface for the watch list and for block/unblock
//! runs. The heavy lifting lives in the library; this binary parses
//! arguments, checks elevation for rule-mutating commands, and renders the
//! progress stream.
//!
//! # Usage
//!
//! ```bash
//! outguard list                      # Show watched folders
//! outguard add "C:\\Games\\Foo"     # Watch a folder
//! outguard remove 0                  # Stop watching by index
//! outguard move-up 2                 # Reorder the list
//! outguard block                     # Block .exe files in watched folders
//! outguard block --ext exe,dll,bat   # Block more extension types
//! outguard unblock                   # Remove the rules again
//! outguard export watch.toml         # Share the list
//! outguard import watch.toml         # Replace the list wholesale
//! ```

use clap::{Parser, Subcommand};
use outguard::control::Controller;
use outguard::core::pipeline::{ProgressEvent, RunSummary};
use outguard::elevation::ElevationStatus;
use outguard::{Direction, ExtensionSet};
use shadow_rs::shadow;
use std::path::PathBuf;
use std::process::ExitCode;

shadow!(build);

#[derive(Parser)]
#[command(name = "outguard")]
#[command(version = build::PKG_VERSION)]
#[command(about = "Outbound Guard - blocks watched programs from the network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List watched folders in order
    List,
    /// Add a folder to the watch list
    Add {
        /// Folder to watch (does not need to exist yet)
        path: String,
    },
    /// Remove a watched folder by its list index
    Remove { index: usize },
    /// Move a watched folder up one position
    MoveUp { index: usize },
    /// Move a watched folder down one position
    MoveDown { index: usize },
    /// Replace the watched folder at an index
    Edit { index: usize, path: String },
    /// Add outbound-block rules for matching files in all watched folders
    Block {
        /// Comma-separated extension list, e.g. "exe,dll,bat"
        #[arg(short, long, default_value = "exe", value_name = "LIST")]
        ext: String,
    },
    /// Remove previously added outbound-block rules
    Unblock {
        /// Comma-separated extension list, e.g. "exe,dll,bat"
        #[arg(short, long, default_value = "exe", value_name = "LIST")]
        ext: String,
    },
    /// Replace the watch list from a TOML document
    Import { file: PathBuf },
    /// Write the watch list to a TOML document
    Export { file: PathBuf },
}

fn main() -> ExitCode {
    let _ = outguard::utils::ensure_dirs();
    init_logging();

    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");
    match runtime.block_on(handle_cli(cli.command)) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Set up logging to a file in the state directory, falling back to stderr.
fn init_logging() {
    if let Some(mut log_path) = outguard::utils::get_state_dir() {
        log_path.push("outguard.log");
        if let Ok(file) = std::fs::File::create(log_path) {
            tracing_subscriber::fmt().with_writer(file).init();
        } else {
            tracing_subscriber::fmt::init();
        }
    } else {
        tracing_subscriber::fmt::init();
    }
}

async fn handle_cli(command: Commands) -> Result<ExitCode, Box<dyn std::error::Error>> {
    match command {
        Commands::List => {
            let controller = Controller::load().await;
            if controller.list_paths().is_empty() {
                println!("No watched folders. Add one with 'outguard add <path>'.");
            } else {
                println!("Watched folders:");
                for (index, path) in controller.list_paths().iter().enumerate() {
                    println!("  [{index}] {path}");
                }
            }
        }
        Commands::Add { path } => {
            let mut controller = Controller::load().await;
            let index = controller.add_path(&path).await?;
            println!("Added [{index}] {}", controller.list_paths()[index]);
        }
        Commands::Remove { index } => {
            let mut controller = Controller::load().await;
            let removed = controller.remove_path(index).await?;
            println!("Removed {removed}");
        }
        Commands::MoveUp { index } => {
            let mut controller = Controller::load().await;
            if controller.move_path_up(index).await? {
                println!("Moved [{index}] up.");
            } else {
                println!("No change.");
            }
        }
        Commands::MoveDown { index } => {
            let mut controller = Controller::load().await;
            if controller.move_path_down(index).await? {
                println!("Moved [{index}] down.");
            } else {
                println!("No change.");
            }
        }
        Commands::Edit { index, path } => {
            let mut controller = Controller::load().await;
            controller.edit_path(index, &path).await?;
            println!("Updated [{index}] {path}");
        }
        Commands::Block { ext } => return run_direction(&ext, Direction::Block).await,
        Commands::Unblock { ext } => return run_direction(&ext, Direction::Unblock).await,
        Commands::Import { file } => {
            let mut controller = Controller::load().await;
            let count = controller.import(&file).await?;
            println!("Imported {count} folder(s) from {}", file.display());
        }
        Commands::Export { file } => {
            let controller = Controller::load().await;
            controller.export(&file).await?;
            println!(
                "Exported {} folder(s) to {}",
                controller.list_paths().len(),
                file.display()
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_direction(
    ext: &str,
    direction: Direction,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    // Firewall mutation needs elevated rights; relaunch and bow out if the
    // elevated copy took over.
    match outguard::elevation::ensure_elevated()? {
        ElevationStatus::Relaunched => return Ok(ExitCode::SUCCESS),
        ElevationStatus::Elevated => {}
    }

    let mut controller = Controller::load().await;
    if controller.list_paths().is_empty() {
        println!("No watched folders configured. Add one with 'outguard add <path>'.");
        return Ok(ExitCode::SUCCESS);
    }

    let extensions = ExtensionSet::parse(ext);
    println!(
        "Scanning {} watched folder(s) for {direction}...",
        controller.list_paths().len()
    );

    let mut events = match direction {
        Direction::Block => controller.run_block(extensions)?,
        Direction::Unblock => controller.run_unblock(extensions)?,
    };

    let verb = match direction {
        Direction::Block => "blocked",
        Direction::Unblock => "unblocked",
    };

    let mut summary: Option<RunSummary> = None;
    while let Some(event) = events.recv().await {
        match event {
            ProgressEvent::Applied {
                processed,
                total,
                ref path,
                ref error,
            } => {
                let percent = event.percent();
                match error {
                    None => println!(
                        "[{processed}/{total}] ({percent:.1}%) {verb} {}",
                        path.display()
                    ),
                    Some(reason) => eprintln!(
                        "[{processed}/{total}] ({percent:.1}%) FAILED {}: {reason}",
                        path.display()
                    ),
                }
            }
            ProgressEvent::Completed(done) => {
                summary = Some(done);
            }
        }
    }

    let Some(summary) = summary else {
        return Err("run ended without a completion event".into());
    };

    for skipped in &summary.skipped_roots {
        eprintln!(
            "warning: skipped {}: {}",
            skipped.root.display(),
            skipped.reason
        );
    }

    if summary.cancelled {
        println!(
            "Run cancelled after {} of {} file(s).",
            summary.succeeded + summary.failures.len(),
            summary.total
        );
        return Ok(ExitCode::FAILURE);
    }

    if summary.failures.is_empty() {
        println!(
            "✓ {direction} run complete: {} file(s), 0 failure(s)",
            summary.total
        );
        Ok(ExitCode::SUCCESS)
    } else {
        for failure in &summary.failures {
            let translation =
                outguard::core::error::NetshErrorPattern::match_error(&failure.reason);
            eprintln!("✗ {}: {}", failure.path.display(), translation.user_message);
        }
        println!(
            "✗ {direction} run finished with {} failure(s) out of {} file(s)",
            summary.failures.len(),
            summary.total
        );
        Ok(ExitCode::FAILURE)
    }
}
