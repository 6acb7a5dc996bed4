//! CLI command definitions and dispatch.
//!
//! Each subcommand drives the same [`PlayerSession`] facade the GUI
//! would: library management (`add`, `remove`, `list`), metadata
//! resolution (`resolve`), and the editor surface (`edit`).

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tokio::runtime::Runtime;

use crate::config;
use crate::cover::CoverDescriptor;
use crate::model::TrackRef;
use crate::resolver::{PresentationState, ResolverEvent};
use crate::session::PlayerSession;

/// Tunedeck CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Add audio files to the library
    Add {
        /// Files to add
        files: Vec<PathBuf>,
    },
    /// Remove a track from the library by file path
    Remove {
        /// Path of the track to remove
        path: PathBuf,
    },
    /// List all tracks in the library
    List,
    /// Resolve metadata for a file (cache first, catalog on a miss)
    Resolve {
        /// Path to the audio file
        path: PathBuf,
        /// Seconds to wait for the catalog follow-up
        #[arg(long, default_value = "10")]
        timeout: u64,
    },
    /// Edit cached metadata for a file
    Edit {
        /// Path to the audio file
        path: PathBuf,
        /// Set a custom display title
        #[arg(long)]
        title: Option<String>,
        /// Clear the custom display title
        #[arg(long)]
        clear_title: bool,
        /// Add a cover image
        #[arg(long)]
        add_image: Vec<PathBuf>,
        /// Remove a cover image
        #[arg(long)]
        remove_image: Vec<PathBuf>,
    },
}

/// Run the specified CLI command.
///
/// Returns `Ok(true)` if a command was run, `Ok(false)` if none was
/// specified.
pub fn run_command(cli: &Cli) -> anyhow::Result<bool> {
    let rt = Runtime::new()?;

    match &cli.command {
        Some(Commands::Add { files }) => {
            cmd_add(files)?;
            Ok(true)
        }
        Some(Commands::Remove { path }) => {
            cmd_remove(path)?;
            Ok(true)
        }
        Some(Commands::List) => {
            cmd_list()?;
            Ok(true)
        }
        Some(Commands::Resolve { path, timeout }) => {
            cmd_resolve(&rt, path, *timeout)?;
            Ok(true)
        }
        Some(Commands::Edit {
            path,
            title,
            clear_title,
            add_image,
            remove_image,
        }) => {
            cmd_edit(
                path,
                title.as_deref(),
                *clear_title,
                add_image,
                remove_image,
            )?;
            Ok(true)
        }
        None => Ok(false),
    }
}

fn open_session() -> anyhow::Result<PlayerSession> {
    let config = config::load();
    Ok(PlayerSession::new(&config)?)
}

fn cmd_add(files: &[PathBuf]) -> anyhow::Result<()> {
    let session = open_session()?;
    let added = session.add_paths(files.iter().cloned())?;
    for track in &added {
        println!("Added: {} ({})", track.title, track.file_path);
    }
    println!("{} track(s) added", added.len());
    Ok(())
}

fn cmd_remove(path: &PathBuf) -> anyhow::Result<()> {
    let session = open_session()?;
    match session.remove_path(&path.to_string_lossy())? {
        Some(track) => println!("Removed: {}", track.title),
        None => println!("Not in library: {}", path.display()),
    }
    Ok(())
}

fn cmd_list() -> anyhow::Result<()> {
    let session = open_session()?;
    let tracks = session.tracks();
    if tracks.is_empty() {
        println!("Library is empty");
        return Ok(());
    }
    for (idx, track) in tracks.iter().enumerate() {
        println!("{:>4}  {}  {}", idx, track.title, track.file_path);
    }
    Ok(())
}

fn cmd_resolve(rt: &Runtime, path: &PathBuf, timeout_secs: u64) -> anyhow::Result<()> {
    rt.block_on(async {
        let session = open_session()?;
        let track: TrackRef = session.track_for(&path.to_string_lossy());
        let mut events = session.subscribe();

        // A cache hit is final; a miss gets a follow-up once the lookup lands
        let cached = session
            .store()
            .get_by_path(&track.file_path)
            .is_some_and(|r| r.has_metadata());

        let immediate = session.select_track(&track);
        print_state("Now", &immediate);
        if cached {
            session.shutdown();
            return Ok(());
        }

        let deadline = Duration::from_secs(timeout_secs);
        loop {
            match tokio::time::timeout(deadline, events.recv()).await {
                Ok(Ok(ResolverEvent::Presentation(state))) => {
                    print_state("Resolved", &state);
                    break;
                }
                Ok(Ok(ResolverEvent::Status(line))) => println!("{}", line),
                Ok(Err(_)) | Err(_) => break,
            }
        }
        session.shutdown();
        Ok(())
    })
}

fn cmd_edit(
    path: &PathBuf,
    title: Option<&str>,
    clear_title: bool,
    add_images: &[PathBuf],
    remove_images: &[PathBuf],
) -> anyhow::Result<()> {
    let session = open_session()?;
    let track = session.track_for(&path.to_string_lossy());
    let mut editor = session.edit(&track);

    if clear_title {
        editor.set_custom_title("");
    } else if let Some(title) = title {
        editor.set_custom_title(title);
    }
    for image in add_images {
        if editor.add_user_image(image) {
            println!("Added image: {}", image.display());
        } else {
            println!("Skipped image (missing or duplicate): {}", image.display());
        }
    }
    for image in remove_images {
        if editor.remove_user_image(image) {
            println!("Removed image: {}", image.display());
        }
    }

    editor.save()?;
    println!(
        "Saved. Title: {} | Artist: {} | Album: {} | {} image(s)",
        if editor.custom_title().is_empty() {
            editor.track_name()
        } else {
            editor.custom_title()
        },
        editor.artist_name(),
        editor.album_name(),
        editor.user_images().len()
    );
    Ok(())
}

fn print_state(label: &str, state: &PresentationState) {
    println!(
        "{}: {} / {} / {}",
        label, state.track_name, state.artist_name, state.album_name
    );
    match &state.cover {
        CoverDescriptor::Slideshow(show) => {
            println!("Cover: slideshow over {} image(s)", show.images().len());
        }
        CoverDescriptor::Artwork { url } => println!("Cover: artwork {}", url),
        CoverDescriptor::Default => println!("Cover: default"),
    }
}
