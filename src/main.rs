use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod runtime;

/// Play MP3 files and playlists from the terminal.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play one file, or several in order as an ad-hoc playlist
    Play {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Play a playlist file (one path per line)
    Playlist { file: PathBuf },
    /// Write the given files out as a playlist
    Save {
        out: PathBuf,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print tag and frame information
    Info {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(fallback: &str) -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let (settings, problem) = runtime::load_settings();
    init_logging(&settings.logging.filter)?;
    if let Some(msg) = problem {
        warn!("{msg}");
    }

    match cli.command {
        Command::Play { files } => runtime::play_files(&files, &settings),
        Command::Playlist { file } => runtime::play_playlist(&file, &settings),
        Command::Save { out, files } => runtime::save(&out, &files),
        Command::Info { files } => runtime::info(&files),
        Command::Config => {
            print!("{}", settings.to_toml()?);
            Ok(())
        }
    }
}
