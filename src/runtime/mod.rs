use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, mpsc};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use tracing::{info, warn};

use encore::audio::RodioEngine;
use encore::clock::format_ms;
use encore::config::Settings;
use encore::library::{LoftyReader, Track};
use encore::playlist::{Playlist, write_playlist};
use encore::session::{PlayerEvent, Session};

mod event_loop;
mod settings;

pub use settings::load_settings;

enum Source {
    Track(Track),
    Playlist(Playlist),
}

pub fn play_files(files: &[PathBuf], settings: &Settings) -> Result<(), Box<dyn Error>> {
    let reader = LoftyReader;
    let source = match files {
        [single] => Source::Track(Track::open(single, &reader)?),
        _ => Source::Playlist(Playlist::from_paths(files, &reader)),
    };
    run(source, settings)
}

pub fn play_playlist(file: &Path, settings: &Settings) -> Result<(), Box<dyn Error>> {
    let playlist = Playlist::open(file, &LoftyReader)?;
    info!(path = %file.display(), tracks = playlist.len(), "playlist loaded");
    run(Source::Playlist(playlist), settings)
}

pub fn save(out: &Path, files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    for missing in files.iter().filter(|f| !f.is_file()) {
        warn!(path = %missing.display(), "saving entry that does not exist");
    }
    write_playlist(out, files)?;
    println!("wrote {} entries to {}", files.len(), out.display());
    Ok(())
}

pub fn info(files: &[PathBuf]) -> Result<(), Box<dyn Error>> {
    let reader = LoftyReader;
    for file in files {
        match Track::open(file, &reader) {
            Ok(track) => {
                println!("{}", track.path().display());
                println!("  title:  {}", track.title());
                println!("  artist: {}", track.artist());
                println!("  genre:  {}", track.genre());
                println!(
                    "  length: {} ({} frames)",
                    format_ms(track.length_ms()),
                    track.total_frames()
                );
            }
            Err(e) => warn!(error = %e, "cannot read track"),
        }
    }
    Ok(())
}

fn run(source: Source, settings: &Settings) -> Result<(), Box<dyn Error>> {
    if let Source::Playlist(p) = &source {
        if p.is_empty() {
            return Err("no playable tracks".into());
        }
    }

    let (event_tx, event_rx) = mpsc::channel::<PlayerEvent>();
    let audio = settings.audio.clone();
    let session = Session::spawn(
        move || RodioEngine::new(&audio),
        Arc::new(event_tx),
        &settings.playback,
    )?;

    match source {
        Source::Track(track) => session.load(track)?,
        Source::Playlist(playlist) => session.load_playlist(playlist)?,
    };

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, Hide)?;

    let run_result = event_loop::run(&mut stdout, &session, &event_rx, settings);

    disable_raw_mode()?;
    execute!(stdout, Show, Print("\r\n"))?;
    session.shutdown();

    run_result
}
