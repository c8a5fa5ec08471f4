use std::error::Error;
use std::io::Write;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use tracing::warn;

use encore::clock::format_ms;
use encore::config::Settings;
use encore::error::PlayerError;
use encore::session::{PlaybackInfo, PlaybackState, PlayerEvent, Session};

/// Key loop: applies session events to a local snapshot, redraws the status
/// line when it changes and forwards keys to the session. Returns on `q`.
pub fn run(
    out: &mut impl Write,
    session: &Session,
    events: &Receiver<PlayerEvent>,
    settings: &Settings,
) -> Result<(), Box<dyn Error>> {
    let handle = session.playback_handle();
    let mut status = session.snapshot()?;
    draw(out, &status)?;

    loop {
        let mut dirty = false;
        for event in events.try_iter() {
            apply_event(&mut status, event);
            dirty = true;
        }
        if dirty {
            // Playlist position is not carried by events.
            if let Ok(shared) = handle.lock() {
                status.playlist_index = shared.playlist_index;
                status.playlist_len = shared.playlist_len;
            }
            draw(out, &status)?;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, session, settings)? {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_key_event(
    key: KeyEvent,
    session: &Session,
    settings: &Settings,
) -> Result<bool, PlayerError> {
    let scrub_ms = settings.controls.scrub_seconds.saturating_mul(1000).min(i64::MAX as u64) as i64;

    let result = match key.code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
        KeyCode::Char(' ') => session.toggle_pause(),
        KeyCode::Char('n') => session.next(),
        KeyCode::Char('p') => session.previous(),
        KeyCode::Char('l') | KeyCode::Right => session.seek_by(scrub_ms),
        KeyCode::Char('h') | KeyCode::Left => session.seek_by(-scrub_ms),
        KeyCode::Char('s') => session.stop(),
        KeyCode::Char('r') => session.play(),
        _ => return Ok(false),
    };

    match result {
        Ok(_) => Ok(false),
        Err(e) if e.is_load_failure() => {
            warn!(error = %e, "command failed");
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

fn apply_event(status: &mut PlaybackInfo, event: PlayerEvent) {
    match event {
        PlayerEvent::PositionChanged(position) => status.position = position,
        PlayerEvent::TrackChanged(track) => status.track = Some(track),
        PlayerEvent::StateChanged(state) => status.state = state,
    }
}

fn draw(out: &mut impl Write, status: &PlaybackInfo) -> std::io::Result<()> {
    execute!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(status_line(status))
    )
}

fn status_line(status: &PlaybackInfo) -> String {
    let state = match status.state {
        PlaybackState::Idle => "stopped",
        PlaybackState::Playing => "playing",
        PlaybackState::Paused => "paused",
        PlaybackState::Finished => "finished",
    };

    let Some(track) = status.track.as_ref() else {
        return format!("[{state}]");
    };

    let mut line = format!(
        "[{state}] {}  {} / {}",
        track.display(),
        format_ms(status.position.elapsed_ms),
        track.length_display()
    );
    if let Some(i) = status.playlist_index {
        line.push_str(&format!("  ({}/{})", i + 1, status.playlist_len));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use encore::clock::Position;
    use encore::library::{Track, TrackMetadata};

    fn track() -> Track {
        Track::new(
            "/music/song.mp3",
            TrackMetadata {
                title: "Song".into(),
                artist: "Band".into(),
                genre: "Rock".into(),
                length_ms: 185_000,
                total_frames: 7082,
            },
        )
    }

    #[test]
    fn status_line_without_track_shows_state() {
        assert_eq!(status_line(&PlaybackInfo::default()), "[stopped]");
    }

    #[test]
    fn status_line_shows_time_and_playlist_slot() {
        let status = PlaybackInfo {
            state: PlaybackState::Playing,
            track: Some(track()),
            position: Position {
                frame_offset: 100,
                elapsed_ms: 61_000,
            },
            playlist_index: Some(1),
            playlist_len: 3,
        };
        assert_eq!(status_line(&status), "[playing] Band - Song  01:01 / 03:05  (2/3)");
    }

    #[test]
    fn events_update_snapshot() {
        let mut status = PlaybackInfo::default();
        apply_event(&mut status, PlayerEvent::TrackChanged(track()));
        apply_event(&mut status, PlayerEvent::StateChanged(PlaybackState::Paused));
        apply_event(
            &mut status,
            PlayerEvent::PositionChanged(Position {
                frame_offset: 5,
                elapsed_ms: 130,
            }),
        );
        assert_eq!(status.state, PlaybackState::Paused);
        assert_eq!(status.position.frame_offset, 5);
        assert_eq!(status.track.as_ref().map(Track::title), Some("Song"));
    }
}
