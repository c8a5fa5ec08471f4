use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PlayerError, Result};

/// Parse playlist text: one path per line, no header, no escaping.
pub(crate) fn parse_lines(text: &str) -> Vec<PathBuf> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.trim().is_empty())
        .map(PathBuf::from)
        .collect()
}

/// Read the track paths listed in a playlist file.
pub fn read_playlist(path: &Path) -> Result<Vec<PathBuf>> {
    let text = fs::read_to_string(path).map_err(|source| PlayerError::PlaylistRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_lines(&text))
}

/// Write `tracks` to `path`, one per line, replacing any existing file.
pub fn write_playlist<P: AsRef<Path>>(path: &Path, tracks: &[P]) -> Result<()> {
    let wrap = |source| PlayerError::PlaylistWrite {
        path: path.to_path_buf(),
        source,
    };

    let mut file = fs::File::create(path).map_err(wrap)?;
    for t in tracks {
        writeln!(file, "{}", t.as_ref().display()).map_err(wrap)?;
    }
    file.flush().map_err(wrap)
}
