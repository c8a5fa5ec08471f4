use super::file::parse_lines;
use super::*;
use crate::error::PlayerError;
use crate::library::TrackMetadata;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

struct NoTags;

impl MetadataReader for NoTags {
    fn read(&self, _path: &Path) -> Option<TrackMetadata> {
        None
    }
}

#[test]
fn next_index_stops_at_last() {
    assert_eq!(next_index(0, 3), Some(1));
    assert_eq!(next_index(1, 3), Some(2));
    assert_eq!(next_index(2, 3), None);
    assert_eq!(next_index(0, 0), None);
    assert_eq!(next_index(usize::MAX, usize::MAX), None);
}

#[test]
fn previous_index_stops_at_zero() {
    assert_eq!(previous_index(2), Some(1));
    assert_eq!(previous_index(1), Some(0));
    assert_eq!(previous_index(0), None);
}

#[test]
fn navigator_reports_last() {
    let mut nav = Navigator::default();
    assert!(!nav.is_last(3));
    assert_eq!(nav.peek_previous(), None);
    nav.jump(2);
    assert!(nav.is_last(3));
    assert_eq!(nav.peek_next(3), None);
    assert_eq!(nav.peek_previous(), Some(1));
}

#[test]
fn parse_lines_skips_blanks_and_crlf() {
    let paths = parse_lines("/music/a.mp3\r\n\n  \n/music/b c.mp3\n");
    assert_eq!(
        paths,
        vec![PathBuf::from("/music/a.mp3"), PathBuf::from("/music/b c.mp3")]
    );
}

#[test]
fn read_missing_playlist_is_an_error() {
    let dir = tempdir().unwrap();
    let err = read_playlist(&dir.path().join("missing.txt")).unwrap_err();
    assert!(matches!(err, PlayerError::PlaylistRead { .. }));
}

#[test]
fn write_then_read_keeps_order() {
    let dir = tempdir().unwrap();
    let list = dir.path().join("list.txt");
    let paths = vec![dir.path().join("b.mp3"), dir.path().join("a.mp3")];

    write_playlist(&list, &paths).unwrap();
    assert_eq!(read_playlist(&list).unwrap(), paths);

    let text = fs::read_to_string(&list).unwrap();
    assert!(text.ends_with('\n'));
    assert_eq!(text.lines().count(), 2);
}

#[test]
fn open_skips_missing_entries() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.mp3");
    let c = dir.path().join("c.mp3");
    fs::write(&a, b"x").unwrap();
    fs::write(&c, b"x").unwrap();

    let list = dir.path().join("list.txt");
    write_playlist(&list, &[a.clone(), dir.path().join("b.mp3"), c.clone()]).unwrap();

    let playlist = Playlist::open(&list, &NoTags).unwrap();
    assert_eq!(playlist.len(), 2);
    assert_eq!(playlist.get(0).unwrap().path(), a.as_path());
    assert_eq!(playlist.get(1).unwrap().path(), c.as_path());

    let copy = dir.path().join("copy.txt");
    playlist.save(&copy).unwrap();
    assert_eq!(read_playlist(&copy).unwrap(), vec![a, c]);
}

#[test]
fn from_paths_keeps_openable_files_in_order() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.mp3");
    fs::write(&a, b"x").unwrap();

    let playlist = Playlist::from_paths(&[dir.path().join("gone.mp3"), a.clone()], &NoTags);
    assert_eq!(playlist.len(), 1);
    assert_eq!(playlist.tracks()[0].path(), a.as_path());
    assert!(Playlist::from_paths::<&Path>(&[], &NoTags).is_empty());
}
