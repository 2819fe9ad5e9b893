use std::path::PathBuf;

use tempfile::{tempdir, TempDir};

use super::{Context, Navigator, RepeatMode};
use crate::library::Track;
use crate::player::testing::FakeEngine;
use crate::player::Session;
use crate::store::{Favorites, PlaylistStore};

fn track(id: &str) -> Track {
    Track {
        id: id.into(),
        path: PathBuf::from("/music").join(id),
        display: id.trim_end_matches(".mp3").into(),
    }
}

/// A navigator over the given track ids, with empty stores in a tempdir.
/// The `TempDir` must stay alive for the duration of the test.
fn navigator(ids: &[&str]) -> (Navigator<FakeEngine>, TempDir) {
    let dir = tempdir().unwrap();
    let favorites = Favorites::load(dir.path().join("favorites.txt")).unwrap();
    let playlists = PlaylistStore::new(dir.path().join("playlists.json"));
    let tracks = ids.iter().map(|id| track(id)).collect();
    let nav = Navigator::new(
        tracks,
        Session::new(FakeEngine::default()),
        favorites,
        playlists,
    );
    (nav, dir)
}

fn current_id(nav: &Navigator<FakeEngine>) -> &str {
    &nav.current_track().unwrap().id
}

#[test]
fn next_advances_sequentially_and_wraps() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(0);

    nav.next();
    assert_eq!(current_id(&nav), "b.mp3");
    nav.next();
    assert_eq!(current_id(&nav), "c.mp3");
    nav.next();
    assert_eq!(current_id(&nav), "a.mp3");

    let loaded = &nav.session().engine().loaded;
    assert_eq!(loaded.len(), 4);
    assert!(nav.session().engine().playing);
}

#[test]
fn previous_wraps_backwards() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(0);

    nav.previous();
    assert_eq!(current_id(&nav), "c.mp3");
    nav.previous();
    assert_eq!(current_id(&nav), "b.mp3");
}

#[test]
fn repeat_once_replays_then_resets() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(1);
    nav.set_repeat(RepeatMode::Once);

    nav.next();
    assert_eq!(current_id(&nav), "b.mp3");
    assert_eq!(nav.repeat(), RepeatMode::None);

    nav.next();
    assert_eq!(current_id(&nav), "c.mp3");
}

#[test]
fn repeat_always_replays_indefinitely() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.select(1);
    nav.set_repeat(RepeatMode::Always);

    for _ in 0..3 {
        nav.next();
        assert_eq!(current_id(&nav), "b.mp3");
    }
    assert_eq!(nav.repeat(), RepeatMode::Always);
}

#[test]
fn previous_ignores_repeat() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(2);
    nav.set_repeat(RepeatMode::Always);

    nav.previous();
    assert_eq!(current_id(&nav), "b.mp3");
}

#[test]
fn cycle_repeat_walks_all_modes() {
    let (mut nav, _dir) = navigator(&["a.mp3"]);
    assert_eq!(nav.repeat(), RepeatMode::None);
    nav.cycle_repeat();
    assert_eq!(nav.repeat(), RepeatMode::Once);
    nav.cycle_repeat();
    assert_eq!(nav.repeat(), RepeatMode::Always);
    nav.cycle_repeat();
    assert_eq!(nav.repeat(), RepeatMode::None);
}

#[test]
fn shuffle_stays_in_bounds() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(0);
    nav.toggle_shuffle();
    assert!(nav.shuffle());

    for _ in 0..50 {
        nav.next();
        assert!(nav.current_index() < 3);
    }
}

#[test]
fn playlist_context_ignores_repeat() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.playlists().create("mix").unwrap();
    nav.playlists().add_track("c.mp3", "mix").unwrap();
    nav.playlists().add_track("a.mp3", "mix").unwrap();
    nav.set_repeat(RepeatMode::Always);

    assert!(nav.enter_playlist("mix", None).unwrap());
    nav.select(0);
    assert_eq!(current_id(&nav), "c.mp3");

    nav.next();
    assert_eq!(current_id(&nav), "a.mp3");
    nav.next();
    assert_eq!(current_id(&nav), "c.mp3");
}

#[test]
fn playlist_previous_wraps_in_playlist_order() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.playlists().create("mix").unwrap();
    nav.playlists().add_track("b.mp3", "mix").unwrap();
    nav.playlists().add_track("a.mp3", "mix").unwrap();

    assert!(nav.enter_playlist("mix", None).unwrap());
    nav.select(0);
    nav.previous();
    assert_eq!(current_id(&nav), "a.mp3");
}

#[test]
fn enter_playlist_drops_tracks_missing_from_library() {
    let (mut nav, _dir) = navigator(&["a.mp3", "c.mp3"]);
    nav.playlists().create("mix").unwrap();
    nav.playlists().add_track("a.mp3", "mix").unwrap();
    nav.playlists().add_track("ghost.mp3", "mix").unwrap();
    nav.playlists().add_track("c.mp3", "mix").unwrap();

    assert!(nav.enter_playlist("mix", None).unwrap());
    let active = nav.active_playlist().unwrap();
    assert_eq!(active.songs, vec!["a.mp3".to_string(), "c.mp3".to_string()]);
    assert_eq!(active.index, 0);
}

#[test]
fn enter_playlist_places_cursor_on_selected_track() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.playlists().create("mix").unwrap();
    for id in ["a.mp3", "b.mp3", "c.mp3"] {
        nav.playlists().add_track(id, "mix").unwrap();
    }

    assert!(nav.enter_playlist("mix", Some("c.mp3")).unwrap());
    assert_eq!(nav.active_playlist().unwrap().index, 2);
}

#[test]
fn enter_playlist_reports_unknown_names() {
    let (mut nav, _dir) = navigator(&["a.mp3"]);
    assert!(!nav.enter_playlist("nope", None).unwrap());
    assert_eq!(nav.context(), &Context::Library);
}

#[test]
fn exit_to_library_keeps_the_library_cursor() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.playlists().create("mix").unwrap();
    nav.playlists().add_track("c.mp3", "mix").unwrap();

    assert!(nav.enter_playlist("mix", None).unwrap());
    nav.select(0);
    nav.exit_to_library();

    assert_eq!(nav.context(), &Context::Library);
    assert_eq!(current_id(&nav), "c.mp3");
    nav.next();
    assert_eq!(current_id(&nav), "a.mp3");
}

#[test]
fn favorites_view_keeps_library_navigation() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(0);
    nav.toggle_favorite().unwrap();
    nav.enter_favorites();

    // Only "a" is a favorite, yet advancement still walks the whole library.
    nav.next();
    assert_eq!(current_id(&nav), "b.mp3");
}

#[test]
fn empty_library_is_a_no_op_everywhere() {
    let (mut nav, _dir) = navigator(&[]);
    nav.select(0);
    nav.next();
    nav.previous();
    nav.toggle_play_pause();

    assert!(nav.current_track().is_none());
    assert!(nav.session().engine().loaded.is_empty());
    assert_eq!(nav.toggle_favorite().unwrap(), None);
    assert!(!nav.add_current_to_playlist("mix").unwrap());
}

#[test]
fn select_out_of_range_is_a_no_op() {
    let (mut nav, _dir) = navigator(&["a.mp3"]);
    nav.select(5);
    assert!(nav.session().engine().loaded.is_empty());
}

#[test]
fn select_clears_the_paused_flag() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.select(0);
    nav.toggle_play_pause();
    assert!(nav.is_paused());

    nav.select(1);
    assert!(!nav.is_paused());
    assert!(nav.session().engine().playing);
}

#[test]
fn toggle_play_pause_pauses_and_resumes() {
    let (mut nav, _dir) = navigator(&["a.mp3"]);
    nav.select(0);

    nav.toggle_play_pause();
    assert!(nav.is_paused());
    assert!(!nav.session().engine().playing);

    nav.toggle_play_pause();
    assert!(!nav.is_paused());
    assert!(nav.session().engine().playing);
    // Resuming must not reload the file.
    assert_eq!(nav.session().engine().loaded.len(), 1);
}

#[test]
fn toggle_play_pause_starts_from_the_cursor_when_stopped() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.toggle_play_pause();

    assert_eq!(current_id(&nav), "a.mp3");
    assert!(nav.session().engine().playing);
}

#[test]
fn poll_advances_when_a_track_ends() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.select(0);

    nav.poll();
    assert_eq!(current_id(&nav), "a.mp3");

    nav.session_mut().engine_mut().ended = true;
    nav.poll();
    assert_eq!(current_id(&nav), "b.mp3");
    assert!(nav.session().engine().playing);
}

#[test]
fn poll_honors_repeat_once_on_track_end() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.select(0);
    nav.set_repeat(RepeatMode::Once);

    nav.session_mut().engine_mut().ended = true;
    nav.poll();
    assert_eq!(current_id(&nav), "a.mp3");
    assert_eq!(nav.repeat(), RepeatMode::None);
}

#[test]
fn seek_by_clamps_at_track_start() {
    let (mut nav, _dir) = navigator(&["a.mp3"]);
    nav.select(0);

    nav.seek_to(30);
    nav.seek_by(-5);
    nav.seek_by(-120);

    let seeks = &nav.session().engine().seeks;
    assert_eq!(seeks[0].as_secs(), 30);
    assert_eq!(seeks[1].as_secs(), 25);
    assert_eq!(seeks[2].as_secs(), 0);
}

#[test]
fn toggle_favorite_round_trips_through_the_store() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.select(0);

    assert_eq!(nav.toggle_favorite().unwrap(), Some(true));
    assert!(nav.favorites().is_favorite("a.mp3"));
    assert_eq!(nav.toggle_favorite().unwrap(), Some(false));
    assert!(!nav.favorites().is_favorite("a.mp3"));
}

#[test]
fn add_current_creates_the_playlist_when_missing() {
    let (mut nav, _dir) = navigator(&["a.mp3"]);
    nav.select(0);

    assert!(nav.add_current_to_playlist("new list").unwrap());
    let pl = nav.playlists().find("new list").unwrap().unwrap();
    assert_eq!(pl.songs, vec!["a.mp3".to_string()]);

    assert!(nav.remove_current_from_playlist("new list").unwrap());
    let pl = nav.playlists().find("new list").unwrap().unwrap();
    assert!(pl.songs.is_empty());
}

#[test]
fn reload_refinds_the_current_track_by_id() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3", "c.mp3"]);
    nav.select(1);

    nav.reload_library(vec![track("b.mp3"), track("c.mp3"), track("d.mp3")]);
    assert_eq!(nav.current_index(), 0);
    assert_eq!(current_id(&nav), "b.mp3");

    nav.reload_library(vec![track("x.mp3"), track("y.mp3")]);
    assert_eq!(nav.current_index(), 0);
    assert_eq!(current_id(&nav), "x.mp3");
}

#[test]
fn reload_drops_back_to_the_library_context() {
    let (mut nav, _dir) = navigator(&["a.mp3", "b.mp3"]);
    nav.playlists().create("mix").unwrap();
    nav.playlists().add_track("a.mp3", "mix").unwrap();
    assert!(nav.enter_playlist("mix", None).unwrap());

    nav.reload_library(vec![track("a.mp3")]);
    assert_eq!(nav.context(), &Context::Library);
}
