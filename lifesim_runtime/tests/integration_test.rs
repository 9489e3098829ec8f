//! Integration tests for lifesim_runtime.
//!
//! All tests use temporary directories for isolation.

use std::fs;
use std::path::PathBuf;

use lifesim_engine::config::{GameConfig, PlayerConfig};
use lifesim_engine::hashing::canonical_hash;

use lifesim_runtime::drift::compare_games;
use lifesim_runtime::replay::{self, TurnRecord};
use lifesim_runtime::save_file;
use lifesim_runtime::session::Session;
use lifesim_runtime::RuntimeError;

const OPENING: &[&str] = &[
    "travel:clothes-store",
    "clothes-store:buy:casual-clothes",
    "clothes-store:exit",
    "travel:college",
    "college:study:community-course",
    "college:exit",
    "travel:restaurant",
    "restaurant:apply:restaurant-cook",
];

fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("lifesim_runtime_tests")
        .join(name);
    if dir.exists() {
        fs::remove_dir_all(&dir).ok();
    }
    fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

fn config() -> GameConfig {
    GameConfig::new(vec![
        PlayerConfig::human("p1", "Ada", "#E6194B"),
        PlayerConfig::human("p2", "Brin", "#3CB44B"),
    ])
}

fn play_opening(session: &mut Session, player: &str) {
    for id in OPENING {
        let response = session.take_turn(player, id).expect("action on offer");
        assert!(response.success, "{}: {}", id, response.message);
    }
}

// ─────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────

#[test]
fn create_play_save_and_reopen() {
    let dir = temp_dir("reopen");
    let mut session = Session::create(&dir, "s1", config()).unwrap();
    play_opening(&mut session, "p1");
    session.save().unwrap();
    let hash = session.current_hash();

    let reopened = Session::open(&dir, "s1").unwrap();
    assert_eq!(reopened.current_hash(), hash);
    assert_eq!(reopened.history(), session.history());
    assert_eq!(reopened.game(), session.game());
}

#[test]
fn sessions_are_isolated() {
    let dir = temp_dir("isolated");
    let mut a = Session::create(&dir, "a", config()).unwrap();
    let b = Session::create(&dir, "b", config()).unwrap();
    play_opening(&mut a, "p1");
    a.save().unwrap();

    assert_ne!(a.current_hash(), b.current_hash());
    let b_again = Session::open(&dir, "b").unwrap();
    assert_eq!(b_again.current_hash(), b.current_hash());
    assert!(b_again.history().is_empty());
}

#[test]
fn create_refuses_existing_and_open_refuses_missing() {
    let dir = temp_dir("exists");
    Session::create(&dir, "s1", config()).unwrap();
    assert!(matches!(
        Session::create(&dir, "s1", config()),
        Err(RuntimeError::SessionExists(_))
    ));
    assert!(matches!(
        Session::open(&dir, "nope"),
        Err(RuntimeError::SessionNotFound(_))
    ));
}

#[test]
fn unknown_and_rejected_turns_are_not_recorded() {
    let dir = temp_dir("rejected");
    let mut session = Session::create(&dir, "s1", config()).unwrap();

    assert!(matches!(
        session.take_turn("p1", "bank:buy-stock:gold"),
        Err(RuntimeError::UnknownAction { .. })
    ));
    // offered to p2 as well, but it is p1's turn
    let response = session.take_turn("p2", "travel:bank").unwrap();
    assert!(!response.success);
    assert!(session.history().is_empty());
}

#[test]
fn week_rollover_autosaves() {
    let dir = temp_dir("autosave");
    let mut session = Session::create(&dir, "s1", config()).unwrap();
    play_opening(&mut session, "p1");
    session.end_turn("p1").unwrap();

    // nothing on disk yet beyond the initial save
    let on_disk = save_file::read_save(session.save_path()).unwrap();
    assert_eq!(on_disk.game.current_week(), 1);
    assert!(on_disk.turns.is_empty());

    session.end_turn("p2").unwrap();
    assert_eq!(session.game().current_week(), 2);
    let on_disk = save_file::read_save(session.save_path()).unwrap();
    assert_eq!(on_disk.game.current_week(), 2);
    assert_eq!(on_disk.turns.len(), OPENING.len() + 2);
    assert_eq!(on_disk.hash, session.current_hash());
}

#[test]
fn autosave_can_be_disabled() {
    let dir = temp_dir("no_autosave");
    let mut session = Session::create(&dir, "s1", config()).unwrap();
    session.set_autosave(false);
    session.end_turn("p1").unwrap();
    session.end_turn("p2").unwrap();
    let on_disk = save_file::read_save(session.save_path()).unwrap();
    assert_eq!(on_disk.game.current_week(), 1);
}

#[test]
fn tampered_history_falls_back_to_replay() {
    let dir = temp_dir("tampered");
    let mut session = Session::create(&dir, "s1", config()).unwrap();
    play_opening(&mut session, "p1");
    session.save().unwrap();

    // keep the game, drop the last recorded turn
    let loaded = save_file::read_save(session.save_path()).unwrap();
    let short = &loaded.turns[..loaded.turns.len() - 1];
    save_file::write_save(session.save_path(), &loaded.game, loaded.config.as_ref(), short).unwrap();

    let reopened = Session::open(&dir, "s1").unwrap();
    let (_, replayed) = replay::rebuild_game(&config(), short).unwrap();
    assert_eq!(reopened.current_hash(), replayed);
    assert!(reopened.game().player("p1").unwrap().state().job().is_none());
}

// ─────────────────────────────────────────────────────────────
// Replay
// ─────────────────────────────────────────────────────────────

#[test]
fn replay_reproduces_the_live_game() {
    let dir = temp_dir("replay");
    let mut session = Session::create(&dir, "s1", config()).unwrap();
    play_opening(&mut session, "p1");
    session.take_turn("p1", "restaurant:work").unwrap();
    session.end_turn("p1").unwrap();
    play_opening(&mut session, "p2");

    let hash = session.verify_replay().unwrap();
    assert_eq!(hash, session.current_hash());

    let (game, rebuilt) = replay::rebuild_game(session.config(), session.history()).unwrap();
    assert_eq!(rebuilt, canonical_hash(&game));
    assert_eq!(&game, session.game());
}

#[test]
fn replay_reports_where_it_diverges() {
    let records = vec![
        TurnRecord::act("p1", "travel:bank"),
        TurnRecord::act("p1", "bank:buy-stock:gold"),
    ];
    match replay::rebuild_game(&config(), &records) {
        Err(RuntimeError::ReplayDiverged { index, .. }) => assert_eq!(index, 1),
        other => panic!("expected divergence, got {:?}", other.map(|(_, h)| h)),
    }

    let out_of_turn = vec![TurnRecord::act("p2", "travel:bank")];
    assert!(matches!(
        replay::rebuild_game(&config(), &out_of_turn),
        Err(RuntimeError::ReplayDiverged { index: 0, .. })
    ));
}

#[test]
fn determinism_check_returns_the_hash() {
    let records: Vec<TurnRecord> = OPENING.iter().map(|id| TurnRecord::act("p1", id)).collect();
    let hash = replay::verify_determinism(&config(), &records).unwrap();
    assert_eq!(hash, replay::rebuild_hash(&config(), &records).unwrap());
}

// ─────────────────────────────────────────────────────────────
// Drift
// ─────────────────────────────────────────────────────────────

#[test]
fn identical_games_show_no_drift() {
    let (game, _) = replay::rebuild_game(&config(), &[]).unwrap();
    assert!(compare_games(&game, &game).is_unchanged());
}

#[test]
fn drift_tracks_player_progress() {
    let (start, _) = replay::rebuild_game(&config(), &[]).unwrap();
    let mut records: Vec<TurnRecord> = OPENING.iter().map(|id| TurnRecord::act("p1", id)).collect();
    records.push(TurnRecord::act("p1", "restaurant:work"));
    let (end, _) = replay::rebuild_game(&config(), &records).unwrap();

    let report = compare_games(&start, &end);
    assert_eq!(report.week_delta, 0);
    let p1 = report.player("p1").unwrap();
    assert_eq!(p1.cash_delta, -60 - 50 + 56);
    assert_eq!(p1.education_delta, 5_000);
    assert_eq!(p1.career_delta, 8_000);
    assert!(p1.job_changed());
    assert_eq!(p1.job_b.as_deref(), Some("restaurant-cook"));
    assert_eq!(p1.possessions_gained.len(), 1);
    assert!(report.player("p2").unwrap().is_unchanged());
}

#[test]
fn weekly_drift_resets_at_rollover() {
    let dir = temp_dir("weekly_drift");
    let mut session = Session::create(&dir, "s1", config()).unwrap();
    play_opening(&mut session, "p1");
    assert!(!session.weekly_drift().is_unchanged());

    session.end_turn("p1").unwrap();
    session.end_turn("p2").unwrap();
    assert!(session.weekly_drift().is_unchanged());
}
