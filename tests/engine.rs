//! End-to-end tests: upload, duplicate rejection, persistence round-trip.

use chrono::NaiveDate;
use scrabble_league_web::{
    LeagueEngine, LeagueError, Member, Metric, PlayerClass, SeasonKey,
};
use std::path::PathBuf;

const SHEET_ONE: &str = "\
Nr;Naam;B1;B2;Totaal
1;Alice;30;20;50
2;Bob;25;15;40
;MAXIMUM;30;20;50
";

const SHEET_TWO: &str = "\
Nr;Naam;B1;B2;Totaal
1;Alice;20;15;35
2;Bob;15;10;25
;MAXIMUM;20;15;35
";

fn d(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn roster() -> Vec<Member> {
    vec![
        Member::new("Alice", Some(PlayerClass::A)),
        Member::new("Bob", Some(PlayerClass::B)),
    ]
}

/// Fresh data directory per test so tests never share season files.
fn data_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "scrabble-league-test-{}-{}",
        std::process::id(),
        name
    ));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn regular_season() -> SeasonKey {
    SeasonKey::Regular {
        start_year: 2024,
        end_year: 2025,
    }
}

#[test]
fn upload_scenario_end_to_end() {
    let dir = data_dir("upload-scenario");
    let mut engine = LeagueEngine::open(&dir).unwrap();
    let roster = roster();

    // First upload: routed to the 2024-2025 regular season, game 1.
    let outcome = engine
        .submit_game(SHEET_ONE.as_bytes(), d(1, 9, 2024), &roster)
        .unwrap();
    assert_eq!(outcome.season, regular_season());
    assert_eq!(outcome.game_index, 1);

    let summary = engine.summary(outcome.season).unwrap();
    let alice = summary.iter().find(|s| s.name == "Alice").unwrap();
    assert!((alice.percent - 100.0).abs() < 1e-9);
    let bob = summary.iter().find(|s| s.name == "Bob").unwrap();
    assert!((bob.percent - 80.0).abs() < 1e-9);

    // Same date again: rejected, nothing changes.
    let err = engine
        .submit_game(SHEET_ONE.as_bytes(), d(1, 9, 2024), &roster)
        .unwrap_err();
    assert!(matches!(err, LeagueError::DuplicateGame { .. }));
    assert_eq!(engine.games(outcome.season).unwrap().len(), 1);

    // A later date with lower totals becomes game 2.
    let outcome2 = engine
        .submit_game(SHEET_TWO.as_bytes(), d(8, 9, 2024), &roster)
        .unwrap();
    assert_eq!(outcome2.game_index, 2);

    let summary = engine.summary(outcome.season).unwrap();
    let alice = summary.iter().find(|s| s.name == "Alice").unwrap();
    assert_eq!(alice.games_played, 2);
    // 85 of 85 possible: still 100 percent.
    assert!((alice.percent - 100.0).abs() < 1e-9);
}

#[test]
fn earlier_date_takes_over_game_number_one() {
    let dir = data_dir("earlier-date");
    let mut engine = LeagueEngine::open(&dir).unwrap();
    let roster = roster();

    engine
        .submit_game(SHEET_ONE.as_bytes(), d(8, 9, 2024), &roster)
        .unwrap();
    // An upload for an earlier date slots in before the existing game.
    let outcome = engine
        .submit_game(SHEET_TWO.as_bytes(), d(1, 9, 2024), &roster)
        .unwrap();
    assert_eq!(outcome.game_index, 1);

    let games = engine.games(outcome.season).unwrap();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].date, d(1, 9, 2024));
    assert_eq!(games[1].game_index, 2);
}

#[test]
fn engine_reloads_persisted_seasons() {
    let dir = data_dir("reload");
    {
        let mut engine = LeagueEngine::open(&dir).unwrap();
        engine
            .submit_game(SHEET_ONE.as_bytes(), d(1, 9, 2024), &roster())
            .unwrap();
        engine
            .submit_game(SHEET_TWO.as_bytes(), d(15, 7, 2025), &roster())
            .unwrap();
    }

    // A fresh engine over the same directory sees both seasons.
    let engine = LeagueEngine::open(&dir).unwrap();
    assert_eq!(
        engine.season_keys(),
        vec![regular_season(), SeasonKey::Summer { year: 2025 }]
    );

    let summary = engine.summary(regular_season()).unwrap();
    let alice = summary.iter().find(|s| s.name == "Alice").unwrap();
    assert_eq!(alice.games_played, 1);
    assert_eq!(alice.total_score, 50);
    assert_eq!(alice.class, PlayerClass::A);

    let table = engine.ranked_table(regular_season(), Metric::Percent).unwrap();
    assert_eq!(table.rows[0][1], "Alice");
    assert_eq!(table.rows[0][5], "100.00");
}

#[test]
fn delete_game_renumbers_and_persists() {
    let dir = data_dir("delete");
    let mut engine = LeagueEngine::open(&dir).unwrap();
    let roster = roster();

    engine
        .submit_game(SHEET_ONE.as_bytes(), d(1, 9, 2024), &roster)
        .unwrap();
    engine
        .submit_game(SHEET_TWO.as_bytes(), d(8, 9, 2024), &roster)
        .unwrap();

    let remaining = engine.delete_game(regular_season(), 1).unwrap();
    assert_eq!(remaining, 1);
    // The surviving game moved up to number 1, on disk too.
    let engine = LeagueEngine::open(&dir).unwrap();
    let games = engine.games(regular_season()).unwrap();
    assert_eq!(games.len(), 1);
    assert_eq!(games[0].game_index, 1);
    assert_eq!(games[0].date, d(8, 9, 2024));
}

#[test]
fn deleting_from_unknown_season_is_not_found() {
    let dir = data_dir("unknown-season");
    let mut engine = LeagueEngine::open(&dir).unwrap();
    assert!(matches!(
        engine.delete_game(SeasonKey::Summer { year: 1999 }, 1),
        Err(LeagueError::SeasonNotFound(_))
    ));
}

#[test]
fn summer_uploads_use_the_best_five_rule() {
    let dir = data_dir("summer");
    let mut engine = LeagueEngine::open(&dir).unwrap();
    let roster = roster();

    for day in 1..=6 {
        // Six summer games with sliding totals (MAXIMUM fixed at 50).
        let total = 50 - day as i64 * 2;
        let sheet = format!(
            "Nr;Naam;B1;Totaal\n1;Alice;{};{}\n;MAXIMUM;50;50\n",
            total, total
        );
        engine
            .submit_game(sheet.as_bytes(), d(day, 7, 2025), &roster)
            .unwrap();
    }

    let season = SeasonKey::Summer { year: 2025 };
    let summary = engine.summary(season).unwrap();
    let alice = &summary[0];
    assert_eq!(alice.games_played, 6);
    // Best five of [96, 92, 88, 84, 80, 76] percent: mean of the first five.
    assert!((alice.percent_best_five.unwrap() - 88.0).abs() < 1e-9);

    let table = engine.ranked_table(season, Metric::Percent).unwrap();
    assert_eq!(
        table.non_counting,
        vec![("Alice".to_string(), "06/07/2025".to_string())]
    );
}
