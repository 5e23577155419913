//! Integration tests for the season ledger: renumbering and duplicates.

use chrono::NaiveDate;
use scrabble_league_web::{GameRow, LeagueError, PlayerClass, SeasonKey, SeasonLedger};

fn d(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn game_row(name: &str, date: NaiveDate) -> GameRow {
    GameRow {
        name: name.to_string(),
        date,
        game_index: 0,
        class: Some(PlayerClass::A),
        turn_scores: vec![Some(30), Some(20)],
        total: 50,
        theoretical_max: 50,
        percent: 100.0,
        ranking_points: 100.0,
        max_turn_count: 2,
        rank_points: 1,
        turns_played: 2,
        scrabbles: 0,
        solos: 0,
        solo_scrabbles: 0,
        zero_scores: 0,
    }
}

fn regular_season() -> SeasonKey {
    SeasonKey::Regular {
        start_year: 2024,
        end_year: 2025,
    }
}

#[test]
fn indices_follow_date_order_not_insertion_order() {
    let mut ledger = SeasonLedger::new(regular_season());
    ledger.append(vec![game_row("Alice", d(5, 1, 2025))]).unwrap();
    ledger.append(vec![game_row("Alice", d(1, 1, 2025))]).unwrap();
    ledger.append(vec![game_row("Alice", d(3, 1, 2025))]).unwrap();

    assert_eq!(ledger.game_index_for(d(1, 1, 2025)), Some(1));
    assert_eq!(ledger.game_index_for(d(3, 1, 2025)), Some(2));
    assert_eq!(ledger.game_index_for(d(5, 1, 2025)), Some(3));
}

#[test]
fn deleting_a_game_keeps_indices_dense() {
    let mut ledger = SeasonLedger::new(regular_season());
    ledger.append(vec![game_row("Alice", d(5, 1, 2025))]).unwrap();
    ledger.append(vec![game_row("Alice", d(1, 1, 2025))]).unwrap();
    ledger.append(vec![game_row("Alice", d(3, 1, 2025))]).unwrap();

    // Delete the middle game (3/1, index 2); 5/1 shifts down to 2.
    let remaining = ledger.remove_game(2).unwrap();
    assert_eq!(remaining, 2);
    assert_eq!(ledger.game_index_for(d(1, 1, 2025)), Some(1));
    assert_eq!(ledger.game_index_for(d(5, 1, 2025)), Some(2));
    assert_eq!(ledger.game_index_for(d(3, 1, 2025)), None);
}

#[test]
fn duplicate_date_is_rejected_and_ledger_unchanged() {
    let mut ledger = SeasonLedger::new(regular_season());
    ledger
        .append(vec![
            game_row("Alice", d(1, 9, 2024)),
            game_row("Bob", d(1, 9, 2024)),
        ])
        .unwrap();
    let before = ledger.clone();

    let err = ledger
        .append(vec![game_row("Carol", d(1, 9, 2024))])
        .unwrap_err();
    assert!(matches!(err, LeagueError::DuplicateGame { .. }));
    assert_eq!(ledger, before);
}

#[test]
fn removing_unknown_game_is_an_error() {
    let mut ledger = SeasonLedger::new(regular_season());
    ledger.append(vec![game_row("Alice", d(1, 9, 2024))]).unwrap();
    assert_eq!(
        ledger.remove_game(7),
        Err(LeagueError::GameNotFound(7))
    );
}

#[test]
fn rows_are_kept_in_date_order() {
    let mut ledger = SeasonLedger::new(regular_season());
    ledger.append(vec![game_row("Alice", d(5, 1, 2025))]).unwrap();
    ledger.append(vec![game_row("Alice", d(1, 1, 2025))]).unwrap();

    let dates: Vec<NaiveDate> = ledger.rows().iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![d(1, 1, 2025), d(5, 1, 2025)]);
}

#[test]
fn season_key_for_date_boundaries() {
    // July and August are summer; September starts the next regular season.
    assert_eq!(
        SeasonKey::for_date(d(15, 7, 2025)),
        SeasonKey::Summer { year: 2025 }
    );
    assert_eq!(
        SeasonKey::for_date(d(31, 8, 2025)),
        SeasonKey::Summer { year: 2025 }
    );
    assert_eq!(
        SeasonKey::for_date(d(1, 9, 2024)),
        SeasonKey::Regular { start_year: 2024, end_year: 2025 }
    );
    assert_eq!(
        SeasonKey::for_date(d(30, 6, 2025)),
        SeasonKey::Regular { start_year: 2024, end_year: 2025 }
    );
}

#[test]
fn season_key_display_round_trips() {
    for key in [
        SeasonKey::Summer { year: 2025 },
        SeasonKey::Regular { start_year: 2024, end_year: 2025 },
    ] {
        let parsed: SeasonKey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }
}
