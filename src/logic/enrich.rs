//! Game enrichment: derive per-player metrics for one game session.

use crate::models::{GameRow, GameSheet, LeagueError, Member, MAXIMUM_ROW};
use chrono::NaiveDate;

/// Enrich a parsed sheet into ledger rows for one game.
///
/// Pure function of its inputs; the caller supplies `game_index` as the
/// season's distinct-date count plus one (the ledger renumbers afterwards
/// anyway). The MAXIMUM pseudo-row feeds the theoretical max and the
/// per-turn ceilings, then is dropped: it never appears in the output.
///
/// Fail-fast: a missing total or finishing rank on any player row, or a
/// sheet without a MAXIMUM row, rejects the whole upload. A partially
/// enriched game must never reach the ledger.
pub fn enrich_sheet(
    sheet: &GameSheet,
    date: NaiveDate,
    game_index: u32,
    roster: &[Member],
) -> Result<Vec<GameRow>, LeagueError> {
    let maximum = sheet.maximum_row().ok_or_else(|| {
        LeagueError::Enrichment("sheet has no MAXIMUM row".to_string())
    })?;
    let per_turn_ceiling = maximum.turn_scores.clone();

    // Theoretical max is the highest reported total, MAXIMUM row included.
    let mut theoretical_max: i64 = 0;
    for row in &sheet.rows {
        let total = row.total.ok_or_else(|| {
            LeagueError::Enrichment(format!("player '{}' has no total", row.name))
        })?;
        theoretical_max = theoretical_max.max(total);
    }
    if theoretical_max <= 0 {
        return Err(LeagueError::Enrichment(
            "theoretical maximum is zero".to_string(),
        ));
    }

    let players: Vec<_> = sheet
        .rows
        .iter()
        .filter(|r| r.name != MAXIMUM_ROW)
        .collect();
    if players.is_empty() {
        return Err(LeagueError::Enrichment(
            "sheet has no player rows".to_string(),
        ));
    }

    let percents: Vec<f64> = players
        .iter()
        .map(|r| r.total.unwrap_or(0) as f64 / theoretical_max as f64 * 100.0)
        .collect();

    // Ranking points: 100 for the winner, 78 at the median, linear in
    // between and beyond. When everyone ties (spread zero) the formula
    // would divide by zero; all players earn 100 instead.
    let winner_pct = percents.iter().cloned().fold(f64::MIN, f64::max);
    let spread = winner_pct - median(&percents);

    let player_count = players.len() as i64;
    let mut rows = Vec::with_capacity(players.len());
    for (row, &percent) in players.iter().zip(&percents) {
        let rank = row.rank.ok_or_else(|| {
            LeagueError::Enrichment(format!("player '{}' has no finishing rank", row.name))
        })? as i64;

        let ranking_points = if spread == 0.0 {
            100.0
        } else {
            100.0 - (winner_pct - percent) * 22.0 / spread
        };

        // Count turns where this player hit the per-turn ceiling. Blank
        // cells never match, on either side.
        let max_turn_count = row
            .turn_scores
            .iter()
            .zip(&per_turn_ceiling)
            .filter(|(score, ceiling)| score.is_some() && *score == *ceiling)
            .count() as u32;

        let class = roster
            .iter()
            .find(|m| m.name == row.name)
            .and_then(|m| m.class);

        rows.push(GameRow {
            name: row.name.clone(),
            date,
            game_index,
            class,
            turn_scores: row.turn_scores.clone(),
            total: row.total.unwrap_or(0),
            theoretical_max,
            percent,
            ranking_points,
            max_turn_count,
            rank_points: player_count - rank + 1,
            turns_played: sheet.turn_count as u32,
            scrabbles: row.scrabbles,
            solos: row.solos,
            solo_scrabbles: row.solo_scrabbles,
            zero_scores: row.zero_scores,
        });
    }
    Ok(rows)
}

/// Median of a non-empty slice; the mean of the two middle values when the
/// length is even.
fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
