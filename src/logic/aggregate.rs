//! Season aggregation: fold the ledger into one summary row per player.

use crate::models::{GameRow, PlayerClass, SeasonLedger};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many games count toward a summer ranking.
pub const SUMMER_BEST_GAMES: usize = 5;

/// Season totals for one player. `percent_best_five` is only filled for
/// summer seasons.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonSummaryRow {
    pub name: String,
    pub class: PlayerClass,
    pub games_played: u32,
    pub total_theoretical_max: i64,
    pub total_score: i64,
    /// Summed score over summed theoretical max, all games.
    pub percent: f64,
    /// Summer rule: mean of the best five per-game percents when more than
    /// five games were played, else equal to `percent`.
    pub percent_best_five: Option<f64>,
    pub avg_ranking_points: f64,
    pub total_rank_points: i64,
    pub scrabbles: i64,
    pub solos: i64,
    pub solo_scrabbles: i64,
    pub zero_scores: i64,
    pub total_turns: i64,
    /// Turns in which the player hit the per-turn ceiling, summed.
    pub max_scores: i64,
    /// max_scores over total_turns, as a percentage.
    pub max_percent: f64,
}

/// Standard season summary: one row per player with a valid class (A/B/C),
/// ordered by name. Players with no valid-class games produce no row.
pub fn season_summary(ledger: &SeasonLedger) -> Vec<SeasonSummaryRow> {
    grouped_rows(ledger)
        .into_iter()
        .map(|(_, rows)| summarize(&rows, false))
        .collect()
}

/// Summer season summary: like `season_summary` but with the best-5
/// percentage variant filled in.
pub fn summer_summary(ledger: &SeasonLedger) -> Vec<SeasonSummaryRow> {
    grouped_rows(ledger)
        .into_iter()
        .map(|(_, rows)| summarize(&rows, true))
        .collect()
}

/// (player, date) pairs whose games do not count under the summer best-5
/// rule, for "does not count" tagging in the percent table. Uses the same
/// selection as the summary so the two can never disagree.
pub fn non_counting_dates(ledger: &SeasonLedger) -> Vec<(String, NaiveDate)> {
    let mut out = Vec::new();
    for (name, rows) in grouped_rows(ledger) {
        if rows.len() <= SUMMER_BEST_GAMES {
            continue;
        }
        let counting = best_five_dates(&rows);
        for row in rows {
            if !counting.contains(&row.date) {
                out.push((name.clone(), row.date));
            }
        }
    }
    out
}

/// The dates of a player's five best games, by per-game percent. Ties are
/// broken by earliest date so the selection is deterministic.
pub fn best_five_dates(rows: &[&GameRow]) -> Vec<NaiveDate> {
    let mut by_percent: Vec<&GameRow> = rows.to_vec();
    by_percent.sort_by(|a, b| {
        b.percent
            .partial_cmp(&a.percent)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.date.cmp(&b.date))
    });
    by_percent
        .into_iter()
        .take(SUMMER_BEST_GAMES)
        .map(|r| r.date)
        .collect()
}

/// Group ledger rows by player, keeping only rows with a valid class.
/// BTreeMap gives a stable name order for the output.
fn grouped_rows(ledger: &SeasonLedger) -> BTreeMap<String, Vec<&GameRow>> {
    let mut groups: BTreeMap<String, Vec<&GameRow>> = BTreeMap::new();
    for row in ledger.rows() {
        if row.class.is_some() {
            groups.entry(row.name.clone()).or_default().push(row);
        }
    }
    groups
}

fn summarize(rows: &[&GameRow], summer: bool) -> SeasonSummaryRow {
    let games_played = rows.len() as u32;
    let total_theoretical_max: i64 = rows.iter().map(|r| r.theoretical_max).sum();
    let total_score: i64 = rows.iter().map(|r| r.total).sum();
    let total_turns: i64 = rows.iter().map(|r| r.turns_played as i64).sum();
    let max_scores: i64 = rows.iter().map(|r| r.max_turn_count as i64).sum();

    let percent = if total_theoretical_max > 0 {
        total_score as f64 / total_theoretical_max as f64 * 100.0
    } else {
        0.0
    };

    let percent_best_five = summer.then(|| {
        if rows.len() <= SUMMER_BEST_GAMES {
            percent
        } else {
            let dates = best_five_dates(rows);
            let best: Vec<f64> = rows
                .iter()
                .filter(|r| dates.contains(&r.date))
                .map(|r| r.percent)
                .collect();
            best.iter().sum::<f64>() / best.len() as f64
        }
    });

    SeasonSummaryRow {
        name: rows[0].name.clone(),
        // Groups only hold valid-class rows; the snapshot of the first game
        // stands for the player, as in the source data.
        class: rows[0].class.unwrap_or(PlayerClass::C),
        games_played,
        total_theoretical_max,
        total_score,
        percent,
        percent_best_five,
        avg_ranking_points: rows.iter().map(|r| r.ranking_points).sum::<f64>()
            / games_played as f64,
        total_rank_points: rows.iter().map(|r| r.rank_points).sum(),
        scrabbles: rows.iter().map(|r| r.scrabbles).sum(),
        solos: rows.iter().map(|r| r.solos).sum(),
        solo_scrabbles: rows.iter().map(|r| r.solo_scrabbles).sum(),
        zero_scores: rows.iter().map(|r| r.zero_scores).sum(),
        total_turns,
        max_scores,
        max_percent: if total_turns > 0 {
            max_scores as f64 / total_turns as f64 * 100.0
        } else {
            0.0
        },
    }
}
