//! Parsed score sheet, enriched game row, and ranking metrics.

use crate::models::member::PlayerClass;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Name of the pseudo-player row carrying the per-turn ceiling of a game.
/// It exists only inside a parsed sheet; enrichment drops it and it must
/// never reach the ledger or any aggregated output.
pub const MAXIMUM_ROW: &str = "MAXIMUM";

/// Date format used everywhere a date is displayed or persisted.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Which per-game value a pivot or ranked table is built from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Percent of the game's theoretical maximum.
    Percent,
    /// Ranking points relative to winner and median.
    RankingPoints,
    /// Points from finishing order.
    Points,
}

impl std::str::FromStr for Metric {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "percent" => Ok(Metric::Percent),
            "ranking-points" | "ranking_points" => Ok(Metric::RankingPoints),
            "points" => Ok(Metric::Points),
            _ => Err(()),
        }
    }
}

/// One row of a raw score sheet, as uploaded. The MAXIMUM pseudo-row is a
/// regular `SheetRow` here; its `rank` and counters are usually blank.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    pub name: String,
    /// Finishing rank from the sheet's `Nr` column. Required for real
    /// players (enrichment rejects the upload otherwise).
    pub rank: Option<u32>,
    /// One entry per detected turn column; None where the cell was blank.
    pub turn_scores: Vec<Option<i64>>,
    /// Reported total from the sheet. Trusted, not recomputed: the MAXIMUM
    /// row's total is the theoretical ceiling, not a sum of its turns.
    pub total: Option<i64>,
    pub scrabbles: i64,
    pub solos: i64,
    pub solo_scrabbles: i64,
    pub zero_scores: i64,
}

/// A parsed score sheet: one game session, one row per player.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameSheet {
    /// Number of turn columns detected in the header (varies per game).
    pub turn_count: usize,
    pub rows: Vec<SheetRow>,
}

impl GameSheet {
    /// The MAXIMUM pseudo-row, if the sheet carries one.
    pub fn maximum_row(&self) -> Option<&SheetRow> {
        self.rows.iter().find(|r| r.name == MAXIMUM_ROW)
    }
}

/// One enriched ledger row: one player in one game session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    pub name: String,
    pub date: NaiveDate,
    /// Dense 1-based chronological index of this game's date within the
    /// season. Re-derived after every ledger mutation, never a counter.
    pub game_index: u32,
    /// Class snapshot taken from the roster at enrichment time.
    pub class: Option<PlayerClass>,
    /// Per-turn scores, one per contested turn of this game.
    pub turn_scores: Vec<Option<i64>>,
    pub total: i64,
    /// Highest total any player (including MAXIMUM) reached in this game.
    pub theoretical_max: i64,
    /// total / theoretical_max * 100.
    pub percent: f64,
    pub ranking_points: f64,
    /// Turns in which this player matched the per-turn ceiling.
    pub max_turn_count: u32,
    /// Points from finishing order: player count - rank + 1.
    pub rank_points: i64,
    /// Turns contested in this game (constant per game).
    pub turns_played: u32,
    pub scrabbles: i64,
    pub solos: i64,
    pub solo_scrabbles: i64,
    pub zero_scores: i64,
}

impl GameRow {
    /// The value of one metric for this row.
    pub fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Percent => self.percent,
            Metric::RankingPoints => self.ranking_points,
            Metric::Points => self.rank_points as f64,
        }
    }

    /// Date formatted for display and persistence (DD/MM/YYYY).
    pub fn formatted_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}
