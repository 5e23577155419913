//! Engine orchestration: uploads, deletes, and ranked-table queries over the
//! per-season ledgers.

use crate::logic::aggregate::{self, SeasonSummaryRow};
use crate::logic::enrich::enrich_sheet;
use crate::logic::parser::parse_sheet;
use crate::logic::pivot::{self, RankedTable};
use crate::models::{LeagueError, Member, Metric, SeasonKey, SeasonLedger};
use crate::storage;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Result of a successful upload: which season the game was routed to and
/// the chronological number it ended up with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub game_index: u32,
    pub season: SeasonKey,
}

/// One entry of the season's game list (for the admin delete view).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameListEntry {
    pub game_index: u32,
    pub date: NaiveDate,
}

/// The league engine: all season ledgers plus the directory they persist
/// to. Callers serialize mutations (the web binary holds it behind a write
/// lock); every mutation is persisted before it becomes visible in memory,
/// so a failed save leaves both views unchanged.
pub struct LeagueEngine {
    data_dir: PathBuf,
    seasons: HashMap<SeasonKey, SeasonLedger>,
}

impl LeagueEngine {
    /// Open the engine over a data directory, loading every persisted
    /// season. A missing directory starts an empty league.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, LeagueError> {
        let data_dir = data_dir.into();
        let mut seasons = HashMap::new();
        for season in storage::scan_seasons(&data_dir)? {
            let ledger = storage::load_season(&data_dir, season)?;
            log::info!(
                "Loaded season {}: {} games, {} rows",
                season,
                ledger.game_count(),
                ledger.rows().len()
            );
            seasons.insert(season, ledger);
        }
        Ok(Self { data_dir, seasons })
    }

    /// Seasons with data, oldest first. A summer season sorts between the
    /// regular season it follows and the one it precedes.
    pub fn season_keys(&self) -> Vec<SeasonKey> {
        let mut keys: Vec<SeasonKey> = self.seasons.keys().copied().collect();
        keys.sort_by_key(|k| match *k {
            SeasonKey::Summer { year } => (year, 7),
            SeasonKey::Regular { start_year, .. } => (start_year, 9),
        });
        keys
    }

    fn ledger(&self, season: SeasonKey) -> Result<&SeasonLedger, LeagueError> {
        self.seasons
            .get(&season)
            .ok_or(LeagueError::SeasonNotFound(season))
    }

    /// Ingest one game's score sheet: parse, route to the season the date
    /// belongs to, enrich against the roster snapshot, append, persist.
    pub fn submit_game(
        &mut self,
        raw_sheet: &[u8],
        date: NaiveDate,
        roster: &[Member],
    ) -> Result<UploadOutcome, LeagueError> {
        let sheet = parse_sheet(raw_sheet)?;
        let season = SeasonKey::for_date(date);

        // Mutate a copy; the live ledger is swapped in only after the save
        // succeeds, so readers never see a partial mutation and a failed
        // save rolls back for free.
        let mut ledger = self
            .seasons
            .get(&season)
            .cloned()
            .unwrap_or_else(|| SeasonLedger::new(season));
        let game_index = ledger.game_count() + 1;
        let rows = enrich_sheet(&sheet, date, game_index, roster)?;
        ledger.append(rows)?;
        storage::save_season(&self.data_dir, &ledger)?;

        // Renumbering may have shifted the new game below an existing one.
        let game_index = ledger.game_index_for(date).unwrap_or(game_index);
        self.seasons.insert(season, ledger);
        log::info!("Added game {} of {} on {}", game_index, season, date);
        Ok(UploadOutcome { game_index, season })
    }

    /// Delete one game from a season; remaining games are renumbered.
    /// Returns how many games the season still has.
    pub fn delete_game(
        &mut self,
        season: SeasonKey,
        game_index: u32,
    ) -> Result<u32, LeagueError> {
        let mut ledger = self.ledger(season)?.clone();
        let remaining = ledger.remove_game(game_index)?;
        storage::save_season(&self.data_dir, &ledger)?;
        self.seasons.insert(season, ledger);
        log::info!(
            "Deleted game {} of {} ({} games remain)",
            game_index,
            season,
            remaining
        );
        Ok(remaining)
    }

    /// The ranked table for one metric of one season.
    pub fn ranked_table(
        &self,
        season: SeasonKey,
        metric: Metric,
    ) -> Result<RankedTable, LeagueError> {
        Ok(pivot::ranked_table(self.ledger(season)?, metric))
    }

    /// Per-player season summary (summer seasons include the best-5 rule).
    pub fn summary(&self, season: SeasonKey) -> Result<Vec<SeasonSummaryRow>, LeagueError> {
        let ledger = self.ledger(season)?;
        Ok(if season.is_summer() {
            aggregate::summer_summary(ledger)
        } else {
            aggregate::season_summary(ledger)
        })
    }

    /// The games of a season in chronological order.
    pub fn games(&self, season: SeasonKey) -> Result<Vec<GameListEntry>, LeagueError> {
        let ledger = self.ledger(season)?;
        Ok(ledger
            .distinct_dates()
            .into_iter()
            .filter_map(|date| {
                ledger.game_index_for(date).map(|game_index| GameListEntry {
                    game_index,
                    date,
                })
            })
            .collect())
    }
}
