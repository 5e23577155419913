//! SeasonKey, SeasonLedger, and engine errors.

use crate::models::game::{GameRow, DATE_FORMAT};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Errors that can occur in the ranking engine.
#[derive(Clone, Debug, PartialEq)]
pub enum LeagueError {
    /// Malformed upload: bad delimiters or a missing required column.
    Parse(String),
    /// A game for this date already exists in the season ledger.
    DuplicateGame { date: NaiveDate, season: SeasonKey },
    /// Data inconsistency found while enriching an upload.
    Enrichment(String),
    /// I/O failure while saving a season file; no state was changed.
    Persistence(String),
    /// No ledger exists for this season.
    SeasonNotFound(SeasonKey),
    /// No game with this index exists in the season ledger.
    GameNotFound(u32),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::Parse(reason) => write!(f, "Could not parse score sheet: {}", reason),
            LeagueError::DuplicateGame { date, season } => write!(
                f,
                "A game for {} was already uploaded to {}",
                date.format(DATE_FORMAT),
                season
            ),
            LeagueError::Enrichment(reason) => {
                write!(f, "Could not process score sheet: {}", reason)
            }
            LeagueError::Persistence(reason) => write!(f, "Could not save season file: {}", reason),
            LeagueError::SeasonNotFound(season) => write!(f, "No data for season {}", season),
            LeagueError::GameNotFound(index) => write!(f, "No game with number {}", index),
        }
    }
}

impl std::error::Error for LeagueError {}

/// Identifies one competition season. Regular seasons run September through
/// June and span two calendar years; summer seasons cover July and August of
/// a single year.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SeasonKey {
    Summer { year: i32 },
    Regular { start_year: i32, end_year: i32 },
}

impl SeasonKey {
    /// Route a game date to its season. Pure; the single source of truth for
    /// the season boundary rule.
    pub fn for_date(date: NaiveDate) -> Self {
        let (year, month) = (date.year(), date.month());
        match month {
            7 | 8 => SeasonKey::Summer { year },
            9..=12 => SeasonKey::Regular {
                start_year: year,
                end_year: year + 1,
            },
            _ => SeasonKey::Regular {
                start_year: year - 1,
                end_year: year,
            },
        }
    }

    pub fn is_summer(&self) -> bool {
        matches!(self, SeasonKey::Summer { .. })
    }
}

impl std::fmt::Display for SeasonKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeasonKey::Summer { year } => write!(f, "Summer {}", year),
            SeasonKey::Regular {
                start_year,
                end_year,
            } => write!(f, "Regular {}-{}", start_year, end_year),
        }
    }
}

impl std::str::FromStr for SeasonKey {
    type Err = ();

    /// Parse the display form back ("Summer 2025", "Regular 2024-2025").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(year) = s.strip_prefix("Summer ") {
            let year: i32 = year.trim().parse().map_err(|_| ())?;
            return Ok(SeasonKey::Summer { year });
        }
        if let Some(range) = s.strip_prefix("Regular ") {
            let (start, end) = range.trim().split_once('-').ok_or(())?;
            let start_year: i32 = start.parse().map_err(|_| ())?;
            let end_year: i32 = end.parse().map_err(|_| ())?;
            if end_year != start_year + 1 {
                return Err(());
            }
            return Ok(SeasonKey::Regular {
                start_year,
                end_year,
            });
        }
        Err(())
    }
}

/// All enriched game rows of one season, ordered by date. Each (name, date)
/// pair is unique; game indices are always a dense 1..K chronological
/// sequence over the distinct dates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeasonLedger {
    pub season: SeasonKey,
    rows: Vec<GameRow>,
}

impl SeasonLedger {
    /// Create an empty ledger for a season (a brand-new season has no games).
    pub fn new(season: SeasonKey) -> Self {
        Self {
            season,
            rows: Vec::new(),
        }
    }

    /// Rebuild a ledger from persisted rows; renumbers so indices are dense
    /// regardless of what was stored.
    pub fn from_rows(season: SeasonKey, rows: Vec<GameRow>) -> Self {
        let mut ledger = Self { season, rows };
        ledger.renumber();
        ledger
    }

    pub fn rows(&self) -> &[GameRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct game dates, ascending.
    pub fn distinct_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.rows.iter().map(|r| r.date).collect();
        dates.sort();
        dates.dedup();
        dates
    }

    /// Number of games (distinct dates) in the ledger.
    pub fn game_count(&self) -> u32 {
        self.distinct_dates().len() as u32
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.rows.iter().any(|r| r.date == date)
    }

    /// The game index currently assigned to a date, if that date was played.
    pub fn game_index_for(&self, date: NaiveDate) -> Option<u32> {
        self.rows
            .iter()
            .find(|r| r.date == date)
            .map(|r| r.game_index)
    }

    /// Append one game's rows. All rows must share one date; a date already
    /// present is rejected and the ledger is left untouched.
    pub fn append(&mut self, game_rows: Vec<GameRow>) -> Result<(), LeagueError> {
        let date = match game_rows.first() {
            Some(row) => row.date,
            None => return Err(LeagueError::Enrichment("empty game".to_string())),
        };
        if self.contains_date(date) {
            return Err(LeagueError::DuplicateGame {
                date,
                season: self.season,
            });
        }
        self.rows.extend(game_rows);
        self.renumber();
        Ok(())
    }

    /// Delete all rows of one game and renumber the remainder. Returns the
    /// number of games left.
    pub fn remove_game(&mut self, game_index: u32) -> Result<u32, LeagueError> {
        if !self.rows.iter().any(|r| r.game_index == game_index) {
            return Err(LeagueError::GameNotFound(game_index));
        }
        self.rows.retain(|r| r.game_index != game_index);
        self.renumber();
        Ok(self.game_count())
    }

    /// Smart game numbering: sort rows by date and assign each row's
    /// game_index as the 1-based rank of its date among the distinct dates.
    /// Always re-derived from scratch, so deleting game 3 of 10 shifts games
    /// 4-10 down to 3-9 while keeping chronological order.
    fn renumber(&mut self) {
        self.rows.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        let dates = self.distinct_dates();
        for row in &mut self.rows {
            // Position is always found: dates was just built from these rows.
            let position = dates.iter().position(|d| *d == row.date).unwrap_or(0);
            row.game_index = position as u32 + 1;
        }
    }
}
