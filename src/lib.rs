//! Scrabble club league rankings: library with models and ranking logic.

pub mod logic;
pub mod models;
pub mod storage;

pub use logic::{
    enrich_sheet, make_pivot, non_counting_dates, parse_sheet, ranked_table, season_summary,
    summer_summary, GameListEntry, LeagueEngine, PivotTable, RankedTable, SeasonSummaryRow,
    UploadOutcome,
};
pub use models::{
    GameRow, GameSheet, LeagueError, Member, Metric, PlayerClass, SeasonKey, SeasonLedger,
    SheetRow, DATE_FORMAT, MAXIMUM_ROW,
};
