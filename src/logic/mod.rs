//! Score aggregation and ranking logic: parsing, enrichment, aggregation,
//! pivoting, and the engine that ties them to the season ledgers.

pub mod aggregate;
pub mod engine;
pub mod enrich;
pub mod parser;
pub mod pivot;

pub use aggregate::{
    best_five_dates, non_counting_dates, season_summary, summer_summary, SeasonSummaryRow,
    SUMMER_BEST_GAMES,
};
pub use engine::{GameListEntry, LeagueEngine, UploadOutcome};
pub use enrich::enrich_sheet;
pub use parser::parse_sheet;
pub use pivot::{make_pivot, ranked_table, PivotTable, RankedTable};
