//! Data structures for the ranking engine.

pub mod game;
pub mod ledger;
pub mod member;

pub use game::{GameRow, GameSheet, Metric, SheetRow, DATE_FORMAT, MAXIMUM_ROW};
pub use ledger::{LeagueError, SeasonKey, SeasonLedger};
pub use member::{Member, PlayerClass};
