//! Season file persistence: one delimited file per season, one physical row
//! per (player, date). Column names and the B1..BK turn-column pattern are
//! the export contract other club tooling reads; keep them stable.

use crate::models::{
    GameRow, LeagueError, Member, PlayerClass, SeasonKey, SeasonLedger, DATE_FORMAT,
};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Season files use the club's semicolon convention, like the score sheets.
const DELIMITER: u8 = b';';

/// Fixed leading columns of a season file, before the turn columns.
const BASE_COLUMNS: [&str; 15] = [
    "Naam",
    "Datum",
    "GameNr",
    "KLASSE",
    "Totaal",
    "TheoMax",
    "Percent",
    "RP",
    "Maxes",
    "Punten",
    "Beurten",
    "Scrabbles",
    "Solo's",
    "Soloscrabbles",
    "Nulscores",
];

/// File a season persists to, inside the data directory.
pub fn season_path(data_dir: &Path, season: SeasonKey) -> PathBuf {
    data_dir.join(format!("{}.csv", season))
}

/// Find every persisted season in the data directory. A missing directory is
/// an empty league, not an error.
pub fn scan_seasons(data_dir: &Path) -> Result<Vec<SeasonKey>, LeagueError> {
    let entries = match fs::read_dir(data_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(persistence(data_dir, e)),
    };
    let mut seasons = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| persistence(data_dir, e))?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            if let Ok(season) = stem.parse::<SeasonKey>() {
                seasons.push(season);
            }
        }
    }
    seasons.sort();
    Ok(seasons)
}

/// Write a season file. The new contents go to a `.tmp` sibling first and
/// are renamed over the old file, so a crash mid-write never leaves a
/// half-written season on disk.
pub fn save_season(data_dir: &Path, ledger: &SeasonLedger) -> Result<(), LeagueError> {
    fs::create_dir_all(data_dir).map_err(|e| persistence(data_dir, e))?;
    let path = season_path(data_dir, ledger.season);
    let tmp = path.with_extension("csv.tmp");

    let turn_count = ledger
        .rows()
        .iter()
        .map(|r| r.turns_played as usize)
        .max()
        .unwrap_or(0);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_path(&tmp)
        .map_err(|e| LeagueError::Persistence(format!("{}: {}", tmp.display(), e)))?;

    let mut header: Vec<String> = BASE_COLUMNS.iter().map(|s| s.to_string()).collect();
    header.extend((1..=turn_count).map(|n| format!("B{}", n)));
    writer
        .write_record(&header)
        .map_err(|e| LeagueError::Persistence(e.to_string()))?;

    for row in ledger.rows() {
        let mut record = vec![
            row.name.clone(),
            row.formatted_date(),
            row.game_index.to_string(),
            row.class.map(|c| c.to_string()).unwrap_or_default(),
            row.total.to_string(),
            row.theoretical_max.to_string(),
            row.percent.to_string(),
            row.ranking_points.to_string(),
            row.max_turn_count.to_string(),
            row.rank_points.to_string(),
            row.turns_played.to_string(),
            row.scrabbles.to_string(),
            row.solos.to_string(),
            row.solo_scrabbles.to_string(),
            row.zero_scores.to_string(),
        ];
        // Shorter games leave their trailing turn cells blank.
        for i in 0..turn_count {
            let cell = row
                .turn_scores
                .get(i)
                .and_then(|s| *s)
                .map(|s| s.to_string())
                .unwrap_or_default();
            record.push(cell);
        }
        writer
            .write_record(&record)
            .map_err(|e| LeagueError::Persistence(e.to_string()))?;
    }
    writer
        .flush()
        .map_err(|e| LeagueError::Persistence(e.to_string()))?;
    drop(writer);

    fs::rename(&tmp, &path).map_err(|e| persistence(&path, e))
}

/// Load a season file back into a ledger. An absent file is an empty season.
/// Rows are renumbered after load so indices are dense even if the file was
/// edited by hand.
pub fn load_season(data_dir: &Path, season: SeasonKey) -> Result<SeasonLedger, LeagueError> {
    let path = season_path(data_dir, season);
    if !path.exists() {
        return Ok(SeasonLedger::new(season));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_path(&path)
        .map_err(|e| persistence(&path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| persistence(&path, e))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| {
                LeagueError::Persistence(format!(
                    "{}: column '{}' is missing",
                    path.display(),
                    name
                ))
            })
    };
    let name_col = column("Naam")?;
    let date_col = column("Datum")?;
    let class_col = column("KLASSE")?;
    let total_col = column("Totaal")?;
    let max_col = column("TheoMax")?;
    let percent_col = column("Percent")?;
    let rp_col = column("RP")?;
    let maxes_col = column("Maxes")?;
    let points_col = column("Punten")?;
    let turns_col = column("Beurten")?;
    let scrabbles_col = column("Scrabbles")?;
    let solos_col = column("Solo's")?;
    let solo_scrabbles_col = column("Soloscrabbles")?;
    let zeros_col = column("Nulscores")?;

    let mut turn_cols: Vec<(usize, u32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| {
            h.strip_prefix('B')
                .and_then(|d| d.parse::<u32>().ok())
                .map(|n| (i, n))
        })
        .collect();
    turn_cols.sort_by_key(|(_, n)| *n);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| persistence(&path, e))?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();
        let int = |i: usize| -> Result<i64, LeagueError> {
            let c = cell(i);
            if c.is_empty() {
                return Ok(0);
            }
            c.parse().map_err(|_| bad_cell(&path, &headers, i, c))
        };
        let float = |i: usize| -> Result<f64, LeagueError> {
            let c = cell(i);
            if c.is_empty() {
                return Ok(0.0);
            }
            c.parse().map_err(|_| bad_cell(&path, &headers, i, c))
        };

        let date = NaiveDate::parse_from_str(cell(date_col), DATE_FORMAT)
            .map_err(|_| bad_cell(&path, &headers, date_col, cell(date_col)))?;
        let turns_played = int(turns_col)? as u32;

        // Only this game's turns; the file is as wide as the season's
        // widest game.
        let turn_scores = turn_cols
            .iter()
            .take(turns_played as usize)
            .map(|&(i, _)| {
                let c = cell(i);
                if c.is_empty() {
                    Ok(None)
                } else {
                    c.parse::<i64>()
                        .map(Some)
                        .map_err(|_| bad_cell(&path, &headers, i, c))
                }
            })
            .collect::<Result<Vec<Option<i64>>, LeagueError>>()?;

        rows.push(GameRow {
            name: cell(name_col).to_string(),
            date,
            game_index: 0, // reassigned by renumbering below
            class: PlayerClass::parse(cell(class_col)),
            turn_scores,
            total: int(total_col)?,
            theoretical_max: int(max_col)?,
            percent: float(percent_col)?,
            ranking_points: float(rp_col)?,
            max_turn_count: int(maxes_col)? as u32,
            rank_points: int(points_col)?,
            turns_played,
            scrabbles: int(scrabbles_col)?,
            solos: int(solos_col)?,
            solo_scrabbles: int(solo_scrabbles_col)?,
            zero_scores: int(zeros_col)?,
        });
    }

    Ok(SeasonLedger::from_rows(season, rows))
}

/// Load the club roster from a members file (columns `Naam`/`NAAM`,
/// `KLASSE`, optional `Club`). An absent file is an empty roster: uploads
/// still work, players just land without a class.
pub fn load_roster(path: &Path) -> Result<Vec<Member>, LeagueError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path).map_err(|e| persistence(path, e))?;
    let header_line = text.lines().next().unwrap_or("");
    let delimiter = if header_line.contains(';') { b';' } else { b',' };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| persistence(path, e))?
        .clone();
    let find = |names: &[&str]| {
        headers
            .iter()
            .position(|h| names.contains(&h.trim()))
    };
    let name_col = find(&["Naam", "NAAM"]).ok_or_else(|| {
        LeagueError::Persistence(format!("{}: no Naam column", path.display()))
    })?;
    let class_col = find(&["KLASSE", "Klasse"]);
    let club_col = find(&["Club", "CLUB"]);

    let mut members = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| persistence(path, e))?;
        let name = record.get(name_col).unwrap_or("").trim();
        if name.is_empty() {
            continue;
        }
        let class = class_col
            .and_then(|i| record.get(i))
            .and_then(PlayerClass::parse);
        let club = club_col
            .and_then(|i| record.get(i))
            .unwrap_or("")
            .trim()
            .to_string();
        members.push(Member {
            name: name.to_string(),
            club,
            class,
        });
    }
    Ok(members)
}

fn persistence(path: &Path, e: impl std::fmt::Display) -> LeagueError {
    LeagueError::Persistence(format!("{}: {}", path.display(), e))
}

fn bad_cell(path: &Path, headers: &csv::StringRecord, col: usize, value: &str) -> LeagueError {
    LeagueError::Persistence(format!(
        "{}: bad value '{}' in column '{}'",
        path.display(),
        value,
        headers.get(col).unwrap_or("?")
    ))
}
