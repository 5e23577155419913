//! Score sheet parsing: raw delimited text to a structured GameSheet.

use crate::models::{GameSheet, LeagueError, SheetRow};

/// Column headers the sheet must carry. Turn columns are detected
/// dynamically on top of these.
const NAME_COLUMN: &str = "Naam";
const TOTAL_COLUMN: &str = "Totaal";
const RANK_COLUMN: &str = "Nr";

/// Optional per-game counter columns; absent columns count as zero.
const SCRABBLES_COLUMN: &str = "Scrabbles";
const ZEROS_COLUMN: &str = "Nulscores";
const SOLOS_COLUMN: &str = "Solo's";
const SOLO_SCRABBLES_COLUMN: &str = "Soloscrabbles";

/// Parse an uploaded score sheet (semicolon- or comma-delimited). Turn
/// columns are found by the `B<digits>` header pattern, so 9-turn and
/// 22-turn formats both parse.
pub fn parse_sheet(raw: &[u8]) -> Result<GameSheet, LeagueError> {
    let text = std::str::from_utf8(raw)
        .map_err(|_| LeagueError::Parse("sheet is not valid UTF-8 text".to_string()))?;

    // The club exports use ';'; spreadsheet re-exports use ','. Decide from
    // the header line so a data error in the sheet body is not masked by a
    // retry under the wrong delimiter.
    let header_line = text.lines().next().unwrap_or("");
    let delimiter = if header_line.contains(';') { b';' } else { b',' };
    parse_with_delimiter(text, delimiter)
}

fn parse_with_delimiter(text: &str, delimiter: u8) -> Result<GameSheet, LeagueError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| LeagueError::Parse(format!("could not read header row: {}", e)))?
        .clone();

    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let name_col =
        column(NAME_COLUMN).ok_or_else(|| missing_column(NAME_COLUMN))?;
    let total_col =
        column(TOTAL_COLUMN).ok_or_else(|| missing_column(TOTAL_COLUMN))?;
    let rank_col = column(RANK_COLUMN).ok_or_else(|| missing_column(RANK_COLUMN))?;
    let scrabbles_col = column(SCRABBLES_COLUMN);
    let zeros_col = column(ZEROS_COLUMN);
    let solos_col = column(SOLOS_COLUMN);
    let solo_scrabbles_col = column(SOLO_SCRABBLES_COLUMN);

    // Turn columns: header 'B' followed by digits, kept in turn order.
    let mut turn_cols: Vec<(usize, u32)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| turn_number(h.trim()).map(|n| (i, n)))
        .collect();
    turn_cols.sort_by_key(|(_, n)| *n);
    if turn_cols.is_empty() {
        return Err(LeagueError::Parse(
            "no turn columns (B1, B2, ...) found in header".to_string(),
        ));
    }

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record =
            record.map_err(|e| LeagueError::Parse(format!("row {}: {}", line + 2, e)))?;
        let cell = |i: usize| record.get(i).unwrap_or("").trim();

        let name = cell(name_col).to_string();
        if name.is_empty() {
            // Trailing blank lines are common in exported sheets.
            if record.iter().all(|c| c.trim().is_empty()) {
                continue;
            }
            return Err(LeagueError::Parse(format!(
                "row {}: empty player name",
                line + 2
            )));
        }

        let rank = parse_int(cell(rank_col), RANK_COLUMN, &name)?.map(|n| n as u32);
        let total = parse_int(cell(total_col), TOTAL_COLUMN, &name)?;
        let turn_scores = turn_cols
            .iter()
            .map(|&(i, n)| parse_int(cell(i), &format!("B{}", n), &name))
            .collect::<Result<Vec<Option<i64>>, LeagueError>>()?;

        rows.push(SheetRow {
            name,
            rank,
            turn_scores,
            total,
            scrabbles: counter(&record, scrabbles_col, SCRABBLES_COLUMN)?,
            solos: counter(&record, solos_col, SOLOS_COLUMN)?,
            solo_scrabbles: counter(&record, solo_scrabbles_col, SOLO_SCRABBLES_COLUMN)?,
            zero_scores: counter(&record, zeros_col, ZEROS_COLUMN)?,
        });
    }

    Ok(GameSheet {
        turn_count: turn_cols.len(),
        rows,
    })
}

fn missing_column(name: &str) -> LeagueError {
    LeagueError::Parse(format!("required column '{}' is missing", name))
}

/// Header matches the turn-column pattern `B<digits>`; returns the turn number.
fn turn_number(header: &str) -> Option<u32> {
    let digits = header.strip_prefix('B')?;
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Parse an integer cell; blank cells are None, garbage is a parse error.
fn parse_int(cell: &str, column: &str, player: &str) -> Result<Option<i64>, LeagueError> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<i64>().map(Some).map_err(|_| {
        LeagueError::Parse(format!(
            "column '{}' for player '{}' is not a number: '{}'",
            column, player, cell
        ))
    })
}

/// Optional counter column: missing column or blank cell counts as zero.
fn counter(
    record: &csv::StringRecord,
    col: Option<usize>,
    name: &str,
) -> Result<i64, LeagueError> {
    let Some(col) = col else {
        return Ok(0);
    };
    let cell = record.get(col).unwrap_or("").trim();
    Ok(parse_int(cell, name, "")?.unwrap_or(0))
}
