//! Pivoted per-date views and the final ranked tables.

use crate::logic::aggregate::{self, SeasonSummaryRow};
use crate::models::{Metric, SeasonLedger, DATE_FORMAT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Player-by-date matrix for one metric. Columns are the season's distinct
/// dates in calendar order (never string order, which would misplace
/// DD/MM/YYYY dates); a missing cell means the player skipped that date.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    pub dates: Vec<NaiveDate>,
    pub cells: BTreeMap<String, Vec<Option<f64>>>,
}

/// A presentation-ready ranked table: header row, then one row of formatted
/// cells per player, best first, with a dense 1-based rank in column "P".
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Summer percent tables: (player, formatted date) cells that do not
    /// count toward the ranking under the best-5 rule. Empty otherwise.
    pub non_counting: Vec<(String, String)>,
}

/// Project the ledger into a per-date matrix for one metric.
pub fn make_pivot(ledger: &SeasonLedger, metric: Metric) -> PivotTable {
    let dates = ledger.distinct_dates();
    let mut cells: BTreeMap<String, Vec<Option<f64>>> = BTreeMap::new();
    for row in ledger.rows() {
        let values = cells
            .entry(row.name.clone())
            .or_insert_with(|| vec![None; dates.len()]);
        if let Some(col) = dates.iter().position(|d| *d == row.date) {
            values[col] = Some(row.metric(metric));
        }
    }
    PivotTable { dates, cells }
}

/// Build the final ranked table for one metric: season summary columns
/// left-joined with the pivot's date columns, sorted by the metric's season
/// total descending (ties broken by name), rank assigned as a leading
/// column. Summer seasons rank percent by the best-5 variant and tag the
/// non-counting cells.
pub fn ranked_table(ledger: &SeasonLedger, metric: Metric) -> RankedTable {
    let summer = ledger.season.is_summer();
    let summary = if summer {
        aggregate::summer_summary(ledger)
    } else {
        aggregate::season_summary(ledger)
    };
    let pivot = make_pivot(ledger, metric);

    let mut ranked: Vec<&SeasonSummaryRow> = summary.iter().collect();
    ranked.sort_by(|a, b| {
        sort_value(b, metric)
            .partial_cmp(&sort_value(a, metric))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut headers = vec!["P".to_string(), "Name".to_string(), "Class".to_string()];
    headers.extend(summary_headers(metric, summer));
    headers.extend(pivot.dates.iter().map(|d| d.format(DATE_FORMAT).to_string()));

    let blank_dates = vec![None; pivot.dates.len()];
    let rows = ranked
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let mut row = vec![(i + 1).to_string(), s.name.clone(), s.class.to_string()];
            row.extend(summary_cells(s, metric, summer));
            // Left join: a summary player absent from the pivot keeps blank
            // date cells rather than being dropped.
            let values = pivot.cells.get(&s.name).unwrap_or(&blank_dates);
            row.extend(values.iter().map(|v| format_cell(*v, metric)));
            row
        })
        .collect();

    let non_counting = if summer && metric == Metric::Percent {
        aggregate::non_counting_dates(ledger)
            .into_iter()
            .map(|(name, date)| (name, date.format(DATE_FORMAT).to_string()))
            .collect()
    } else {
        Vec::new()
    };

    RankedTable {
        headers,
        rows,
        non_counting,
    }
}

/// The season value a metric's table is sorted and ranked by.
fn sort_value(row: &SeasonSummaryRow, metric: Metric) -> f64 {
    match metric {
        Metric::Percent => row.percent_best_five.unwrap_or(row.percent),
        Metric::RankingPoints => row.avg_ranking_points,
        Metric::Points => row.total_rank_points as f64,
    }
}

fn summary_headers(metric: Metric, summer: bool) -> Vec<String> {
    let labels: &[&str] = match metric {
        Metric::Percent if summer => {
            &["Tot. max", "Tot. score", "% (all)", "% (best 5)"]
        }
        Metric::Percent => &["Tot. max", "Tot. score", "%"],
        Metric::RankingPoints => &["Avg RP"],
        Metric::Points => &["Tot. points"],
    };
    labels.iter().map(|s| s.to_string()).collect()
}

fn summary_cells(row: &SeasonSummaryRow, metric: Metric, summer: bool) -> Vec<String> {
    match metric {
        Metric::Percent if summer => vec![
            row.total_theoretical_max.to_string(),
            row.total_score.to_string(),
            format!("{:.2}", row.percent),
            format!("{:.2}", row.percent_best_five.unwrap_or(row.percent)),
        ],
        Metric::Percent => vec![
            row.total_theoretical_max.to_string(),
            row.total_score.to_string(),
            format!("{:.2}", row.percent),
        ],
        Metric::RankingPoints => vec![format!("{:.2}", row.avg_ranking_points)],
        Metric::Points => vec![row.total_rank_points.to_string()],
    }
}

/// Percent and RP cells carry two decimals; points are whole numbers; a
/// skipped date stays blank.
fn format_cell(value: Option<f64>, metric: Metric) -> String {
    match value {
        None => String::new(),
        Some(v) => match metric {
            Metric::Points => format!("{}", v as i64),
            _ => format!("{:.2}", v),
        },
    }
}
