//! Batting rates, at-bat result lines and pitch arsenal summaries.

use std::fmt;

use ndarray::{Array2, Axis};
use serde::Serialize;
use tracing::debug;

use crate::dataset::{PitchCall, PitchEvent, PitchResult};
use crate::error::{Error, Result};
use crate::filter::Selection;

/// Counting stats for a set of plate-appearance-ending rows.
///
/// Feed it in-play rows (see [`crate::filter::select_in_play`]); each row is one PA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BattingLine {
    pub plate_appearances: usize,
    pub at_bats: usize,
    pub hits: usize,
    pub walks: usize,
    pub outs: usize,
    /// Results that are none of hit, walk or out
    pub other: usize,
    /// Sum of the per-pitch slugging weights
    pub total_bases: f64,
}

impl BattingLine {
    pub fn from_selection(rows: &Selection<'_>) -> Self {
        let mut line = BattingLine::default();
        for row in rows.iter() {
            line.plate_appearances += 1;
            line.total_bases += row.slg;
            match row.pitch_result {
                PitchResult::Hit => line.hits += 1,
                PitchResult::Walk => line.walks += 1,
                PitchResult::Out => line.outs += 1,
                _ => line.other += 1,
            }
        }
        line.at_bats = line.plate_appearances - line.walks; // walks are not at-bats
        line
    }

    pub fn batting_average(&self) -> Result<f64> {
        ratio(self.hits as f64, self.at_bats, "batting average", "at-bats")
    }

    pub fn slugging(&self) -> Result<f64> {
        ratio(self.total_bases, self.at_bats, "slugging percentage", "at-bats")
    }

    pub fn on_base(&self) -> Result<f64> {
        ratio(
            (self.hits + self.walks) as f64,
            self.plate_appearances,
            "on-base percentage",
            "plate appearances",
        )
    }

    /// The three rates in display order, each with its label.
    pub fn rates(&self) -> [(&'static str, Result<f64>); 3] {
        [
            ("Batting Average", self.batting_average()),
            ("Slugging Percentage", self.slugging()),
            ("On Base Percentage", self.on_base()),
        ]
    }
}

fn ratio(
    numerator: f64,
    denominator: usize,
    statistic: &'static str,
    name: &'static str,
) -> Result<f64> {
    if denominator == 0 {
        return Err(Error::UndefinedStatistic {
            statistic,
            denominator: name,
        });
    }
    Ok(numerator / denominator as f64)
}

/// `Batting Average:  0.667`, or `... unavailable` when the rate is undefined.
pub fn format_rate(label: &str, rate: &Result<f64>) -> String {
    match rate {
        Ok(value) => format!("{}: {:6.3}", label, value),
        Err(_) => format!("{}: unavailable", label),
    }
}

/// Outcome of one plate appearance, numbered from 1 in row order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AtBatResult<'a> {
    pub ordinal: usize,
    pub pitch_call: &'a PitchCall,
    pub balls: u8,
    pub strikes: u8,
}

impl fmt::Display for AtBatResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AB {} Result: {} ({}-{})",
            self.ordinal, self.pitch_call, self.balls, self.strikes
        )
    }
}

/// Lazy walk over in-play rows. Clone it to start over.
#[derive(Clone, Debug)]
pub struct AtBatSummary<'s, 'a> {
    rows: std::iter::Enumerate<std::slice::Iter<'s, &'a PitchEvent>>,
}

impl<'s, 'a> Iterator for AtBatSummary<'s, 'a> {
    type Item = AtBatResult<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (i, row) = self.rows.next()?;
        Some(AtBatResult {
            ordinal: i + 1,
            pitch_call: &row.pitch_call,
            balls: row.balls,
            strikes: row.strikes,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for AtBatSummary<'_, '_> {}

pub fn summarize_at_bats<'s, 'a>(rows: &'s Selection<'a>) -> AtBatSummary<'s, 'a> {
    AtBatSummary {
        rows: rows.rows().iter().enumerate(),
    }
}

/// Usage and average shape of one pitch type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArsenalEntry {
    pub pitch_type: String,
    pub count: usize,
    /// Share of the pitcher's pitches, 0..=1
    pub usage: f64,
    /// Pitches of this type with speed and both breaks recorded; the averages use only these
    pub tracked: usize,
    pub release_speed: f64,
    pub horizontal_break: f64,
    pub induced_vertical_break: f64,
}

impl fmt::Display for ArsenalEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<12} {:>4} ({:>5.1}%)  {:>5.1} mph  HB {:>5.1}  IVB {:>5.1}",
            self.pitch_type,
            self.count,
            self.usage * 100.0,
            self.release_speed,
            self.horizontal_break,
            self.induced_vertical_break
        )
    }
}

fn shape(row: &PitchEvent) -> Option<[f64; 3]> {
    let (hb, ivb) = row.movement()?;
    Some([row.release_speed?, hb, ivb])
}

/// Per-type averages, most thrown type first.
///
/// Types with no fully tracked pitch are left out.
pub fn arsenal(rows: &Selection<'_>) -> Vec<ArsenalEntry> {
    let total = rows.len();
    let mut entries = Vec::new();
    for pitch_type in rows.pitch_types() {
        let group: Vec<&PitchEvent> = rows.iter().filter(|r| r.pitch_type == pitch_type).collect();
        let flat: Vec<f64> = group.iter().filter_map(|r| shape(r)).flatten().collect();
        let tracked = flat.len() / 3;
        let Ok(matrix) = Array2::from_shape_vec((tracked, 3), flat) else {
            continue;
        };
        let Some(means) = matrix.mean_axis(Axis(0)) else {
            debug!(pitch_type = %pitch_type, "no tracked pitches, left out of arsenal");
            continue;
        };
        entries.push(ArsenalEntry {
            count: group.len(),
            usage: group.len() as f64 / total as f64,
            tracked,
            release_speed: means[0],
            horizontal_break: means[1],
            induced_vertical_break: means[2],
            pitch_type,
        });
    }
    entries
}
