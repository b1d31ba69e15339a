//! Row filters over a [`Dataset`](crate::dataset::Dataset).
//!
//! Every filter borrows rows and keeps their original order. Filters never touch
//! the rows themselves, so they can be chained in any order with the same result.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{InningHalf, PitchEvent, PitchResult, PlayerId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Home, Side::Away];

    /// Half-inning in which this side bats: the visitors bat in the top.
    pub fn batting_half(self) -> InningHalf {
        match self {
            Side::Away => InningHalf::Top,
            Side::Home => InningHalf::Bottom,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Home => f.write_str("Home"),
            Side::Away => f.write_str("Away"),
        }
    }
}

/// Whether a side is looked at while it bats or while it is in the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Perspective {
    Batting,
    Pitching,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Pitcher,
    Batter,
}

impl Role {
    pub fn id_of(self, row: &PitchEvent) -> &PlayerId {
        match self {
            Role::Pitcher => &row.pitcher_id,
            Role::Batter => &row.batter_id,
        }
    }
}

/// A single row predicate. Applying several is an intersection.
#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Side(Side, Perspective),
    Player(PlayerId, Role),
    PitchTypes(Vec<String>),
    AtBats(Vec<u32>),
    InPlay,
    BattedBalls,
}

impl Filter {
    pub fn matches(&self, row: &PitchEvent) -> bool {
        match self {
            Filter::Side(side, perspective) => {
                let batting = row.inning_half == side.batting_half();
                match perspective {
                    Perspective::Batting => batting,
                    Perspective::Pitching => !batting, // complement of the batting mask
                }
            }
            Filter::Player(id, role) => role.id_of(row) == id,
            Filter::PitchTypes(allowed) => allowed.iter().any(|t| *t == row.pitch_type),
            Filter::AtBats(allowed) => allowed.contains(&row.at_bat_number),
            Filter::InPlay => row.pitch_result != PitchResult::NotInPlay,
            Filter::BattedBalls => {
                !matches!(row.pitch_result, PitchResult::Walk | PitchResult::NotInPlay)
                    && !row.pitch_call.is_strikeout()
            }
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Filter::Side(..) => "side",
            Filter::Player(..) => "player",
            Filter::PitchTypes(_) => "pitch types",
            Filter::AtBats(_) => "at-bats",
            Filter::InPlay => "in play",
            Filter::BattedBalls => "batted balls",
        }
    }
}

/// An ordered view of borrowed pitch rows.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection<'a> {
    rows: Vec<&'a PitchEvent>,
}

impl<'a> Selection<'a> {
    pub fn new(rows: Vec<&'a PitchEvent>) -> Self {
        Self { rows }
    }

    pub fn apply(&self, filter: &Filter) -> Selection<'a> {
        let rows: Vec<&'a PitchEvent> = self
            .rows
            .iter()
            .copied()
            .filter(|r| filter.matches(r))
            .collect();
        debug!(
            filter = filter.name(),
            before = self.rows.len(),
            after = rows.len(),
            "applied filter"
        );
        Selection { rows }
    }

    pub fn rows(&self) -> &[&'a PitchEvent] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a PitchEvent> + Clone + '_ {
        self.rows.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sorted distinct ids for the given role.
    pub fn players(&self, role: Role) -> Vec<PlayerId> {
        let ids: BTreeSet<&PlayerId> = self.iter().map(|r| role.id_of(r)).collect();
        ids.into_iter().cloned().collect()
    }

    /// Distinct pitch types, most thrown first. Ties keep first-seen order.
    pub fn pitch_types(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut seen: Vec<&str> = Vec::new();
        for row in self.iter() {
            let count = counts.entry(row.pitch_type.as_str()).or_insert(0);
            if *count == 0 {
                seen.push(row.pitch_type.as_str());
            }
            *count += 1;
        }
        seen.sort_by(|a, b| counts[b].cmp(&counts[a])); // stable, so ties stay in seen order
        seen.into_iter().map(str::to_string).collect()
    }

    /// Sorted distinct at-bat numbers.
    pub fn at_bats(&self) -> Vec<u32> {
        let numbers: BTreeSet<u32> = self.iter().map(|r| r.at_bat_number).collect();
        numbers.into_iter().collect()
    }

    /// Stacks one `(x, y)` pair per row into an `(n, 2)` matrix. Rows where `f`
    /// gives `None` are left out.
    pub fn xy<F>(&self, f: F) -> Array2<f64>
    where
        F: Fn(&PitchEvent) -> Option<(f64, f64)>,
    {
        xy_matrix(self.iter().filter_map(f))
    }
}

pub(crate) fn xy_matrix(points: impl Iterator<Item = (f64, f64)>) -> Array2<f64> {
    let flat: Vec<f64> = points.flat_map(|(x, y)| [x, y]).collect();
    let n = flat.len() / 2;
    Array2::from_shape_vec((n, 2), flat).unwrap_or_else(|_| Array2::zeros((0, 2)))
}

pub fn select_side<'a>(
    data: &Selection<'a>,
    side: Side,
    perspective: Perspective,
) -> Selection<'a> {
    data.apply(&Filter::Side(side, perspective))
}

pub fn select_by_player<'a>(
    data: &Selection<'a>,
    player: &PlayerId,
    role: Role,
) -> Selection<'a> {
    data.apply(&Filter::Player(player.clone(), role))
}

pub fn select_by_pitch_types<'a>(data: &Selection<'a>, allowed: &[String]) -> Selection<'a> {
    data.apply(&Filter::PitchTypes(allowed.to_vec()))
}

pub fn select_by_at_bats<'a>(data: &Selection<'a>, allowed: &[u32]) -> Selection<'a> {
    data.apply(&Filter::AtBats(allowed.to_vec()))
}

pub fn select_in_play<'a>(data: &Selection<'a>) -> Selection<'a> {
    data.apply(&Filter::InPlay)
}

pub fn select_batted_balls<'a>(data: &Selection<'a>) -> Selection<'a> {
    data.apply(&Filter::BattedBalls)
}
