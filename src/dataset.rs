//! Typed pitch table loaded once from the tracking CSV.

use std::cmp::Ordering;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result, SchemaError};
use crate::filter::Selection;

/// Header names every pitch file must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 19] = [
    "PitcherId",
    "BatterId",
    "Inning_Top_Bottom",
    "At_Bat_Num",
    "PitchType",
    "HorzBreak",
    "InducedVerticalBreak",
    "PlateX",
    "PlateZ",
    "ReleaseSpeed",
    "LaunchSpeed",
    "LaunchAngle",
    "PitchCall",
    "PitchResult",
    "LandingPositionX",
    "LandingPositionY",
    "Balls",
    "Strikes",
    "slg",
];

/// Opaque pitcher/batter identifier.
///
/// Ids that both look like integers sort numerically so selector lists come out
/// as `2, 10, 100` rather than `10, 100, 2`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn numeric(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }
}

impl Ord for PlayerId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric(), other.numeric()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for PlayerId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InningHalf {
    Top,
    Bottom,
    /// Anything the feed writes that is neither half (kept, but belongs to no side)
    Other(String),
}

impl From<String> for InningHalf {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Top" => InningHalf::Top,
            "Bottom" => InningHalf::Bottom,
            _ => InningHalf::Other(s),
        }
    }
}

impl From<InningHalf> for String {
    fn from(h: InningHalf) -> Self {
        match h {
            InningHalf::Top => "Top".to_string(),
            InningHalf::Bottom => "Bottom".to_string(),
            InningHalf::Other(s) => s,
        }
    }
}

/// Coarse outcome used by the statistics engine.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PitchResult {
    Hit,
    Walk,
    Out,
    NotInPlay,
    Other(String),
}

impl PitchResult {
    pub fn label(&self) -> &str {
        match self {
            PitchResult::Hit => "Hit",
            PitchResult::Walk => "Walk",
            PitchResult::Out => "Out",
            PitchResult::NotInPlay => "Not In-Play",
            PitchResult::Other(s) => s,
        }
    }
}

impl From<String> for PitchResult {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Hit" => PitchResult::Hit,
            "Walk" => PitchResult::Walk,
            "Out" => PitchResult::Out,
            "Not In-Play" => PitchResult::NotInPlay,
            _ => PitchResult::Other(s),
        }
    }
}

impl From<PitchResult> for String {
    fn from(r: PitchResult) -> Self {
        match r {
            PitchResult::Other(s) => s,
            known => known.label().to_string(),
        }
    }
}

/// Fine-grained call on the pitch (`BallCalled`, `InPlay`, `strikeout`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PitchCall(String);

impl PitchCall {
    pub fn new(call: impl Into<String>) -> Self {
        Self(call.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_strikeout(&self) -> bool {
        self.0 == "strikeout"
    }
}

impl fmt::Display for PitchCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One tracked pitch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PitchEvent {
    #[serde(rename = "PitcherId")]
    pub pitcher_id: PlayerId,
    #[serde(rename = "BatterId")]
    pub batter_id: PlayerId,
    #[serde(rename = "Inning_Top_Bottom")]
    pub inning_half: InningHalf,
    #[serde(rename = "At_Bat_Num")]
    pub at_bat_number: u32,
    #[serde(rename = "PitchType")]
    pub pitch_type: String,
    #[serde(rename = "HorzBreak")]
    pub horizontal_break: Option<f64>,
    #[serde(rename = "InducedVerticalBreak")]
    pub induced_vertical_break: Option<f64>,
    #[serde(rename = "PlateX")]
    pub plate_x: Option<f64>,
    #[serde(rename = "PlateZ")]
    pub plate_z: Option<f64>,
    #[serde(rename = "ReleaseSpeed")]
    pub release_speed: Option<f64>,
    #[serde(rename = "LaunchSpeed")]
    pub launch_speed: Option<f64>,
    #[serde(rename = "LaunchAngle")]
    pub launch_angle: Option<f64>,
    #[serde(rename = "PitchCall")]
    pub pitch_call: PitchCall,
    #[serde(rename = "PitchResult")]
    pub pitch_result: PitchResult,
    #[serde(rename = "LandingPositionX")]
    pub landing_position_x: Option<f64>,
    #[serde(rename = "LandingPositionY")]
    pub landing_position_y: Option<f64>,
    #[serde(rename = "Balls")]
    pub balls: u8,
    #[serde(rename = "Strikes")]
    pub strikes: u8,
    pub slg: f64,
}

impl PitchEvent {
    /// Horizontal break and induced vertical break, when the tracker caught both.
    pub fn movement(&self) -> Option<(f64, f64)> {
        self.horizontal_break.zip(self.induced_vertical_break)
    }

    /// Where the pitch crossed the plate.
    pub fn plate_location(&self) -> Option<(f64, f64)> {
        self.plate_x.zip(self.plate_z)
    }

    /// Landing spot, only when both coordinates were recorded.
    pub fn landing_position(&self) -> Option<(f64, f64)> {
        self.landing_position_x.zip(self.landing_position_y)
    }

    // NaN cells written by the upstream export count as missing
    fn normalize(mut self) -> Self {
        for v in [
            &mut self.horizontal_break,
            &mut self.induced_vertical_break,
            &mut self.plate_x,
            &mut self.plate_z,
            &mut self.release_speed,
            &mut self.launch_speed,
            &mut self.launch_angle,
            &mut self.landing_position_x,
            &mut self.landing_position_y,
        ] {
            if v.is_some_and(|x| !x.is_finite()) {
                *v = None;
            }
        }
        self
    }
}

/// Immutable pitch table. Built once at startup and handed to whoever needs it.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    source: String,
    rows: Vec<PitchEvent>,
}

impl Dataset {
    pub fn from_rows(source: impl Into<String>, rows: Vec<PitchEvent>) -> Self {
        Self {
            source: source.into(),
            rows: rows.into_iter().map(PitchEvent::normalize).collect(),
        }
    }

    /// Reads the pitch CSV at `path`. Any schema problem aborts the load.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let file = File::open(path).map_err(|source| Error::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_reader(file, display)
    }

    /// Same as [`Dataset::read_csv`] over any reader; `source` names it in errors.
    pub fn from_reader<R: Read>(reader: R, source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(|e| SchemaError::Header {
            path: source.clone(),
            source: e,
        })?;
        let labels: Vec<&str> = headers.iter().collect();
        debug!(columns = labels.len(), "read header of {}", source);
        if let Some(column) = REQUIRED_COLUMNS.iter().copied().find(|c| !labels.contains(c)) {
            return Err(SchemaError::MissingColumn {
                path: source,
                column,
            }
            .into());
        }

        let mut rows = Vec::new();
        for result in reader.deserialize::<PitchEvent>() {
            let row = result.map_err(|e| SchemaError::InvalidRow {
                path: source.clone(),
                line: e.position().map(|p| p.line()).unwrap_or(0), // 0 if csv lost the position
                message: e.to_string(),
            })?;
            rows.push(row.normalize());
        }

        info!(rows = rows.len(), "loaded pitch data from {}", source);
        Ok(Self { source, rows })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn rows(&self) -> &[PitchEvent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// A view over every row, the starting point of each pipeline run.
    pub fn selection(&self) -> Selection<'_> {
        Selection::new(self.rows.iter().collect())
    }
}
