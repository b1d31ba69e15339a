//! Renderer-agnostic plot descriptions.
//!
//! Nothing here draws. Each builder turns a [`Selection`] into a [`PlotSpec`] that a
//! front end (static raster, interactive web chart, ...) can paint however it likes.

use std::path::Path;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::dataset::PitchEvent;
use crate::filter::{select_batted_balls, xy_matrix, Selection};

pub const MOVEMENT_BOUNDS: ([f64; 2], [f64; 2]) = ([-30.0, 30.0], [-30.0, 30.0]);
pub const ZONE_BOUNDS: ([f64; 2], [f64; 2]) = ([-24.0, 24.0], [7.5, 54.0]);
/// Universal strike zone, inches from the middle of the plate and off the ground
pub const STRIKE_ZONE: ([f64; 2], [f64; 2]) = ([-8.5, 8.5], [19.5, 41.8]);
/// Field coordinates the stadium image is stretched over
pub const FIELD_EXTENT: ([f64; 2], [f64; 2]) = ([-300.0, 300.0], [-125.0, 500.0]);

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
    pub const fn with_a(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const ROYAL_BLUE: Self = Self::rgb(0.255, 0.412, 0.882);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlotKind {
    Movement,
    Zone,
    Spray,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interactivity {
    Static,
    Interactive,
}

/// Whether spray chart points carry their at-bat number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Labelling {
    PerAtBat,
    Unlabelled,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub range: [f64; 2],
}

impl Axis {
    fn new(label: &str, range: [f64; 2]) -> Self {
        Self {
            label: label.to_string(),
            range,
        }
    }
}

/// Fixed decorations drawn over the data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Guide {
    HLine { y: f64, color: Color, width: f32 },
    VLine { x: f64, color: Color, width: f32 },
    Rect { x: [f64; 2], y: [f64; 2], color: Color },
}

fn crosshair() -> [Guide; 2] {
    [
        Guide::HLine { y: 0.0, color: Color::BLACK, width: 2.0 },
        Guide::VLine { x: 0.0, color: Color::BLACK, width: 2.0 },
    ]
}

/// Image painted under the points, stretched to `extent`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Background {
    pub path: String,
    pub x: [f64; 2],
    pub y: [f64; 2],
}

/// Extra per-point fields shown when a point is inspected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PointMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at_bat_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_angle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_call: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    /// `(n, 2)`: one `[x, y]` row per point
    pub points: Array2<f64>,
    /// Continuous colour scale input, one per point (missing values drawn neutral)
    pub color_values: Option<Vec<Option<f64>>>,
    /// Text drawn next to each point
    pub annotations: Option<Vec<String>>,
    pub meta: Vec<PointMeta>,
    pub size: f32,
    pub opacity: f32,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Array2<f64>) -> Self {
        Self {
            label: label.into(),
            points,
            color_values: None,
            annotations: None,
            meta: Vec::new(),
            size: 6.0,
            opacity: 1.0,
        }
    }

    pub fn len(&self) -> usize {
        self.points.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.points.nrows() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlotSpec {
    pub title: String,
    pub kind: PlotKind,
    pub interactivity: Interactivity,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub series: Vec<Series>,
    pub guides: Vec<Guide>,
    pub background: Option<Background>,
    pub legend_title: Option<String>,
    /// Lines shown on hover, `{field}` placeholders refer to [`PointMeta`]
    pub hover_template: Vec<String>,
    pub show_grid: bool,
}

impl PlotSpec {
    fn new(title: &str, kind: PlotKind, x_axis: Axis, y_axis: Axis) -> Self {
        Self {
            title: title.to_string(),
            kind,
            interactivity: Interactivity::Interactive,
            x_axis,
            y_axis,
            series: Vec::new(),
            guides: Vec::new(),
            background: None,
            legend_title: None,
            hover_template: Vec::new(),
            show_grid: true,
        }
    }

    pub fn point_count(&self) -> usize {
        self.series.iter().map(Series::len).sum()
    }
}

/// Horizontal break against induced vertical break, one series per pitch type.
pub fn movement_plot(rows: &Selection<'_>, interactivity: Interactivity) -> PlotSpec {
    let (x, y) = MOVEMENT_BOUNDS;
    let mut plot = PlotSpec::new(
        "Movement Plot",
        PlotKind::Movement,
        Axis::new("Horizontal Break (in)", x),
        Axis::new("Induced Vertical Break (in)", y),
    );
    plot.interactivity = interactivity;
    plot.guides.extend(crosshair());
    plot.legend_title = Some("PitchType".to_string());

    for pitch_type in rows.pitch_types() {
        let group: Vec<(&PitchEvent, (f64, f64))> = rows
            .iter()
            .filter(|r| r.pitch_type == pitch_type)
            .filter_map(|r| r.movement().map(|m| (r, m)))
            .collect();
        if group.is_empty() {
            continue; // none of this type were tracked
        }
        let mut series = Series::new(pitch_type, xy_matrix(group.iter().map(|(_, m)| *m)));
        if interactivity == Interactivity::Interactive {
            series.meta = group
                .iter()
                .map(|(r, _)| PointMeta {
                    release_speed: r.release_speed,
                    pitch_call: Some(r.pitch_call.to_string()),
                    ..PointMeta::default()
                })
                .collect();
        }
        plot.series.push(series);
    }

    if interactivity == Interactivity::Interactive {
        plot.hover_template = vec![
            "Release Speed: {release_speed} mph".to_string(),
            "Result: {pitch_call}".to_string(),
        ];
    }
    plot
}

/// Pitch location at the plate, shaded by exit velocity, with the strike zone drawn in.
pub fn zone_plot(rows: &Selection<'_>) -> PlotSpec {
    let (x, y) = ZONE_BOUNDS;
    let mut plot = PlotSpec::new(
        "Hitter Plot",
        PlotKind::Zone,
        Axis::new("PlateX (in)", x),
        Axis::new("PlateZ (in)", y),
    );
    plot.guides.extend(crosshair());
    let (zone_x, zone_y) = STRIKE_ZONE;
    plot.guides.push(Guide::Rect {
        x: zone_x,
        y: zone_y,
        color: Color::ROYAL_BLUE.with_a(0.5),
    });
    plot.legend_title = Some("LaunchSpeed".to_string());
    plot.hover_template = vec![
        "At-Bat: {at_bat_number}".to_string(),
        "Pitch Type: {pitch_type}".to_string(),
        "Launch Speed: {launch_speed} mph".to_string(),
        "Launch Angle: {launch_angle} degrees".to_string(),
        "Result: {pitch_call}".to_string(),
    ];

    // rows the tracker lost at the plate are left off; meta stays aligned with points
    let located = Selection::new(rows.iter().filter(|r| r.plate_location().is_some()).collect());
    let mut series = Series::new("Pitches", located.xy(PitchEvent::plate_location));
    series.color_values = Some(located.iter().map(|r| r.launch_speed).collect());
    series.meta = located
        .iter()
        .map(|r| PointMeta {
            at_bat_number: Some(r.at_bat_number),
            pitch_type: Some(r.pitch_type.clone()),
            launch_speed: r.launch_speed,
            launch_angle: r.launch_angle,
            pitch_call: Some(r.pitch_call.to_string()),
            ..PointMeta::default()
        })
        .collect();
    plot.series.push(series);
    plot
}

/// Landing spots of batted balls, one series per pitch call, over the stadium image.
///
/// Walks, pitches not put in play and strikeouts are dropped here even if the
/// caller already filtered them. Rows without a landing position are skipped.
pub fn spray_chart(
    rows: &Selection<'_>,
    stadium: Option<&Path>,
    labelling: Labelling,
) -> PlotSpec {
    let (x, y) = FIELD_EXTENT;
    let mut plot = PlotSpec::new(
        "Spray Chart",
        PlotKind::Spray,
        Axis::new("LandingPositionX (ft)", x),
        Axis::new("LandingPositionY (ft)", y),
    );
    plot.interactivity = Interactivity::Static;
    plot.show_grid = false;
    plot.legend_title = Some("PitchCall".to_string());
    plot.background = stadium.map(|p| Background {
        path: p.display().to_string(),
        x,
        y,
    });

    let batted = select_batted_balls(rows);
    let mut calls: Vec<&str> = Vec::new();
    for row in batted.iter() {
        if !calls.contains(&row.pitch_call.as_str()) {
            calls.push(row.pitch_call.as_str());
        }
    }

    for call in calls {
        let group: Vec<(&PitchEvent, (f64, f64))> = batted
            .iter()
            .filter(|r| r.pitch_call.as_str() == call)
            .filter_map(|r| r.landing_position().map(|p| (r, p)))
            .collect();
        if group.is_empty() {
            continue;
        }
        let mut series = Series::new(call, xy_matrix(group.iter().map(|(_, p)| *p)));
        series.size = 60.0;
        series.opacity = 0.5; // half transparent
        if labelling == Labelling::PerAtBat {
            let numbers = group.iter().map(|(r, _)| r.at_bat_number.to_string());
            series.annotations = Some(numbers.collect());
        }
        plot.series.push(series);
    }
    plot
}

/// Shape check used by tests and callers that accept specs from elsewhere.
pub fn points_within(points: &Array2<f64>, x: [f64; 2], y: [f64; 2]) -> bool {
    points
        .rows()
        .into_iter()
        .all(|p| (x[0]..=x[1]).contains(&p[0]) && (y[0]..=y[1]).contains(&p[1]))
}
