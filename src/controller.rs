//! Selection state machine that drives filter -> stats -> plot on every render.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assets::Assets;
use crate::dataset::{Dataset, PlayerId};
use crate::error::{Error, Result};
use crate::filter::{
    select_by_at_bats, select_by_pitch_types, select_by_player, select_in_play, select_side,
    Perspective, Role, Selection, Side,
};
use crate::plot::{movement_plot, spray_chart, zone_plot, Interactivity, Labelling, PlotSpec};
use crate::stats::{arsenal, format_rate, summarize_at_bats, BattingLine};

pub const APP_NAME: &str = "Pitchboard";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    PitcherMovementInteractive,
    PitcherMovementStatic,
    HitterPlots,
    TeamHittingPlots,
}

impl ViewMode {
    pub const ALL: [ViewMode; 4] = [
        ViewMode::PitcherMovementInteractive,
        ViewMode::PitcherMovementStatic,
        ViewMode::HitterPlots,
        ViewMode::TeamHittingPlots,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::PitcherMovementInteractive => "Pitcher Movement (Interactive)",
            ViewMode::PitcherMovementStatic => "Pitcher Movement (Static)",
            ViewMode::HitterPlots => "Hitter Plots",
            ViewMode::TeamHittingPlots => "Team Hitting Plots",
        }
    }

    pub fn perspective(self) -> Perspective {
        match self {
            ViewMode::PitcherMovementInteractive | ViewMode::PitcherMovementStatic => {
                Perspective::Pitching
            }
            ViewMode::HitterPlots | ViewMode::TeamHittingPlots => Perspective::Batting,
        }
    }

    /// Whose id the player selector lists; team view has no player step.
    pub fn role(self) -> Option<Role> {
        match self {
            ViewMode::PitcherMovementInteractive | ViewMode::PitcherMovementStatic => {
                Some(Role::Pitcher)
            }
            ViewMode::HitterPlots => Some(Role::Batter),
            ViewMode::TeamHittingPlots => None,
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum State {
    SelectView,
    SelectSide,
    SelectPlayer,
    SelectRefinements,
    Render,
}

impl State {
    fn name(self) -> &'static str {
        match self {
            State::SelectView => "selecting a view",
            State::SelectSide => "selecting a side",
            State::SelectPlayer => "selecting a player",
            State::SelectRefinements => "refining the selection",
            State::Render => "rendering",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    ChooseView(ViewMode),
    ChooseSide(Side),
    ChoosePlayer(PlayerId),
    ChoosePitchTypes(Vec<String>),
    ChooseAtBats(Vec<u32>),
    Render,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::ChooseView(_) => "choose a view",
            Event::ChooseSide(_) => "choose a side",
            Event::ChoosePlayer(_) => "choose a player",
            Event::ChoosePitchTypes(_) => "choose pitch types",
            Event::ChooseAtBats(_) => "choose at-bats",
            Event::Render => "render",
        }
    }
}

/// What the user may pick next.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Choices {
    Views(Vec<ViewMode>),
    Sides(Vec<Side>),
    Players(Vec<PlayerId>),
    PitchTypes(Vec<String>),
    AtBats(Vec<u32>),
    Nothing,
}

impl Choices {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    Left,
    Center,
    Right,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PanelContent {
    Plot(Box<PlotSpec>),
    Text { heading: String, lines: Vec<String> },
    /// "no data" / "image missing" style messages in place of a failed panel
    Notice(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Panel {
    pub column: Column,
    pub content: PanelContent,
}

impl Panel {
    fn plot(column: Column, plot: PlotSpec) -> Self {
        Self {
            column,
            content: PanelContent::Plot(Box::new(plot)),
        }
    }

    fn text(column: Column, heading: &str, lines: Vec<String>) -> Self {
        Self {
            column,
            content: PanelContent::Text {
                heading: heading.to_string(),
                lines,
            },
        }
    }

    fn notice(column: Column, error: &Error) -> Self {
        Self {
            column,
            content: PanelContent::Notice(error.to_string()),
        }
    }
}

/// Everything one render produces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page {
    pub app_name: String,
    pub header: String,
    pub logo: Option<String>,
    pub panels: Vec<Panel>,
}

impl Page {
    pub fn plots(&self) -> impl Iterator<Item = &PlotSpec> {
        self.panels.iter().filter_map(|p| match &p.content {
            PanelContent::Plot(plot) => Some(plot.as_ref()),
            _ => None,
        })
    }

    pub fn notices(&self) -> impl Iterator<Item = &str> {
        self.panels.iter().filter_map(|p| match &p.content {
            PanelContent::Notice(msg) => Some(msg.as_str()),
            _ => None,
        })
    }

    /// Plain-text rendering of the text and notice panels.
    pub fn text_lines(&self) -> Vec<String> {
        let mut out = vec![self.header.clone()];
        for panel in &self.panels {
            match &panel.content {
                PanelContent::Text { heading, lines } => {
                    out.push(String::new());
                    out.push(heading.clone());
                    out.extend(lines.iter().cloned());
                }
                PanelContent::Notice(msg) => out.push(format!("[notice] {}", msg)),
                PanelContent::Plot(plot) => {
                    out.push(format!("[plot] {} ({} points)", plot.title, plot.point_count()))
                }
            }
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json<W: std::io::Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Selections {
    view: Option<ViewMode>,
    side: Option<Side>,
    player: Option<PlayerId>,          // pitcher or batter, per the view's role
    pitch_types: Option<Vec<String>>, // None means everything the pitcher throws
    at_bats: Option<Vec<u32>>,        // None means every at-bat of the batter
}

/// One user's walk through the dashboard. Holds choices, never derived data.
pub struct Session<'d> {
    dataset: &'d Dataset,
    assets: Assets,
    state: State,
    selections: Selections,
}

impl<'d> Session<'d> {
    pub fn new(dataset: &'d Dataset, assets: Assets) -> Self {
        Self {
            dataset,
            assets,
            state: State::SelectView,
            selections: Selections::default(),
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn apply(&mut self, event: Event) -> Result<State> {
        let view = self.selections.view;
        let refining = matches!(self.state, State::SelectRefinements | State::Render);
        let next = match (&event, view) {
            (Event::ChooseView(mode), _) => {
                self.selections = Selections {
                    view: Some(*mode),
                    ..Selections::default()
                };
                State::SelectSide
            }
            (Event::ChooseSide(side), Some(mode)) => {
                self.selections.side = Some(*side);
                self.selections.player = None;
                self.clear_refinements();
                match mode.role() {
                    Some(_) => State::SelectPlayer,
                    None => State::SelectRefinements,
                }
            }
            (Event::ChoosePlayer(id), Some(mode))
                if mode.role().is_some() && (self.state == State::SelectPlayer || refining) =>
            {
                self.selections.player = Some(id.clone());
                self.clear_refinements();
                State::SelectRefinements
            }
            (Event::ChoosePitchTypes(types), Some(mode))
                if refining && mode.role() == Some(Role::Pitcher) =>
            {
                self.selections.pitch_types = Some(types.clone());
                State::SelectRefinements
            }
            (Event::ChooseAtBats(at_bats), Some(ViewMode::HitterPlots)) if refining => {
                self.selections.at_bats = Some(at_bats.clone());
                State::SelectRefinements
            }
            (Event::Render, Some(_)) if refining => State::Render,
            _ => {
                return Err(Error::InvalidTransition {
                    state: self.state.name(),
                    event: event.name(),
                })
            }
        };
        debug!(event = event.name(), from = ?self.state, to = ?next, "session transition");
        self.state = next;
        Ok(next)
    }

    fn clear_refinements(&mut self) {
        self.selections.pitch_types = None;
        self.selections.at_bats = None;
    }

    /// Choices for the current step, computed fresh from the dataset.
    pub fn options(&self) -> Choices {
        let Some(mode) = self.selections.view else {
            return Choices::Views(ViewMode::ALL.to_vec());
        };
        let Some(side) = self.selections.side else {
            return Choices::Sides(Side::ALL.to_vec());
        };
        let Some(role) = mode.role() else {
            return Choices::Nothing;
        };
        let team = select_side(&self.dataset.selection(), side, mode.perspective());
        let Some(player) = &self.selections.player else {
            return Choices::Players(team.players(role));
        };
        let rows = select_by_player(&team, player, role);
        match mode {
            ViewMode::HitterPlots => Choices::AtBats(rows.at_bats()),
            _ => Choices::PitchTypes(rows.pitch_types()),
        }
    }

    /// Re-runs the pipeline from the full dataset and lays out the page.
    pub fn render(&mut self) -> Result<Page> {
        self.apply(Event::Render)?;
        let (Some(mode), Some(side)) = (self.selections.view, self.selections.side) else {
            return Err(Error::InvalidTransition {
                state: self.state.name(),
                event: Event::Render.name(),
            });
        };
        info!(view = %mode, side = %side, "rendering page");

        let header = match mode {
            ViewMode::PitcherMovementStatic => "Pitcher Movement".to_string(),
            ViewMode::TeamHittingPlots => "Team Hitter Plots".to_string(),
            other => other.title().to_string(),
        };
        let logo = match self.assets.logo() {
            Ok(path) => Some(path.display().to_string()),
            Err(e) => {
                warn!("{}", e); // header just goes without it
                None
            }
        };
        let team = select_side(&self.dataset.selection(), side, mode.perspective());

        let panels = match mode {
            ViewMode::PitcherMovementInteractive => {
                self.pitcher_panels(&team, Interactivity::Interactive)
            }
            ViewMode::PitcherMovementStatic => self.pitcher_panels(&team, Interactivity::Static),
            ViewMode::HitterPlots => self.hitter_panels(&team),
            ViewMode::TeamHittingPlots => self.team_panels(&team),
        };

        Ok(Page {
            app_name: APP_NAME.to_string(),
            header,
            logo,
            panels,
        })
    }

    fn player_rows<'a>(&self, team: &Selection<'a>, role: Role) -> Result<Selection<'a>> {
        let player = self.selections.player.as_ref().ok_or(Error::InvalidTransition {
            state: self.state.name(),
            event: Event::Render.name(),
        })?;
        let rows = select_by_player(team, player, role);
        non_empty(rows, || format!("no pitches recorded for player {}", player))
    }

    fn pitcher_panels(&self, team: &Selection<'_>, interactivity: Interactivity) -> Vec<Panel> {
        let pitcher = match self.player_rows(team, Role::Pitcher) {
            Ok(rows) => rows,
            Err(e) => return vec![recover(Column::Center, e)],
        };
        let allowed = self
            .selections
            .pitch_types
            .clone()
            .unwrap_or_else(|| pitcher.pitch_types());
        let shown = select_by_pitch_types(&pitcher, &allowed);

        let mut panels = Vec::new();
        match non_empty(shown, || "no pitches of the selected types".to_string()) {
            Ok(rows) => {
                panels.push(Panel::plot(Column::Center, movement_plot(&rows, interactivity)));
                let lines = arsenal(&rows).iter().map(ToString::to_string).collect();
                panels.push(Panel::text(Column::Right, "Arsenal", lines));
            }
            Err(e) => panels.push(recover(Column::Center, e)),
        }
        panels
    }

    fn hitter_panels(&self, team: &Selection<'_>) -> Vec<Panel> {
        let hitter = match self.player_rows(team, Role::Batter) {
            Ok(rows) => rows,
            Err(e) => return vec![recover(Column::Center, e)],
        };

        // Summary and stats cover every plate appearance, before the at-bat refinement
        let in_play = select_in_play(&hitter);
        let mut panels = vec![
            at_bat_panel(&in_play),
            stats_panel(&in_play, "Hitter Stats"),
        ];

        let allowed = self.selections.at_bats.clone().unwrap_or_else(|| hitter.at_bats());
        let shown = select_by_at_bats(&hitter, &allowed);
        panels.extend(self.plot_panels(&shown, Labelling::PerAtBat, || {
            "no pitches in the selected at-bats".to_string()
        }));
        panels
    }

    fn team_panels(&self, team: &Selection<'_>) -> Vec<Panel> {
        let in_play = select_in_play(team);
        let mut panels = vec![stats_panel(&in_play, "Team Stats")];
        let side = self.selections.side;
        panels.extend(self.plot_panels(team, Labelling::Unlabelled, || match side {
            Some(side) => format!("no pitches recorded while the {} side batted", side),
            None => "no pitches recorded for this side".to_string(),
        }));
        panels
    }

    fn plot_panels(
        &self,
        rows: &Selection<'_>,
        labelling: Labelling,
        empty: impl FnOnce() -> String,
    ) -> Vec<Panel> {
        if rows.is_empty() {
            return vec![recover(Column::Center, Error::EmptySelection(empty()))];
        }
        let mut panels = vec![Panel::plot(Column::Center, zone_plot(rows))];
        let stadium = match self.assets.stadium() {
            Ok(path) => Some(path),
            Err(e) => {
                panels.push(recover(Column::Center, e));
                None
            }
        };
        panels.push(Panel::plot(Column::Center, spray_chart(rows, stadium, labelling)));
        panels
    }
}

fn non_empty<'a>(rows: Selection<'a>, what: impl FnOnce() -> String) -> Result<Selection<'a>> {
    if rows.is_empty() {
        return Err(Error::EmptySelection(what()));
    }
    Ok(rows)
}

fn recover(column: Column, error: Error) -> Panel {
    if error.is_recoverable() {
        warn!("{}", error);
    } else {
        warn!("unexpected error while rendering: {}", error);
    }
    Panel::notice(column, &error)
}

fn at_bat_panel(in_play: &Selection<'_>) -> Panel {
    if in_play.is_empty() {
        return recover(
            Column::Left,
            Error::EmptySelection("no completed plate appearances".to_string()),
        );
    }
    let lines = summarize_at_bats(in_play).map(|r| r.to_string()).collect();
    Panel::text(Column::Left, "At-Bat Results", lines)
}

fn stats_panel(in_play: &Selection<'_>, heading: &str) -> Panel {
    let line = BattingLine::from_selection(in_play);
    let lines = line
        .rates()
        .iter()
        .map(|(label, rate)| {
            if let Err(e) = rate {
                warn!("{}", e);
            }
            format_rate(label, rate)
        })
        .collect();
    Panel::text(Column::Right, heading, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::fixture;
    use crate::dataset::{InningHalf, PitchCall, PitchEvent, PitchResult};

    fn dataset() -> Dataset {
        let rows = vec![
            // away team bats in the top against home pitchers H1 and H2
            PitchEvent {
                at_bat_number: 1,
                pitch_result: PitchResult::NotInPlay,
                ..fixture("H1", "A1", InningHalf::Top)
            },
            PitchEvent {
                at_bat_number: 1,
                pitch_result: PitchResult::Hit,
                pitch_call: PitchCall::new("Double"),
                slg: 2.0,
                ..fixture("H1", "A1", InningHalf::Top)
            },
            PitchEvent {
                at_bat_number: 2,
                pitch_type: "Slider".into(),
                pitch_result: PitchResult::Walk,
                pitch_call: PitchCall::new("Walk"),
                ..fixture("H1", "A2", InningHalf::Top)
            },
            PitchEvent {
                at_bat_number: 3,
                ..fixture("H1", "A1", InningHalf::Top)
            },
            PitchEvent {
                at_bat_number: 5,
                pitch_type: "Changeup".into(),
                pitch_result: PitchResult::NotInPlay,
                ..fixture("H2", "A3", InningHalf::Top)
            },
            PitchEvent {
                at_bat_number: 5,
                pitch_type: "Curveball".into(),
                pitch_result: PitchResult::NotInPlay,
                ..fixture("H2", "A3", InningHalf::Top)
            },
            PitchEvent {
                at_bat_number: 5,
                pitch_type: "Curveball".into(),
                ..fixture("H2", "A3", InningHalf::Top)
            },
            // home team bats in the bottom against away pitcher V1
            PitchEvent {
                at_bat_number: 4,
                ..fixture("V1", "H9", InningHalf::Bottom)
            },
        ];
        Dataset::from_rows("game", rows)
    }

    fn session(data: &Dataset) -> Session<'_> {
        Session::new(data, Assets::new("missing-logo.jpeg", "missing-stadium.png"))
    }

    fn text_panel<'p>(page: &'p Page, heading: &str) -> &'p [String] {
        page.panels
            .iter()
            .find_map(|p| match &p.content {
                PanelContent::Text { heading: h, lines } if h == heading => {
                    Some(lines.as_slice())
                }
                _ => None,
            })
            .unwrap()
    }

    fn series_labels(page: &Page) -> Vec<String> {
        let plot = page.plots().next().unwrap();
        plot.series.iter().map(|s| s.label.clone()).collect()
    }

    #[test]
    fn walks_through_states() {
        let data = dataset();
        let mut s = session(&data);
        assert_eq!(s.state(), State::SelectView);
        let view = s.apply(Event::ChooseView(ViewMode::HitterPlots)).unwrap();
        assert_eq!(view, State::SelectSide);
        let side = s.apply(Event::ChooseSide(Side::Away)).unwrap();
        assert_eq!(side, State::SelectPlayer);
        let player = s.apply(Event::ChoosePlayer("A1".into())).unwrap();
        assert_eq!(player, State::SelectRefinements);
        let at_bats = s.apply(Event::ChooseAtBats(vec![1])).unwrap();
        assert_eq!(at_bats, State::SelectRefinements);
        assert_eq!(s.apply(Event::Render).unwrap(), State::Render);
    }

    #[test]
    fn team_view_skips_player_step() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::TeamHittingPlots)).unwrap();
        let side = s.apply(Event::ChooseSide(Side::Home)).unwrap();
        assert_eq!(side, State::SelectRefinements);
        assert!(matches!(
            s.apply(Event::ChoosePlayer("H9".into())),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        let data = dataset();
        let mut s = session(&data);
        assert!(s.apply(Event::ChooseSide(Side::Home)).is_err());
        assert!(s.render().is_err());
        s.apply(Event::ChooseView(ViewMode::PitcherMovementStatic)).unwrap();
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        assert!(s.apply(Event::ChooseAtBats(vec![1])).is_err());
        assert_eq!(s.state(), State::SelectPlayer);
    }

    #[test]
    fn options_follow_the_state() {
        let data = dataset();
        let mut s = session(&data);
        assert_eq!(s.options(), Choices::Views(ViewMode::ALL.to_vec()));
        s.apply(Event::ChooseView(ViewMode::PitcherMovementInteractive)).unwrap();
        assert_eq!(s.options(), Choices::Sides(vec![Side::Home, Side::Away]));
        // home pitchers work while the away side bats
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        assert_eq!(
            s.options(),
            Choices::Players(vec![PlayerId::new("H1"), PlayerId::new("H2")])
        );
        s.apply(Event::ChoosePlayer("H1".into())).unwrap();
        assert_eq!(
            s.options(),
            Choices::PitchTypes(vec!["Fastball".to_string(), "Slider".to_string()])
        );
    }

    #[test]
    fn choosing_a_player_clears_pitch_type_choice() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::PitcherMovementInteractive)).unwrap();
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        s.apply(Event::ChoosePlayer("H1".into())).unwrap();
        s.apply(Event::ChoosePitchTypes(vec!["Slider".to_string()])).unwrap();
        // H2 throws no sliders; a stale choice would leave nothing to draw
        s.apply(Event::ChoosePlayer("H2".into())).unwrap();
        let page = s.render().unwrap();

        assert_eq!(page.notices().count(), 0);
        assert_eq!(series_labels(&page), vec!["Curveball", "Changeup"]);
        assert_eq!(
            s.options(),
            Choices::PitchTypes(vec!["Curveball".to_string(), "Changeup".to_string()])
        );
    }

    #[test]
    fn choosing_a_view_clears_later_choices() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::HitterPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        s.apply(Event::ChoosePlayer("A1".into())).unwrap();
        s.apply(Event::ChooseAtBats(vec![3])).unwrap();

        let next = s.apply(Event::ChooseView(ViewMode::HitterPlots)).unwrap();
        assert_eq!(next, State::SelectSide);
        assert_eq!(s.options(), Choices::Sides(vec![Side::Home, Side::Away]));
        assert!(matches!(s.render(), Err(Error::InvalidTransition { .. })));

        // side and player have to be picked again, at-bats start from all
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        assert_eq!(
            s.options(),
            Choices::Players(vec![
                PlayerId::new("A1"),
                PlayerId::new("A2"),
                PlayerId::new("A3")
            ])
        );
        s.apply(Event::ChoosePlayer("A1".into())).unwrap();
        let page = s.render().unwrap();
        let zone = page.plots().next().unwrap();
        assert_eq!(zone.point_count(), 3);
    }

    #[test]
    fn pitcher_page_defaults_to_every_pitch_type() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::PitcherMovementStatic)).unwrap();
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        s.apply(Event::ChoosePlayer("H1".into())).unwrap();
        let page = s.render().unwrap();

        let plot = page.plots().next().unwrap();
        let sizes: Vec<usize> = plot.series.iter().map(|s| s.len()).collect();
        assert_eq!(series_labels(&page), vec!["Fastball", "Slider"]);
        assert_eq!(sizes, vec![3, 1]); // most thrown first
        assert_eq!(text_panel(&page, "Arsenal").len(), 2);
    }

    #[test]
    fn hitter_page_stats_ignore_at_bat_refinement() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::HitterPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        s.apply(Event::ChoosePlayer("A1".into())).unwrap();
        s.apply(Event::ChooseAtBats(vec![3])).unwrap();
        let page = s.render().unwrap();

        assert_eq!(page.header, "Hitter Plots");
        // A1: a double then an out over two plate appearances
        assert_eq!(
            text_panel(&page, "Hitter Stats"),
            [
                "Batting Average:  0.500",
                "Slugging Percentage:  1.000",
                "On Base Percentage:  0.500"
            ]
        );
        assert_eq!(
            text_panel(&page, "At-Bat Results"),
            ["AB 1 Result: Double (1-1)", "AB 2 Result: InPlay (1-1)"]
        );

        let plots: Vec<&PlotSpec> = page.plots().collect();
        assert_eq!(plots.len(), 2);
        assert_eq!(plots[0].point_count(), 1); // only at-bat 3 is drawn
        assert!(plots[1].background.is_none());
        assert_eq!(page.notices().filter(|n| n.contains("stadium")).count(), 1);
        assert!(page.logo.is_none());
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn missing_stadium_is_logged_once() {
        let logs = Captured::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::TeamHittingPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        let page = tracing::subscriber::with_default(subscriber, || s.render().unwrap());

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("stadium image not found").count(), 1);
        assert_eq!(text.matches("logo image not found").count(), 1);
        assert_eq!(page.notices().count(), 1);
    }

    #[test]
    fn unknown_player_renders_notice() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::PitcherMovementStatic)).unwrap();
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        s.apply(Event::ChoosePlayer("nobody".into())).unwrap();
        let page = s.render().unwrap();
        assert_eq!(page.plots().count(), 0);
        assert!(page.notices().any(|n| n.contains("nobody")));
    }

    #[test]
    fn team_without_plate_appearances_shows_unavailable() {
        let rows = vec![PitchEvent {
            pitch_result: PitchResult::NotInPlay,
            ..fixture("V1", "H9", InningHalf::Bottom)
        }];
        let data = Dataset::from_rows("quiet", rows);
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::TeamHittingPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        let page = s.render().unwrap();
        let stats = text_panel(&page, "Team Stats");
        assert!(stats.iter().all(|l| l.ends_with("unavailable")));
        assert_eq!(page.plots().count(), 2);
    }

    #[test]
    fn empty_team_notice_names_the_side() {
        let rows = vec![fixture("V1", "H9", InningHalf::Bottom)];
        let data = Dataset::from_rows("home only", rows);
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::TeamHittingPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        let page = s.render().unwrap();

        assert_eq!(page.plots().count(), 0);
        let notices: Vec<&str> = page.notices().collect();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].contains("Away side"));
        assert!(!notices[0].contains("at-bats"));
    }

    #[test]
    fn pitcher_page_filters_pitch_types() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::PitcherMovementInteractive)).unwrap();
        s.apply(Event::ChooseSide(Side::Home)).unwrap();
        s.apply(Event::ChoosePlayer("H1".into())).unwrap();
        s.apply(Event::ChoosePitchTypes(vec!["Slider".to_string()])).unwrap();
        let page = s.render().unwrap();
        assert_eq!(series_labels(&page), vec!["Slider"]);
        assert_eq!(text_panel(&page, "Arsenal").len(), 1);
    }

    #[test]
    fn changing_side_resets_player() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::HitterPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        s.apply(Event::ChoosePlayer("A1".into())).unwrap();
        let side = s.apply(Event::ChooseSide(Side::Home)).unwrap();
        assert_eq!(side, State::SelectPlayer);
        assert_eq!(s.options(), Choices::Players(vec![PlayerId::new("H9")]));
    }

    #[test]
    fn page_serializes_through_crate_error() {
        let data = dataset();
        let mut s = session(&data);
        s.apply(Event::ChooseView(ViewMode::TeamHittingPlots)).unwrap();
        s.apply(Event::ChooseSide(Side::Away)).unwrap();
        let page = s.render().unwrap();

        let json = page.to_json().unwrap();
        assert!(json.contains("\"header\": \"Team Hitter Plots\""));
        let mut buf = Vec::new();
        page.write_json(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), json);
        let sides = s.options().to_json().unwrap();
        assert!(sides.contains("Nothing"));
    }
}
