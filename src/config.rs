//! Command-line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::assets::Assets;
use crate::controller::{Event, ViewMode};
use crate::dataset::PlayerId;
use crate::filter::Side;

/// Pitch-tracking explorer: movement, zone and spray charts plus batting rates
#[derive(Parser, Clone, Debug)]
#[command(name = "pitchboard")]
#[command(about = "Explore pitch-tracking data and emit plot specifications")]
pub struct Config {
    /// Pitch CSV loaded at startup
    #[arg(long, env = "PITCHBOARD_DATA", default_value = "data_new.csv")]
    pub data: PathBuf,

    /// Team logo shown in the page header
    #[arg(long, env = "PITCHBOARD_LOGO", default_value = "Tigers_Logo.jpeg")]
    pub logo: PathBuf,

    /// Stadium image drawn under spray charts
    #[arg(long, env = "PITCHBOARD_STADIUM", default_value = "tigers_stadium.png")]
    pub stadium: PathBuf,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "pitchboard=info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    pub fn assets(&self) -> Assets {
        Assets::new(&self.logo, &self.stadium)
    }
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// List what can be chosen next for the given selections
    Options(Selections),

    /// Run the pipeline and write the page
    Render {
        #[command(flatten)]
        selections: Selections,

        /// Write page JSON here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the text panels instead of JSON
        #[arg(long)]
        text: bool,
    },
}

impl Command {
    pub fn selections(&self) -> &Selections {
        match self {
            Command::Options(s) => s,
            Command::Render { selections, .. } => selections,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewArg {
    PitcherInteractive,
    PitcherStatic,
    Hitter,
    Team,
}

impl From<ViewArg> for ViewMode {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::PitcherInteractive => ViewMode::PitcherMovementInteractive,
            ViewArg::PitcherStatic => ViewMode::PitcherMovementStatic,
            ViewArg::Hitter => ViewMode::HitterPlots,
            ViewArg::Team => ViewMode::TeamHittingPlots,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SideArg {
    Home,
    Away,
}

impl From<SideArg> for Side {
    fn from(s: SideArg) -> Self {
        match s {
            SideArg::Home => Side::Home,
            SideArg::Away => Side::Away,
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
pub struct Selections {
    #[arg(long, value_enum)]
    pub view: Option<ViewArg>,

    #[arg(long, value_enum)]
    pub side: Option<SideArg>,

    /// Pitcher or batter id, depending on the view
    #[arg(long)]
    pub player: Option<String>,

    /// Comma-separated pitch types (default: all the pitcher throws)
    #[arg(long, value_delimiter = ',')]
    pub pitch_types: Option<Vec<String>>,

    /// Comma-separated at-bat numbers (default: all of the batter's)
    #[arg(long, value_delimiter = ',')]
    pub at_bats: Option<Vec<u32>>,
}

impl Selections {
    /// The selections as controller events, in the order a user would make them.
    pub fn events(&self) -> Vec<Event> {
        let mut events = Vec::new();
        if let Some(view) = self.view {
            events.push(Event::ChooseView(view.into()));
        }
        if let Some(side) = self.side {
            events.push(Event::ChooseSide(side.into()));
        }
        if let Some(player) = &self.player {
            events.push(Event::ChoosePlayer(PlayerId::new(player.as_str())));
        }
        if let Some(types) = &self.pitch_types {
            events.push(Event::ChoosePitchTypes(types.clone()));
        }
        if let Some(at_bats) = &self.at_bats {
            events.push(Event::ChooseAtBats(at_bats.clone()));
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_selections() {
        let config = Config::try_parse_from([
            "pitchboard",
            "--data",
            "game.csv",
            "render",
            "--view",
            "hitter",
            "--side",
            "away",
            "--player",
            "123",
            "--at-bats",
            "2,3",
            "--text",
        ])
        .unwrap();
        assert_eq!(config.data, PathBuf::from("game.csv"));
        let events = config.command.selections().events();
        assert_eq!(
            events,
            vec![
                Event::ChooseView(ViewMode::HitterPlots),
                Event::ChooseSide(Side::Away),
                Event::ChoosePlayer(PlayerId::new("123")),
                Event::ChooseAtBats(vec![2, 3]),
            ]
        );
        assert!(matches!(config.command, Command::Render { text: true, .. }));
    }

    #[test]
    fn options_without_selections() {
        let config = Config::try_parse_from(["pitchboard", "options"]).unwrap();
        assert!(config.command.selections().events().is_empty());
    }
}
