//! Pitch-tracking explorer.
//!
//! Loads a pitch CSV into an immutable [`Dataset`], narrows it with the
//! [`filter`] functions, computes batting rates in [`stats`] and turns the result
//! into renderer-agnostic [`plot::PlotSpec`]s. [`controller::Session`] ties the
//! steps together the way the dashboard's selectors do.

pub mod assets;
pub mod config;
pub mod controller;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod plot;
pub mod stats;

pub use assets::Assets;
pub use controller::{Choices, Event, Page, Session, State, ViewMode};
pub use dataset::{Dataset, InningHalf, PitchCall, PitchEvent, PitchResult, PlayerId};
pub use error::{Error, Result, SchemaError};
pub use filter::{Filter, Perspective, Role, Selection, Side};
pub use plot::PlotSpec;
pub use stats::BattingLine;
