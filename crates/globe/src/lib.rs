//! Interactive sky-localization globe.
//!
//! `LocalizationPlot` picks which localization to show and gates on
//! incomplete data; `GlobePlot` projects and draws every layer into a
//! retained `scene::Surface` and reacts to clicks and drags.

pub mod adapter;
pub mod config;
pub mod error;
pub mod interaction;
pub mod props;
pub mod renderer;

pub use adapter::*;
pub use config::*;
pub use error::*;
pub use props::*;
pub use renderer::*;
