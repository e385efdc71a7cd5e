//! Presentation layer: view model, terminal rendering and form flags.

pub mod cli;
pub mod render;
pub mod view;

pub use cli::FormArgs;
pub use view::{PanelView, ResultCard, Tone};
