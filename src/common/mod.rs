//! Shared utilities: configuration, errors and logging.
pub mod config;
pub mod error;
pub mod log;

pub use config::AppCfg;
pub use error::{PanelCode, PanelError, PanelResult};
