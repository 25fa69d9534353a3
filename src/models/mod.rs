//! Data models for jobs, colors and configuration.

mod color;
mod config;
mod job;

pub use color::{default_palette, ColorParseError, HexColor, DEFAULT_PALETTE};
pub use config::{AppConfig, BehaviorConfig, ConfigError, DisplayConfig, StoreConfig};
pub use job::{Job, JobCollection, JobId};
