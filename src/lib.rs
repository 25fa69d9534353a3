//! teamjobs - manage a team's job titles from the terminal

pub mod display;
pub mod formatting;
pub mod logging;
pub mod models;
pub mod store;
pub mod tui;
