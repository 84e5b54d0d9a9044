//! Ratatui front-end: a tour catalog screen and an operations dashboard.
mod app;
mod forms;
mod helpers;
mod screens;
mod terminal;

pub use app::App;
pub use terminal::run_app;
