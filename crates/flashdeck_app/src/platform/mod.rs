//! Terminal front end: stdin commands in, rendered session state out.
mod app;
mod commands;
mod config;
mod effects;
mod ui;

pub use app::run_app;
