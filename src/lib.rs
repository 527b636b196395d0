pub mod api;
pub mod cli;
pub mod crud;
pub mod logging;
pub mod models;
pub mod settings;
pub mod tui;
