mod app;
mod theme;
mod ui;

pub use app::App;

use std::io::stdout;
use std::panic;
use std::sync::Arc;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::api::ProjectApi;
use crate::crud::Container;
use crate::settings::Settings;

/// Drop guard that restores terminal state when dropped.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
    }
}

/// Takes over the terminal until the user quits. Must run inside a tokio
/// runtime, since requests are spawned as tasks.
pub fn run(api: Arc<dyn ProjectApi>, settings: Settings, base_url: String) -> Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    // Install panic hook that restores terminal before printing the panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    tracing::info!(%base_url, "starting terminal UI");
    let mut app = App::new(Container::new(api), settings, base_url);
    let result = app.run(&mut terminal);

    // Restore the original panic hook before returning
    let _ = panic::take_hook();

    result
}
