use std::io::Stdout;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::crud::{Container, ListAction, ListView, Notice};
use crate::settings::Settings;
use crate::tui::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    HelpOverlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPanel {
    List,
    Form,
}

pub struct App {
    pub container: Container,
    pub list: ListView,
    pub running: bool,
    pub mode: InputMode,
    pub focused_panel: FocusedPanel,
    pub settings: Settings,
    pub base_url: String,
}

impl App {
    pub fn new(container: Container, settings: Settings, base_url: String) -> Self {
        Self {
            container,
            list: ListView::default(),
            running: true,
            mode: InputMode::Normal,
            focused_panel: FocusedPanel::List,
            settings,
            base_url,
        }
    }

    pub fn run(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        self.container.load();

        while self.running {
            terminal.draw(|frame| ui::draw(frame, self))?;

            if event::poll(Duration::from_millis(42))?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(key);
            }

            self.apply_outcomes();
        }
        Ok(())
    }

    /// Applies finished requests and keeps the row cursor in range.
    pub fn apply_outcomes(&mut self) {
        if self.container.drain() > 0 {
            self.list.clamp(self.container.projects().len());
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }

        match self.mode {
            InputMode::HelpOverlay => self.handle_help_key(key),
            InputMode::Normal => match self.focused_panel {
                FocusedPanel::List => self.handle_list_key(key),
                FocusedPanel::Form => self.handle_form_key(key),
            },
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        let len = self.container.projects().len();
        match key.code {
            KeyCode::Char('q') => self.running = false,
            KeyCode::Char('?') => self.mode = InputMode::HelpOverlay,
            KeyCode::Char('j') | KeyCode::Down => self.list.navigate(len, 1),
            KeyCode::Char('k') | KeyCode::Up => self.list.navigate(len, -1),
            KeyCode::Char('e') | KeyCode::Enter => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('n') | KeyCode::Tab => self.focused_panel = FocusedPanel::Form,
            KeyCode::Char('r') => self.container.load(),
            KeyCode::Char('w') => self.write_settings(),
            KeyCode::Esc if self.container.edit_state().is_editing() => {
                self.container.cancel_edit();
            }
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.container.edit_state().is_editing() {
                    self.container.cancel_edit();
                }
                self.focused_panel = FocusedPanel::List;
            }
            KeyCode::Enter => {
                let was_editing = self.container.edit_state().is_editing();
                if self.container.submit_form() && was_editing {
                    self.focused_panel = FocusedPanel::List;
                }
            }
            KeyCode::Tab | KeyCode::Down => self.container.form_mut().focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.container.form_mut().focus_prev(),
            KeyCode::Left => self.container.form_mut().cycle_priority(false),
            KeyCode::Right => self.container.form_mut().cycle_priority(true),
            KeyCode::Backspace => self.container.form_mut().backspace(),
            KeyCode::Char(c) => self.container.form_mut().insert_char(c),
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
                self.mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn edit_selected(&mut self) {
        if let Some(ListAction::Edit(project)) = self.list.edit_trigger(self.container.projects()) {
            self.container.start_edit(project);
            self.focused_panel = FocusedPanel::Form;
        }
    }

    fn delete_selected(&mut self) {
        if let Some(ListAction::Delete(id)) = self.list.delete_trigger(self.container.projects()) {
            self.container.delete(id);
        }
    }

    fn write_settings(&mut self) {
        match std::env::current_dir() {
            Ok(cwd) => self.write_settings_in(&cwd),
            Err(e) => {
                tracing::warn!(error = %e, "no current directory to write settings into");
                self.container
                    .set_notice(Notice::error("Could not determine the current directory"));
            }
        }
    }

    /// Persists the active base URL into `<dir>/.projdesk/settings.json`.
    fn write_settings_in(&mut self, dir: &Path) {
        self.settings.api_base_url = Some(self.base_url.clone());
        let path = Settings::path_in(dir);
        match self.settings.save_to(dir) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "settings written");
                self.container
                    .set_notice(Notice::success(format!("Settings saved to {}", path.display())));
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to write settings");
                self.container
                    .set_notice(Notice::error(format!("Failed to write settings: {e}")));
            }
        }
    }
}
