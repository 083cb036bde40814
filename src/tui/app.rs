use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use ratatui::widgets::{ListState, ScrollbarState};

use crate::render::TreeLine;
use super::models::{PlanStats, ReviewOutcome};

#[derive(Debug)]
pub struct App {
    pub lines: Vec<TreeLine>,
    pub stats: PlanStats,
    pub list_state: ListState,
    pub scroll_state: ScrollbarState,
    pub show_help: bool,
    pub show_preview: bool,
    pub outcome: Option<ReviewOutcome>,
    pub status_message: Option<String>,
    pub status_message_time: Option<Instant>,
}

impl App {
    pub fn new(lines: Vec<TreeLine>, stats: PlanStats) -> Self {
        let mut list_state = ListState::default();
        if !lines.is_empty() {
            list_state.select(Some(0));
        }
        let scroll_state = ScrollbarState::new(lines.len());

        Self {
            lines,
            stats,
            list_state,
            scroll_state,
            show_help: false,
            show_preview: true,
            outcome: None,
            status_message: None,
            status_message_time: None,
        }
    }

    pub fn selected_line(&self) -> Option<&TreeLine> {
        self.list_state.selected().and_then(|i| self.lines.get(i))
    }

    pub fn next(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < self.lines.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.select(i);
    }

    pub fn previous(&mut self) {
        if self.lines.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.lines.len() - 1,
            Some(i) => i - 1,
        };
        self.select(i);
    }

    fn select(&mut self, i: usize) {
        self.list_state.select(Some(i));
        self.scroll_state = ScrollbarState::new(self.lines.len()).position(i);
    }

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn toggle_preview(&mut self) {
        self.show_preview = !self.show_preview;
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_message_time = Some(Instant::now());
    }

    pub fn clear_status_message_if_expired(&mut self) {
        if let (Some(_), Some(time)) = (&self.status_message, self.status_message_time) {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_message_time = None;
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.show_help {
                    self.toggle_help();
                } else {
                    self.outcome = Some(ReviewOutcome::Aborted);
                }
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.toggle_help(),
            KeyCode::Char('p') => self.toggle_preview(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Enter | KeyCode::Char('w') => {
                if self.show_help {
                    self.toggle_help();
                } else if self.lines.is_empty() {
                    self.set_status_message("Nothing to write".to_string());
                } else {
                    self.outcome = Some(ReviewOutcome::Accepted);
                }
            }
            _ => {}
        }
    }
}
