// src/app.rs

use crate::core::models::{FaviconCheck, ScanResult};
use crate::logging;
use ratatui::widgets::{ListState, ScrollbarState};

pub const SPINNER_CHARS: [char; 4] = ['|', '/', '-', '\\'];

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

#[derive(Debug, Default)]
pub struct ScanSummary {
    pub score: u8,
    pub failed_checks: usize,
    pub warning_checks: usize,
    pub favicons_found: usize,
    pub from_cache: bool,
}

pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub scan_result: Option<ScanResult>,
    pub scan_error: Option<String>,
    pub summary: ScanSummary,
    /// Flattened `(category name, check)` pairs backing the report list.
    pub all_checks: Vec<(String, FaviconCheck)>,
    pub check_list_state: ListState,
    /// Gauge value that climbs toward the real score on each tick.
    pub displayed_score: u8,
    pub spinner_frame: usize,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub log_horizontal_scroll: usize,
    pub log_horizontal_scroll_state: ScrollbarState,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            scan_result: None,
            scan_error: None,
            summary: ScanSummary::default(),
            all_checks: Vec::new(),
            check_list_state: ListState::default(),
            displayed_score: 0,
            spinner_frame: 0,
            show_logs: false,
            log_content: Vec::new(),
            log_horizontal_scroll: 0,
            log_horizontal_scroll_state: ScrollbarState::default(),
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        let show_logs = self.show_logs;
        *self = Self::new();
        self.show_logs = show_logs;
    }

    pub fn scroll_up(&mut self) {
        let selected = match self.check_list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.check_list_state.select(Some(selected));
    }

    pub fn scroll_down(&mut self) {
        let last = self.all_checks.len().saturating_sub(1);
        let selected = match self.check_list_state.selected() {
            Some(i) => (i + 1).min(last),
            None => 0,
        };
        self.check_list_state.select(Some(selected));
    }

    pub fn log_scroll_left(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_sub(4);
        self.log_horizontal_scroll_state = self
            .log_horizontal_scroll_state
            .position(self.log_horizontal_scroll);
    }

    pub fn log_scroll_right(&mut self) {
        self.log_horizontal_scroll = self.log_horizontal_scroll.saturating_add(4);
        self.log_horizontal_scroll_state = self
            .log_horizontal_scroll_state
            .position(self.log_horizontal_scroll);
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        if matches!(self.state, AppState::Finished) && self.displayed_score < self.summary.score {
            let step = ((self.summary.score - self.displayed_score) / 8).max(1);
            self.displayed_score = (self.displayed_score + step).min(self.summary.score);
        }
    }

    pub fn finish_scan(&mut self, outcome: Result<ScanResult, String>) {
        match outcome {
            Ok(result) => {
                self.scan_error = None;
                self.scan_result = Some(result);
                self.update_summary();
            }
            Err(message) => {
                self.scan_result = None;
                self.scan_error = Some(message);
                self.summary = ScanSummary::default();
                self.all_checks = Vec::new();
            }
        }
        self.displayed_score = 0;
        self.check_list_state = ListState::default();
        self.state = AppState::Finished;
    }

    pub fn update_summary(&mut self) {
        let Some(result) = &self.scan_result else {
            return;
        };

        self.all_checks = [
            &result.categories.basic,
            &result.categories.sizes,
            &result.categories.platforms,
            &result.categories.accessibility,
        ]
        .into_iter()
        .flat_map(|category| {
            category
                .checks
                .iter()
                .map(|check| (category.name.clone(), check.clone()))
        })
        .collect();

        let failed = result
            .categories
            .iter_checks()
            .filter(|c| matches!(c.status, crate::core::models::CheckStatus::Fail))
            .count();
        let warnings = result
            .categories
            .iter_checks()
            .filter(|c| matches!(c.status, crate::core::models::CheckStatus::Warning))
            .count();

        self.summary = ScanSummary {
            score: result.overall_score,
            failed_checks: failed,
            warning_checks: warnings,
            favicons_found: result.favicons.iter().filter(|f| f.accessible).count(),
            from_cache: result.from_cache,
        };
    }

    pub fn load_logs(&mut self) {
        let log_path = logging::get_data_dir().join(logging::LOG_FILE.clone());
        self.log_content = match std::fs::read_to_string(&log_path) {
            Ok(content) => content.lines().rev().take(100).map(String::from).collect(),
            Err(_) => vec!["No log file found.".to_string()],
        };
        self.log_horizontal_scroll = 0;
        self.log_horizontal_scroll_state = ScrollbarState::default();
    }
}
