// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{AppMode, TabKind, ThemeMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub mode: AppMode,
    pub active_tab: TabKind,
    pub theme: ThemeMode,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Nav,
            active_tab: TabKind::Holdings,
            theme: ThemeMode::Light,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    NextTab,
    PrevTab,
    EnterSearch,
    EnterPageInput,
    OpenForm,
    ExitToNav,
    ToggleTheme,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    TabChanged(TabKind),
    ThemeChanged(ThemeMode),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::NextTab => self.rotate_tab(1),
            AppCommand::PrevTab => self.rotate_tab(-1),
            AppCommand::EnterSearch => self.set_mode(AppMode::Search),
            AppCommand::EnterPageInput => self.set_mode(AppMode::PageInput),
            AppCommand::OpenForm => self.set_mode(AppMode::Form),
            AppCommand::ExitToNav => self.set_mode(AppMode::Nav),
            AppCommand::ToggleTheme => {
                self.theme = self.theme.toggled();
                let label = format!("{} theme", self.theme.as_str());
                vec![AppEvent::ThemeChanged(self.theme), self.set_status(&label)]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    fn set_mode(&mut self, mode: AppMode) -> Vec<AppEvent> {
        self.mode = mode;
        vec![AppEvent::ModeChanged(mode)]
    }

    fn rotate_tab(&mut self, delta: isize) -> Vec<AppEvent> {
        let tabs = TabKind::ALL;
        let current = tabs
            .iter()
            .position(|tab| *tab == self.active_tab)
            .unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.active_tab = tabs[next];
        vec![AppEvent::TabChanged(self.active_tab)]
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{AppCommand, AppEvent, AppState};
    use crate::{AppMode, TabKind, ThemeMode};

    #[test]
    fn tab_rotation_wraps_both_ways() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::NextTab);
        assert_eq!(state.active_tab, TabKind::Market);
        assert_eq!(events, vec![AppEvent::TabChanged(TabKind::Market)]);

        state.dispatch(AppCommand::NextTab);
        assert_eq!(state.active_tab, TabKind::Holdings);

        state.dispatch(AppCommand::PrevTab);
        assert_eq!(state.active_tab, TabKind::Market);
    }

    #[test]
    fn toggle_theme_updates_status() {
        let mut state = AppState::default();

        let events = state.dispatch(AppCommand::ToggleTheme);
        assert_eq!(state.theme, ThemeMode::Dark);
        assert_eq!(
            events,
            vec![
                AppEvent::ThemeChanged(ThemeMode::Dark),
                AppEvent::StatusUpdated("dark theme".to_owned()),
            ]
        );
    }

    #[test]
    fn mode_transitions() {
        let mut state = AppState::default();

        state.dispatch(AppCommand::EnterSearch);
        assert_eq!(state.mode, AppMode::Search);

        state.dispatch(AppCommand::EnterPageInput);
        assert_eq!(state.mode, AppMode::PageInput);

        state.dispatch(AppCommand::OpenForm);
        assert_eq!(state.mode, AppMode::Form);

        let events = state.dispatch(AppCommand::ExitToNav);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(events, vec![AppEvent::ModeChanged(AppMode::Nav)]);
    }

    #[test]
    fn status_set_and_clear() {
        let mut state = AppState::default();
        state.dispatch(AppCommand::SetStatus("saved TCS".to_owned()));
        assert_eq!(state.status_line.as_deref(), Some("saved TCS"));

        let events = state.dispatch(AppCommand::ClearStatus);
        assert_eq!(state.status_line, None);
        assert_eq!(events, vec![AppEvent::StatusCleared]);
    }
}
