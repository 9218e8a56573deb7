// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use hypertrend_app::{
    AppCommand, AppMode, AppState, ColumnKey, DEFAULT_ITEMS_PER_PAGE, FieldValue, FormErrors,
    Holding, HoldingColumn, HoldingField, HoldingFormDraft, HoldingRequest, MarketColumn,
    MarketTick, PortfolioSummary, SortDirection, SortRequest, SortSpec, SubmitOutcome, TabKind,
    TableRow, ThemeMode, ViewCommand, ViewController, ViewEvent, format_rupees,
    format_signed_percent, format_signed_rupees,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::time::Duration;
use time::Date;
use tracing::{info, warn};

const SIGNED_COLUMNS: [&str; 4] = ["pnl", "pnlPercent", "dayChange", "dayChangePercent"];

/// Everything the UI needs from the outside world. The CLI wires this to
/// the settings store, the holdings source and the dashboard API.
pub trait AppRuntime {
    fn load_holdings(&mut self) -> Result<Vec<Holding>>;
    fn load_market(&mut self) -> Result<Vec<MarketTick>>;
    fn submit_holding(&mut self, request: &HoldingRequest) -> Result<SubmitOutcome>;
    fn load_theme(&mut self) -> Result<ThemeMode>;
    fn save_theme(&mut self, theme: ThemeMode) -> Result<()>;

    fn items_per_page(&self) -> usize {
        DEFAULT_ITEMS_PER_PAGE
    }

    fn holdings_sort(&self) -> SortSpec<HoldingColumn> {
        SortSpec::new(HoldingColumn::CurrentValue, SortDirection::Desc)
    }

    fn today(&self) -> Date {
        hypertrend_app::today()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Palette {
    text: Color,
    background: Color,
    accent: Color,
    muted: Color,
    gain: Color,
    loss: Color,
    selection: Color,
}

const fn palette(theme: ThemeMode) -> Palette {
    match theme {
        ThemeMode::Light => Palette {
            text: Color::Black,
            background: Color::White,
            accent: Color::Blue,
            muted: Color::DarkGray,
            gain: Color::Green,
            loss: Color::Red,
            selection: Color::LightBlue,
        },
        ThemeMode::Dark => Palette {
            text: Color::White,
            background: Color::Black,
            accent: Color::Cyan,
            muted: Color::Gray,
            gain: Color::LightGreen,
            loss: Color::LightRed,
            selection: Color::DarkGray,
        },
    }
}

#[derive(Debug, Clone, Default)]
struct FormUiState {
    draft: HoldingFormDraft,
    field_index: usize,
    errors: Option<FormErrors>,
}

impl FormUiState {
    fn focused(&self) -> HoldingField {
        self.draft
            .visible_fields()
            .get(self.field_index)
            .copied()
            .unwrap_or(HoldingField::Symbol)
    }

    fn move_focus(&mut self, delta: isize) {
        let len = self.draft.visible_fields().len().max(1) as isize;
        self.field_index = (self.field_index as isize + delta).rem_euclid(len) as usize;
    }

    fn clamp_focus(&mut self) {
        let len = self.draft.visible_fields().len();
        self.field_index = self.field_index.min(len.saturating_sub(1));
    }
}

#[derive(Debug, Clone)]
enum TableAction {
    Search(String),
    SortSelected,
    Step(i64),
    PageInput(String),
}

struct ViewData {
    holdings: ViewController<Holding>,
    market: ViewController<MarketTick>,
    holdings_column: usize,
    market_column: usize,
    market_loaded: bool,
    page_input: String,
    form: Option<FormUiState>,
    help_visible: bool,
}

impl ViewData {
    fn new<R: AppRuntime>(runtime: &R) -> Self {
        let per_page = runtime.items_per_page();
        let holdings_sort = runtime.holdings_sort();
        let market_sort = SortSpec::new(MarketColumn::Time, SortDirection::Desc);
        Self {
            holdings: ViewController::new(Vec::new(), holdings_sort, per_page),
            market: ViewController::new(Vec::new(), market_sort, per_page),
            holdings_column: column_index(holdings_sort.column),
            market_column: column_index(market_sort.column),
            market_loaded: false,
            page_input: String::new(),
            form: None,
            help_visible: false,
        }
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    let mut view_data = ViewData::new(runtime);
    load_initial(state, runtime, &mut view_data);

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    info!(component = "tui", event = "tui.start", tab = state.active_tab.label());

    let mut result = Ok(());
    loop {
        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        match event::poll(Duration::from_millis(120)).context("poll event") {
            Ok(false) => {}
            Ok(true) => match event::read().context("read event") {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if handle_key_event(state, runtime, &mut view_data, key) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(error) => {
                    result = Err(error);
                    break;
                }
            },
            Err(error) => {
                result = Err(error);
                break;
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    info!(component = "tui", event = "tui.exit");
    result
}

fn load_initial<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    match runtime.load_theme() {
        Ok(theme) => state.theme = theme,
        Err(error) => set_status(state, format!("theme load failed: {error:#}")),
    }
    reload_holdings(state, runtime, view_data);
    if state.active_tab == TabKind::Market {
        reload_market(state, runtime, view_data);
    }
}

fn reload_holdings<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    match runtime.load_holdings() {
        Ok(rows) => {
            let count = rows.len();
            view_data.holdings.replace_rows(rows);
            set_status(state, format!("loaded {count} holdings"));
        }
        Err(error) => set_status(state, format!("holdings load failed: {error:#}")),
    }
}

/// Rows stay untouched when the fetch fails.
fn reload_market<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    match runtime.load_market() {
        Ok(ticks) => {
            let count = ticks.len();
            view_data.market.replace_rows(ticks);
            view_data.market_loaded = true;
            set_status(state, format!("loaded {count} ticks"));
        }
        Err(error) => {
            warn!(
                component = "tui",
                event = "market.reload_failed",
                error = %format!("{error:#}")
            );
            set_status(state, format!("market fetch failed: {error:#}"));
        }
    }
}

fn set_status(state: &mut AppState, message: impl Into<String>) {
    state.dispatch(AppCommand::SetStatus(message.into()));
}

/// Returns `true` when the app should exit.
fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            view_data.help_visible = false;
        }
        return false;
    }

    match state.mode {
        AppMode::Nav => handle_nav_key(state, runtime, view_data, key),
        AppMode::Search => {
            handle_search_key(state, view_data, key);
            false
        }
        AppMode::PageInput => {
            handle_page_input_key(state, view_data, key);
            false
        }
        AppMode::Form => {
            handle_form_key(state, runtime, view_data, key);
            false
        }
    }
}

fn handle_nav_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) -> bool {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) => return true,
        (KeyCode::Tab, _) | (KeyCode::Char('f'), KeyModifiers::NONE) => {
            switch_tab(state, runtime, view_data, AppCommand::NextTab);
        }
        (KeyCode::BackTab, _) | (KeyCode::Char('b'), KeyModifiers::NONE) => {
            switch_tab(state, runtime, view_data, AppCommand::PrevTab);
        }
        (KeyCode::Char('/'), _) => {
            state.dispatch(AppCommand::EnterSearch);
        }
        (KeyCode::Char('h') | KeyCode::Left, _) => move_column(state, view_data, -1),
        (KeyCode::Char('l') | KeyCode::Right, _) => move_column(state, view_data, 1),
        (KeyCode::Char('s'), KeyModifiers::NONE) => {
            run_table_action(state, view_data, TableAction::SortSelected);
        }
        (KeyCode::Char('n') | KeyCode::PageDown, _) => {
            run_table_action(state, view_data, TableAction::Step(1));
        }
        (KeyCode::Char('p') | KeyCode::PageUp, _) => {
            run_table_action(state, view_data, TableAction::Step(-1));
        }
        (KeyCode::Char('g'), KeyModifiers::NONE) => {
            view_data.page_input.clear();
            state.dispatch(AppCommand::EnterPageInput);
        }
        (KeyCode::Char('t'), KeyModifiers::NONE) => toggle_theme(state, runtime),
        (KeyCode::Char('a'), KeyModifiers::NONE) => open_form(state, view_data),
        (KeyCode::Char('r'), KeyModifiers::NONE) => match state.active_tab {
            TabKind::Holdings => reload_holdings(state, runtime, view_data),
            TabKind::Market => reload_market(state, runtime, view_data),
        },
        (KeyCode::Char('?'), _) => view_data.help_visible = true,
        (KeyCode::Esc, _) => {
            state.dispatch(AppCommand::ClearStatus);
        }
        _ => {}
    }
    false
}

fn switch_tab<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
) {
    state.dispatch(command);
    if state.active_tab == TabKind::Market && !view_data.market_loaded {
        reload_market(state, runtime, view_data);
    }
}

fn toggle_theme<R: AppRuntime>(state: &mut AppState, runtime: &mut R) {
    state.dispatch(AppCommand::ToggleTheme);
    if let Err(error) = runtime.save_theme(state.theme) {
        set_status(state, format!("theme not saved: {error:#}"));
    }
}

fn handle_search_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            run_table_action(state, view_data, TableAction::Search(String::new()));
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Backspace => {
            let mut term = active_search_term(state, view_data).to_owned();
            term.pop();
            run_table_action(state, view_data, TableAction::Search(term));
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut term = active_search_term(state, view_data).to_owned();
            term.push(ch);
            run_table_action(state, view_data, TableAction::Search(term));
        }
        _ => {}
    }
}

fn handle_page_input_key(state: &mut AppState, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            view_data.page_input.clear();
            state.dispatch(AppCommand::ExitToNav);
        }
        KeyCode::Enter => {
            let text = std::mem::take(&mut view_data.page_input);
            state.dispatch(AppCommand::ExitToNav);
            run_table_action(state, view_data, TableAction::PageInput(text));
        }
        KeyCode::Backspace => {
            view_data.page_input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.page_input.push(ch);
        }
        _ => {}
    }
}

fn open_form(state: &mut AppState, view_data: &mut ViewData) {
    view_data.form = Some(FormUiState::default());
    state.dispatch(AppCommand::OpenForm);
}

fn close_form(state: &mut AppState, view_data: &mut ViewData) {
    view_data.form = None;
    state.dispatch(AppCommand::ExitToNav);
}

fn handle_form_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    key: KeyEvent,
) {
    let today = runtime.today();
    let Some(form) = view_data.form.as_mut() else {
        state.dispatch(AppCommand::ExitToNav);
        return;
    };
    let focused = form.focused();
    let on_date = focused == HoldingField::DatedOn;

    match key.code {
        KeyCode::Esc => {
            close_form(state, view_data);
            set_status(state, "add holding canceled");
        }
        KeyCode::Enter => submit_form(state, runtime, view_data, today),
        KeyCode::Tab => form.move_focus(1),
        KeyCode::BackTab => form.move_focus(-1),
        KeyCode::Down if on_date => {
            form.draft.dated_on.shift_days(1, today);
        }
        KeyCode::Up if on_date => {
            form.draft.dated_on.shift_days(-1, today);
        }
        KeyCode::PageDown if on_date => {
            form.draft.dated_on.shift_months(1, today);
        }
        KeyCode::PageUp if on_date => {
            form.draft.dated_on.shift_months(-1, today);
        }
        KeyCode::Char(']') if on_date => {
            form.draft.dated_on.shift_years(1, today);
        }
        KeyCode::Char('[') if on_date => {
            form.draft.dated_on.shift_years(-1, today);
        }
        KeyCode::Down => form.move_focus(1),
        KeyCode::Up => form.move_focus(-1),
        KeyCode::Backspace => {
            form.draft.backspace(focused, today);
            form.errors = None;
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.draft.input_char(focused, ch, today);
            form.errors = None;
            form.clamp_focus();
        }
        _ => {}
    }
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    today: Date,
) {
    let Some(form) = view_data.form.as_mut() else {
        return;
    };
    let request = match form.draft.validate(today) {
        Ok(request) => request,
        Err(errors) => {
            let message = format!("fix {} field(s): {errors}", errors.len());
            form.errors = Some(errors);
            set_status(state, message);
            return;
        }
    };
    form.errors = None;

    match runtime.submit_holding(&request) {
        Ok(SubmitOutcome::Saved { request_id }) => {
            close_form(state, view_data);
            let message = match request_id {
                Some(id) => format!("saved {} (request {id})", request.symbol),
                None => format!("saved {}", request.symbol),
            };
            set_status(state, message);
        }
        Ok(SubmitOutcome::Rejected(reason)) => {
            set_status(state, format!("server rejected {}: {reason}", request.symbol));
        }
        Err(error) => set_status(state, format!("submit failed: {error:#}")),
    }
}

fn move_column(state: &AppState, view_data: &mut ViewData, delta: isize) {
    let (index, len) = match state.active_tab {
        TabKind::Holdings => (&mut view_data.holdings_column, HoldingColumn::ALL.len()),
        TabKind::Market => (&mut view_data.market_column, MarketColumn::ALL.len()),
    };
    let next = (*index as isize + delta).clamp(0, len.saturating_sub(1) as isize);
    *index = next as usize;
}

fn run_table_action(state: &mut AppState, view_data: &mut ViewData, action: TableAction) {
    let status = match state.active_tab {
        TabKind::Holdings => {
            let column = HoldingColumn::ALL[view_data.holdings_column.min(HoldingColumn::ALL.len() - 1)];
            apply_table_action(&mut view_data.holdings, column, action)
        }
        TabKind::Market => {
            let column = MarketColumn::ALL[view_data.market_column.min(MarketColumn::ALL.len() - 1)];
            apply_table_action(&mut view_data.market, column, action)
        }
    };
    if let Some(status) = status {
        set_status(state, status);
    }
}

fn apply_table_action<R: TableRow + Clone>(
    controller: &mut ViewController<R>,
    selected: R::Column,
    action: TableAction,
) -> Option<String> {
    let command = match action {
        TableAction::Search(term) => ViewCommand::SetSearchTerm(term),
        TableAction::SortSelected => ViewCommand::SetSort(selected, SortRequest::Toggle),
        TableAction::Step(delta) => ViewCommand::GoToPage(delta),
        TableAction::PageInput(text) => ViewCommand::SetPageInput(text),
    };
    controller
        .dispatch(command)
        .into_iter()
        .find_map(|event| match event {
            ViewEvent::SortChanged(sort) => Some(format!(
                "sort: {}{}",
                sort.column.label(),
                sort.direction.indicator()
            )),
            ViewEvent::Ignored => Some("page number must be a whole number".to_owned()),
            _ => None,
        })
}

fn active_search_term<'a>(state: &AppState, view_data: &'a ViewData) -> &'a str {
    match state.active_tab {
        TabKind::Holdings => &view_data.holdings.state().search_term,
        TabKind::Market => &view_data.market.state().search_term,
    }
}

fn column_index<C: ColumnKey>(column: C) -> usize {
    C::all()
        .iter()
        .position(|candidate| *candidate == column)
        .unwrap_or(0)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let colors = palette(state.theme);
    let base = Style::default().fg(colors.text).bg(colors.background);
    frame.render_widget(Block::default().style(base), frame.area());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let selected = TabKind::ALL
        .iter()
        .position(|tab| *tab == state.active_tab)
        .unwrap_or(0);
    let tab_titles = TabKind::ALL
        .iter()
        .map(|tab| tab_title(*tab, view_data))
        .collect::<Vec<String>>();
    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("hypertrend").borders(Borders::ALL))
        .style(base)
        .highlight_style(
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    frame.render_widget(
        Paragraph::new(summary_text(state, view_data)).style(base.add_modifier(Modifier::BOLD)),
        layout[1],
    );

    let search_style = if state.mode == AppMode::Search {
        base.fg(colors.accent)
    } else {
        base.fg(colors.muted)
    };
    frame.render_widget(
        Paragraph::new(search_bar_text(state, view_data)).style(search_style),
        layout[2],
    );

    match state.active_tab {
        TabKind::Holdings => render_table(
            frame,
            layout[3],
            &view_data.holdings,
            view_data.holdings_column,
            colors,
            TabKind::Holdings.label(),
        ),
        TabKind::Market => render_table(
            frame,
            layout[3],
            &view_data.market,
            view_data.market_column,
            colors,
            TabKind::Market.label(),
        ),
    }

    frame.render_widget(
        Paragraph::new(footer_text(state, view_data)).style(base),
        layout[4],
    );
    frame.render_widget(
        Paragraph::new(status_text(state)).style(base.fg(colors.muted)),
        layout[5],
    );

    if let Some(form) = &view_data.form {
        let area = centered_rect(64, 50, frame.area());
        frame.render_widget(Clear, area);
        let overlay = Paragraph::new(render_form_overlay_text(form)).style(base).block(
            Block::default()
                .title("add holding")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.accent)),
        );
        frame.render_widget(overlay, area);
    }

    if view_data.help_visible {
        let area = centered_rect(70, 70, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .style(base)
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

fn render_table<R: TableRow + Clone>(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    controller: &ViewController<R>,
    selected_column: usize,
    colors: Palette,
    title: &str,
) {
    let columns = <R::Column as ColumnKey>::all();
    let sort = controller.state().sort;

    let header = Row::new(columns.iter().enumerate().map(|(index, column)| {
        let mut style = Style::default()
            .fg(colors.accent)
            .add_modifier(Modifier::BOLD);
        if index == selected_column {
            style = style.bg(colors.selection);
        }
        Cell::from(header_label(*column, sort)).style(style)
    }));

    let rows = controller.view().visible_rows.iter().map(|row| {
        Row::new(columns.iter().map(|column| {
            let style = cell_style(row.value(*column), *column, colors);
            let alignment = if column.is_numeric() {
                Alignment::Right
            } else {
                Alignment::Left
            };
            Cell::from(Line::from(row.cell_text(*column)).alignment(alignment)).style(style)
        }))
    });

    let widths = columns
        .iter()
        .map(|column| Constraint::Min(column.label().chars().count() as u16 + 2))
        .collect::<Vec<_>>();

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn cell_style<C: ColumnKey>(value: FieldValue<'_>, column: C, colors: Palette) -> Style {
    match value {
        FieldValue::Number(number) if SIGNED_COLUMNS.contains(&column.key()) => {
            if number > 0.0 {
                Style::default().fg(colors.gain)
            } else if number < 0.0 {
                Style::default().fg(colors.loss)
            } else {
                Style::default()
            }
        }
        _ => Style::default(),
    }
}

fn header_label<C: ColumnKey>(column: C, sort: SortSpec<C>) -> String {
    if sort.column == column {
        format!("{}{}", column.label(), sort.direction.indicator())
    } else {
        column.label().to_owned()
    }
}

fn tab_title(tab: TabKind, view_data: &ViewData) -> String {
    let count = match tab {
        TabKind::Holdings => view_data.holdings.view().total_match_count,
        TabKind::Market => view_data.market.view().total_match_count,
    };
    format!("{} ({count})", tab.label())
}

fn summary_text(state: &AppState, view_data: &ViewData) -> String {
    match state.active_tab {
        TabKind::Holdings => {
            portfolio_summary_text(&PortfolioSummary::from_holdings(view_data.holdings.rows()))
        }
        TabKind::Market if view_data.market_loaded => {
            format!("{} ticks · r to refresh", view_data.market.rows().len())
        }
        TabKind::Market => "market data not loaded · r to fetch".to_owned(),
    }
}

pub fn portfolio_summary_text(summary: &PortfolioSummary) -> String {
    format!(
        "Invested {} · Current {} · P&L {} ({}) · Today {} · {} positions",
        format_rupees(summary.invested),
        format_rupees(summary.current_value),
        format_signed_rupees(summary.pnl),
        format_signed_percent(summary.pnl_percent),
        format_signed_rupees(summary.day_change),
        summary.positions
    )
}

fn search_bar_text(state: &AppState, view_data: &ViewData) -> String {
    let term = active_search_term(state, view_data);
    if state.mode == AppMode::Search {
        format!("search: {term}_")
    } else if term.is_empty() {
        "/ to search".to_owned()
    } else {
        format!("search: {term}")
    }
}

fn footer_text(state: &AppState, view_data: &ViewData) -> String {
    let summary = match state.active_tab {
        TabKind::Holdings => view_data.holdings.view().summary(),
        TabKind::Market => view_data.market.view().summary(),
    };
    if state.mode == AppMode::PageInput {
        format!("{summary} · go to page: {}_", view_data.page_input)
    } else {
        summary
    }
}

fn status_text(state: &AppState) -> String {
    let hints = match state.mode {
        AppMode::Nav => {
            "/ search | h/l col s sort | n/p g page | a add | r reload | t theme | tab | ? | q"
        }
        AppMode::Search => "type to filter | enter keep | esc clear",
        AppMode::PageInput => "page number | enter go | esc cancel",
        AppMode::Form => "tab field | space own | up/down day | pgup/pgdn month | enter save | esc",
    };
    let mode = mode_label(state.mode);
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

const fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::Nav => "NAV",
        AppMode::Search => "SEARCH",
        AppMode::PageInput => "PAGE",
        AppMode::Form => "FORM",
    }
}

fn render_form_overlay_text(form: &FormUiState) -> String {
    let focused = form.focused();
    let mut lines = form
        .draft
        .visible_fields()
        .into_iter()
        .map(|field| {
            let marker = if field == focused { ">" } else { " " };
            let line = format!("{marker} {:<14} {}", field.label(), form.draft.field_text(field));
            match field_error_text(form, field) {
                Some(error) => format!("{line}  ! {error}"),
                None => line,
            }
        })
        .collect::<Vec<_>>();
    if focused == HoldingField::DatedOn {
        lines.push(String::new());
        lines.push("YYYY-MM-DD · up/down ±1 day · pgup/pgdn ±1 month · [/] ±1 year".to_owned());
    }
    lines.join("\n")
}

fn field_error_text(form: &FormUiState, field: HoldingField) -> Option<String> {
    if let Some(errors) = &form.errors
        && let Some(error) = errors.for_field(field)
    {
        return Some(error.to_string());
    }
    if field == HoldingField::DatedOn && !form.draft.dated_on.text().is_empty() {
        return form.draft.dated_on.error().map(|error| error.to_string());
    }
    None
}

fn help_overlay_text() -> &'static str {
    "/        search symbol or company\n\
     h/l      select column\n\
     s        sort by selected column (again to flip)\n\
     n/p      next/previous page\n\
     g        jump to page number\n\
     a        add holding\n\
     r        reload active tab\n\
     t        toggle light/dark theme\n\
     tab f/b  switch tab\n\
     q        quit\n\
     \n\
     esc or ? closes this help"
}

/// Column-aligned plain text of the current page, for non-interactive
/// output.
pub fn render_plain_table<R: TableRow + Clone>(controller: &ViewController<R>) -> String {
    let columns = <R::Column as ColumnKey>::all();
    let sort = controller.state().sort;
    let headers = columns
        .iter()
        .map(|column| header_label(*column, sort))
        .collect::<Vec<_>>();
    let body = controller
        .view()
        .visible_rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|column| row.cell_text(*column))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            body.iter()
                .map(|cells| cells[index].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let numeric = columns
        .iter()
        .map(|column| column.is_numeric())
        .collect::<Vec<_>>();
    let mut lines = vec![pad_cells(&headers, &widths, &numeric)];
    lines.extend(body.iter().map(|cells| pad_cells(cells, &widths, &numeric)));
    lines.push(controller.view().summary());
    lines.join("\n")
}

/// Numeric columns are right-aligned.
fn pad_cells(cells: &[String], widths: &[usize], numeric: &[bool]) -> String {
    cells
        .iter()
        .zip(widths)
        .zip(numeric)
        .map(|((cell, width), right)| {
            let pad = " ".repeat(width.saturating_sub(cell.chars().count()));
            if *right {
                format!("{pad}{cell}")
            } else {
                format!("{cell}{pad}")
            }
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AppRuntime, FormUiState, ViewData, footer_text, handle_key_event, header_label,
        load_initial, pad_cells, portfolio_summary_text, render_form_overlay_text,
        render_plain_table, search_bar_text, status_text,
    };
    use anyhow::{Result, anyhow};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use hypertrend_app::{
        AppMode, AppState, Holding, HoldingColumn, HoldingField, HoldingRequest, MarketTick,
        PortfolioSummary, SortDirection, SortSpec, SubmitOutcome, TabKind, ThemeMode,
        holdings_controller,
    };
    use hypertrend_testkit::{distinct_value_holdings, fixture_today, sample_ticks};
    use time::Date;

    #[derive(Debug, Default)]
    struct TestRuntime {
        holdings: Vec<Holding>,
        market: Vec<MarketTick>,
        market_error: Option<String>,
        market_loads: usize,
        submitted: Vec<HoldingRequest>,
        submit_reply: Option<SubmitOutcome>,
        theme: ThemeMode,
        saved_themes: Vec<ThemeMode>,
    }

    impl TestRuntime {
        fn with_holdings() -> Self {
            Self {
                holdings: distinct_value_holdings(),
                market: sample_ticks(),
                submit_reply: Some(SubmitOutcome::Saved {
                    request_id: Some(3),
                }),
                ..Self::default()
            }
        }
    }

    impl AppRuntime for TestRuntime {
        fn load_holdings(&mut self) -> Result<Vec<Holding>> {
            Ok(self.holdings.clone())
        }

        fn load_market(&mut self) -> Result<Vec<MarketTick>> {
            self.market_loads += 1;
            match &self.market_error {
                Some(error) => Err(anyhow!(error.clone())),
                None => Ok(self.market.clone()),
            }
        }

        fn submit_holding(&mut self, request: &HoldingRequest) -> Result<SubmitOutcome> {
            self.submitted.push(request.clone());
            self.submit_reply
                .clone()
                .ok_or_else(|| anyhow!("cannot reach http://127.0.0.1:8000/api"))
        }

        fn load_theme(&mut self) -> Result<ThemeMode> {
            Ok(self.theme)
        }

        fn save_theme(&mut self, theme: ThemeMode) -> Result<()> {
            self.saved_themes.push(theme);
            Ok(())
        }

        fn today(&self) -> Date {
            fixture_today()
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn press(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        code: KeyCode,
    ) -> bool {
        handle_key_event(state, runtime, view_data, key(code))
    }

    fn type_text(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        text: &str,
    ) {
        for ch in text.chars() {
            press(state, runtime, view_data, KeyCode::Char(ch));
        }
    }

    fn setup(runtime: &mut TestRuntime) -> (AppState, ViewData) {
        let mut state = AppState::default();
        let mut view_data = ViewData::new(runtime);
        load_initial(&mut state, runtime, &mut view_data);
        (state, view_data)
    }

    fn visible_symbols(view_data: &ViewData) -> Vec<String> {
        view_data
            .holdings
            .view()
            .visible_rows
            .iter()
            .map(|row| row.symbol.clone())
            .collect()
    }

    #[test]
    fn startup_loads_theme_and_sorted_holdings() {
        let mut runtime = TestRuntime {
            theme: ThemeMode::Dark,
            ..TestRuntime::with_holdings()
        };
        let (state, view_data) = setup(&mut runtime);

        assert_eq!(state.theme, ThemeMode::Dark);
        assert_eq!(state.status_line.as_deref(), Some("loaded 11 holdings"));
        assert_eq!(view_data.holdings.view().visible_rows.len(), 10);
        assert!(
            !visible_symbols(&view_data).contains(&"BHARTIARTL".to_owned()),
            "lowest current value lands on page 2"
        );
        assert_eq!(
            footer_text(&state, &view_data),
            "Showing 1–10 of 11 · page 1/2"
        );
        assert_eq!(runtime.market_loads, 0);
    }

    #[test]
    fn search_filters_live_and_resets_page() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('n'));
        assert_eq!(view_data.holdings.state().current_page, 2);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('/'));
        assert_eq!(state.mode, AppMode::Search);
        type_text(&mut state, &mut runtime, &mut view_data, "tcs");
        assert_eq!(view_data.holdings.state().current_page, 1);
        assert_eq!(visible_symbols(&view_data), vec!["TCS"]);
        assert_eq!(search_bar_text(&state, &view_data), "search: tcs_");

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(view_data.holdings.state().search_term, "tcs");

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('/'));
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(view_data.holdings.state().search_term, "");
        assert_eq!(view_data.holdings.view().total_match_count, 11);
    }

    #[test]
    fn q_types_into_search_instead_of_quitting() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('/'));
        let quit = press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('q'));
        assert!(!quit);
        assert_eq!(view_data.holdings.state().search_term, "q");

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc);
        assert!(press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('q')));
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        assert!(handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL),
        ));
    }

    #[test]
    fn sort_key_toggles_the_selected_column() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('s'));
        assert_eq!(
            view_data.holdings.state().sort,
            SortSpec::new(HoldingColumn::CurrentValue, SortDirection::Asc)
        );
        assert_eq!(state.status_line.as_deref(), Some("sort: Current Value ↑"));
        assert_eq!(visible_symbols(&view_data)[0], "BHARTIARTL");

        for _ in 0..10 {
            press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('h'));
        }
        assert_eq!(view_data.holdings_column, 0);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('s'));
        assert_eq!(
            view_data.holdings.state().sort,
            SortSpec::new(HoldingColumn::Symbol, SortDirection::Asc)
        );
        assert_eq!(
            visible_symbols(&view_data)[..3],
            ["BHARTIARTL", "HDFCBANK", "HINDUNILVR"]
        );
    }

    #[test]
    fn page_input_jumps_and_rejects_garbage() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('g'));
        assert_eq!(state.mode, AppMode::PageInput);
        type_text(&mut state, &mut runtime, &mut view_data, "2");
        assert_eq!(
            footer_text(&state, &view_data),
            "Showing 1–10 of 11 · page 1/2 · go to page: 2_"
        );
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(view_data.holdings.state().current_page, 2);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('g'));
        type_text(&mut state, &mut runtime, &mut view_data, "two");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);
        assert_eq!(view_data.holdings.state().current_page, 2);
        assert_eq!(
            state.status_line.as_deref(),
            Some("page number must be a whole number")
        );
    }

    #[test]
    fn market_tab_fetches_once_and_r_reloads() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        assert_eq!(state.active_tab, TabKind::Market);
        assert_eq!(runtime.market_loads, 1);
        assert_eq!(view_data.market.view().total_match_count, 3);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('b'));
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('f'));
        assert_eq!(runtime.market_loads, 1);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('r'));
        assert_eq!(runtime.market_loads, 2);
        assert_eq!(state.status_line.as_deref(), Some("loaded 3 ticks"));
    }

    #[test]
    fn market_failure_keeps_previous_rows() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('/'));
        type_text(&mut state, &mut runtime, &mut view_data, "nse");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);
        assert_eq!(view_data.market.view().total_match_count, 2);

        runtime.market_error = Some("cannot reach http://127.0.0.1:8000/api".to_owned());
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('r'));

        let status = state.status_line.clone().unwrap_or_default();
        assert!(status.starts_with("market fetch failed: cannot reach"));
        assert_eq!(view_data.market.rows().len(), 3);
        assert_eq!(view_data.market.state().search_term, "nse");
        assert_eq!(view_data.market.view().total_match_count, 2);
    }

    #[test]
    fn theme_toggle_is_persisted() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('t'));
        assert_eq!(state.theme, ThemeMode::Dark);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('t'));
        assert_eq!(state.theme, ThemeMode::Light);
        assert_eq!(runtime.saved_themes, vec![ThemeMode::Dark, ThemeMode::Light]);
    }

    #[test]
    fn form_submits_unowned_holding() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        assert_eq!(state.mode, AppMode::Form);
        type_text(&mut state, &mut runtime, &mut view_data, "tcs");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "Tata Consultancy Services");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);

        assert_eq!(state.mode, AppMode::Nav);
        assert!(view_data.form.is_none());
        assert_eq!(runtime.submitted.len(), 1);
        assert_eq!(runtime.submitted[0].symbol, "TCS");
        assert_eq!(runtime.submitted[0].company, "Tata Consultancy Services");
        assert_eq!(runtime.submitted[0].stock_held, None);
        assert_eq!(state.status_line.as_deref(), Some("saved TCS (request 3)"));
    }

    #[test]
    fn form_collects_errors_and_stays_open() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);

        assert_eq!(state.mode, AppMode::Form);
        assert!(runtime.submitted.is_empty());
        let status = state.status_line.clone().unwrap_or_default();
        assert!(status.starts_with("fix 2 field(s):"), "{status}");
        let form = view_data.form.as_ref().expect("form stays open");
        let text = render_form_overlay_text(form);
        assert!(text.contains("symbol is required"), "{text}");
    }

    #[test]
    fn form_date_keys_walk_the_calendar() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char(' '));
        for _ in 0..3 {
            press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        }
        let date_text = |view_data: &ViewData| {
            view_data
                .form
                .as_ref()
                .map(|form| form.draft.dated_on.text().to_owned())
                .unwrap_or_default()
        };
        assert_eq!(
            view_data.form.as_ref().map(FormUiState::focused),
            Some(HoldingField::DatedOn)
        );

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Down);
        assert_eq!(date_text(&view_data), "2025-06-30", "clamped to today");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Up);
        assert_eq!(date_text(&view_data), "2025-06-29");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::PageUp);
        assert_eq!(date_text(&view_data), "2025-05-29");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('['));
        assert_eq!(date_text(&view_data), "2024-05-29");
    }

    #[test]
    fn owned_holding_payload_carries_position_details() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        type_text(&mut state, &mut runtime, &mut view_data, "infy");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "Infosys Limited");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char(' '));
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "80");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "₹1,13,600");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "2024-02-15");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);

        assert_eq!(runtime.submitted.len(), 1);
        let request = &runtime.submitted[0];
        assert_eq!(request.stock_held, Some(80));
        assert_eq!(
            request.investment_value.as_ref().map(ToString::to_string),
            Some("113600.00".to_owned())
        );
        assert_eq!(
            request.dated_on,
            Date::from_calendar_date(2024, time::Month::February, 15).ok()
        );
    }

    #[test]
    fn rejected_submission_keeps_form_open() {
        let mut runtime = TestRuntime {
            submit_reply: Some(SubmitOutcome::Rejected(
                "symbol: holding already exists.".to_owned(),
            )),
            ..TestRuntime::with_holdings()
        };
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        type_text(&mut state, &mut runtime, &mut view_data, "tcs");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "Tata");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);

        assert_eq!(state.mode, AppMode::Form);
        assert!(view_data.form.is_some());
        assert_eq!(
            state.status_line.as_deref(),
            Some("server rejected TCS: symbol: holding already exists.")
        );
    }

    #[test]
    fn network_failure_on_submit_surfaces_in_status() {
        let mut runtime = TestRuntime {
            submit_reply: None,
            ..TestRuntime::with_holdings()
        };
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        type_text(&mut state, &mut runtime, &mut view_data, "tcs");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Tab);
        type_text(&mut state, &mut runtime, &mut view_data, "Tata");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Enter);

        assert!(view_data.form.is_some());
        assert_eq!(
            state.status_line.as_deref(),
            Some("submit failed: cannot reach http://127.0.0.1:8000/api")
        );
        assert_eq!(view_data.holdings.view().total_match_count, 11);
    }

    #[test]
    fn esc_cancels_the_form() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('a'));
        type_text(&mut state, &mut runtime, &mut view_data, "tcs");
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc);

        assert_eq!(state.mode, AppMode::Nav);
        assert!(view_data.form.is_none());
        assert!(runtime.submitted.is_empty());
        assert_eq!(state.status_line.as_deref(), Some("add holding canceled"));
    }

    #[test]
    fn help_overlay_swallows_keys_until_closed() {
        let mut runtime = TestRuntime::with_holdings();
        let (mut state, mut view_data) = setup(&mut runtime);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('?'));
        assert!(view_data.help_visible);
        assert!(!press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('q')));
        press(&mut state, &mut runtime, &mut view_data, KeyCode::Char('n'));
        assert_eq!(view_data.holdings.state().current_page, 1);

        press(&mut state, &mut runtime, &mut view_data, KeyCode::Esc);
        assert!(!view_data.help_visible);
    }

    #[test]
    fn form_overlay_hides_position_fields_until_owned() {
        let mut form = FormUiState::default();
        let text = render_form_overlay_text(&form);
        assert!(text.contains("symbol"));
        assert!(!text.contains("quantity"));

        form.draft.owns_stock = true;
        let text = render_form_overlay_text(&form);
        assert!(text.contains("quantity"));
        assert!(text.contains("purchase date"));
    }

    #[test]
    fn header_label_marks_only_the_sorted_column() {
        let sort = SortSpec::new(HoldingColumn::CurrentValue, SortDirection::Desc);
        assert_eq!(
            header_label(HoldingColumn::CurrentValue, sort),
            "Current Value ↓"
        );
        assert_eq!(header_label(HoldingColumn::Symbol, sort), "Symbol");
    }

    #[test]
    fn status_text_shows_mode_and_message() {
        let mut state = AppState::default();
        assert!(status_text(&state).starts_with("NAV | / search"));
        state.status_line = Some("loaded 3 ticks".to_owned());
        state.mode = AppMode::Search;
        assert!(status_text(&state).starts_with("SEARCH | loaded 3 ticks | type to filter"));
    }

    #[test]
    fn portfolio_summary_line_formats_rupees() {
        let summary = PortfolioSummary {
            invested: 1000.0,
            current_value: 1250.5,
            pnl: 250.5,
            pnl_percent: 25.05,
            day_change: -12.0,
            positions: 2,
        };
        assert_eq!(
            portfolio_summary_text(&summary),
            "Invested ₹1000.00 · Current ₹1250.50 · P&L +₹250.50 (+25.05%) · Today -₹12.00 · 2 positions"
        );
    }

    #[test]
    fn plain_table_lists_page_and_footer() {
        let controller = holdings_controller(distinct_value_holdings());
        let text = render_plain_table(&controller);
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(lines.len(), 12);
        assert!(lines[0].starts_with("Symbol"));
        assert!(lines[0].contains("Current Value ↓"));
        assert_eq!(lines[11], "Showing 1–10 of 11 · page 1/2");
    }

    #[test]
    fn plain_table_right_aligns_numeric_columns() {
        let cells = ["TCS".to_owned(), "5".to_owned(), "12.5".to_owned()];
        let line = pad_cells(&cells, &[6, 4, 6], &[false, true, true]);
        assert_eq!(line, "TCS        5    12.5");

        let controller = holdings_controller(distinct_value_holdings());
        let text = render_plain_table(&controller);
        let lines = text.lines().collect::<Vec<_>>();
        let header_width = lines[0].chars().count();
        for row in &lines[1..11] {
            assert_eq!(row.chars().count(), header_width, "{row}");
        }
    }
}
