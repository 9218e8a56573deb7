// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Owns the view parameters for one table and recomputes the derived view
//! after every change.

use tracing::debug;

use crate::model::{Holding, HoldingColumn};
use crate::view::{
    ColumnKey, DerivedView, SortDirection, SortSpec, TableRow, clamp_page, derive_view,
};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState<C> {
    pub search_term: String,
    pub sort: SortSpec<C>,
    pub current_page: usize,
    pub items_per_page: usize,
}

impl<C: ColumnKey> ViewState<C> {
    pub fn new(sort: SortSpec<C>, items_per_page: usize) -> Self {
        Self {
            search_term: String::new(),
            sort,
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortRequest {
    Toggle,
    Direction(SortDirection),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCommand<C> {
    SetSearchTerm(String),
    SetSort(C, SortRequest),
    SetPage(i64),
    SetPageInput(String),
    GoToPage(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent<C> {
    SearchChanged(String),
    SortChanged(SortSpec<C>),
    PageChanged(usize),
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<R> = Box<dyn FnMut(&DerivedView<R>)>;

pub struct ViewController<R: TableRow> {
    rows: Vec<R>,
    state: ViewState<R::Column>,
    view: DerivedView<R>,
    listeners: Vec<(SubscriptionId, Listener<R>)>,
    next_subscription: u64,
}

impl<R: TableRow + Clone> ViewController<R> {
    pub fn new(rows: Vec<R>, sort: SortSpec<R::Column>, items_per_page: usize) -> Self {
        let state = ViewState::new(sort, items_per_page);
        let view = derive_view(&rows, "", state.sort, 1, state.items_per_page);
        Self {
            rows,
            state,
            view,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &ViewState<R::Column> {
        &self.state
    }

    pub fn view(&self) -> &DerivedView<R> {
        &self.view
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&DerivedView<R>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn dispatch(&mut self, command: ViewCommand<R::Column>) -> Vec<ViewEvent<R::Column>> {
        match command {
            ViewCommand::SetSearchTerm(term) => self.set_search_term(&term),
            ViewCommand::SetSort(column, request) => self.set_sort(column, request),
            ViewCommand::SetPage(page) => self.set_page(page),
            ViewCommand::SetPageInput(text) => self.set_page_input(&text),
            ViewCommand::GoToPage(delta) => self.go_to_page(delta),
        }
    }

    pub fn set_search_term(&mut self, term: &str) -> Vec<ViewEvent<R::Column>> {
        self.state.search_term = term.to_owned();
        self.state.current_page = 1;
        self.recompute();
        vec![
            ViewEvent::SearchChanged(self.state.search_term.clone()),
            ViewEvent::PageChanged(self.state.current_page),
        ]
    }

    pub fn set_sort(
        &mut self,
        column: R::Column,
        request: SortRequest,
    ) -> Vec<ViewEvent<R::Column>> {
        let direction = match request {
            SortRequest::Direction(direction) => direction,
            SortRequest::Toggle if self.state.sort.column == column => {
                self.state.sort.direction.toggled()
            }
            SortRequest::Toggle => SortDirection::Asc,
        };
        self.state.sort = SortSpec::new(column, direction);
        self.state.current_page = 1;
        self.recompute();
        vec![
            ViewEvent::SortChanged(self.state.sort),
            ViewEvent::PageChanged(self.state.current_page),
        ]
    }

    pub fn set_page(&mut self, page: i64) -> Vec<ViewEvent<R::Column>> {
        self.state.current_page = clamp_page(page, self.view.page_count);
        self.recompute();
        vec![ViewEvent::PageChanged(self.state.current_page)]
    }

    /// Accepts whole numbers typed into the page box, including `"3.0"`.
    /// Anything else leaves the view untouched.
    pub fn set_page_input(&mut self, text: &str) -> Vec<ViewEvent<R::Column>> {
        match parse_page_input(text) {
            Some(page) => self.set_page(page),
            None => vec![ViewEvent::Ignored],
        }
    }

    pub fn go_to_page(&mut self, delta: i64) -> Vec<ViewEvent<R::Column>> {
        let current = i64::try_from(self.state.current_page).unwrap_or(i64::MAX);
        self.set_page(current.saturating_add(delta))
    }

    /// Swaps the underlying rows, keeping query and sort.
    pub fn replace_rows(&mut self, rows: Vec<R>) -> Vec<ViewEvent<R::Column>> {
        self.rows = rows;
        self.recompute();
        vec![ViewEvent::PageChanged(self.state.current_page)]
    }

    fn recompute(&mut self) {
        let page = i64::try_from(self.state.current_page).unwrap_or(i64::MAX);
        self.view = derive_view(
            &self.rows,
            &self.state.search_term,
            self.state.sort,
            page,
            self.state.items_per_page,
        );
        self.state.current_page = self.view.current_page;
        debug!(
            component = "view",
            event = "view.recompute",
            rows = self.rows.len(),
            matches = self.view.total_match_count,
            page = self.view.current_page,
            page_count = self.view.page_count,
            sort = self.state.sort.column.key(),
            direction = self.state.sort.direction.as_str(),
        );
        for (_, listener) in &mut self.listeners {
            listener(&self.view);
        }
    }
}

pub fn parse_page_input(text: &str) -> Option<i64> {
    let value = text.trim().parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

pub fn holdings_controller(holdings: Vec<Holding>) -> ViewController<Holding> {
    ViewController::new(
        holdings,
        SortSpec::new(HoldingColumn::CurrentValue, SortDirection::Desc),
        DEFAULT_ITEMS_PER_PAGE,
    )
}
