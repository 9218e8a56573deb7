// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, anyhow};
use hypertrend_app::{
    Holding, HoldingColumn, HoldingRequest, MarketTick, SortSpec, SubmitOutcome, ThemeMode,
    sample_holdings,
};
use hypertrend_db::Store;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoldingsSource {
    /// JSON array of holdings on disk.
    File(PathBuf),
    Sample,
}

impl HoldingsSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => Self::File(path),
            None => Self::Sample,
        }
    }

    pub fn load(&self) -> Result<Vec<Holding>> {
        match self {
            Self::File(path) => hypertrend_db::read_holdings_file(path),
            Self::Sample => Ok(sample_holdings()),
        }
    }
}

pub struct DashboardRuntime<'a> {
    store: &'a Store,
    holdings: HoldingsSource,
    client: Option<hypertrend_api::Client>,
    items_per_page: usize,
    holdings_sort: SortSpec<HoldingColumn>,
}

impl<'a> DashboardRuntime<'a> {
    pub fn new(
        store: &'a Store,
        holdings: HoldingsSource,
        client: Option<hypertrend_api::Client>,
        items_per_page: usize,
        holdings_sort: SortSpec<HoldingColumn>,
    ) -> Self {
        Self {
            store,
            holdings,
            client,
            items_per_page,
            holdings_sort,
        }
    }

    fn client(&self) -> Result<&hypertrend_api::Client> {
        self.client.as_ref().ok_or_else(|| {
            anyhow!("dashboard API is disabled -- set [api].enabled = true in the config file")
        })
    }
}

impl hypertrend_tui::AppRuntime for DashboardRuntime<'_> {
    fn load_holdings(&mut self) -> Result<Vec<Holding>> {
        self.holdings.load()
    }

    fn load_market(&mut self) -> Result<Vec<MarketTick>> {
        self.client()?.fetch_market_data()
    }

    fn submit_holding(&mut self, request: &HoldingRequest) -> Result<SubmitOutcome> {
        self.client()?.submit_holding(request)
    }

    fn load_theme(&mut self) -> Result<ThemeMode> {
        self.store.theme_preference().get()
    }

    fn save_theme(&mut self, theme: ThemeMode) -> Result<()> {
        self.store.theme_preference().set(theme)
    }

    fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    fn holdings_sort(&self) -> SortSpec<HoldingColumn> {
        self.holdings_sort
    }
}
