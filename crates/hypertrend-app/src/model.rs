// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::macros::format_description;

use crate::view::{ColumnKey, FieldValue, TableRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TabKind {
    Holdings,
    Market,
}

impl TabKind {
    pub const ALL: [Self; 2] = [Self::Holdings, Self::Market];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Holdings => "Holdings",
            Self::Market => "Market",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Nav,
    Search,
    PageInput,
    Form,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Theme,
}

impl SettingKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Theme => "theme",
        }
    }
}

/// One equity position as shown in the holdings table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub symbol: String,
    pub company: String,
    pub qty: f64,
    pub avg_price: f64,
    pub ltp: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub day_change: f64,
    pub day_change_percent: f64,
}

impl Holding {
    /// Derives value and P&L figures from a position and its latest quote.
    /// `day_change` is per share.
    pub fn from_position(
        symbol: &str,
        company: &str,
        qty: f64,
        avg_price: f64,
        ltp: f64,
        day_change: f64,
    ) -> Self {
        let invested = qty * avg_price;
        let current_value = qty * ltp;
        let pnl = current_value - invested;
        let previous_close = ltp - day_change;
        Self {
            symbol: symbol.to_owned(),
            company: company.to_owned(),
            qty,
            avg_price,
            ltp,
            current_value,
            pnl,
            pnl_percent: percent_of(pnl, invested),
            day_change,
            day_change_percent: percent_of(day_change, previous_close),
        }
    }
}

fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldingColumn {
    Symbol,
    Company,
    Qty,
    AvgPrice,
    Ltp,
    CurrentValue,
    Pnl,
    PnlPercent,
    DayChange,
    DayChangePercent,
}

impl HoldingColumn {
    pub const ALL: [Self; 10] = [
        Self::Symbol,
        Self::Company,
        Self::Qty,
        Self::AvgPrice,
        Self::Ltp,
        Self::CurrentValue,
        Self::Pnl,
        Self::PnlPercent,
        Self::DayChange,
        Self::DayChangePercent,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Company => "company",
            Self::Qty => "qty",
            Self::AvgPrice => "avgPrice",
            Self::Ltp => "ltp",
            Self::CurrentValue => "currentValue",
            Self::Pnl => "pnl",
            Self::PnlPercent => "pnlPercent",
            Self::DayChange => "dayChange",
            Self::DayChangePercent => "dayChangePercent",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.as_str() == value)
    }
}

impl ColumnKey for HoldingColumn {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn key(self) -> &'static str {
        self.as_str()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Symbol => "Symbol",
            Self::Company => "Company",
            Self::Qty => "Qty",
            Self::AvgPrice => "Avg Price",
            Self::Ltp => "LTP",
            Self::CurrentValue => "Current Value",
            Self::Pnl => "P&L",
            Self::PnlPercent => "P&L %",
            Self::DayChange => "Day Change",
            Self::DayChangePercent => "Day %",
        }
    }

    fn is_numeric(self) -> bool {
        !matches!(self, Self::Symbol | Self::Company)
    }
}

impl TableRow for Holding {
    type Column = HoldingColumn;

    fn value(&self, column: HoldingColumn) -> FieldValue<'_> {
        match column {
            HoldingColumn::Symbol => FieldValue::Text(&self.symbol),
            HoldingColumn::Company => FieldValue::Text(&self.company),
            HoldingColumn::Qty => FieldValue::Number(self.qty),
            HoldingColumn::AvgPrice => FieldValue::Number(self.avg_price),
            HoldingColumn::Ltp => FieldValue::Number(self.ltp),
            HoldingColumn::CurrentValue => FieldValue::Number(self.current_value),
            HoldingColumn::Pnl => FieldValue::Number(self.pnl),
            HoldingColumn::PnlPercent => FieldValue::Number(self.pnl_percent),
            HoldingColumn::DayChange => FieldValue::Number(self.day_change),
            HoldingColumn::DayChangePercent => FieldValue::Number(self.day_change_percent),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.symbol, &self.company]
    }

    fn cell_text(&self, column: HoldingColumn) -> String {
        match column {
            HoldingColumn::Symbol => self.symbol.clone(),
            HoldingColumn::Company => self.company.clone(),
            HoldingColumn::Qty => format_quantity(self.qty),
            HoldingColumn::AvgPrice => format_rupees(self.avg_price),
            HoldingColumn::Ltp => format_rupees(self.ltp),
            HoldingColumn::CurrentValue => format_rupees(self.current_value),
            HoldingColumn::Pnl => format_signed_rupees(self.pnl),
            HoldingColumn::PnlPercent => format_signed_percent(self.pnl_percent),
            HoldingColumn::DayChange => format_signed_rupees(self.day_change),
            HoldingColumn::DayChangePercent => format_signed_percent(self.day_change_percent),
        }
    }
}

/// OHLCV tick as returned by the market data endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketTick {
    #[serde(with = "time::serde::rfc3339")]
    pub time: OffsetDateTime,
    pub symbol: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub exchange: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarketColumn {
    Time,
    Symbol,
    Exchange,
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl MarketColumn {
    pub const ALL: [Self; 8] = [
        Self::Time,
        Self::Symbol,
        Self::Exchange,
        Self::Open,
        Self::High,
        Self::Low,
        Self::Close,
        Self::Volume,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Symbol => "symbol",
            Self::Exchange => "exchange",
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
            Self::Volume => "volume",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|column| column.as_str() == value)
    }
}

impl ColumnKey for MarketColumn {
    fn all() -> &'static [Self] {
        &Self::ALL
    }

    fn key(self) -> &'static str {
        self.as_str()
    }

    fn label(self) -> &'static str {
        match self {
            Self::Time => "Time",
            Self::Symbol => "Symbol",
            Self::Exchange => "Exchange",
            Self::Open => "Open",
            Self::High => "High",
            Self::Low => "Low",
            Self::Close => "Close",
            Self::Volume => "Volume",
        }
    }

    fn is_numeric(self) -> bool {
        !matches!(self, Self::Time | Self::Symbol | Self::Exchange)
    }
}

impl TableRow for MarketTick {
    type Column = MarketColumn;

    fn value(&self, column: MarketColumn) -> FieldValue<'_> {
        match column {
            // Unix seconds keep chronological order across UTC offsets.
            MarketColumn::Time => FieldValue::Number(self.time.unix_timestamp() as f64),
            MarketColumn::Symbol => FieldValue::Text(&self.symbol),
            MarketColumn::Exchange => FieldValue::Text(&self.exchange),
            MarketColumn::Open => FieldValue::Number(self.open),
            MarketColumn::High => FieldValue::Number(self.high),
            MarketColumn::Low => FieldValue::Number(self.low),
            MarketColumn::Close => FieldValue::Number(self.close),
            MarketColumn::Volume => FieldValue::Number(self.volume as f64),
        }
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![&self.symbol, &self.exchange]
    }

    fn cell_text(&self, column: MarketColumn) -> String {
        match column {
            MarketColumn::Time => format_tick_time(self.time),
            MarketColumn::Symbol => self.symbol.clone(),
            MarketColumn::Exchange => self.exchange.clone(),
            MarketColumn::Open => format_rupees(self.open),
            MarketColumn::High => format_rupees(self.high),
            MarketColumn::Low => format_rupees(self.low),
            MarketColumn::Close => format_rupees(self.close),
            MarketColumn::Volume => self.volume.to_string(),
        }
    }
}

/// Totals shown above the holdings table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PortfolioSummary {
    pub invested: f64,
    pub current_value: f64,
    pub pnl: f64,
    pub pnl_percent: f64,
    pub day_change: f64,
    pub positions: usize,
}

impl PortfolioSummary {
    pub fn from_holdings(holdings: &[Holding]) -> Self {
        let invested: f64 = holdings.iter().map(|row| row.qty * row.avg_price).sum();
        let current_value: f64 = holdings.iter().map(|row| row.current_value).sum();
        let pnl: f64 = holdings.iter().map(|row| row.pnl).sum();
        let day_change: f64 = holdings.iter().map(|row| row.day_change * row.qty).sum();
        Self {
            invested,
            current_value,
            pnl,
            pnl_percent: percent_of(pnl, invested),
            day_change,
            positions: holdings.len(),
        }
    }
}

pub fn format_rupees(amount: f64) -> String {
    format!("₹{amount:.2}")
}

pub fn format_signed_rupees(amount: f64) -> String {
    let sign = if amount >= 0.0 { "+" } else { "-" };
    format!("{sign}₹{:.2}", amount.abs())
}

pub fn format_signed_percent(percent: f64) -> String {
    let sign = if percent >= 0.0 { "+" } else { "-" };
    format!("{sign}{:.2}%", percent.abs())
}

fn format_quantity(qty: f64) -> String {
    if qty.fract() == 0.0 {
        format!("{qty:.0}")
    } else {
        format!("{qty}")
    }
}

fn format_tick_time(time: OffsetDateTime) -> String {
    let layout = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
    time.format(layout)
        .unwrap_or_else(|_| time.unix_timestamp().to_string())
}
