// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use hypertrend_app::{Holding, MarketTick, sample_holdings};
use std::path::{Path, PathBuf};
use time::macros::{date, datetime};
use time::{Date, Duration, OffsetDateTime};

const SYMBOLS: [(&str, &str); 16] = [
    ("TCS", "Tata Consultancy Services"),
    ("INFY", "Infosys Limited"),
    ("RELIANCE", "Reliance Industries"),
    ("HDFCBANK", "HDFC Bank"),
    ("ICICIBANK", "ICICI Bank"),
    ("WIPRO", "Wipro Limited"),
    ("ITC", "ITC Limited"),
    ("SBIN", "State Bank of India"),
    ("BHARTIARTL", "Bharti Airtel"),
    ("LT", "Larsen & Toubro"),
    ("HINDUNILVR", "Hindustan Unilever"),
    ("AXISBANK", "Axis Bank"),
    ("MARUTI", "Maruti Suzuki India"),
    ("SUNPHARMA", "Sun Pharmaceutical Industries"),
    ("TITAN", "Titan Company"),
    ("ASIANPAINT", "Asian Paints"),
];

const EXCHANGES: [&str; 2] = ["NSE", "BSE"];

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }

    /// Price with paise precision in `[min, max)`.
    fn price(&mut self, min: f64, max: f64) -> f64 {
        let span_paise = ((max - min) * 100.0).max(1.0) as u64;
        let offset = (self.next_u64() % span_paise) as f64 / 100.0;
        ((min + offset) * 100.0).round() / 100.0
    }
}

/// Seeded generator for holdings and market ticks.
#[derive(Debug, Clone)]
pub struct MarketFaker {
    rng: DeterministicRng,
    seed: u64,
}

impl MarketFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            seed: normalized,
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn holding(&mut self) -> Holding {
        let (symbol, company) = SYMBOLS[self.rng.int_n(SYMBOLS.len())];
        let qty = (self.rng.int_n(500) + 1) as f64;
        let avg_price = self.rng.price(100.0, 4000.0);
        let ltp = self.rng.price(avg_price * 0.7, avg_price * 1.4);
        let day_change = self.rng.price(-ltp * 0.03, ltp * 0.03);
        Holding::from_position(symbol, company, qty, avg_price, ltp, day_change)
    }

    pub fn holdings(&mut self, count: usize) -> Vec<Holding> {
        (0..count).map(|_| self.holding()).collect()
    }

    pub fn tick_at(&mut self, time: OffsetDateTime) -> MarketTick {
        let (symbol, _) = SYMBOLS[self.rng.int_n(SYMBOLS.len())];
        let open = self.rng.price(100.0, 4000.0);
        let close = self.rng.price(open * 0.98, open * 1.02);
        let high = open.max(close) + self.rng.price(0.0, open * 0.01);
        let low = open.min(close) - self.rng.price(0.0, open * 0.01);
        MarketTick {
            time,
            symbol: symbol.to_owned(),
            open,
            high,
            low,
            close,
            volume: self.rng.next_u64() % 1_000_000,
            exchange: EXCHANGES[self.rng.int_n(EXCHANGES.len())].to_owned(),
        }
    }

    /// One tick per minute starting at the 09:15 IST open.
    pub fn ticks(&mut self, count: usize) -> Vec<MarketTick> {
        let open = datetime!(2025-06-30 09:15 +05:30);
        (0..count)
            .map(|index| self.tick_at(open + Duration::minutes(index as i64)))
            .collect()
    }
}

/// Fixed "today" for date validation tests.
pub fn fixture_today() -> Date {
    date!(2025 - 06 - 30)
}

/// Eleven holdings with distinct current values.
pub fn distinct_value_holdings() -> Vec<Holding> {
    sample_holdings()
}

/// Two INFY rows share a current value and differ only in average price,
/// so their relative order is observable after sorting.
pub fn duplicate_value_holdings() -> Vec<Holding> {
    vec![
        Holding::from_position("TCS", "Tata Consultancy Services", 50.0, 3245.50, 3845.20, 45.30),
        Holding::from_position("INFY", "Infosys Limited", 80.0, 1420.00, 1565.75, -12.50),
        Holding::from_position("WIPRO", "Wipro Limited", 150.0, 412.60, 468.90, -3.25),
        Holding::from_position("INFY", "Infosys Limited", 80.0, 1500.00, 1565.75, -12.50),
        Holding::from_position("ITC", "ITC Limited", 200.0, 398.10, 436.75, 2.10),
    ]
}

pub fn sample_ticks() -> Vec<MarketTick> {
    vec![
        MarketTick {
            time: datetime!(2025-06-30 09:15 +05:30),
            symbol: "RELIANCE".to_owned(),
            open: 1244.0,
            high: 1252.0,
            low: 1240.1,
            close: 1250.5,
            volume: 120_000,
            exchange: "NSE".to_owned(),
        },
        MarketTick {
            time: datetime!(2025-06-30 09:16 +05:30),
            symbol: "TCS".to_owned(),
            open: 3840.0,
            high: 3851.0,
            low: 3835.5,
            close: 3845.2,
            volume: 48_500,
            exchange: "NSE".to_owned(),
        },
        MarketTick {
            time: datetime!(2025-06-30 09:16 +05:30),
            symbol: "SBIN".to_owned(),
            open: 788.0,
            high: 791.2,
            low: 786.4,
            close: 789.55,
            volume: 301_220,
            exchange: "BSE".to_owned(),
        },
    ]
}

pub fn sample_ticks_json() -> Result<String> {
    serde_json::to_string(&sample_ticks()).context("encode sample ticks")
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("hypertrend.db");
    Ok((dir, db_path))
}

pub fn write_holdings_file(dir: &Path, holdings: &[Holding]) -> Result<PathBuf> {
    let path = dir.join("holdings.json");
    let raw = serde_json::to_string_pretty(holdings).context("encode holdings")?;
    std::fs::write(&path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
