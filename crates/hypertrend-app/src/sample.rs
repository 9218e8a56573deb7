// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::model::Holding;

/// Built-in portfolio used when no holdings file is configured.
pub fn sample_holdings() -> Vec<Holding> {
    [
        ("TCS", "Tata Consultancy Services", 50.0, 3245.50, 3845.20, 45.30),
        ("INFY", "Infosys Limited", 80.0, 1420.00, 1565.75, -12.50),
        ("RELIANCE", "Reliance Industries", 40.0, 2380.00, 2512.40, 18.20),
        ("HDFCBANK", "HDFC Bank", 60.0, 1545.25, 1672.10, -8.40),
        ("ICICIBANK", "ICICI Bank", 90.0, 905.80, 1088.35, 6.15),
        ("WIPRO", "Wipro Limited", 150.0, 412.60, 468.90, -3.25),
        ("ITC", "ITC Limited", 200.0, 398.10, 436.75, 2.10),
        ("SBIN", "State Bank of India", 120.0, 601.40, 789.55, 11.30),
        ("BHARTIARTL", "Bharti Airtel", 45.0, 1120.00, 1398.60, -14.80),
        ("LT", "Larsen & Toubro", 25.0, 3310.00, 3520.45, 27.90),
        ("HINDUNILVR", "Hindustan Unilever", 30.0, 2590.00, 2401.30, -9.60),
    ]
    .into_iter()
    .map(|(symbol, company, qty, avg_price, ltp, day_change)| {
        Holding::from_position(symbol, company, qty, avg_price, ltp, day_change)
    })
    .collect()
}
