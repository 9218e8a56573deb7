// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;
use time::macros::{date, format_description};
use time::{Date, Month, OffsetDateTime, UtcOffset};

pub const DATE_LAYOUT: &str = "YYYY-MM-DD";
pub const EARLIEST_DATE: Date = date!(1900 - 01 - 01);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatIssue {
    Pattern,
    ImpossibleDay,
}

impl std::fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pattern => write!(f, "expected {DATE_LAYOUT}"),
            Self::ImpossibleDay => f.write_str("no such calendar day"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeIssue {
    Future,
    TooOld,
}

impl RangeIssue {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Future => "future",
            Self::TooOld => "too old",
        }
    }
}

impl std::fmt::Display for RangeIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DateInputError {
    #[error("date is required")]
    Required,
    #[error("invalid date: {0}")]
    Format(FormatIssue),
    #[error("date out of range: {0}")]
    Range(RangeIssue),
}

/// The calendar date at the local UTC offset. Falls back to UTC when the
/// offset cannot be determined.
pub fn today() -> Date {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    date_at_offset(OffsetDateTime::now_utc(), offset)
}

pub fn date_at_offset(now: OffsetDateTime, offset: UtcOffset) -> Date {
    now.to_offset(offset).date()
}

pub fn format_date(value: Date) -> String {
    let layout = format_description!("[year]-[month]-[day]");
    match value.format(layout) {
        Ok(text) => text,
        Err(_) => format!(
            "{:04}-{:02}-{:02}",
            value.year(),
            u8::from(value.month()),
            value.day()
        ),
    }
}

pub fn validate_date_text(text: &str, today: Date) -> Result<Date, DateInputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(DateInputError::Required);
    }
    let (year, month, day) = match_date_pattern(text)?;
    let month =
        Month::try_from(month).map_err(|_| DateInputError::Format(FormatIssue::Pattern))?;
    let parsed = Date::from_calendar_date(year, month, day)
        .map_err(|_| DateInputError::Format(FormatIssue::ImpossibleDay))?;
    check_range(parsed, today)?;
    Ok(parsed)
}

pub fn check_range(value: Date, today: Date) -> Result<(), DateInputError> {
    if value > today {
        return Err(DateInputError::Range(RangeIssue::Future));
    }
    if value < EARLIEST_DATE {
        return Err(DateInputError::Range(RangeIssue::TooOld));
    }
    Ok(())
}

fn match_date_pattern(text: &str) -> Result<(i32, u8, u8), DateInputError> {
    let pattern = DateInputError::Format(FormatIssue::Pattern);
    let bytes = text.as_bytes();
    if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
        return Err(pattern);
    }
    let digits = |range: std::ops::Range<usize>| -> Option<u32> {
        let part = &bytes[range];
        if !part.iter().all(u8::is_ascii_digit) {
            return None;
        }
        Some(
            part.iter()
                .fold(0u32, |acc, byte| acc * 10 + u32::from(byte - b'0')),
        )
    };
    let year = digits(0..4).ok_or(pattern)?;
    let month = digits(5..7).ok_or(pattern)?;
    let day = digits(8..10).ok_or(pattern)?;
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return Err(pattern);
    }
    // Four digits keep every component well inside the target integer types.
    Ok((year as i32, month as u8, day as u8))
}

/// Text-or-picker date field. The committed date and the error are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CalendarInput {
    text: String,
    date: Option<Date>,
    error: Option<DateInputError>,
}

impl CalendarInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn date(&self) -> Option<Date> {
        self.date
    }

    pub fn error(&self) -> Option<DateInputError> {
        self.error
    }

    /// Validates typed text; returns the committed date on success.
    pub fn set_text(&mut self, text: &str, today: Date) -> Option<Date> {
        self.text = text.to_owned();
        match validate_date_text(text, today) {
            Ok(date) => {
                self.date = Some(date);
                self.error = None;
            }
            Err(error) => {
                self.date = None;
                self.error = Some(error);
            }
        }
        self.date
    }

    pub fn push_char(&mut self, ch: char, today: Date) -> Option<Date> {
        let mut text = self.text.clone();
        text.push(ch);
        self.set_text(&text, today)
    }

    pub fn pop_char(&mut self, today: Date) -> Option<Date> {
        let mut text = self.text.clone();
        text.pop();
        self.set_text(&text, today)
    }

    /// Picker path. Normalizes the text so it round-trips through
    /// [`CalendarInput::set_text`].
    pub fn pick(&mut self, value: Date, today: Date) -> Result<Date, DateInputError> {
        if let Err(error) = check_range(value, today) {
            self.date = None;
            self.error = Some(error);
            return Err(error);
        }
        self.text = format_date(value);
        self.date = Some(value);
        self.error = None;
        Ok(value)
    }

    pub fn shift_days(&mut self, days: i64, today: Date) -> Date {
        let base = self.date.unwrap_or(today);
        let shifted = base
            .checked_add(time::Duration::days(days))
            .unwrap_or(base);
        self.pick_clamped(shifted, today)
    }

    pub fn shift_months(&mut self, months: i32, today: Date) -> Date {
        let base = self.date.unwrap_or(today);
        let shifted = shift_date_by_months(base, months).unwrap_or(base);
        self.pick_clamped(shifted, today)
    }

    pub fn shift_years(&mut self, years: i32, today: Date) -> Date {
        self.shift_months(years.saturating_mul(12), today)
    }

    fn pick_clamped(&mut self, value: Date, today: Date) -> Date {
        let clamped = value.clamp(EARLIEST_DATE, today.max(EARLIEST_DATE));
        self.text = format_date(clamped);
        self.date = Some(clamped);
        self.error = None;
        clamped
    }
}

pub fn shift_date_by_months(value: Date, months: i32) -> Option<Date> {
    let base_month = i32::from(u8::from(value.month()));
    let total_month = base_month - 1 + months;
    let year = value.year() + total_month.div_euclid(12);
    let month = Month::try_from((total_month.rem_euclid(12) + 1) as u8).ok()?;
    let max_day = last_day_of_month(year, month)?;
    Date::from_calendar_date(year, month, value.day().min(max_day)).ok()
}

fn last_day_of_month(year: i32, month: Month) -> Option<u8> {
    let (next_year, next_month) = if month == Month::December {
        (year + 1, Month::January)
    } else {
        (year, month.next())
    };
    let first_of_next = Date::from_calendar_date(next_year, next_month, 1).ok()?;
    Some(first_of_next.previous_day()?.day())
}
