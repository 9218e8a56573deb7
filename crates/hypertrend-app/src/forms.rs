// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Serialize, Serializer};
use thiserror::Error;
use time::Date;
use time::format_description::well_known::Rfc3339;

use crate::dates::{CalendarInput, DateInputError, validate_date_text};

pub const MAX_SYMBOL_LEN: usize = 20;
pub const MAX_COMPANY_LEN: usize = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HoldingField {
    Symbol,
    Company,
    OwnsStock,
    Quantity,
    Investment,
    DatedOn,
}

impl HoldingField {
    pub const ALL: [Self; 6] = [
        Self::Symbol,
        Self::Company,
        Self::OwnsStock,
        Self::Quantity,
        Self::Investment,
        Self::DatedOn,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::Company => "company",
            Self::OwnsStock => "owns stock",
            Self::Quantity => "quantity",
            Self::Investment => "investment value",
            Self::DatedOn => "purchase date",
        }
    }

    const fn needs_ownership(self) -> bool {
        matches!(self, Self::Quantity | Self::Investment | Self::DatedOn)
    }
}

impl std::fmt::Display for HoldingField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{0} is required")]
    Required(HoldingField),
    #[error("{0} must be a number")]
    InvalidNumber(HoldingField),
    #[error("{0} cannot be negative")]
    Negative(HoldingField),
    #[error("{field} must be at most {max} characters")]
    TooLong { field: HoldingField, max: usize },
    #[error(transparent)]
    Date(#[from] DateInputError),
}

impl FieldError {
    pub fn field(&self) -> HoldingField {
        match self {
            Self::Required(field) | Self::InvalidNumber(field) | Self::Negative(field) => *field,
            Self::TooLong { field, .. } => *field,
            Self::Date(_) => HoldingField::DatedOn,
        }
    }
}

/// Every field problem found in one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_errors(.0))]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn for_field(&self, field: HoldingField) -> Option<&FieldError> {
        self.0.iter().find(|error| error.field() == field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Money in paise, serialized as a two-decimal string for decimal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Paise(pub i64);

impl std::fmt::Display for Paise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Serialize for Paise {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Payload for the holding submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingRequest {
    pub symbol: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_held: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investment_value: Option<Paise>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_midnight_utc"
    )]
    pub dated_on: Option<Date>,
}

fn serialize_midnight_utc<S: Serializer>(
    value: &Option<Date>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(date) => {
            let stamp = date
                .midnight()
                .assume_utc()
                .format(&Rfc3339)
                .map_err(serde::ser::Error::custom)?;
            serializer.serialize_str(&stamp)
        }
        None => serializer.serialize_none(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved { request_id: Option<i64> },
    /// The server refused the payload; the message flattens its field errors.
    Rejected(String),
}

/// Raw field text for the add-holding form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HoldingFormDraft {
    pub symbol: String,
    pub company: String,
    pub owns_stock: bool,
    pub quantity: String,
    pub investment: String,
    pub dated_on: CalendarInput,
}

impl HoldingFormDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields in focus order; ownership details only show when owned.
    pub fn visible_fields(&self) -> Vec<HoldingField> {
        HoldingField::ALL
            .into_iter()
            .filter(|field| self.owns_stock || !field.needs_ownership())
            .collect()
    }

    pub fn field_text(&self, field: HoldingField) -> &str {
        match field {
            HoldingField::Symbol => &self.symbol,
            HoldingField::Company => &self.company,
            HoldingField::OwnsStock => {
                if self.owns_stock {
                    "yes"
                } else {
                    "no"
                }
            }
            HoldingField::Quantity => &self.quantity,
            HoldingField::Investment => &self.investment,
            HoldingField::DatedOn => self.dated_on.text(),
        }
    }

    pub fn input_char(&mut self, field: HoldingField, ch: char, today: Date) {
        match field {
            HoldingField::Symbol => self.symbol.push(ch),
            HoldingField::Company => self.company.push(ch),
            HoldingField::OwnsStock => {
                if ch == ' ' {
                    self.owns_stock = !self.owns_stock;
                }
            }
            HoldingField::Quantity => self.quantity.push(ch),
            HoldingField::Investment => self.investment.push(ch),
            HoldingField::DatedOn => {
                self.dated_on.push_char(ch, today);
            }
        }
    }

    pub fn backspace(&mut self, field: HoldingField, today: Date) {
        match field {
            HoldingField::Symbol => {
                self.symbol.pop();
            }
            HoldingField::Company => {
                self.company.pop();
            }
            HoldingField::OwnsStock => {}
            HoldingField::Quantity => {
                self.quantity.pop();
            }
            HoldingField::Investment => {
                self.investment.pop();
            }
            HoldingField::DatedOn => {
                self.dated_on.pop_char(today);
            }
        }
    }

    pub fn validate(&self, today: Date) -> Result<HoldingRequest, FormErrors> {
        let mut errors = Vec::new();

        let symbol = self.symbol.trim().to_uppercase();
        check_text(&symbol, HoldingField::Symbol, MAX_SYMBOL_LEN, &mut errors);
        let company = self.company.trim().to_owned();
        check_text(&company, HoldingField::Company, MAX_COMPANY_LEN, &mut errors);

        let (mut stock_held, mut investment_value, mut dated_on) = (None, None, None);
        if self.owns_stock {
            match parse_quantity(&self.quantity) {
                Ok(value) => stock_held = Some(value),
                Err(error) => errors.push(error),
            }
            match parse_paise(&self.investment) {
                Ok(value) => investment_value = Some(value),
                Err(error) => errors.push(error),
            }
            match validate_date_text(self.dated_on.text(), today) {
                Ok(value) => dated_on = Some(value),
                Err(DateInputError::Required) => {
                    errors.push(FieldError::Required(HoldingField::DatedOn));
                }
                Err(error) => errors.push(FieldError::Date(error)),
            }
        }

        if !errors.is_empty() {
            return Err(FormErrors(errors));
        }
        Ok(HoldingRequest {
            symbol,
            company,
            stock_held,
            investment_value,
            dated_on,
        })
    }
}

fn check_text(value: &str, field: HoldingField, max: usize, errors: &mut Vec<FieldError>) {
    if value.is_empty() {
        errors.push(FieldError::Required(field));
    } else if value.chars().count() > max {
        errors.push(FieldError::TooLong { field, max });
    }
}

fn parse_quantity(input: &str) -> Result<i64, FieldError> {
    let field = HoldingField::Quantity;
    let clean: String = input.chars().filter(|ch| *ch != ',').collect();
    let clean = clean.trim();
    if clean.is_empty() {
        return Err(FieldError::Required(field));
    }
    let (negative, digits) = match clean.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, clean),
    };
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(FieldError::InvalidNumber(field));
    }
    let value = digits
        .parse::<i64>()
        .map_err(|_| FieldError::InvalidNumber(field))?;
    if negative && value != 0 {
        return Err(FieldError::Negative(field));
    }
    Ok(value)
}

fn parse_paise(input: &str) -> Result<Paise, FieldError> {
    let field = HoldingField::Investment;
    let clean: String = input
        .chars()
        .filter(|ch| !matches!(ch, '₹' | ',') && !ch.is_whitespace())
        .collect();
    if clean.is_empty() {
        return Err(FieldError::Required(field));
    }
    let (negative, body) = match clean.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, clean.as_str()),
    };
    let invalid = FieldError::InvalidNumber(field);
    let (whole, frac) = match body.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (body, ""),
    };
    let is_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if (whole.is_empty() && frac.is_empty()) || !is_digits(whole) || !is_digits(frac) {
        return Err(invalid);
    }
    if frac.len() > 2 {
        return Err(invalid);
    }
    let whole = if whole.is_empty() {
        0
    } else {
        whole.parse::<i64>().map_err(|_| invalid)?
    };
    let frac = match frac.len() {
        0 => 0,
        1 => frac.parse::<i64>().map_err(|_| invalid)? * 10,
        _ => frac.parse::<i64>().map_err(|_| invalid)?,
    };
    let paise = whole
        .checked_mul(100)
        .and_then(|value| value.checked_add(frac))
        .ok_or(invalid)?;
    if negative && paise != 0 {
        return Err(FieldError::Negative(field));
    }
    Ok(Paise(paise))
}
