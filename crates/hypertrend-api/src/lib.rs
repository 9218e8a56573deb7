// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use hypertrend_app::{HoldingRequest, MarketTick};
use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

pub use hypertrend_app::SubmitOutcome;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const SUBMIT_PATH: &str = "/dashboard/user_request/";
const MARKET_PATH: &str = "/dashboard/fetch_market_data/";

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    token: Option<String>,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("api.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("api.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "api.base_url {base_url:?} uses scheme {:?}; use http:// or https://",
                parsed.scheme()
            );
        }
        if timeout.is_zero() {
            bail!("api.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            base_url,
            timeout,
            token: None,
            http,
        })
    }

    /// Sends `Authorization: Bearer <token>` on every request.
    pub fn with_token(mut self, token: Option<&str>) -> Self {
        self.token = token
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn submit_holding(&self, request: &HoldingRequest) -> Result<SubmitOutcome> {
        info!(
            component = "api",
            event = "api.submit_holding",
            symbol = %request.symbol,
            owned = request.stock_held.is_some()
        );
        let response = self
            .authorized(self.http.post(self.url(SUBMIT_PATH)))
            .json(request)
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        let body = response.text().unwrap_or_default();
        if status.is_success() {
            let request_id = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|value| value.get("request_id").and_then(Value::as_i64));
            info!(
                component = "api",
                event = "api.submit_holding.saved",
                status = status.as_u16(),
                request_id
            );
            return Ok(SubmitOutcome::Saved { request_id });
        }
        if status == StatusCode::BAD_REQUEST {
            let message = flatten_field_errors(&body)
                .unwrap_or_else(|| "request rejected by server".to_owned());
            warn!(
                component = "api",
                event = "api.submit_holding.rejected",
                reason = %message
            );
            return Ok(SubmitOutcome::Rejected(message));
        }
        Err(clean_error_response(status, &body))
    }

    pub fn fetch_market_data(&self) -> Result<Vec<MarketTick>> {
        let response = self
            .authorized(self.http.get(self.url(MARKET_PATH)))
            .send()
            .map_err(|error| connection_error(&self.base_url, error))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        let payload: MarketPayload = response.json().context("decode market data")?;
        let ticks = payload.into_ticks();
        info!(
            component = "api",
            event = "api.fetch_market_data",
            count = ticks.len()
        );
        Ok(ticks)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MarketPayload {
    List(Vec<MarketTick>),
    Page { results: Vec<MarketTick> },
}

impl MarketPayload {
    fn into_ticks(self) -> Vec<MarketTick> {
        match self {
            Self::List(ticks) | Self::Page { results: ticks } => ticks,
        }
    }
}

fn connection_error(base_url: &str, error: reqwest::Error) -> anyhow::Error {
    anyhow!(
        "cannot reach {} -- start the dashboard backend or fix [api].base_url ({})",
        base_url,
        error
    )
}

fn clean_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    if let Ok(value) = serde_json::from_str::<Value>(body)
        && let Some(detail) = value.get("detail").and_then(Value::as_str)
        && !detail.is_empty()
    {
        return anyhow!("server error ({}): {}", status.as_u16(), detail);
    }

    if body.len() < 100 && !body.contains('{') && !body.trim().is_empty() {
        return anyhow!("server error ({}): {}", status.as_u16(), body.trim());
    }

    anyhow!("server returned {}", status.as_u16())
}

/// Turns `{"field": ["msg", ...], "detail": "msg"}` into `field: msg; ...`.
fn flatten_field_errors(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    let mut parts = Vec::new();
    for (field, errors) in object {
        let messages: Vec<&str> = match errors {
            Value::String(message) => vec![message.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        };
        if messages.is_empty() {
            continue;
        }
        if field == "detail" || field == "non_field_errors" {
            parts.push(messages.join(" "));
        } else {
            parts.push(format!("{field}: {}", messages.join(" ")));
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}
