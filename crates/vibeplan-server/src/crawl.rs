//! Fetch a page and its stylesheets, then run the design-token extractor.

use futures::future::join_all;
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use vibeplan_core::theme::{self, ThemeTokens, MAX_STYLESHEETS};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to fetch {url}: HTTP {status}")]
    Status { url: String, status: u16 },
}

#[derive(Debug, Clone, Copy)]
pub struct FetchTimeouts {
    pub page: Duration,
    pub stylesheet: Duration,
}

impl Default for FetchTimeouts {
    fn default() -> Self {
        Self {
            page: Duration::from_secs(10),
            stylesheet: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    pub url: String,
    #[serde(flatten)]
    pub tokens: ThemeTokens,
}

pub fn parse_url(raw: &str) -> Result<Url, CrawlError> {
    let url = Url::parse(raw.trim()).map_err(|e| CrawlError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(CrawlError::InvalidUrl(format!(
            "{raw}: unsupported scheme {other}"
        ))),
    }
}

async fn fetch_text(
    http: &reqwest::Client,
    url: &str,
    timeout: Duration,
) -> Result<String, CrawlError> {
    let fetch = |source| CrawlError::Fetch {
        url: url.to_string(),
        source,
    };
    let resp = http
        .get(url)
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .timeout(timeout)
        .send()
        .await
        .map_err(fetch)?;
    let status = resp.status();
    if !status.is_success() {
        return Err(CrawlError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    resp.text().await.map_err(fetch)
}

/// Fetch `raw_url`, gather inline `<style>` blocks plus the first
/// [`MAX_STYLESHEETS`] linked stylesheets, and extract tokens from the lot.
///
/// A failing page fetch is an error. A failing stylesheet contributes
/// nothing.
pub async fn crawl_page(
    http: &reqwest::Client,
    raw_url: &str,
    timeouts: FetchTimeouts,
) -> Result<CrawlResult, CrawlError> {
    let url = parse_url(raw_url)?;
    tracing::info!(%url, "crawling page");
    let html = fetch_text(http, url.as_str(), timeouts.page).await?;

    let mut styles = theme::style_blocks(&html);
    let links: Vec<String> = theme::stylesheet_links(&html, &url)
        .into_iter()
        .take(MAX_STYLESHEETS)
        .collect();

    let sheets = join_all(links.iter().map(|link| async move {
        match fetch_text(http, link, timeouts.stylesheet).await {
            Ok(css) => css,
            Err(e) => {
                tracing::warn!(error = %e, "skipping stylesheet");
                String::new()
            }
        }
    }))
    .await;
    styles.extend(sheets);

    let css = styles.join("\n");
    let tokens = theme::analyze_css(&css);
    tracing::debug!(
        colors = tokens.colors.len(),
        fonts = tokens.fonts.len(),
        stylesheets = links.len(),
        "extracted design tokens"
    );
    Ok(CrawlResult {
        url: raw_url.trim().to_string(),
        tokens,
    })
}
