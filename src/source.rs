use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};

use crate::config::CONFIG;
use crate::data_models::{SearchCandidate, SearchListing};
use crate::pipeline::PageSource;

// Selectors for the BBC News search page and article layout (as of Oct 2025).
static SEARCH_RESULT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"a:has(div[data-testid="newport-article"])"#).unwrap());
static TITLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"h2[data-testid="card-headline"]"#).unwrap());
static SNIPPET_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.sc-cdecfb63-3").unwrap());
static SEARCH_INPUT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"input[data-testid="search-input-field"]:not([disabled])"#).unwrap());
static ARTICLE_TEXT_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("article p").unwrap());

/// Live page source over HTTP. Knows how to read the search-results page
/// (candidate entries plus the engine's corrected-query echo) and how to pull
/// paragraph text out of an article page.
pub struct HttpPageSource {
    client: reqwest::Client,
    search_base: Url,
}

impl HttpPageSource {
    pub fn new() -> Result<HttpPageSource> {
        let client = reqwest::Client::builder()
            .user_agent(&CONFIG.user_agent)
            .build()
            .context("Failed to build HTTP client")?;
        let search_base = Url::parse(&CONFIG.search_base_url)
            .with_context(|| format!("Invalid search base URL: {}", CONFIG.search_base_url))?;
        Ok(HttpPageSource {
            client,
            search_base,
        })
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let res = self.client.get(url).send().await?.error_for_status()?;
        let body = res.text().await?;
        Ok(body)
    }

    fn parse_listing(page_url: &str, query: &str, html: &str) -> SearchListing {
        let document = Html::parse_document(html);

        // the engine echoes its normalized form of the query back through the
        // search input; fall back to what we submitted if it's missing
        let corrected_query = document
            .select(&SEARCH_INPUT_SELECTOR)
            .next()
            .and_then(|input| input.value().attr("value"))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| query.to_string());

        let mut candidates = Vec::new();
        for result in document.select(&SEARCH_RESULT_SELECTOR) {
            let title = result
                .select(&TITLE_SELECTOR)
                .next()
                .map(|t| t.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            let href = result.value().attr("href").unwrap_or_default().to_string();
            let snippet = result
                .select(&SNIPPET_SELECTOR)
                .next()
                .map(|s| s.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            candidates.push(SearchCandidate::new(title, href, snippet));
        }

        SearchListing {
            page_url: page_url.to_string(),
            corrected_query,
            candidates,
        }
    }

    fn parse_article_text(html: &str) -> Option<String> {
        let document = Html::parse_document(html);
        let paragraphs: Vec<String> = document
            .select(&ARTICLE_TEXT_SELECTOR)
            .map(|p| p.text().collect::<String>().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join(" "))
        }
    }
}

impl PageSource for HttpPageSource {
    async fn search(&self, query: &str) -> Result<SearchListing> {
        let mut page_url = self.search_base.clone();
        page_url
            .query_pairs_mut()
            .append_pair("q", &query.to_lowercase());
        let page_url = page_url.to_string();

        log::info!("fetching search results from {page_url}");
        let html = self
            .fetch_page(&page_url)
            .await
            .with_context(|| format!("Failed to load search page {page_url}"))?;

        let listing = Self::parse_listing(&page_url, query, &html);
        log::info!("found {} search results", listing.candidates.len());
        Ok(listing)
    }

    async fn article_text(&self, url: &str) -> Result<Option<String>> {
        let html = self
            .fetch_page(url)
            .await
            .with_context(|| format!("Failed to load article {url}"))?;
        Ok(Self::parse_article_text(&html))
    }
}
