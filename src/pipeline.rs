use std::time::Duration;

use anyhow::Result;
use thiserror::Error;

use crate::config::ScrapeConfig;
use crate::data_models::{RelevantCandidate, ResultRecord, ScrapeReport, SearchListing};
use crate::summarizer::LsaSummarizer;

/// Where candidates and article text come from. The concrete implementation
/// owns navigation, timeouts, and retries; the pipeline just awaits it, one
/// call at a time.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Fetch the search-results page for `query` and return its candidate
    /// entries together with the engine's corrected echo of the query.
    async fn search(&self, query: &str) -> Result<SearchListing>;

    /// Fetch the raw body text of one article. `Ok(None)` means the page
    /// loaded but carried no extractable text.
    async fn article_text(&self, url: &str) -> Result<Option<String>>;
}

/// Where finished records go. Records arrive one at a time, in emission
/// order; durability is the sink's problem.
#[allow(async_fn_in_trait)]
pub trait ResultSink {
    async fn open(&mut self, topic: &str, source_url: &str) -> Result<()>;
    async fn push(&mut self, record: &ResultRecord) -> Result<()>;
}

/// Why one candidate was dropped without aborting the run.
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("could not fetch article text: {0:#}")]
    Fetch(anyhow::Error),
    #[error("article page had no extractable text")]
    EmptyBody,
    #[error("text did not segment into any sentences")]
    NoSentences,
}

/// Fetches, summarizes, and emits candidates strictly one at a time, in
/// collector order. A failing candidate is logged and skipped; the cap bounds
/// how many candidates are attempted, not how many succeed.
pub struct ScrapePipeline<P, S> {
    source: P,
    sink: S,
    summarizer: LsaSummarizer,
    config: ScrapeConfig,
}

impl<P: PageSource, S: ResultSink> ScrapePipeline<P, S> {
    pub fn new(source: P, sink: S, config: ScrapeConfig) -> ScrapePipeline<P, S> {
        ScrapePipeline {
            source,
            sink,
            summarizer: LsaSummarizer::new(config.language),
            config,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Runs the scrape over an already-collected candidate list. Returns how
    /// many records were emitted and how many candidates were attempted;
    /// `saved <= attempted <= max_articles`.
    pub async fn run(&mut self, relevant: &[RelevantCandidate]) -> Result<ScrapeReport> {
        let mut saved = 0usize;
        let mut attempted = 0usize;

        for candidate in relevant.iter().take(self.config.max_articles) {
            if attempted > 0 && self.config.politeness_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.politeness_delay_ms)).await;
            }
            attempted += 1;

            log::info!("scraping article {attempted}: {}", candidate.title);
            match self.scrape_one(candidate).await {
                Ok(record) => {
                    self.sink.push(&record).await?;
                    saved += 1;
                }
                Err(reason) => {
                    log::warn!("skipping {}: {reason}", candidate.url);
                }
            }
        }

        if attempted == self.config.max_articles && relevant.len() > attempted {
            log::info!("attempted first {} candidates, stopping", self.config.max_articles);
        }

        Ok(ScrapeReport { saved, attempted })
    }

    async fn scrape_one(&self, candidate: &RelevantCandidate) -> Result<ResultRecord, SkipReason> {
        let text = self
            .source
            .article_text(&candidate.url)
            .await
            .map_err(SkipReason::Fetch)?
            .ok_or(SkipReason::EmptyBody)?;

        let summary = self.summarizer.summarize(&text, self.config.sentence_count);
        if summary.is_empty() {
            return Err(SkipReason::NoSentences);
        }

        Ok(ResultRecord {
            title: candidate.title.clone(),
            url: candidate.url.clone(),
            summary,
        })
    }
}
