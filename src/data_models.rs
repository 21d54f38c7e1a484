use serde::{Deserialize, Serialize};

/// One raw search-result entry as extracted from the results page.
/// `href` is whatever the page carried; it may be relative to the search URL.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SearchCandidate {
    pub title: String,
    pub href: String,
    pub snippet: String,
}

impl SearchCandidate {
    pub fn new(
        title: impl Into<String>,
        href: impl Into<String>,
        snippet: impl Into<String>,
    ) -> SearchCandidate {
        SearchCandidate {
            title: title.into(),
            href: href.into(),
            snippet: snippet.into(),
        }
    }
}

/// The user's query plus the search engine's normalized echo of it.
/// `corrected` may equal `original`; the matcher treats that as harmless
/// redundancy.
#[derive(Debug, Clone)]
pub struct Topic {
    pub original: String,
    pub corrected: String,
}

impl Topic {
    pub fn new(original: impl Into<String>, corrected: impl Into<String>) -> Topic {
        Topic {
            original: original.into(),
            corrected: corrected.into(),
        }
    }
}

/// A candidate that passed the relevance filter, with its href resolved to an
/// absolute URL. The collector guarantees no two of these share a `url`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RelevantCandidate {
    pub title: String,
    pub url: String,
}

/// Extracted sentences in original text order, at most the configured count.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary(pub Vec<String>);

impl Summary {
    pub fn sentences(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Final unit handed to the result sink. Built only after a successful
/// fetch + summarize, never mutated afterwards.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResultRecord {
    pub title: String,
    pub url: String,
    pub summary: Summary,
}

/// Everything the page source learned from one search-results page: where it
/// was fetched from, the engine's corrected query echo, and the raw entries.
#[derive(Debug, Clone)]
pub struct SearchListing {
    pub page_url: String,
    pub corrected_query: String,
    pub candidates: Vec<SearchCandidate>,
}

/// Terminal report of one pipeline run. `saved <= attempted`, and `attempted`
/// is bounded by the configured article cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrapeReport {
    pub saved: usize,
    pub attempted: usize,
}
