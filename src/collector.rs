use std::collections::HashSet;

use reqwest::Url;

use crate::data_models::{RelevantCandidate, SearchCandidate, Topic};
use crate::matcher;

/// Filters raw search-result entries down to an ordered, URL-unique list of
/// candidates worth scraping.
pub struct CandidateCollector {
    page_url: Url,
}

impl CandidateCollector {
    /// `page_url` is the search-results page the candidates came from; hrefs
    /// are resolved against it before deduplication.
    pub fn new(page_url: Url) -> CandidateCollector {
        CandidateCollector { page_url }
    }

    /// One pass over the candidates, in input order:
    /// entries with an empty title or href are malformed and skipped, hrefs
    /// are resolved to absolute URLs, non-matches are dropped, and duplicate
    /// URLs keep only their first occurrence. An empty result is a normal
    /// outcome, not an error.
    pub fn collect(&self, candidates: &[SearchCandidate], topic: &Topic) -> Vec<RelevantCandidate> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut relevant = Vec::new();

        for candidate in candidates {
            if candidate.title.trim().is_empty() || candidate.href.trim().is_empty() {
                continue;
            }

            let resolved = match self.page_url.join(&candidate.href) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    log::warn!("skipping candidate with unresolvable href {:?}: {e}", candidate.href);
                    continue;
                }
            };

            if !matcher::is_relevant(candidate, topic) {
                continue;
            }

            log::info!("relevant: {}", candidate.title);
            if seen.insert(resolved.clone()) {
                relevant.push(RelevantCandidate {
                    title: candidate.title.clone(),
                    url: resolved,
                });
            }
        }

        relevant
    }
}
