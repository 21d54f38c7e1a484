use anyhow::Result;
use std::collections::HashMap;

use newsclip::collector::CandidateCollector;
use newsclip::config::ScrapeConfig;
use newsclip::data_models::{RelevantCandidate, ResultRecord, SearchCandidate, SearchListing, Topic};
use newsclip::pipeline::{PageSource, ResultSink, ScrapePipeline};
use newsclip::summarizer::Language;
use reqwest::Url;

mod test_helpers {
    use super::*;

    pub const ARTICLE_TEXT: &str = "Climate talks resumed in Geneva this week. \
        Delegates argued over emission targets late into the night. \
        A final communique is expected on Friday.";

    /// In-memory page source: maps article URLs to canned outcomes.
    pub struct FakeSource {
        pub articles: HashMap<String, FakeArticle>,
    }

    pub enum FakeArticle {
        Text(&'static str),
        Empty,
        FetchError,
    }

    impl FakeSource {
        pub fn new(articles: Vec<(&str, FakeArticle)>) -> FakeSource {
            FakeSource {
                articles: articles
                    .into_iter()
                    .map(|(url, a)| (url.to_string(), a))
                    .collect(),
            }
        }
    }

    impl PageSource for FakeSource {
        async fn search(&self, _query: &str) -> Result<SearchListing> {
            unimplemented!("pipeline tests collect candidates directly")
        }

        async fn article_text(&self, url: &str) -> Result<Option<String>> {
            match self.articles.get(url) {
                Some(FakeArticle::Text(text)) => Ok(Some(text.to_string())),
                Some(FakeArticle::Empty) => Ok(None),
                Some(FakeArticle::FetchError) => Err(anyhow::anyhow!("navigation failed")),
                None => Err(anyhow::anyhow!("unexpected fetch of {url}")),
            }
        }
    }

    /// Records everything pushed into it, in order.
    #[derive(Default)]
    pub struct MemorySink {
        pub header: Option<(String, String)>,
        pub records: Vec<ResultRecord>,
    }

    impl ResultSink for MemorySink {
        async fn open(&mut self, topic: &str, source_url: &str) -> Result<()> {
            self.header = Some((topic.to_string(), source_url.to_string()));
            Ok(())
        }

        async fn push(&mut self, record: &ResultRecord) -> Result<()> {
            self.records.push(record.clone());
            Ok(())
        }
    }

    pub fn config(max_articles: usize) -> ScrapeConfig {
        ScrapeConfig {
            max_articles,
            sentence_count: 2,
            language: Language::English,
            politeness_delay_ms: 0,
        }
    }

    pub fn candidate(title: &str, url: &str) -> RelevantCandidate {
        RelevantCandidate {
            title: title.to_string(),
            url: url.to_string(),
        }
    }
}

use test_helpers::*;

#[tokio::test]
async fn test_happy_path_saves_every_candidate() -> Result<()> {
    let source = FakeSource::new(vec![
        ("https://n.example/a", FakeArticle::Text(ARTICLE_TEXT)),
        ("https://n.example/b", FakeArticle::Text(ARTICLE_TEXT)),
    ]);
    let relevant = vec![
        candidate("First", "https://n.example/a"),
        candidate("Second", "https://n.example/b"),
    ];

    let mut pipeline = ScrapePipeline::new(source, MemorySink::default(), config(5));
    let report = pipeline.run(&relevant).await?;

    assert_eq!(report.saved, 2);
    assert_eq!(report.attempted, 2);
    let sink = pipeline.into_sink();
    assert_eq!(sink.records.len(), 2);
    assert_eq!(sink.records[0].title, "First");
    assert_eq!(sink.records[1].title, "Second");
    assert!(sink.records[0].summary.len() <= 2);
    Ok(())
}

#[tokio::test]
async fn test_cap_bounds_attempts_not_successes() -> Result<()> {
    // everything fails, but the cap still stops iteration after two attempts
    let source = FakeSource::new(vec![
        ("https://n.example/a", FakeArticle::FetchError),
        ("https://n.example/b", FakeArticle::FetchError),
        ("https://n.example/c", FakeArticle::Text(ARTICLE_TEXT)),
    ]);
    let relevant = vec![
        candidate("A", "https://n.example/a"),
        candidate("B", "https://n.example/b"),
        candidate("C", "https://n.example/c"),
    ];

    let mut pipeline = ScrapePipeline::new(source, MemorySink::default(), config(2));
    let report = pipeline.run(&relevant).await?;

    assert_eq!(report.attempted, 2);
    assert_eq!(report.saved, 0);
    assert!(pipeline.into_sink().records.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_fetch_skips_but_run_continues() -> Result<()> {
    let source = FakeSource::new(vec![
        ("https://n.example/a", FakeArticle::Text(ARTICLE_TEXT)),
        ("https://n.example/b", FakeArticle::FetchError),
        ("https://n.example/c", FakeArticle::Text(ARTICLE_TEXT)),
    ]);
    let relevant = vec![
        candidate("A", "https://n.example/a"),
        candidate("B", "https://n.example/b"),
        candidate("C", "https://n.example/c"),
    ];

    let mut pipeline = ScrapePipeline::new(source, MemorySink::default(), config(5));
    let report = pipeline.run(&relevant).await?;

    assert_eq!(report.attempted, 3);
    assert_eq!(report.saved, 2);
    let titles: Vec<&str> = pipeline
        .sink()
        .records
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles, vec!["A", "C"]);
    Ok(())
}

#[tokio::test]
async fn test_empty_body_and_unsegmentable_text_are_skips() -> Result<()> {
    let source = FakeSource::new(vec![
        ("https://n.example/a", FakeArticle::Empty),
        ("https://n.example/b", FakeArticle::Text("no sentence terminators at all")),
        ("https://n.example/c", FakeArticle::Text(ARTICLE_TEXT)),
    ]);
    let relevant = vec![
        candidate("A", "https://n.example/a"),
        candidate("B", "https://n.example/b"),
        candidate("C", "https://n.example/c"),
    ];

    let mut pipeline = ScrapePipeline::new(source, MemorySink::default(), config(5));
    let report = pipeline.run(&relevant).await?;

    assert_eq!(report.attempted, 3);
    assert_eq!(report.saved, 1);
    assert_eq!(pipeline.sink().records[0].title, "C");
    Ok(())
}

#[tokio::test]
async fn test_climate_scenario_end_to_end() -> Result<()> {
    // 6 raw candidates, 3 mentioning the topic; collector keeps those 3 in
    // order, and with a cap of 2 the pipeline only ever touches the first 2
    let raw = vec![
        SearchCandidate::new("Climate summit opens", "/news/1", ""),
        SearchCandidate::new("Football results", "/news/2", "weekend scores"),
        SearchCandidate::new("Heatwave warning", "/news/3", "linked to climate change"),
        SearchCandidate::new("Celebrity interview", "/news/4", ""),
        SearchCandidate::new("Climate protest in London", "/news/5", ""),
        SearchCandidate::new("Stock market update", "/news/6", ""),
    ];
    let topic = Topic::new("climate", "climate change");
    let collector =
        CandidateCollector::new(Url::parse("https://www.bbc.com/search?q=climate")?);
    let relevant = collector.collect(&raw, &topic);

    let expected: Vec<&str> = vec![
        "Climate summit opens",
        "Heatwave warning",
        "Climate protest in London",
    ];
    let got: Vec<&str> = relevant.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(got, expected);

    let source = FakeSource::new(vec![
        ("https://www.bbc.com/news/1", FakeArticle::Text(ARTICLE_TEXT)),
        ("https://www.bbc.com/news/3", FakeArticle::Text(ARTICLE_TEXT)),
    ]);
    let mut pipeline = ScrapePipeline::new(source, MemorySink::default(), config(2));
    let report = pipeline.run(&relevant).await?;

    assert_eq!(report.attempted, 2);
    assert_eq!(report.saved, 2);
    let urls: Vec<&str> = pipeline
        .sink()
        .records
        .iter()
        .map(|r| r.url.as_str())
        .collect();
    assert_eq!(
        urls,
        vec!["https://www.bbc.com/news/1", "https://www.bbc.com/news/3"]
    );
    Ok(())
}

#[tokio::test]
async fn test_sink_open_records_header() -> Result<()> {
    let mut sink = MemorySink::default();
    sink.open("climate", "https://www.bbc.com/search?q=climate")
        .await?;
    assert_eq!(
        sink.header,
        Some((
            "climate".to_string(),
            "https://www.bbc.com/search?q=climate".to_string()
        ))
    );
    Ok(())
}
