use anyhow::{Result, bail};
use clap::Parser;
use reqwest::Url;

use newsclip::collector::CandidateCollector;
use newsclip::config::ScrapeConfig;
use newsclip::data_models::Topic;
use newsclip::pipeline::{PageSource, ResultSink, ScrapePipeline};
use newsclip::sink::{FileSink, JsonlSink, OutputSink};
use newsclip::source::HttpPageSource;
use newsclip::summarizer::Language;

/// Search the news for a topic, summarize the matching articles, and save
/// the summaries to a file.
#[derive(Parser, Debug)]
#[command(name = "newsclip", version)]
struct Args {
    /// Topic to search for
    topic: String,

    /// Maximum number of articles to attempt
    #[arg(long, default_value_t = 5)]
    max_articles: usize,

    /// Sentences per summary
    #[arg(long, default_value_t = 3)]
    sentences: usize,

    /// Language for sentence splitting, stop words, and stemming
    #[arg(long, default_value = "english")]
    language: Language,

    /// Output file (defaults to <topic>_news.txt, or .jsonl with --json)
    #[arg(long)]
    output: Option<String>,

    /// Write JSON lines instead of the text layout
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Idle interval between article fetches, in milliseconds
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,
}

/// Lowercased topic with spaces as underscores and everything outside
/// [a-zA-Z0-9_] stripped, so it is always a usable file name.
fn safe_filename(topic: &str) -> String {
    topic
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let args = Args::parse();
    let topic = args.topic.trim().to_string();
    if topic.is_empty() {
        bail!("No topic entered.");
    }

    let output = args.output.unwrap_or_else(|| {
        let ext = if args.json { "jsonl" } else { "txt" };
        format!("{}_news.{ext}", safe_filename(&topic))
    });
    println!("Searching for '{topic}'... Results will be saved to {output}");

    let source = HttpPageSource::new()?;
    let listing = source.search(&topic).await?;
    log::info!("search term on page: '{}'", listing.corrected_query);

    if listing.candidates.is_empty() {
        println!("No search results found on the page. Exiting.");
        return Ok(());
    }

    let topic_pair = Topic::new(&topic, &listing.corrected_query);
    let collector = CandidateCollector::new(Url::parse(&listing.page_url)?);
    let relevant = collector.collect(&listing.candidates, &topic_pair);
    if relevant.is_empty() {
        println!(
            "No results matched '{}' or '{}' in their title or snippet.",
            topic_pair.original, topic_pair.corrected
        );
        return Ok(());
    }
    println!("Found {} relevant articles. Now scraping...", relevant.len());

    let mut sink = if args.json {
        OutputSink::Jsonl(JsonlSink::new(&output))
    } else {
        OutputSink::Text(FileSink::new(&output))
    };
    sink.open(&topic, &listing.page_url).await?;

    let config = ScrapeConfig {
        max_articles: args.max_articles,
        sentence_count: args.sentences,
        language: args.language,
        politeness_delay_ms: args.delay_ms,
    };
    let mut pipeline = ScrapePipeline::new(source, sink, config);
    let report = pipeline.run(&relevant).await?;

    println!("Done.");
    println!(
        "Saved {} relevant articles ({} attempted).",
        report.saved, report.attempted
    );
    println!("Check {output} for the results.");
    Ok(())
}
