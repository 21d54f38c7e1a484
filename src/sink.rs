use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::data_models::ResultRecord;
use crate::pipeline::ResultSink;

const HEADER_RULE: &str = "=========================================";
const RECORD_RULE: &str = "-----------------------------------------";

/// Appends records to a text file in a fixed layout: one header block naming
/// the topic and source URL, then one block per record with the headline, the
/// link, and a bullet per summary sentence, separated by a rule line.
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> FileSink {
        FileSink {
            path: path.into(),
            file: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file
            .as_mut()
            .context("Result file not opened; call open() first")
    }
}

impl ResultSink for FileSink {
    /// Truncates the file and writes the header block.
    async fn open(&mut self, topic: &str, source_url: &str) -> Result<()> {
        let mut file = File::create(&self.path)
            .await
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        let header =
            format!("News articles found for: {topic}\nSource URL: {source_url}\n{HEADER_RULE}\n\n");
        file.write_all(header.as_bytes()).await?;
        self.file = Some(file);
        Ok(())
    }

    async fn push(&mut self, record: &ResultRecord) -> Result<()> {
        let mut block = format!("Headline: {}\nLink: {}\nSummary:\n", record.title, record.url);
        for sentence in record.summary.sentences() {
            block.push_str("* ");
            block.push_str(sentence);
            block.push('\n');
        }
        block.push_str(RECORD_RULE);
        block.push_str("\n\n");

        let file = self.file_mut()?;
        file.write_all(block.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Either concrete sink, so callers can pick the format at runtime.
pub enum OutputSink {
    Text(FileSink),
    Jsonl(JsonlSink),
}

impl ResultSink for OutputSink {
    async fn open(&mut self, topic: &str, source_url: &str) -> Result<()> {
        match self {
            OutputSink::Text(sink) => sink.open(topic, source_url).await,
            OutputSink::Jsonl(sink) => sink.open(topic, source_url).await,
        }
    }

    async fn push(&mut self, record: &ResultRecord) -> Result<()> {
        match self {
            OutputSink::Text(sink) => sink.push(record).await,
            OutputSink::Jsonl(sink) => sink.push(record).await,
        }
    }
}

/// Machine-readable alternative: one JSON object per record, one per line.
pub struct JsonlSink {
    path: PathBuf,
    file: Option<File>,
}

impl JsonlSink {
    pub fn new(path: impl Into<PathBuf>) -> JsonlSink {
        JsonlSink {
            path: path.into(),
            file: None,
        }
    }
}

impl ResultSink for JsonlSink {
    async fn open(&mut self, _topic: &str, _source_url: &str) -> Result<()> {
        let file = File::create(&self.path)
            .await
            .with_context(|| format!("Failed to create {}", self.path.display()))?;
        self.file = Some(file);
        Ok(())
    }

    async fn push(&mut self, record: &ResultRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');
        let file = self
            .file
            .as_mut()
            .context("Result file not opened; call open() first")?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
