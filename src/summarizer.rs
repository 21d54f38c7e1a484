use std::collections::{BTreeMap, HashSet};
use std::str::FromStr;

use nalgebra::DMatrix;
use porter_stemmer::stem;

use crate::data_models::Summary;

/// Cell weighting used for the term-by-sentence matrix: raw counts smoothed
/// towards the column maximum so long sentences don't dominate outright.
const TF_SMOOTHING: f64 = 0.4;

/// Latent-topic reduction settings. With a ratio of 1.0 every component is
/// retained; the floor only matters for degenerate matrices.
const MIN_DIMENSIONS: usize = 3;
const REDUCTION_RATIO: f64 = 1.0;

/// Languages the summarizer knows stop words (and, for English, stemming
/// rules) for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Russian,
}

impl Language {
    fn stop_words(&self) -> HashSet<String> {
        let lang = match self {
            Language::English => stop_words::LANGUAGE::English,
            Language::French => stop_words::LANGUAGE::French,
            Language::German => stop_words::LANGUAGE::German,
            Language::Spanish => stop_words::LANGUAGE::Spanish,
            Language::Italian => stop_words::LANGUAGE::Italian,
            Language::Portuguese => stop_words::LANGUAGE::Portuguese,
            Language::Dutch => stop_words::LANGUAGE::Dutch,
            Language::Russian => stop_words::LANGUAGE::Russian,
        };
        stop_words::get(lang).into_iter().map(|w| w.to_string()).collect()
    }

    /// Abbreviations whose trailing period does not end a sentence.
    fn abbreviations(&self) -> &'static [&'static str] {
        match self {
            Language::English => &[
                "mr", "mrs", "ms", "dr", "prof", "rev", "gen", "sen", "rep", "st", "sr", "jr",
                "vs", "etc", "approx", "dept", "est", "fig", "gov", "inc", "ltd", "co", "corp",
                "mt", "no", "sgt", "capt", "col", "lt", "ave",
            ],
            _ => &[],
        }
    }
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "french" | "fr" => Ok(Language::French),
            "german" | "de" => Ok(Language::German),
            "spanish" | "es" => Ok(Language::Spanish),
            "italian" | "it" => Ok(Language::Italian),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "dutch" | "nl" => Ok(Language::Dutch),
            "russian" | "ru" => Ok(Language::Russian),
            other => Err(anyhow::anyhow!("unsupported language: {other}")),
        }
    }
}

/// Extractive summarizer using latent semantic analysis: sentences are scored
/// by how strongly they load on the singular components of a term-by-sentence
/// frequency matrix, and the top scorers are returned in their original text
/// order. Fully deterministic; ties go to the earlier sentence.
pub struct LsaSummarizer {
    language: Language,
    stop_words: HashSet<String>,
}

impl LsaSummarizer {
    pub fn new(language: Language) -> LsaSummarizer {
        LsaSummarizer {
            language,
            stop_words: language.stop_words(),
        }
    }

    /// Produces at most `sentence_count` sentences from `text`, in original
    /// positional order. Texts that segment into zero sentences yield an
    /// empty summary rather than an error.
    pub fn summarize(&self, text: &str, sentence_count: usize) -> Summary {
        let sentences = self.segment_sentences(text);
        if sentences.is_empty() || sentence_count == 0 {
            return Summary::default();
        }
        if sentences.len() <= sentence_count {
            return Summary(sentences);
        }

        let tokenized: Vec<Vec<String>> =
            sentences.iter().map(|s| self.tokenize(s)).collect();

        let scores = match self.salience_scores(&tokenized) {
            Some(scores) => scores,
            // every token got filtered away; fall back to leading sentences
            None => return Summary(sentences.into_iter().take(sentence_count).collect()),
        };

        let mut order: Vec<usize> = (0..sentences.len()).collect();
        order.sort_by(|&a, &b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });

        let mut selected: Vec<usize> = order.into_iter().take(sentence_count).collect();
        selected.sort_unstable();

        Summary(selected.into_iter().map(|i| sentences[i].clone()).collect())
    }

    /// Splits `text` on sentence terminators (`.`, `!`, `?`), absorbing
    /// trailing quotes and brackets. A period does not close a sentence after
    /// a known abbreviation or a single-letter initial, and a terminator only
    /// counts when followed by whitespace or end of text, so decimals like
    /// "3.5" stay intact. Text with no terminators segments to nothing.
    pub fn segment_sentences(&self, text: &str) -> Vec<String> {
        let abbreviations = self.language.abbreviations();
        let chars: Vec<char> = text.chars().collect();
        let mut sentences = Vec::new();
        let mut start = 0usize;
        let mut i = 0usize;

        while i < chars.len() {
            let c = chars[i];
            if c == '.' || c == '!' || c == '?' {
                let mut end = i + 1;
                while end < chars.len()
                    && matches!(chars[end], '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
                {
                    end += 1;
                }

                let followed_by_break = end >= chars.len() || chars[end].is_whitespace();
                let abbreviation = c == '.' && is_abbreviation(&chars[start..i], abbreviations);

                if followed_by_break && !abbreviation {
                    let sentence: String = chars[start..end].iter().collect();
                    let sentence = sentence.trim();
                    if sentence.chars().any(char::is_alphanumeric) {
                        sentences.push(sentence.to_string());
                    }
                    start = end;
                    i = end;
                    continue;
                }
            }
            i += 1;
        }

        sentences
    }

    /// Lowercased, stop-word-free stems for one sentence. Mirrors the
    /// cleaning applied to page text elsewhere: split on non-alphanumerics,
    /// drop one-character and purely numeric tokens.
    fn tokenize(&self, sentence: &str) -> Vec<String> {
        sentence
            .split(|c: char| !c.is_alphanumeric())
            .filter(|s| !s.is_empty())
            .map(|w| w.to_lowercase())
            .filter(|w| {
                if w.len() < 2 {
                    return false;
                }
                if w.chars().all(char::is_numeric) {
                    return false;
                }
                !self.stop_words.contains(w)
            })
            .map(|w| match self.language {
                Language::English => stem(&w),
                _ => w,
            })
            .collect()
    }

    /// Builds the term-by-sentence matrix, factorizes it, and derives one
    /// salience score per sentence from the singular-value-weighted component
    /// loadings. Returns None when no sentence contributed any terms.
    fn salience_scores(&self, tokenized: &[Vec<String>]) -> Option<Vec<f64>> {
        let mut term_rows: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in tokenized {
            for token in tokens {
                let next = term_rows.len();
                term_rows.entry(token.as_str()).or_insert(next);
            }
        }
        if term_rows.is_empty() {
            return None;
        }

        let rows = term_rows.len();
        let cols = tokenized.len();
        let mut matrix = DMatrix::<f64>::zeros(rows, cols);
        for (col, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                matrix[(term_rows[token.as_str()], col)] += 1.0;
            }
        }

        // smooth each column's counts towards its own maximum
        for col in 0..cols {
            let max = (0..rows)
                .map(|row| matrix[(row, col)])
                .fold(0.0_f64, f64::max);
            if max == 0.0 {
                continue;
            }
            for row in 0..rows {
                let count = matrix[(row, col)];
                if count > 0.0 {
                    matrix[(row, col)] = TF_SMOOTHING + (1.0 - TF_SMOOTHING) * count / max;
                }
            }
        }

        let svd = matrix.svd(false, true);
        let sigma = &svd.singular_values;
        let v_t = svd.v_t.as_ref()?;

        let components = sigma.len();
        let dimensions =
            MIN_DIMENSIONS.max((components as f64 * REDUCTION_RATIO) as usize);

        let mut scores = Vec::with_capacity(cols);
        for col in 0..cols {
            let mut rank = 0.0;
            for k in 0..components.min(dimensions) {
                let loading = v_t[(k, col)];
                rank += sigma[k] * sigma[k] * loading * loading;
            }
            scores.push(rank.sqrt());
        }

        Some(scores)
    }
}

fn is_abbreviation(before: &[char], abbreviations: &[&str]) -> bool {
    let word: String = before
        .iter()
        .rev()
        .take_while(|c| c.is_alphabetic())
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    if word.is_empty() {
        return false;
    }
    // single letters cover initials like "J. Smith" and runs like "U.S."
    if word.chars().count() == 1 {
        return true;
    }
    let word = word.to_lowercase();
    abbreviations.contains(&word.as_str())
}
