//! TF-IDF cosine similarity between a resume and a job description.
//!
//! Deterministic and LLM-free. The score feeds the PASS/FAIL verdict and is
//! quoted to the model so its analysis lines up with the keyword overlap.
//!
//! Vectorizer settings:
//! - tokens are lower-cased runs of word characters, at least two long
//! - English stop words are dropped
//! - vocabulary capped at `MAX_FEATURES` most frequent terms across the corpus
//! - smoothed idf `ln((1 + n) / (1 + df)) + 1`, raw counts, L2-normalised rows

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

mod stop_words;

pub use stop_words::is_stop_word;

pub const MAX_FEATURES: usize = 5000;
pub const DEFAULT_PASS_THRESHOLD: f64 = 0.30;

/// PASS/FAIL outcome of the similarity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    /// No job description was supplied, so there was nothing to compare against.
    NotScored,
}

impl Verdict {
    pub fn from_score(score: f64, threshold: f64) -> Self {
        if score >= threshold {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Pass => "✅ PASS",
            Verdict::Fail => "❌ FAIL",
            Verdict::NotScored => "ℹ️ NOT SCORED",
        }
    }
}

/// Similarity score together with the threshold it was judged against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityScore {
    pub score: f64,
    pub threshold: f64,
    pub verdict: Verdict,
}

impl SimilarityScore {
    pub fn compute(resume_text: &str, job_description: &str, threshold: f64) -> Self {
        let score = cosine_similarity(resume_text, job_description);
        Self {
            score,
            threshold,
            verdict: Verdict::from_score(score, threshold),
        }
    }

    /// e.g. `Similarity Score: 0.423 (Threshold: 0.30)`
    pub fn summary(&self) -> String {
        format!(
            "Similarity Score: {:.3} (Threshold: {:.2})",
            self.score, self.threshold
        )
    }
}

/// Splits text into lower-cased tokens of two or more word characters, minus stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
        .filter(|t| !is_stop_word(t))
        .collect()
}

/// Cosine similarity of the TF-IDF vectors of two documents, in `[0, 1]`.
///
/// Returns 0.0 when the shared vocabulary is empty (e.g. either text is blank).
pub fn cosine_similarity(a: &str, b: &str) -> f64 {
    let docs = [term_counts(a), term_counts(b)];
    let vocabulary = build_vocabulary(&docs, MAX_FEATURES);
    if vocabulary.is_empty() {
        return 0.0;
    }

    let n_docs = docs.len() as f64;
    let idf: HashMap<&str, f64> = vocabulary
        .iter()
        .map(|term| {
            let df = docs.iter().filter(|d| d.contains_key(*term)).count() as f64;
            (*term, ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0)
        })
        .collect();

    let vectors: Vec<Vec<f64>> = docs
        .iter()
        .map(|counts| {
            let raw: Vec<f64> = vocabulary
                .iter()
                .map(|term| counts.get(*term).copied().unwrap_or(0) as f64 * idf[term])
                .collect();
            l2_normalize(raw)
        })
        .collect();

    let dot: f64 = vectors[0]
        .iter()
        .zip(&vectors[1])
        .map(|(x, y)| x * y)
        .sum();

    dot.clamp(0.0, 1.0)
}

fn term_counts(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokenize(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Keeps the `max_features` terms with the highest corpus frequency.
/// Ties break alphabetically so the result is deterministic.
fn build_vocabulary(docs: &[HashMap<String, u32>], max_features: usize) -> Vec<&str> {
    let mut totals: BTreeMap<&str, u32> = BTreeMap::new();
    for doc in docs {
        for (term, count) in doc {
            *totals.entry(term.as_str()).or_insert(0) += count;
        }
    }

    let mut ranked: Vec<(&str, u32)> = totals.into_iter().collect();
    ranked.sort_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)));
    ranked.truncate(max_features);
    ranked.into_iter().map(|(term, _)| term).collect()
}

fn l2_normalize(v: Vec<f64>) -> Vec<f64> {
    let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm == 0.0 {
        v
    } else {
        v.into_iter().map(|x| x / norm).collect()
    }
}
