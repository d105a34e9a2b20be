mod lexical;

use serde::{Deserialize, Serialize};

pub use lexical::{
    count_syllables, estimate_syllables, preview, reading_ease, split_sentences, tokenize,
    LexicalAnalyzer, TextAnalysis, PREVIEW_MAX_CHARS, PREVIEW_MAX_LINES, SYLLABLE_TOKEN_CAP,
};

pub(crate) use lexical::round2;

/// Quantified features of extracted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub avg_sentence_length: f64,
    pub keyword_hits: usize,
    pub reading_ease: f64,
}
