use strsim::normalized_levenshtein;

use crate::bank::QaRecord;

/// Watermark the game renders over the question area; stripped before any
/// matching or caching.
pub const NOISE_TOKEN: &str = "咸鱼游戏";

/// Minimum accepted similarity score, inclusive.
pub const DEFAULT_THRESHOLD: i32 = 40;

/// Cleaned queries shorter than this never match.
const MIN_QUERY_CHARS: usize = 2;

/// Strip the known watermark and surrounding whitespace from recognized
/// text. Applied to every query before matching, caching, and dedup.
pub fn clean_text(raw: &str) -> String {
    raw.replace(NOISE_TOKEN, "").trim().to_string()
}

/// Similarity between two strings as an integer score 0-100.
///
/// Defined as normalized Levenshtein similarity (1 - distance / longer
/// length, over characters) scaled by 100 and rounded to nearest. The
/// acceptance threshold is calibrated against exactly this definition.
pub fn similarity_score(a: &str, b: &str) -> i32 {
    (normalized_levenshtein(a, b) * 100.0).round() as i32
}

/// Scores a query against every bank record and picks the best one.
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    threshold: i32,
}

impl FuzzyMatcher {
    pub fn new() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(threshold: i32) -> Self {
        Self { threshold }
    }

    /// Best-scoring record for the query, if it clears the threshold.
    ///
    /// The query is cleaned first; under two characters of cleaned text is
    /// never a match. Ties keep the earliest record in bank order.
    pub fn best_match<'a>(&self, query: &str, records: &'a [QaRecord]) -> Option<&'a QaRecord> {
        let cleaned = clean_text(query);
        if cleaned.chars().count() < MIN_QUERY_CHARS {
            return None;
        }

        let mut best: Option<(i32, &QaRecord)> = None;
        for record in records {
            let score = similarity_score(&cleaned, &record.question);
            if best.map_or(true, |(top_score, _)| score > top_score) {
                best = Some((score, record));
            }
        }

        match best {
            Some((score, record)) if score >= self.threshold => Some(record),
            _ => None,
        }
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new()
    }
}
