//! Fuzzy question matching and the bounded result cache.

pub mod cache;
pub mod matcher;

// Re-export main types
pub use cache::{ResultCache, CACHE_CAPACITY};
pub use matcher::{clean_text, similarity_score, FuzzyMatcher, DEFAULT_THRESHOLD, NOISE_TOKEN};
