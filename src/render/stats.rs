//! Document statistics.

use crate::tables::ANA_PREFIX;
use crate::tree::Element;
use serde::{Deserialize, Serialize};

/// Counts collected from a page or merged document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Number of page breaks
    pub page_count: u32,

    /// Number of sentences
    pub sentence_count: u32,

    /// Number of word tokens
    pub word_count: u32,

    /// Number of punctuation tokens
    pub punctuation_count: u32,

    /// Number of elements carrying a NameTag back-reference
    pub entity_count: u32,

    /// Number of facsimile zones
    pub zone_count: u32,

    /// Character count of token text (excluding whitespace)
    pub char_count: u32,
}

impl DocumentStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk a tree and count its parts.
    pub fn collect(root: &Element) -> Self {
        let mut stats = Self::new();
        for element in root.descendants() {
            match element.name.as_str() {
                "pb" => stats.page_count += 1,
                "s" => stats.sentence_count += 1,
                "zone" => stats.zone_count += 1,
                "w" => {
                    stats.word_count += 1;
                    stats.count_text(element.text_or_empty());
                }
                "pc" => {
                    stats.punctuation_count += 1;
                    stats.count_text(element.text_or_empty());
                }
                _ => {}
            }
            if element
                .get("ana")
                .is_some_and(|ana| ana.starts_with(ANA_PREFIX))
            {
                stats.entity_count += 1;
            }
        }
        stats
    }

    /// Total number of tokens.
    pub fn token_count(&self) -> u32 {
        self.word_count + self.punctuation_count
    }

    /// Add the non-whitespace characters of a token.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &DocumentStats) {
        self.page_count += other.page_count;
        self.sentence_count += other.sentence_count;
        self.word_count += other.word_count;
        self.punctuation_count += other.punctuation_count;
        self.entity_count += other.entity_count;
        self.zone_count += other.zone_count;
        self.char_count += other.char_count;
    }
}
