//! Page and token records.

use serde::{Deserialize, Serialize};

/// UDPipe part-of-speech tag of punctuation tokens.
pub const PUNCT_TAG: &str = "PUNCT";

/// UDPipe `misc` marker of a token not followed by whitespace.
pub const NO_SPACE_AFTER: &str = "SpaceAfter=No";

/// One digitized page with its annotated tokens.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page identifier (UUID); required by the page builder
    pub id: Option<String>,

    /// Page title (page number label)
    pub title: Option<String>,

    /// URL of the page source
    pub source: Option<String>,

    /// Tokens in reading order
    #[serde(default)]
    pub tokens: Vec<Token>,
}

impl Page {
    /// Create an empty page with an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Add a token.
    pub fn add_token(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Parse a page from a JSON record.
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Number of tokens on the page.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// A single annotated token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    /// Surface form; required
    pub content: Option<String>,

    /// Pipe-delimited NameTag labels (`B-ps|I-P`)
    pub name_tag_metadata: Option<String>,

    /// UDPipe output; required
    pub linguistic_metadata: Option<LinguisticMetadata>,

    /// ALTO layout coordinates
    pub alto_metadata: Option<AltoMetadata>,
}

impl Token {
    /// Create a token with content and sentence position.
    pub fn new(content: impl Into<String>, position: u32) -> Self {
        Self {
            content: Some(content.into()),
            name_tag_metadata: None,
            linguistic_metadata: Some(LinguisticMetadata {
                position: Some(position),
                ..Default::default()
            }),
            alto_metadata: None,
        }
    }

    /// Builder: set the NameTag labels.
    pub fn with_labels(mut self, labels: impl Into<String>) -> Self {
        self.name_tag_metadata = Some(labels.into());
        self
    }

    /// Builder: set the lemma.
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.linguistic_mut().lemma = Some(lemma.into());
        self
    }

    /// Builder: set the universal part-of-speech tag.
    pub fn with_pos(mut self, tag: impl Into<String>) -> Self {
        self.linguistic_mut().u_pos_tag = Some(tag.into());
        self
    }

    /// Builder: set the morphological features.
    pub fn with_feats(mut self, feats: impl Into<String>) -> Self {
        self.linguistic_mut().feats = Some(feats.into());
        self
    }

    /// Builder: set the UDPipe `misc` column.
    pub fn with_misc(mut self, misc: impl Into<String>) -> Self {
        self.linguistic_mut().misc = Some(misc.into());
        self
    }

    /// Builder: set the layout coordinates.
    pub fn with_alto(mut self, alto: AltoMetadata) -> Self {
        self.alto_metadata = Some(alto);
        self
    }

    fn linguistic_mut(&mut self) -> &mut LinguisticMetadata {
        self.linguistic_metadata.get_or_insert_with(Default::default)
    }

    /// NameTag labels in order; empty when the token has no NameTag data.
    pub fn labels(&self) -> Vec<&str> {
        match self.name_tag_metadata {
            Some(ref raw) => raw.split('|').collect(),
            None => Vec::new(),
        }
    }
}

/// UDPipe annotation of a token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinguisticMetadata {
    /// 1-based position within the sentence; required
    pub position: Option<u32>,
    pub u_pos_tag: Option<String>,
    pub misc: Option<String>,
    pub feats: Option<String>,
    pub lemma: Option<String>,
}

impl LinguisticMetadata {
    /// Whether the token is punctuation.
    pub fn is_punctuation(&self) -> bool {
        self.u_pos_tag.as_deref() == Some(PUNCT_TAG)
    }

    /// Whether the token is followed by whitespace.
    pub fn space_after(&self) -> bool {
        !self
            .misc
            .as_deref()
            .is_some_and(|misc| misc.contains(NO_SPACE_AFTER))
    }
}

/// ALTO layout coordinates of a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AltoMetadata {
    pub height: Option<f64>,
    pub width: Option<f64>,
    pub vpos: Option<f64>,
    pub hpos: Option<f64>,
}

impl AltoMetadata {
    /// Coordinates with every field present.
    pub fn new(height: f64, width: f64, vpos: f64, hpos: f64) -> Self {
        Self {
            height: Some(height),
            width: Some(width),
            vpos: Some(vpos),
            hpos: Some(hpos),
        }
    }

    /// Present fields as (name, value) pairs in rendering order.
    pub fn fields(&self) -> Vec<(&'static str, f64)> {
        [
            ("height", self.height),
            ("width", self.width),
            ("vpos", self.vpos),
            ("hpos", self.hpos),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect()
    }
}
