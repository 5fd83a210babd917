//! Attribute-retention configuration of the merge step.

use crate::tables::{ALTO_ATTR_PREFIX, ALTO_DEFAULTS, NAME_TAG_DEFAULTS, UDPIPE_DEFAULTS};

/// Which annotation layers survive into the merged document.
///
/// Each list defaults to the full superset when unset. Entries outside the
/// superset have no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetentionConfig {
    /// Retained NameTag group-code prefixes (`p`, `g`, ...)
    pub name_tag: Option<Vec<String>>,

    /// Retained UDPipe token attributes (`lemma`, `pos`, ...)
    pub udpipe: Option<Vec<String>>,

    /// Retained ALTO geometry fields (`hpos`, `width`, ...)
    pub alto: Option<Vec<String>>,
}

impl RetentionConfig {
    /// Create a configuration retaining everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the retained NameTag group-code prefixes.
    pub fn with_name_tag<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.name_tag = Some(normalize_list(codes));
        self
    }

    /// Set the retained UDPipe attributes.
    pub fn with_udpipe<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.udpipe = Some(normalize_list(attrs));
        self
    }

    /// Set the retained ALTO fields.
    pub fn with_alto<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.alto = Some(normalize_list(fields));
        self
    }

    /// Build a configuration from comma-separated filter strings.
    ///
    /// `None` keeps the default for that category; an empty string retains
    /// nothing.
    pub fn from_filters(
        name_tag: Option<&str>,
        udpipe: Option<&str>,
        alto: Option<&str>,
    ) -> Self {
        Self {
            name_tag: name_tag.map(parse_filter),
            udpipe: udpipe.map(parse_filter),
            alto: alto.map(parse_filter),
        }
    }

    /// NameTag prefixes to prune (default minus retained).
    pub fn removed_name_tags(&self) -> Vec<String> {
        removed(NAME_TAG_DEFAULTS, &self.name_tag)
    }

    /// UDPipe attributes to strip (default minus retained).
    pub fn removed_udpipe(&self) -> Vec<String> {
        removed(UDPIPE_DEFAULTS, &self.udpipe)
    }

    /// ALTO fields not retained (default minus retained).
    pub fn removed_alto(&self) -> Vec<String> {
        removed(ALTO_DEFAULTS, &self.alto)
    }

    /// Token attribute names (`alto-hpos`, ...) of retained ALTO fields.
    pub fn retained_alto_attrs(&self) -> Vec<String> {
        ALTO_DEFAULTS
            .iter()
            .filter(|field| is_retained(field, &self.alto))
            .map(|field| format!("{}{}", ALTO_ATTR_PREFIX, field))
            .collect()
    }

    /// Whether a geometry section is produced.
    pub fn use_geometry(&self) -> bool {
        !self.retained_alto_attrs().is_empty()
    }
}

/// Split a comma-separated filter into trimmed, lowercased entries.
pub fn parse_filter(filter: &str) -> Vec<String> {
    normalize_list(filter.split(','))
}

fn normalize_list<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_retained(item: &str, retained: &Option<Vec<String>>) -> bool {
    match retained {
        Some(list) => list.iter().any(|r| r == item),
        None => true,
    }
}

fn removed(defaults: &[&str], retained: &Option<Vec<String>>) -> Vec<String> {
    defaults
        .iter()
        .filter(|item| !is_retained(item, retained))
        .map(|item| item.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_remove_nothing() {
        let config = RetentionConfig::default();
        assert!(config.removed_name_tags().is_empty());
        assert!(config.removed_udpipe().is_empty());
        assert!(config.removed_alto().is_empty());
        assert!(config.use_geometry());
        assert_eq!(config.retained_alto_attrs().len(), 4);
    }

    #[test]
    fn test_removal_sets() {
        let config = RetentionConfig::new()
            .with_name_tag(["p", "G"])
            .with_udpipe(["lemma"])
            .with_alto(Vec::<String>::new());

        assert_eq!(config.removed_name_tags(), vec!["a", "i", "m", "n", "o", "t"]);
        assert_eq!(config.removed_udpipe(), vec!["n", "pos", "msd", "join"]);
        assert_eq!(config.removed_alto().len(), 4);
        assert!(!config.use_geometry());
    }

    #[test]
    fn test_unknown_entries_ignored() {
        let config = RetentionConfig::new().with_alto(["depth", "hpos"]);
        assert_eq!(config.retained_alto_attrs(), vec!["alto-hpos"]);
        assert!(config.use_geometry());
    }

    #[test]
    fn test_from_filters() {
        let config = RetentionConfig::from_filters(Some(" P , t"), None, Some(""));
        assert_eq!(config.name_tag, Some(vec!["p".to_string(), "t".to_string()]));
        assert_eq!(config.udpipe, None);
        assert_eq!(config.alto, Some(vec![]));
        assert!(!config.use_geometry());
    }
}
