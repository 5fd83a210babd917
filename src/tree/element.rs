//! Owned XML element type.

/// An XML element with ordered attributes, optional text and child elements.
///
/// Attribute order is insertion order; setting an existing attribute
/// replaces its value in place. Mixed content is not modelled: an element
/// carries at most one text run, placed before its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name (e.g. `w`, `teiHeader`)
    pub name: String,

    /// Attributes as (qualified name, value) pairs
    pub attributes: Vec<(String, String)>,

    /// Text content, if any
    pub text: Option<String>,

    /// Child elements in document order
    pub children: Vec<Element>,
}

impl Element {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder: set the text content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: append a child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Get an attribute value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check whether an attribute is present.
    pub fn has_attr(&self, key: &str) -> bool {
        self.attributes.iter().any(|(k, _)| k == key)
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, key: &str) -> Option<String> {
        let idx = self.attributes.iter().position(|(k, _)| k == key)?;
        Some(self.attributes.remove(idx).1)
    }

    /// Append a child and return a mutable reference to it.
    pub fn push(&mut self, child: Element) -> &mut Element {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Text content or an empty string.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whether the element is a `w` or `pc` token node.
    pub fn is_token(&self) -> bool {
        self.name == "w" || self.name == "pc"
    }

    /// Iterate over this element and all its descendants in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Find the first descendant (or self) with the given name.
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().find(|e| e.name == name)
    }

    /// Find the first direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|e| e.name == name)
    }

    /// Find the first direct child with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find(|e| e.name == name)
    }

    /// Count elements (self included) with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.descendants().filter(|e| e.name == name).count()
    }

    /// Visit every element mutably, parents before children.
    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&mut Element),
    {
        f(self);
        for child in &mut self.children {
            child.walk_mut(f);
        }
    }

    /// Concatenated text of all token descendants, separated by spaces.
    pub fn plain_text(&self) -> String {
        self.descendants()
            .filter(|e| e.is_token())
            .map(|e| e.text_or_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Pre-order iterator over an element subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.stack.pop()?;
        self.stack.extend(next.children.iter().rev());
        Some(next)
    }
}
