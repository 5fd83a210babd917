//! Rendering options and configuration.

/// Options for serializing trees to XML text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Spaces per nesting level
    pub indent: usize,

    /// Emit the `<?xml ...?>` declaration
    pub declaration: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width.
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Enable or disable the XML declaration.
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new().with_indent(4).with_declaration(false);
        assert_eq!(options.indent, 4);
        assert!(!options.declaration);
    }

    #[test]
    fn test_default_options() {
        let options = RenderOptions::default();
        assert_eq!(options.indent, 2);
        assert!(options.declaration);
    }
}
