//! Form configuration: dispatch limits and inline error text.

/// Default prefix for inline selector error messages.
pub const DEFAULT_SELECTOR_ERROR_PREFIX: &str = "Error calling selector: ";

/// Default prefix for the whole-panel error layout message.
pub const DEFAULT_PANEL_ERROR_PREFIX: &str = "Error in panel: ";

/// Configuration for a [`Form`](crate::form::Form).
#[derive(Debug, Clone)]
pub struct FormConfig {
    /// Maximum nesting of change dispatch (a change handler that changes
    /// another value that changes another...). Deeper dispatch is dropped.
    pub max_dispatch_depth: usize,
    /// Prefix for inline selector errors.
    pub selector_error_prefix: String,
    /// Prefix for the panel-wide error layout.
    pub panel_error_prefix: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            max_dispatch_depth: 32,
            selector_error_prefix: DEFAULT_SELECTOR_ERROR_PREFIX.to_owned(),
            panel_error_prefix: DEFAULT_PANEL_ERROR_PREFIX.to_owned(),
        }
    }
}

impl FormConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum change dispatch depth (builder).
    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }

    /// Set the inline selector error prefix (builder).
    pub fn with_selector_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.selector_error_prefix = prefix.into();
        self
    }

    /// Set the panel error prefix (builder).
    pub fn with_panel_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.panel_error_prefix = prefix.into();
        self
    }
}
