//! Display-only widgets: html block, heading, spacer, error placeholder.
//!
//! None of these have a value, so they never show up in a panel value.

use std::any::Any;

use crate::error::Result;
use crate::layout::ElementDescriptor;
use crate::widget::traits::Widget;

// ---------------------------------------------------------------------------
// HtmlDisplay
// ---------------------------------------------------------------------------

/// Fixed markup content.
#[derive(Debug, Clone)]
pub struct HtmlDisplay {
    html: String,
}

impl HtmlDisplay {
    pub const TYPE_NAME: &'static str = "htmlDisplay";

    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        Ok(Self::new(desc.str_extra("html").unwrap_or_default()))
    }

    /// Return the markup.
    pub fn html(&self) -> &str {
        &self.html
    }
}

impl Widget for HtmlDisplay {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Heading
// ---------------------------------------------------------------------------

/// A heading line. Level 2 unless configured.
#[derive(Debug, Clone)]
pub struct Heading {
    text: String,
    level: u8,
}

impl Heading {
    pub const TYPE_NAME: &'static str = "heading";
    pub const DEFAULT_LEVEL: u8 = 2;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: Self::DEFAULT_LEVEL,
        }
    }

    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        let mut heading = Self::new(desc.str_extra("text").unwrap_or_default());
        if let Some(level) = desc.f64_extra("level") {
            heading.level = level as u8;
        }
        Ok(heading)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn level(&self) -> u8 {
        self.level
    }
}

impl Widget for Heading {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Spacer
// ---------------------------------------------------------------------------

/// Vertical blank space.
#[derive(Debug, Clone)]
pub struct Spacer {
    height: u32,
}

impl Spacer {
    pub const TYPE_NAME: &'static str = "spacer";
    pub const DEFAULT_HEIGHT: u32 = 15;

    pub fn from_descriptor(desc: &ElementDescriptor) -> Result<Self> {
        Ok(Self {
            height: desc
                .f64_extra("height")
                .map_or(Self::DEFAULT_HEIGHT, |h| h as u32),
        })
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

impl Widget for Spacer {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// ErrorElement
// ---------------------------------------------------------------------------

/// Stands in for an element whose descriptor could not be built.
#[derive(Debug, Clone)]
pub struct ErrorElement {
    message: String,
}

impl ErrorElement {
    pub const TYPE_NAME: &'static str = "errorElement";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Widget for ErrorElement {
    fn widget_type(&self) -> &str {
        Self::TYPE_NAME
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
