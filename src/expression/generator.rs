//! Function body generation from a form value and its meta shadow tree.
//!
//! The generated body builds an `output` object one assignment at a time:
//!
//! ```text
//! let output = {};
//! output["a"] = {}
//! output["a"]["b"] = 1
//! output["f"] = x + 1
//! return output;
//! ```
//!
//! Statement order is exactly the iteration order of the value's keys and
//! elements. The generator never mutates its inputs.

use serde_json::Value;

use super::classify::{classify, encode};
use super::meta::{Meta, MetaMap, ParentType};
use crate::error::Result;

/// Name of the generated result variable.
pub const OUTPUT_NAME: &str = "output";

/// Result of a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionBody {
    /// Newline-joined statements, ending with `return output;`.
    pub body: String,
    /// Whether any emitted statement contains an expression.
    pub has_expression: bool,
}

/// Walks a value tree with its meta and accumulates assignment statements.
#[derive(Debug, Default)]
pub struct FunctionBodyGenerator {
    lines: Vec<String>,
    has_expression: bool,
}

impl FunctionBodyGenerator {
    /// Create an empty generator.
    pub fn new() -> Self {
        Self::default()
    }

    /// One-shot generation.
    pub fn generate(value: &Value, meta: &MetaMap) -> Result<FunctionBody> {
        let mut generator = Self::new();
        generator.set_input(value, meta)?;
        Ok(FunctionBody {
            body: generator.function_body(),
            has_expression: generator.has_expression(),
        })
    }

    /// Replace the accumulated body with the one for `value`/`meta`.
    ///
    /// On error the generator is left empty.
    pub fn set_input(&mut self, value: &Value, meta: &MetaMap) -> Result<()> {
        self.reset();
        self.append(format!("let {OUTPUT_NAME} = {{}};"));
        if let Err(err) = self.load_panel_lines(OUTPUT_NAME, value, Some(meta)) {
            self.reset();
            return Err(err);
        }
        self.append(format!("return {OUTPUT_NAME};"));
        Ok(())
    }

    /// The accumulated body.
    pub fn function_body(&self) -> String {
        self.lines.join("\n")
    }

    /// Whether an expression was emitted.
    pub fn has_expression(&self) -> bool {
        self.has_expression
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn reset(&mut self) {
        self.lines.clear();
        self.has_expression = false;
    }

    fn append(&mut self, line: String) {
        self.lines.push(line);
    }

    /// Load one entry. Returns whether a statement was emitted.
    fn load_entry(
        &mut self,
        assignee: &str,
        value: Option<&Value>,
        container: Option<&Value>,
        meta: Option<&Meta>,
    ) -> Result<bool> {
        let Some(value) = value else {
            return Ok(false);
        };

        match meta.and_then(|m| m.parent_type) {
            Some(ParentType::Object) => {
                self.append(format!("{assignee} = {{}}"));
                let child_meta = meta.and_then(|m| m.child_meta.as_ref());
                self.load_panel_lines(assignee, value, child_meta)?;
                return Ok(true);
            }
            Some(ParentType::Array) => {
                self.append(format!("{assignee} = []"));
                if let Some(entry_meta_array) = meta.and_then(|m| m.entry_meta_array.as_deref()) {
                    self.load_generic_array_lines(assignee, value, entry_meta_array)?;
                } else if let Some(entry_meta) = meta.and_then(|m| m.entry_meta.as_deref()) {
                    self.load_common_entry_array_lines(assignee, value, entry_meta)?;
                }
                return Ok(true);
            }
            None => {}
        }

        let kind = classify(meta, container, assignee)?;
        let Some(code) = encode(kind, value, meta, container)? else {
            return Ok(false);
        };
        self.append(format!("{assignee} = {code}"));
        if kind.is_expression() {
            self.has_expression = true;
        }
        Ok(true)
    }

    fn load_panel_lines(&mut self, parent: &str, panel_value: &Value, panel_meta: Option<&MetaMap>) -> Result<()> {
        let map = match panel_value {
            Value::Null => return Ok(()),
            Value::Object(map) => map,
            other => {
                tracing::warn!(assignee = parent, value = %other, "object meta on a non-object value; skipped");
                return Ok(());
            }
        };
        for (key, value) in map {
            let assignee = format!("{parent}[{}]", Value::String(key.clone()));
            let meta = panel_meta.and_then(|m| m.get(key));
            self.load_entry(&assignee, Some(value), Some(panel_value), meta)?;
        }
        Ok(())
    }

    /// Heterogeneous array: element `i` pairs with `entry_meta_array[i]`.
    fn load_generic_array_lines(&mut self, assignee: &str, value: &Value, entry_meta_array: &[Meta]) -> Result<bool> {
        let Some(items) = array_items(assignee, value) else {
            return Ok(false);
        };
        let mut insert_index = 0;
        for (index, item) in items.iter().enumerate() {
            let entry_assignee = format!("{assignee}[{insert_index}]");
            if self.load_entry(&entry_assignee, Some(item), None, entry_meta_array.get(index))? {
                insert_index += 1;
            }
        }
        Ok(insert_index > 0)
    }

    /// Homogeneous array: every element shares `entry_meta`.
    fn load_common_entry_array_lines(&mut self, assignee: &str, value: &Value, entry_meta: &Meta) -> Result<bool> {
        let Some(items) = array_items(assignee, value) else {
            return Ok(false);
        };
        let mut insert_index = 0;
        for item in items {
            let entry_assignee = format!("{assignee}[{insert_index}]");
            if self.load_entry(&entry_assignee, Some(item), None, Some(entry_meta))? {
                insert_index += 1;
            }
        }
        Ok(insert_index > 0)
    }
}

fn array_items<'a>(assignee: &str, value: &'a Value) -> Option<&'a Vec<Value>> {
    match value {
        Value::Null => None,
        Value::Array(items) => Some(items),
        other => {
            tracing::warn!(assignee, value = %other, "array meta on a non-array value; skipped");
            None
        }
    }
}

/// Body text only, for callers that do not need the expression flag.
pub fn form_result_function_body(value: &Value, meta: &MetaMap) -> Result<String> {
    FunctionBodyGenerator::generate(value, meta).map(|f| f.body)
}

// ===========================================================================
// Tests
// ===========================================================================
