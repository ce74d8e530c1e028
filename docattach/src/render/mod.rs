//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod text;

use anyhow::{anyhow, Result};
use xmldoc::SyntaxTree;

/// Trait for rendering a syntax tree into a specific output format.
pub trait Renderer {
    fn render(&self, tree: &SyntaxTree) -> Result<String>;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "text" | "txt" => Ok(Box::new(text::TextRenderer)),
        "json" => Ok(Box::new(json::JsonRenderer)),
        _ => Err(anyhow!("unknown format: {}. Use text or json", format)),
    }
}
