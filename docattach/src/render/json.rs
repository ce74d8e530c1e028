//! JSON renderer: the mutated tree in the input format.

use crate::input;
use crate::render::Renderer;
use anyhow::{Context, Result};
use xmldoc::SyntaxTree;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, tree: &SyntaxTree) -> Result<String> {
        let mut out = serde_json::to_string_pretty(&input::export_tree(tree))
            .context("failed to serialize tree")?;
        out.push('\n');
        Ok(out)
    }
}
