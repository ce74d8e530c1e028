//! Plain-text outline renderer.
//!
//! One line per node, two spaces of indentation per level:
//!
//! ```text
//! namespace Acme
//!   /// <summary>A widget.</summary>
//!   type Widget
//!     method Reset
//! ```

use crate::render::Renderer;
use anyhow::Result;
use xmldoc::{CommentKind, NodeId, NodeKind, SyntaxTree};

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, tree: &SyntaxTree) -> Result<String> {
        let mut out = String::new();
        render_node(tree, tree.root(), 0, &mut out);
        Ok(out)
    }
}

fn render_node(tree: &SyntaxTree, id: NodeId, depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    match tree.kind(id) {
        NodeKind::Declaration(decl) => {
            out.push_str(decl.kind.as_str());
            out.push(' ');
            out.push_str(&decl.name);
        }
        NodeKind::Comment(comment) => {
            out.push_str(match comment.kind {
                CommentKind::Documentation => "///",
                CommentKind::Line => "//",
            });
            out.push_str(&comment.text);
        }
        NodeKind::Other { kind, name } => {
            out.push_str(kind);
            if let Some(name) = name {
                out.push(' ');
                out.push_str(name);
            }
        }
    }
    out.push('\n');

    for &child in tree.children(id) {
        render_node(tree, child, depth + 1, out);
    }
}
