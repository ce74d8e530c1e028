//! JSON tree format read and written by the CLI.
//!
//! ```json
//! { "kind": "namespace", "name": "Acme", "children": [
//!     { "kind": "type", "name": "Widget",
//!       "symbol": { "type": { "definition": { "kind": "type", ... } } } }
//! ] }
//! ```
//!
//! `kind` is a declaration kind (`type`, `method`, ...), `comment` /
//! `line-comment`, or anything else for structural nodes.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use xmldoc::{Comment, CommentKind, DeclKind, Declaration, NodeId, NodeKind, Symbol, SyntaxTree};

const COMMENT: &str = "comment";
const LINE_COMMENT: &str = "line-comment";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<Symbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

/// Build a syntax tree from its JSON description.
pub fn build_tree(spec: &NodeSpec) -> Result<SyntaxTree> {
    let mut tree = SyntaxTree::new(node_kind(spec)?);
    let root = tree.root();
    add_children(&mut tree, root, &spec.children)?;
    Ok(tree)
}

fn add_children(tree: &mut SyntaxTree, parent: NodeId, children: &[NodeSpec]) -> Result<()> {
    for child in children {
        let id = tree.append_child(parent, node_kind(child)?);
        add_children(tree, id, &child.children)?;
    }
    Ok(())
}

fn node_kind(spec: &NodeSpec) -> Result<NodeKind> {
    let comment_kind = match spec.kind.as_str() {
        COMMENT => Some(CommentKind::Documentation),
        LINE_COMMENT => Some(CommentKind::Line),
        _ => None,
    };
    if let Some(kind) = comment_kind {
        if !spec.children.is_empty() {
            bail!("comment nodes cannot have children");
        }
        return Ok(NodeKind::Comment(Comment {
            text: spec.text.clone().unwrap_or_default(),
            kind,
        }));
    }

    match DeclKind::parse(&spec.kind) {
        Some(kind) => {
            let Some(name) = spec.name.clone() else {
                bail!("`{}` declaration without a name", spec.kind);
            };
            Ok(NodeKind::Declaration(Declaration {
                kind,
                name,
                symbol: spec.symbol.clone(),
            }))
        }
        None => Ok(NodeKind::Other {
            kind: spec.kind.clone(),
            name: spec.name.clone(),
        }),
    }
}

/// Describe `tree` in the input format, comments included.
pub fn export_tree(tree: &SyntaxTree) -> NodeSpec {
    export_node(tree, tree.root())
}

fn export_node(tree: &SyntaxTree, id: NodeId) -> NodeSpec {
    let children = tree
        .children(id)
        .iter()
        .map(|&child| export_node(tree, child))
        .collect();
    match tree.kind(id) {
        NodeKind::Declaration(decl) => NodeSpec {
            kind: decl.kind.as_str().to_string(),
            name: Some(decl.name.clone()),
            symbol: decl.symbol.clone(),
            text: None,
            children,
        },
        NodeKind::Comment(comment) => NodeSpec {
            kind: match comment.kind {
                CommentKind::Documentation => COMMENT,
                CommentKind::Line => LINE_COMMENT,
            }
            .to_string(),
            name: None,
            symbol: None,
            text: Some(comment.text.clone()),
            children,
        },
        NodeKind::Other { kind, name } => NodeSpec {
            kind: kind.clone(),
            name: name.clone(),
            symbol: None,
            text: None,
            children,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "kind": "unit",
        "children": [
            { "kind": "namespace", "name": "Acme", "children": [
                { "kind": "type", "name": "Widget",
                  "symbol": { "type": { "definition": {
                      "kind": "type", "module": { "name": "Acme.dll" },
                      "namespace": "Acme", "name": "Widget" } } },
                  "children": [
                    { "kind": "line-comment", "text": " keep me" },
                    { "kind": "method", "name": "Reset",
                      "symbol": { "member": { "name": "Reset", "metadata": {
                          "kind": "method", "module": { "name": "Acme.dll" },
                          "declaring_type": { "namespace": "Acme", "name": "Widget" },
                          "name": "Reset" } } } }
                  ] }
            ] }
        ]
    }"#;

    #[test]
    fn builds_declarations_and_structure() {
        let spec: NodeSpec = serde_json::from_str(SAMPLE).unwrap();
        let tree = build_tree(&spec).unwrap();
        let ids = tree.descendants_and_self(tree.root());
        assert_eq!(ids.len(), 5);
        let widget = tree.declaration(ids[2]).unwrap();
        assert_eq!(widget.kind, DeclKind::Type);
        assert!(widget.symbol.is_some());
        assert_eq!(tree.comment(ids[3]).unwrap().kind, CommentKind::Line);
        assert_eq!(tree.declaration(ids[4]).unwrap().name, "Reset");
    }

    #[test]
    fn export_matches_input() {
        let spec: NodeSpec = serde_json::from_str(SAMPLE).unwrap();
        let tree = build_tree(&spec).unwrap();
        assert_eq!(export_tree(&tree), spec);
    }

    #[test]
    fn declaration_needs_a_name() {
        let spec: NodeSpec = serde_json::from_str(r#"{"kind":"method"}"#).unwrap();
        let err = build_tree(&spec).unwrap_err();
        assert!(err.to_string().contains("without a name"));
    }

    #[test]
    fn comment_cannot_have_children() {
        let spec: NodeSpec =
            serde_json::from_str(r#"{"kind":"unit","children":[{"kind":"comment","children":[{"kind":"x"}]}]}"#)
                .unwrap();
        assert!(build_tree(&spec).is_err());
    }
}
