//! Arena-backed syntax tree produced by the decompiler.
//!
//! Nodes are addressed by [`NodeId`]. Ids stay valid across insertions, which
//! is what lets the attacher snapshot a traversal once and then splice
//! comments into the tree while walking that snapshot.

use crate::error::TreeError;
use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Declaration flavours the decompiler emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Type,
    Delegate,
    Method,
    Constructor,
    Destructor,
    Operator,
    Field,
    Property,
    Indexer,
    Event,
    EnumMember,
}

impl DeclKind {
    pub const ALL: [DeclKind; 11] = [
        DeclKind::Type,
        DeclKind::Delegate,
        DeclKind::Method,
        DeclKind::Constructor,
        DeclKind::Destructor,
        DeclKind::Operator,
        DeclKind::Field,
        DeclKind::Property,
        DeclKind::Indexer,
        DeclKind::Event,
        DeclKind::EnumMember,
    ];

    pub fn parse(s: &str) -> Option<DeclKind> {
        Self::ALL.into_iter().find(|k| k.as_str() == s)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Type => "type",
            DeclKind::Delegate => "delegate",
            DeclKind::Method => "method",
            DeclKind::Constructor => "constructor",
            DeclKind::Destructor => "destructor",
            DeclKind::Operator => "operator",
            DeclKind::Field => "field",
            DeclKind::Property => "property",
            DeclKind::Indexer => "indexer",
            DeclKind::Event => "event",
            DeclKind::EnumMember => "enummember",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// `///` comments.
    Documentation,
    /// `//` comments.
    Line,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub name: String,
    pub symbol: Option<Symbol>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub kind: CommentKind,
}

impl Comment {
    pub fn documentation(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: CommentKind::Documentation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Declaration(Declaration),
    Comment(Comment),
    /// Compilation units, namespaces, usings and other structure without a
    /// member behind it.
    Other { kind: String, name: Option<String> },
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new(root: NodeKind) -> Self {
        Self {
            nodes: vec![Node {
                kind: root,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn declaration(&self, id: NodeId) -> Option<&Declaration> {
        match self.kind(id) {
            NodeKind::Declaration(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn comment(&self, id: NodeId) -> Option<&Comment> {
        match self.kind(id) {
            NodeKind::Comment(c) => Some(c),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        pos.checked_sub(1).map(|p| siblings[p])
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let siblings = self.children(self.parent(id)?);
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.get(pos + 1).copied()
    }

    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.alloc(parent, kind);
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Insert a new child of `parent` right before `anchor`, or at the end
    /// when `anchor` is `None`.
    pub fn insert_child_before(
        &mut self,
        parent: NodeId,
        anchor: Option<NodeId>,
        kind: NodeKind,
    ) -> Result<NodeId, TreeError> {
        let pos = match anchor {
            Some(anchor) => self
                .children(parent)
                .iter()
                .position(|&c| c == anchor)
                .ok_or(TreeError::NotAChild { parent, anchor })?,
            None => self.children(parent).len(),
        };
        let id = self.alloc(parent, kind);
        self.nodes[parent.0].children.insert(pos, id);
        Ok(id)
    }

    /// Insert a new sibling immediately before `anchor`.
    pub fn insert_before(&mut self, anchor: NodeId, kind: NodeKind) -> Result<NodeId, TreeError> {
        let parent = self.parent(anchor).ok_or(TreeError::NoParent(anchor))?;
        self.insert_child_before(parent, Some(anchor), kind)
    }

    /// Pre-order, depth-first list of `id` and everything below it.
    ///
    /// The list is a snapshot; nodes inserted afterwards are not in it.
    pub fn descendants_and_self(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            stack.extend(self.children(cur).iter().rev());
        }
        out
    }

    /// The run of comment siblings directly preceding `id`, in tree order.
    pub fn leading_comments(&self, id: NodeId) -> Vec<&Comment> {
        let mut out = Vec::new();
        let mut cur = id;
        while let Some(prev) = self.prev_sibling(cur) {
            match self.comment(prev) {
                Some(c) => out.push(c),
                None => break,
            }
            cur = prev;
        }
        out.reverse();
        out
    }

    fn alloc(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        id
    }
}
