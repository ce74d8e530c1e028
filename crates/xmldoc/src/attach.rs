//! Splicing documentation comments into a syntax tree.
//!
//! For every declaration under (and including) the start node, in pre-order:
//! resolve its identity, fetch the module's store, look up the key, reduce
//! the markup to lines and insert one `///` comment per line directly before
//! the declaration.
//!
//! The first malformed member stops the run. A diagnostic block describing
//! the fault is placed before the start node's first child and nothing after
//! the faulting declaration is documented. Running twice over the same tree
//! inserts every comment twice; callers attach once per decompiled tree.

use crate::error::DocFailure;
use crate::loader::DocProvider;
use crate::markup::{self, DocLines, MarkupLine};
use crate::resolve::resolve;
use crate::tree::{Comment, NodeId, NodeKind, SyntaxTree};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

const DIAGNOSTIC_PREFIX: &str = " Exception while reading XmlDoc: ";

static RE_LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());

/// What a run did. The run itself never fails; a markup fault is reported
/// here and inside the tree.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AttachReport {
    /// Declarations looked at before the run finished or faulted.
    pub visited: usize,
    /// Declarations that received documentation.
    pub documented: usize,
    /// Comment nodes inserted, diagnostic lines included.
    pub comments: usize,
    pub fault: Option<DocFailure>,
}

impl AttachReport {
    pub fn is_faulted(&self) -> bool {
        self.fault.is_some()
    }
}

/// Attaches documentation from `provider` to syntax trees.
///
/// Holds one scratch buffer reused for key formatting and comment text, so
/// an attacher must not be shared between concurrent runs.
pub struct DocAttacher<'p, P: DocProvider + ?Sized> {
    provider: &'p P,
    buf: String,
}

impl<'p, P: DocProvider + ?Sized> DocAttacher<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self {
            provider,
            buf: String::new(),
        }
    }

    pub fn run(&mut self, tree: &mut SyntaxTree, node: NodeId) -> AttachReport {
        let mut report = AttachReport::default();
        if let Err(failure) = self.attach_all(tree, node, &mut report) {
            warn!(key = %failure.key, error = %failure.source, "stopping at malformed documentation");
            report.comments += insert_diagnostic(tree, node, &failure);
            report.fault = Some(failure);
        }
        report
    }

    fn attach_all(
        &mut self,
        tree: &mut SyntaxTree,
        node: NodeId,
        report: &mut AttachReport,
    ) -> Result<(), DocFailure> {
        // Snapshot first: comments are inserted while walking.
        for id in tree.descendants_and_self(node) {
            let Some(decl) = tree.declaration(id) else {
                continue;
            };
            report.visited += 1;

            let Some(identity) = resolve(decl) else {
                continue;
            };
            let Some(store) = self.provider.documentation(identity.module()) else {
                continue;
            };
            let key = identity.key(&mut self.buf);
            let Some(doc) = store.documentation(key) else {
                continue;
            };
            let lines = markup::reduce(doc).map_err(|source| DocFailure {
                key: key.to_string(),
                source,
            })?;
            debug!(key = %key, declaration = %decl.name, "attaching documentation");

            let inserted = self.insert_lines(tree, id, lines);
            if inserted > 0 {
                report.documented += 1;
                report.comments += inserted;
            }
        }
        Ok(())
    }

    fn insert_lines(&mut self, tree: &mut SyntaxTree, decl: NodeId, lines: DocLines<'_>) -> usize {
        let mut inserted = 0;
        for line in lines {
            self.buf.clear();
            if let MarkupLine::Content(_) = line {
                self.buf.push(' ');
                line.write_to(&mut self.buf);
            }
            let comment = NodeKind::Comment(Comment::documentation(self.buf.as_str()));
            if let Err(err) = tree.insert_before(decl, comment) {
                debug!(error = %err, "declaration has no place for documentation");
                break;
            }
            inserted += 1;
        }
        inserted
    }
}

/// Convenience wrapper: one run with a fresh attacher.
pub fn attach<P: DocProvider + ?Sized>(
    provider: &P,
    tree: &mut SyntaxTree,
    node: NodeId,
) -> AttachReport {
    DocAttacher::new(provider).run(tree, node)
}

/// Insert the failure text before `node`'s first child, one comment per
/// physical line. Returns the number of lines inserted.
fn insert_diagnostic(tree: &mut SyntaxTree, node: NodeId, failure: &DocFailure) -> usize {
    let message = format!("{}{}", DIAGNOSTIC_PREFIX, failure);
    let anchor = tree.first_child(node);
    let mut inserted = 0;
    for line in RE_LINE_BREAKS.split(&message).filter(|l| !l.is_empty()) {
        let comment = NodeKind::Comment(Comment::documentation(line));
        if tree.insert_child_before(node, anchor, comment).is_ok() {
            inserted += 1;
        }
    }
    inserted
}
