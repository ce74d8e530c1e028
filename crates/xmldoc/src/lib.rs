//! xmldoc — attach XML documentation to decompiled syntax trees.
//!
//! - [`metadata`] / [`symbol`]: what a declaration stands for
//! - [`key`]: canonical `T:`/`M:`/`F:`/`P:`/`E:` documentation keys
//! - [`store`] / [`loader`]: per-module documentation files, cached once per module
//! - [`markup`]: well-formedness checking and line reduction
//! - [`tree`]: the syntax tree the comments are spliced into
//! - [`attach`]: the transform tying it all together

pub mod attach;
pub mod error;
pub mod key;
pub mod loader;
pub mod markup;
pub mod metadata;
pub mod resolve;
pub mod store;
pub mod symbol;
pub mod tree;

pub use attach::{attach, AttachReport, DocAttacher};
pub use error::{DocFailure, MarkupError, MarkupFault, StoreError, TreeError};
pub use loader::{DocCache, DocLoader, DocProvider};
pub use metadata::{MetadataDef, MetadataRef, ModuleId, TypeName, TypeSig};
pub use resolve::{resolve, MemberIdentity};
pub use store::DocumentationStore;
pub use symbol::{MemberSymbol, Symbol, TypeSymbol};
pub use tree::{Comment, CommentKind, DeclKind, Declaration, NodeId, NodeKind, SyntaxTree};
