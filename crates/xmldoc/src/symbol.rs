//! Semantic symbols attached to declaration nodes.

use crate::metadata::{MetadataRef, TypeSig};
use serde::{Deserialize, Serialize};

/// What a declaration node refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    Member(MemberSymbol),
    Type(TypeSymbol),
    /// Locals, parameters, namespaces and anything else without a definition
    /// token of its own.
    Other(String),
}

/// A method, field, property or event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSymbol {
    pub name: String,
    /// Missing for compiler-synthesized members that have no row in metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataRef>,
}

/// A type, possibly reached through an instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSymbol {
    Definition(MetadataRef),
    Instantiation {
        generic: Box<TypeSymbol>,
        #[serde(default)]
        arguments: Vec<TypeSig>,
    },
    /// A reference the decompiler could not resolve to a definition.
    Unresolved(String),
}

impl TypeSymbol {
    /// The definition that carries documentation, looking through any number
    /// of instantiations.
    pub fn definition(&self) -> Option<&MetadataRef> {
        match self {
            TypeSymbol::Definition(def) => Some(def),
            TypeSymbol::Instantiation { generic, .. } => generic.definition(),
            TypeSymbol::Unresolved(_) => None,
        }
    }
}
