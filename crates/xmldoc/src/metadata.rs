//! Metadata references: the binary-level identity behind a symbol.
//!
//! These are the parts of a member definition that the documentation key
//! grammar needs, nothing more. Everything here is immutable once built;
//! [`MetadataRef`] is a cheap shared handle so that symbols and the attacher
//! can hold the same definition without copying it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// The module (assembly file) a definition lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId {
    /// Simple module name, e.g. `Acme.Core.dll`.
    pub name: String,
    /// Where the module was loaded from, if it came from disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,
}

impl ModuleId {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: impl Into<PathBuf>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Module name without its file extension: `Acme.Core.dll` → `Acme.Core`.
    pub fn stem(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((stem, ext))
                if ext.eq_ignore_ascii_case("dll")
                    || ext.eq_ignore_ascii_case("exe")
                    || ext.eq_ignore_ascii_case("winmd")
                    || ext.eq_ignore_ascii_case("netmodule") =>
            {
                stem
            }
            _ => &self.name,
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A type definition name. Nested types point at their declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeName {
    #[serde(default)]
    pub namespace: String,
    /// Name without any generic arity suffix.
    pub name: String,
    /// Number of generic parameters introduced by this type itself.
    #[serde(default)]
    pub generic_arity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declaring: Option<Box<TypeName>>,
}

impl TypeName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            generic_arity: 0,
            declaring: None,
        }
    }

    pub fn generic(mut self, arity: u32) -> Self {
        self.generic_arity = arity;
        self
    }

    pub fn nested_in(mut self, declaring: TypeName) -> Self {
        self.declaring = Some(Box::new(declaring));
        self
    }

    /// Outermost type's namespace.
    pub fn root_namespace(&self) -> &str {
        match &self.declaring {
            Some(outer) => outer.root_namespace(),
            None => &self.namespace,
        }
    }

    /// The chain from outermost declaring type down to `self`.
    pub fn chain(&self) -> Vec<&TypeName> {
        let mut chain = vec![self];
        let mut cur = self;
        while let Some(outer) = cur.declaring.as_deref() {
            chain.push(outer);
            cur = outer;
        }
        chain.reverse();
        chain
    }
}

/// A type as it appears in a member signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "sig", rename_all = "snake_case")]
pub enum TypeSig {
    Named {
        #[serde(flatten)]
        name: TypeName,
        /// Instantiation arguments for the whole nesting chain, outermost first.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        arguments: Vec<TypeSig>,
    },
    Array {
        element: Box<TypeSig>,
        #[serde(default = "default_rank")]
        rank: u32,
    },
    Pointer {
        element: Box<TypeSig>,
    },
    ByRef {
        element: Box<TypeSig>,
    },
    /// Generic parameter of the declaring type, by position.
    TypeParam {
        index: u32,
    },
    /// Generic parameter of the method, by position.
    MethodParam {
        index: u32,
    },
}

fn default_rank() -> u32 {
    1
}

impl TypeSig {
    pub fn named(namespace: &str, name: &str) -> Self {
        TypeSig::Named {
            name: TypeName::new(namespace, name),
            arguments: Vec::new(),
        }
    }

    pub fn array_of(element: TypeSig, rank: u32) -> Self {
        TypeSig::Array {
            element: Box::new(element),
            rank,
        }
    }
}

/// A member or type definition as recorded in module metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MetadataDef {
    Type {
        module: ModuleId,
        #[serde(flatten)]
        name: TypeName,
    },
    Method {
        module: ModuleId,
        declaring_type: TypeName,
        name: String,
        #[serde(default)]
        generic_arity: u32,
        #[serde(default)]
        parameters: Vec<TypeSig>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        return_type: Option<TypeSig>,
    },
    Field {
        module: ModuleId,
        declaring_type: TypeName,
        name: String,
    },
    Property {
        module: ModuleId,
        declaring_type: TypeName,
        name: String,
        /// Non-empty for indexers.
        #[serde(default)]
        parameters: Vec<TypeSig>,
    },
    Event {
        module: ModuleId,
        declaring_type: TypeName,
        name: String,
    },
}

impl MetadataDef {
    pub fn module(&self) -> &ModuleId {
        match self {
            MetadataDef::Type { module, .. }
            | MetadataDef::Method { module, .. }
            | MetadataDef::Field { module, .. }
            | MetadataDef::Property { module, .. }
            | MetadataDef::Event { module, .. } => module,
        }
    }
}

/// Shared handle to a [`MetadataDef`].
///
/// Equality is structural: two handles describing the same physical
/// definition compare equal even when they were created independently.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataRef(Arc<MetadataDef>);

impl MetadataRef {
    pub fn new(def: MetadataDef) -> Self {
        Self(Arc::new(def))
    }

    pub fn def(&self) -> &MetadataDef {
        &self.0
    }

    pub fn module(&self) -> &ModuleId {
        self.0.module()
    }
}

impl From<MetadataDef> for MetadataRef {
    fn from(def: MetadataDef) -> Self {
        Self::new(def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn module_stem_strips_known_extensions() {
        assert_eq!(ModuleId::new("Acme.Core.dll").stem(), "Acme.Core");
        assert_eq!(ModuleId::new("tool.EXE").stem(), "tool");
        assert_eq!(ModuleId::new("Acme.Core").stem(), "Acme.Core");
    }

    #[test]
    fn chain_runs_outermost_first() {
        let inner = TypeName::new("", "Inner").nested_in(TypeName::new("Acme", "Outer"));
        let names: Vec<&str> = inner.chain().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Outer", "Inner"]);
        assert_eq!(inner.root_namespace(), "Acme");
    }

    #[test]
    fn independent_refs_compare_equal() {
        let make = || {
            MetadataRef::new(MetadataDef::Field {
                module: ModuleId::new("a.dll"),
                declaring_type: TypeName::new("N", "T"),
                name: "f".into(),
            })
        };
        assert_eq!(make(), make());
    }

    #[test]
    fn deserializes_tagged_definition() {
        let json = r#"{"kind":"type","module":{"name":"a.dll"},"namespace":"N","name":"Bag","generic_arity":1}"#;
        let def: MetadataDef = serde_json::from_str(json).unwrap();
        match def {
            MetadataDef::Type { name, .. } => {
                assert_eq!(name.name, "Bag");
                assert_eq!(name.generic_arity, 1);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
