//! Declaration → member identity.

use crate::key;
use crate::metadata::{MetadataRef, ModuleId};
use crate::symbol::Symbol;
use crate::tree::Declaration;

/// Module-scoped identity of the definition behind a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberIdentity(MetadataRef);

impl MemberIdentity {
    pub fn metadata(&self) -> &MetadataRef {
        &self.0
    }

    pub fn module(&self) -> &ModuleId {
        self.0.module()
    }

    /// Canonical documentation key, written into `buf`.
    pub fn key<'a>(&self, buf: &'a mut String) -> &'a str {
        key::key(self.0.def(), buf)
    }
}

/// Identity of the member or type definition `decl` stands for.
///
/// Types resolve through instantiations to their definition. Declarations
/// without a symbol, with an `Other` symbol, or whose reference never
/// resolved to metadata give `None`.
pub fn resolve(decl: &Declaration) -> Option<MemberIdentity> {
    let metadata = match decl.symbol.as_ref()? {
        Symbol::Member(member) => member.metadata.as_ref()?,
        Symbol::Type(ty) => ty.definition()?,
        Symbol::Other(_) => return None,
    };
    Some(MemberIdentity(metadata.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{MetadataDef, TypeName, TypeSig};
    use crate::symbol::{MemberSymbol, TypeSymbol};
    use crate::tree::DeclKind;

    fn decl(kind: DeclKind, symbol: Option<Symbol>) -> Declaration {
        Declaration {
            kind,
            name: "x".into(),
            symbol,
        }
    }

    fn widget() -> MetadataRef {
        MetadataRef::new(MetadataDef::Type {
            module: ModuleId::new("Acme.dll"),
            name: TypeName::new("Acme", "Widget").generic(1),
        })
    }

    fn reset() -> MetadataRef {
        MetadataRef::new(MetadataDef::Method {
            module: ModuleId::new("Acme.dll"),
            declaring_type: TypeName::new("Acme", "Widget").generic(1),
            name: "Reset".into(),
            generic_arity: 0,
            parameters: vec![],
            return_type: None,
        })
    }

    #[test]
    fn member_resolves_to_its_metadata() {
        let d = decl(
            DeclKind::Method,
            Some(Symbol::Member(MemberSymbol {
                name: "Reset".into(),
                metadata: Some(reset()),
            })),
        );
        let id = resolve(&d).unwrap();
        assert_eq!(id.metadata(), &reset());
        assert_eq!(id.module(), &ModuleId::new("Acme.dll"));
        let mut buf = String::new();
        assert_eq!(id.key(&mut buf), "M:Acme.Widget`1.Reset");
    }

    #[test]
    fn instantiated_type_resolves_to_definition() {
        let d = decl(
            DeclKind::Type,
            Some(Symbol::Type(TypeSymbol::Instantiation {
                generic: Box::new(TypeSymbol::Definition(widget())),
                arguments: vec![TypeSig::named("System", "Int32")],
            })),
        );
        let direct = decl(DeclKind::Type, Some(Symbol::Type(TypeSymbol::Definition(widget()))));
        assert_eq!(resolve(&d), resolve(&direct));
        let mut buf = String::new();
        assert_eq!(resolve(&d).unwrap().key(&mut buf), "T:Acme.Widget`1");
    }

    #[test]
    fn unresolvable_declarations_are_skipped() {
        assert!(resolve(&decl(DeclKind::Method, None)).is_none());
        assert!(resolve(&decl(DeclKind::Field, Some(Symbol::Other("local".into())))).is_none());
        assert!(resolve(&decl(
            DeclKind::Method,
            Some(Symbol::Member(MemberSymbol {
                name: "<Clone>$".into(),
                metadata: None
            }))
        ))
        .is_none());
        assert!(resolve(&decl(
            DeclKind::Type,
            Some(Symbol::Type(TypeSymbol::Unresolved("Missing".into())))
        ))
        .is_none());
    }
}
