//! Top-level declarations and modules.

use vibefun_common::Location;

use crate::expr::{Expr, RecBinding};
use crate::ty::TypeExpr;

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub kind: DeclKind,
    pub loc: Location,
}

impl Declaration {
    pub fn new(kind: DeclKind, loc: Location) -> Declaration {
        Declaration { kind, loc }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DeclKind {
    /// `let [mutable] [rec] name = value`
    Let {
        name: String,
        mutable: bool,
        recursive: bool,
        value: Expr,
    },
    /// `let rec a = .. and b = ..`
    LetGroup { bindings: Vec<RecBinding> },
    /// `type Name<params> = ...`
    Type(TypeDecl),
    /// `external type Name<params>` -- an opaque host type.
    ExternalType { name: String, params: Vec<String> },
    /// `external name: T = "jsName" [from "module"]`
    External {
        name: String,
        signature: TypeExpr,
        js_name: String,
        from: Option<String>,
    },
    Import(ImportDecl),
    /// `export { a, b }`
    Export { names: Vec<String> },
    /// `export { a, b } from "./m"`
    ReExport { source: String, items: Vec<ImportItem> },
}

/// A type declaration: alias, record, or variant. Variant declarations may
/// be recursive or mutually recursive with other declarations.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: String,
    /// Type parameter names, e.g. `["a"]` for `Option<a>`.
    pub params: Vec<String>,
    pub body: TypeDeclBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDeclBody {
    Alias(TypeExpr),
    Record(Vec<(String, TypeExpr)>),
    /// Constructors with their argument types.
    Variant(Vec<(String, Vec<TypeExpr>)>),
}

/// `import { a, type T, b as c } from "./m"` or a side-effect-only
/// `import "./m"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// The import specifier as written.
    pub source: String,
    pub items: Vec<ImportItem>,
    /// True for `import "./m"` with no item list.
    pub side_effect_only: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportItem {
    pub name: String,
    pub alias: Option<String>,
    /// True for `type` imports; an edge is type-only iff every item is.
    pub type_only: bool,
}

impl ImportItem {
    /// The name this item binds locally.
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A parsed module: a sequence of declarations plus its location.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub declarations: Vec<Declaration>,
    pub loc: Location,
}

impl Module {
    pub fn new(declarations: Vec<Declaration>, loc: Location) -> Module {
        Module { declarations, loc }
    }

    /// All import declarations, in source order.
    pub fn imports(&self) -> impl Iterator<Item = (&ImportDecl, &Location)> {
        self.declarations.iter().filter_map(|d| match &d.kind {
            DeclKind::Import(i) => Some((i, &d.loc)),
            _ => None,
        })
    }

    /// All re-export declarations, in source order.
    pub fn reexports(&self) -> impl Iterator<Item = (&str, &[ImportItem], &Location)> {
        self.declarations.iter().filter_map(|d| match &d.kind {
            DeclKind::ReExport { source, items } => {
                Some((source.as_str(), items.as_slice(), &d.loc))
            }
            _ => None,
        })
    }
}
