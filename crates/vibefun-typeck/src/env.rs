//! The type environment: value bindings, type definitions, and variant
//! constructors.
//!
//! Environments are immutable from the inference engine's point of view:
//! every extension clones the underlying maps. Inference extends the
//! environment at lambda parameters, let bindings, and match arms, and the
//! original environment stays valid for sibling scopes.

use rustc_hash::FxHashMap;

use vibefun_common::Location;

use crate::ty::{Scheme, TyVar, Type};

/// A value binding: an ordinary definition, an external, or a group of
/// overloaded externals sharing one name.
#[derive(Clone, Debug)]
pub enum ValueBinding {
    Value {
        scheme: Scheme,
        loc: Location,
    },
    External {
        scheme: Scheme,
        js_name: String,
        from: Option<String>,
        loc: Location,
    },
    ExternalOverload {
        overloads: Vec<ExternalSig>,
        loc: Location,
    },
}

impl ValueBinding {
    /// The scheme to instantiate for a plain variable reference.
    ///
    /// For an overload group this is the first signature; call sites that
    /// can narrow by arity do so through [`ValueBinding::overloads`].
    pub fn scheme(&self) -> &Scheme {
        match self {
            ValueBinding::Value { scheme, .. } => scheme,
            ValueBinding::External { scheme, .. } => scheme,
            ValueBinding::ExternalOverload { overloads, .. } => &overloads[0].scheme,
        }
    }
}

/// One signature of an overloaded external.
#[derive(Clone, Debug)]
pub struct ExternalSig {
    pub scheme: Scheme,
    pub js_name: String,
    pub from: Option<String>,
    pub loc: Location,
}

/// A registered type definition.
#[derive(Clone, Debug)]
pub struct TypeBinding {
    /// Number of type parameters.
    pub arity: usize,
    pub kind: TypeDefKind,
    pub loc: Location,
}

/// The body of a type definition. Parameterized bodies reference their
/// parameters as `TyVar(0..arity)`; instantiation remaps them to fresh
/// variables, so the placeholder IDs never touch the unification table.
#[derive(Clone, Debug)]
pub enum TypeDefKind {
    /// A primitive like `Int`, or an `external type` with no visible body.
    Opaque,
    /// `type Name<params> = T`
    Alias { params: Vec<TyVar>, body: Type },
    /// `type Name<params> = { f: T, ... }`
    RecordDef {
        params: Vec<TyVar>,
        fields: Vec<(String, Type)>,
    },
    /// `type Name<params> = C1(T..) | C2 | ...`
    VariantDef {
        params: Vec<TyVar>,
        ctors: Vec<(String, Vec<Type>)>,
    },
}

/// A variant constructor, indexed by constructor name for pattern and
/// construction sites.
#[derive(Clone, Debug)]
pub struct CtorBinding {
    /// The declared variant type this constructor belongs to.
    pub type_name: String,
    /// Parameter placeholders shared with the constructor's arg types.
    pub params: Vec<TyVar>,
    /// Argument types, referencing `params`.
    pub arg_types: Vec<Type>,
    pub loc: Location,
}

/// The environment threaded through inference.
#[derive(Clone, Debug, Default)]
pub struct TypeEnv {
    values: FxHashMap<String, ValueBinding>,
    types: FxHashMap<String, TypeBinding>,
    ctors: FxHashMap<String, CtorBinding>,
}

impl TypeEnv {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Values ──────────────────────────────────────────────────────────

    pub fn lookup_value(&self, name: &str) -> Option<&ValueBinding> {
        self.values.get(name)
    }

    /// Extend with a value binding, returning the extended environment.
    pub fn with_value(&self, name: impl Into<String>, binding: ValueBinding) -> TypeEnv {
        let mut next = self.clone();
        next.values.insert(name.into(), binding);
        next
    }

    /// In-place insertion, for building the base environment.
    pub fn insert_value(&mut self, name: impl Into<String>, binding: ValueBinding) {
        self.values.insert(name.into(), binding);
    }

    pub fn value_names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(|k| k.as_str())
    }

    // ── Types ───────────────────────────────────────────────────────────

    pub fn lookup_type(&self, name: &str) -> Option<&TypeBinding> {
        self.types.get(name)
    }

    pub fn insert_type(&mut self, name: impl Into<String>, binding: TypeBinding) {
        self.types.insert(name.into(), binding);
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(|k| k.as_str())
    }

    // ── Constructors ────────────────────────────────────────────────────

    pub fn lookup_ctor(&self, name: &str) -> Option<&CtorBinding> {
        self.ctors.get(name)
    }

    pub fn insert_ctor(&mut self, name: impl Into<String>, binding: CtorBinding) {
        self.ctors.insert(name.into(), binding);
    }

    pub fn ctor_names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(|k| k.as_str())
    }

    /// The constructor table of a declared variant type, with its
    /// parameter placeholders.
    pub fn variant_ctors(&self, type_name: &str) -> Option<(&[TyVar], &[(String, Vec<Type>)])> {
        match self.lookup_type(type_name) {
            Some(TypeBinding {
                kind: TypeDefKind::VariantDef { params, ctors },
                ..
            }) => Some((params.as_slice(), ctors.as_slice())),
            _ => None,
        }
    }
}
