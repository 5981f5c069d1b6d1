//! Match exhaustiveness and reachability analysis.
//!
//! Implements the usefulness algorithm over a pattern matrix: a pattern
//! vector is useful w.r.t. a matrix iff some value matches it and no row
//! of the matrix. Exhaustiveness asks whether the wildcard vector is
//! useful (a witness is a missing case); reachability asks whether each
//! row is useful against the rows above it.
//!
//! Guards are refutable: a guarded arm contributes nothing to coverage.

use crate::ty::Type;

/// Abstract pattern, decoupled from AST details.
#[derive(Clone, Debug, PartialEq)]
pub enum Pat {
    /// Wildcards and variable bindings.
    Wild,
    /// Variant constructor pattern.
    Ctor { name: String, args: Vec<Pat> },
    Bool(bool),
    Int(i64),
    /// Keyed by formatted text so `1.0` and `1.00` stay distinct.
    Float(String),
    Str(String),
    Unit,
    Tuple(Vec<Pat>),
    /// Field subpatterns; fields absent from the pattern match anything.
    Record(Vec<(String, Pat)>),
}

impl std::fmt::Display for Pat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pat::Wild => write!(f, "_"),
            Pat::Ctor { name, args } => {
                write!(f, "{name}")?;
                if !args.is_empty() {
                    write!(f, "(")?;
                    for (i, a) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{a}")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
            Pat::Bool(b) => write!(f, "{b}"),
            Pat::Int(i) => write!(f, "{i}"),
            Pat::Float(s) => write!(f, "{s}"),
            Pat::Str(s) => write!(f, "{s:?}"),
            Pat::Unit => write!(f, "null"),
            Pat::Tuple(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Pat::Record(fields) => {
                write!(f, "{{ ")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// The constructor universe of a column's type.
#[derive(Clone, Debug)]
pub enum TypeShape {
    /// A declared variant type with its full constructor table, argument
    /// types already instantiated at the scrutinee's type arguments.
    Variant { ctors: Vec<CtorSig> },
    Bool,
    Unit,
    Tuple(Vec<Type>),
    Record(Vec<(String, Type)>),
    /// Int, Float, String, functions, refs, unresolved variables:
    /// no finite signature, only a wildcard completes them.
    Open,
}

/// One constructor of a variant type.
#[derive(Clone, Debug)]
pub struct CtorSig {
    pub name: String,
    pub arg_types: Vec<Type>,
}

/// Supplies type shapes for columns. Implemented by the inference engine
/// over its environment and unification state.
pub trait TypeInfoSource {
    fn shape_of(&mut self, ty: &Type) -> TypeShape;
}

/// Result of analyzing one match expression.
#[derive(Debug, Default)]
pub struct MatchAnalysis {
    /// Witnesses of uncovered values, rendered as pattern text.
    pub missing: Vec<String>,
    /// Indices of arms no value can reach.
    pub unreachable: Vec<usize>,
}

/// Analyze a single-scrutinee match. `rows` pairs each arm's pattern with
/// whether it carries a guard.
pub fn analyze_match(
    rows: &[(Pat, bool)],
    scrutinee: &Type,
    src: &mut dyn TypeInfoSource,
) -> MatchAnalysis {
    let mut analysis = MatchAnalysis::default();

    // Coverage: only unguarded rows count, since a guard may be false.
    let mut coverage: Vec<Vec<Pat>> = rows
        .iter()
        .filter(|(_, guarded)| !guarded)
        .map(|(p, _)| vec![p.clone()])
        .collect();

    // Collect distinct witnesses, feeding each back as a covered row so
    // the next iteration surfaces a different missing case.
    const WITNESS_LIMIT: usize = 16;
    while analysis.missing.len() < WITNESS_LIMIT {
        match useful(&coverage, &[Pat::Wild], &[scrutinee.clone()], src) {
            Some(witness) => {
                let pat = witness.into_iter().next().unwrap_or(Pat::Wild);
                analysis.missing.push(pat.to_string());
                coverage.push(vec![pat]);
            }
            None => break,
        }
    }

    // Reachability: a row is unreachable when it is not useful against
    // the unguarded rows above it. Guarded rows above are skipped -- they
    // may fail at runtime, so they never make a later arm unreachable.
    for (i, (pat, _)) in rows.iter().enumerate() {
        let above: Vec<Vec<Pat>> = rows[..i]
            .iter()
            .filter(|(_, guarded)| !guarded)
            .map(|(p, _)| vec![p.clone()])
            .collect();
        if useful(&above, &[pat.clone()], &[scrutinee.clone()], src).is_none() {
            analysis.unreachable.push(i);
        }
    }

    analysis
}

/// Head-constructor key for specialization.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Head {
    Ctor(String),
    Bool(bool),
    Int(i64),
    Float(String),
    Str(String),
    Unit,
    Tuple,
    Record,
}

fn head_of(pat: &Pat) -> Option<Head> {
    match pat {
        Pat::Wild => None,
        Pat::Ctor { name, .. } => Some(Head::Ctor(name.clone())),
        Pat::Bool(b) => Some(Head::Bool(*b)),
        Pat::Int(i) => Some(Head::Int(*i)),
        Pat::Float(s) => Some(Head::Float(s.clone())),
        Pat::Str(s) => Some(Head::Str(s.clone())),
        Pat::Unit => Some(Head::Unit),
        Pat::Tuple(_) => Some(Head::Tuple),
        Pat::Record(_) => Some(Head::Record),
    }
}

/// Sub-column types a head constructor introduces.
fn head_arg_types(head: &Head, shape: &TypeShape) -> Vec<Type> {
    match (head, shape) {
        (Head::Ctor(name), TypeShape::Variant { ctors }) => ctors
            .iter()
            .find(|c| &c.name == name)
            .map(|c| c.arg_types.clone())
            .unwrap_or_default(),
        (Head::Tuple, TypeShape::Tuple(elems)) => elems.clone(),
        (Head::Record, TypeShape::Record(fields)) => {
            fields.iter().map(|(_, t)| t.clone()).collect()
        }
        _ => Vec::new(),
    }
}

/// Expand a pattern into the sub-patterns of `head`, or `None` if the
/// pattern does not match that head. Wildcards expand to wildcards.
fn specialize_pat(pat: &Pat, head: &Head, shape: &TypeShape) -> Option<Vec<Pat>> {
    let arity = head_arg_types(head, shape).len();
    match pat {
        Pat::Wild => Some(vec![Pat::Wild; arity]),
        Pat::Ctor { name, args } => match head {
            Head::Ctor(h) if h == name => Some(args.clone()),
            _ => None,
        },
        Pat::Bool(b) => (*head == Head::Bool(*b)).then(Vec::new),
        Pat::Int(i) => (*head == Head::Int(*i)).then(Vec::new),
        Pat::Float(s) => (*head == Head::Float(s.clone())).then(Vec::new),
        Pat::Str(s) => (*head == Head::Str(s.clone())).then(Vec::new),
        Pat::Unit => (*head == Head::Unit).then(Vec::new),
        Pat::Tuple(elems) => match head {
            Head::Tuple => Some(elems.clone()),
            _ => None,
        },
        Pat::Record(fields) => match (head, shape) {
            (Head::Record, TypeShape::Record(type_fields)) => Some(
                type_fields
                    .iter()
                    .map(|(name, _)| {
                        fields
                            .iter()
                            .find(|(k, _)| k == name)
                            .map(|(_, p)| p.clone())
                            .unwrap_or(Pat::Wild)
                    })
                    .collect(),
            ),
            _ => None,
        },
    }
}

/// Rebuild a witness pattern from a head and its sub-witnesses.
fn rebuild(head: &Head, mut args: Vec<Pat>, shape: &TypeShape) -> Pat {
    match head {
        Head::Ctor(name) => Pat::Ctor {
            name: name.clone(),
            args,
        },
        Head::Bool(b) => Pat::Bool(*b),
        Head::Int(i) => Pat::Int(*i),
        Head::Float(s) => Pat::Float(s.clone()),
        Head::Str(s) => Pat::Str(s.clone()),
        Head::Unit => Pat::Unit,
        Head::Tuple => Pat::Tuple(args),
        Head::Record => {
            let names: Vec<String> = match shape {
                TypeShape::Record(fields) => fields.iter().map(|(n, _)| n.clone()).collect(),
                _ => Vec::new(),
            };
            let fields = names
                .into_iter()
                .map(|n| {
                    let p = if args.is_empty() { Pat::Wild } else { args.remove(0) };
                    (n, p)
                })
                .collect();
            Pat::Record(fields)
        }
    }
}

/// The complete signature of a shape, or `None` for open types.
fn complete_signature(shape: &TypeShape) -> Option<Vec<Head>> {
    match shape {
        TypeShape::Variant { ctors } => {
            Some(ctors.iter().map(|c| Head::Ctor(c.name.clone())).collect())
        }
        TypeShape::Bool => Some(vec![Head::Bool(false), Head::Bool(true)]),
        TypeShape::Unit => Some(vec![Head::Unit]),
        TypeShape::Tuple(_) => Some(vec![Head::Tuple]),
        TypeShape::Record(_) => Some(vec![Head::Record]),
        TypeShape::Open => None,
    }
}

/// Is the pattern vector `q` useful with respect to `matrix`? Returns a
/// witness vector matching `q` but no row, or `None` if `q` adds nothing.
fn useful(
    matrix: &[Vec<Pat>],
    q: &[Pat],
    types: &[Type],
    src: &mut dyn TypeInfoSource,
) -> Option<Vec<Pat>> {
    if q.is_empty() {
        return if matrix.is_empty() { Some(Vec::new()) } else { None };
    }

    let shape = src.shape_of(&types[0]);

    match head_of(&q[0]) {
        // Constructed head: specialize on it.
        Some(head) => {
            let arg_types = head_arg_types(&head, &shape);
            let spec_matrix = specialize_matrix(matrix, &head, &shape);
            let mut spec_q = specialize_pat(&q[0], &head, &shape)
                .expect("q's own head always specializes");
            spec_q.extend_from_slice(&q[1..]);
            let mut spec_types = arg_types.clone();
            spec_types.extend_from_slice(&types[1..]);
            useful(&spec_matrix, &spec_q, &spec_types, src).map(|mut witness| {
                let args: Vec<Pat> = witness.drain(..arg_types.len()).collect();
                let mut result = vec![rebuild(&head, args, &shape)];
                result.extend(witness);
                result
            })
        }
        // Wildcard head.
        None => {
            let used_heads: Vec<Head> = {
                let mut heads = Vec::new();
                for row in matrix {
                    if let Some(h) = head_of(&row[0]) {
                        if !heads.contains(&h) {
                            heads.push(h);
                        }
                    }
                }
                heads
            };

            let signature = complete_signature(&shape);
            let is_complete = match &signature {
                Some(sig) => sig.iter().all(|h| used_heads.contains(h)),
                None => false,
            };

            if is_complete {
                // Every constructor is covered at the head; usefulness
                // must come from some constructor's sub-patterns.
                for head in signature.unwrap() {
                    let arg_types = head_arg_types(&head, &shape);
                    let spec_matrix = specialize_matrix(matrix, &head, &shape);
                    let mut spec_q = vec![Pat::Wild; arg_types.len()];
                    spec_q.extend_from_slice(&q[1..]);
                    let mut spec_types = arg_types.clone();
                    spec_types.extend_from_slice(&types[1..]);
                    if let Some(mut witness) = useful(&spec_matrix, &spec_q, &spec_types, src) {
                        let args: Vec<Pat> = witness.drain(..arg_types.len()).collect();
                        let mut result = vec![rebuild(&head, args, &shape)];
                        result.extend(witness);
                        return Some(result);
                    }
                }
                None
            } else {
                // Some constructor is unused (or the type is open): the
                // default matrix decides, and the witness head is any
                // missing constructor.
                let default_matrix: Vec<Vec<Pat>> = matrix
                    .iter()
                    .filter(|row| head_of(&row[0]).is_none())
                    .map(|row| row[1..].to_vec())
                    .collect();
                useful(&default_matrix, &q[1..], &types[1..], src).map(|witness| {
                    let head_pat = match &signature {
                        Some(sig) => sig
                            .iter()
                            .find(|h| !used_heads.contains(h))
                            .map(|h| {
                                let arity = head_arg_types(h, &shape).len();
                                rebuild(h, vec![Pat::Wild; arity], &shape)
                            })
                            .unwrap_or(Pat::Wild),
                        None => Pat::Wild,
                    };
                    let mut result = vec![head_pat];
                    result.extend(witness);
                    result
                })
            }
        }
    }
}

fn specialize_matrix(matrix: &[Vec<Pat>], head: &Head, shape: &TypeShape) -> Vec<Vec<Pat>> {
    matrix
        .iter()
        .filter_map(|row| {
            specialize_pat(&row[0], head, shape).map(|mut expanded| {
                expanded.extend_from_slice(&row[1..]);
                expanded
            })
        })
        .collect()
}
