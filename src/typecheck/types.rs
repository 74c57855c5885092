//! Type terms.
use std::fmt;

/// Identity of an as-yet-unresolved type variable.
///
/// The Python original gives every `UnknownType` object identity equality
/// (`is`-based); Rust has no object identity to borrow, so each fresh
/// unknown is instead minted a unique, monotonically increasing id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnknownId(u64);

/// Mints fresh, distinct `UnknownId`s for the lifetime of a single type-check.
#[derive(Debug, Default)]
pub struct UnknownIdGen(u64);

impl UnknownIdGen {
    pub fn fresh(&mut self) -> UnknownId {
        let id = UnknownId(self.0);
        self.0 += 1;
        id
    }
}

/// A type term: either a concrete type, an unresolved variable, or a
/// structural type built from other type terms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Unknown(UnknownId),
    Int,
    Float,
    Bool,
    List(Box<Type>),
    Function(Vec<Type>, Box<Type>),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown(UnknownId(id)) => write!(f, "?{id}"),
            Type::Int => write!(f, "int"),
            Type::Float => write!(f, "float"),
            Type::Bool => write!(f, "bool"),
            Type::List(elem) => write!(f, "(list {elem})"),
            Type::Function(params, ret) => {
                write!(f, "(func (")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") {ret})")
            }
        }
    }
}
