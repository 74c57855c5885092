//! Union-find type unifier, grounded on `lispyc`'s `typechecker/unifier.py`
//! `Unifier` class.
use std::collections::HashMap;

use crate::error::TypeCheckError;
use crate::span::Span;
use crate::typecheck::types::{Type, UnknownId};

/// Tracks the current substitution from unknowns to type terms and performs
/// unification against it. One `Unifier` lives for the duration of a single
/// `check_program` call.
#[derive(Debug, Default)]
pub struct Unifier {
    repr: HashMap<UnknownId, Type>,
}

impl Unifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follows the substitution chain for `ty` until it reaches a
    /// non-`Unknown` type or an `Unknown` with no mapping yet.
    pub fn find(&self, ty: Type) -> Type {
        let mut current = ty;
        loop {
            match current {
                Type::Unknown(id) => match self.repr.get(&id) {
                    Some(next) => current = next.clone(),
                    None => return Type::Unknown(id),
                },
                other => return other,
            }
        }
    }

    /// Resolves `ty` fully, recursing into `List`/`Function` structure so
    /// that the result carries no substitutable unknowns that already have
    /// a mapping.
    pub fn resolve(&self, ty: Type) -> Type {
        match self.find(ty) {
            Type::List(elem) => Type::List(Box::new(self.resolve(*elem))),
            Type::Function(params, ret) => Type::Function(
                params.into_iter().map(|p| self.resolve(p)).collect(),
                Box::new(self.resolve(*ret)),
            ),
            other => other,
        }
    }

    /// Unifies `left` and `right`, recording any new substitutions.
    pub fn unify(&mut self, left: Type, right: Type, span: Span) -> Result<(), TypeCheckError> {
        let left = self.find(left);
        let right = self.find(right);

        if left == right {
            return Ok(());
        }

        match (left, right) {
            (Type::Unknown(id), other) | (other, Type::Unknown(id)) => self.bind(id, other, span),
            (Type::List(l), Type::List(r)) => self.unify(*l, *r, span),
            (Type::Function(lp, lr), Type::Function(rp, rr)) => {
                self.unify(*lr, *rr, span)?;
                self.unify_many(lp, rp, span)
            }
            (l, r) => Err(TypeCheckError::unification(
                format!("mismatched types: '{l}' and '{r}'"),
                span,
            )),
        }
    }

    fn unify_many(&mut self, left: Vec<Type>, right: Vec<Type>, span: Span) -> Result<(), TypeCheckError> {
        if left.len() != right.len() {
            return Err(TypeCheckError::unification(
                format!(
                    "mismatched argument counts: expected {} but got {}",
                    left.len(),
                    right.len()
                ),
                span,
            ));
        }
        for (l, r) in left.into_iter().zip(right) {
            self.unify(l, r, span)?;
        }
        Ok(())
    }

    fn bind(&mut self, id: UnknownId, ty: Type, span: Span) -> Result<(), TypeCheckError> {
        if self.occurs(id, &ty) {
            return Err(TypeCheckError::cyclic(span));
        }
        self.repr.insert(id, ty);
        Ok(())
    }

    fn occurs(&self, id: UnknownId, ty: &Type) -> bool {
        match self.find(ty.clone()) {
            Type::Unknown(other) => other == id,
            Type::List(elem) => self.occurs(id, &elem),
            Type::Function(params, ret) => {
                self.occurs(id, &ret) || params.iter().any(|p| self.occurs(id, p))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span() -> Span {
        Span::default()
    }

    #[test]
    fn unifies_equal_primitives() {
        let mut u = Unifier::new();
        assert!(u.unify(Type::Int, Type::Int, span()).is_ok());
    }

    #[test]
    fn rejects_mismatched_primitives() {
        let mut u = Unifier::new();
        assert!(u.unify(Type::Int, Type::Bool, span()).is_err());
    }

    #[test]
    fn binds_unknown_to_concrete_type() {
        let mut u = Unifier::new();
        let mut gen = crate::typecheck::types::UnknownIdGen::default();
        let unknown = Type::Unknown(gen.fresh());
        u.unify(unknown.clone(), Type::Int, span()).unwrap();
        assert_eq!(u.resolve(unknown), Type::Int);
    }

    #[test]
    fn detects_occurs_check_violation() {
        let mut u = Unifier::new();
        let mut gen = crate::typecheck::types::UnknownIdGen::default();
        let a = Type::Unknown(gen.fresh());
        let cyclic = Type::List(Box::new(a.clone()));
        assert!(u.unify(a, cyclic, span()).is_err());
    }

    #[test]
    fn unifies_nested_structural_types() {
        let mut u = Unifier::new();
        let mut gen = crate::typecheck::types::UnknownIdGen::default();
        let elem = Type::Unknown(gen.fresh());
        let left = Type::List(Box::new(elem.clone()));
        let right = Type::List(Box::new(Type::Float));
        u.unify(left, right, span()).unwrap();
        assert_eq!(u.resolve(elem), Type::Float);
    }
}
