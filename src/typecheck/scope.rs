//! Lexical scope for the type checker.
//!
//! Unlike the teacher's `typechecker::typescope::TypeScope`, which shares
//! frames behind `Rc<RefCell<_>>`, `Scope` is a plain, cheaply cloned map.
//! `lambda`/`let` must see their own copy that mutations never leak out of —
//! entering a nested scope clones it, and `set` inside never affects the
//! enclosing scope — which a shared frame stack cannot express directly.
//! This mirrors `lispyc.typechecker.checker.TypeChecker._create_scope`, which
//! uses `copy.copy(scope)` for exactly the same reason.
use std::collections::HashMap;

use crate::typecheck::types::Type;

#[derive(Debug, Clone, Default)]
pub struct Scope(HashMap<String, Type>);

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, ty: Type) {
        self.0.insert(name.into(), ty);
    }

    pub fn lookup(&self, name: &str) -> Option<&Type> {
        self.0.get(name)
    }
}
