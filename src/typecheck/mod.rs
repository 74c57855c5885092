//! Hindley-Milner-style type checking (components E and F).
pub mod checker;
pub mod scope;
pub mod types;
pub mod unifier;

pub use checker::TypeChecker;
pub use types::Type;

use crate::ast::form::Form;
use crate::error::LispyError;

/// Type-checks a parsed program, returning the resolved type of each
/// top-level form in order.
pub fn check_forms(forms: &[Form]) -> Result<Vec<Type>, LispyError> {
    TypeChecker::new().check_program(forms)
}
