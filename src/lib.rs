//! `lispy`: a front-end for a small statically-typed Lisp-like language.
//!
//! The pipeline is a straight line: source text is lexed and parsed into a
//! uniform s-expression tree ([`sexpr`]), which is then specialized into an
//! AST of form terms ([`ast`]), which is finally type-checked with a
//! Hindley-Milner-style inference pass over a union-find unifier
//! ([`typecheck`]). There is no evaluator or code generator here; this crate
//! only answers "does this program parse, and if so, what are its types?"
extern crate pest_derive;

pub mod ast;
pub mod error;
pub mod sexpr;
pub mod span;
pub mod typecheck;

use error::LispyError;

/// Parses `source` all the way down to AST form terms.
pub fn parse(source: &str) -> Result<Vec<ast::Form>, LispyError> {
    let program = sexpr::parse_program(source)?;
    ast::parse_program(&program)
}

/// Parses and type-checks `source`, returning the resolved type of each
/// top-level form in program order.
pub fn check(source: &str) -> Result<Vec<typecheck::Type>, LispyError> {
    let forms = parse(source)?;
    typecheck::check_forms(&forms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use typecheck::Type;

    #[test]
    fn parses_and_checks_a_homogeneous_list() {
        let types = check("(list 1 2 3)").unwrap();
        assert_eq!(types, vec![Type::List(Box::new(Type::Int))]);
    }

    #[test]
    fn rejects_heterogeneous_list() {
        assert!(check("(list 1 false)").is_err());
    }

    #[test]
    fn checks_a_lambda() {
        let types = check("(lambda ((x int) (y float)) (list 1 2 3))").unwrap();
        assert_eq!(
            types,
            vec![Type::Function(
                vec![Type::Int, Type::Float],
                Box::new(Type::List(Box::new(Type::Int)))
            )]
        );
    }

    #[test]
    fn rejects_set_of_reserved_name() {
        assert!(check("(set lambda 1)").is_err());
    }

    #[test]
    fn rejects_unbound_variable() {
        assert!(check("x").is_err());
    }

    #[test]
    fn let_bindings_do_not_leak_into_outer_scope() {
        // `a` is bound only inside the `let`; referencing it afterwards is
        // an unbound-name error.
        assert!(check("(progn (let ((a 1)) a) a)").is_err());
    }
}
