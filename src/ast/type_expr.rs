//! Type syntax.
//!
//! Parameter annotations translate directly into the type-term language
//! (`crate::typecheck::types::Type`) used by the checker; there is no
//! separate "type AST" to build and then lower, since annotations never
//! contain unknowns.
use crate::error::TypeSyntaxError;
use crate::sexpr::{SExpr, SExprKind};
use crate::typecheck::types::Type;

const TYPE_TEMPLATE: &str =
    "'int' | 'float' | 'bool' | '(' 'list' T ')' | '(' 'func' '(' T* ')' R ')'";

pub fn parse_type(sexpr: &SExpr) -> Result<Type, TypeSyntaxError> {
    let shape = || TypeSyntaxError {
        template: TYPE_TEMPLATE,
        span: sexpr.span,
    };

    match &sexpr.kind {
        SExprKind::Atom(_) => match sexpr.as_ident() {
            Some("int") => Ok(Type::Int),
            Some("float") => Ok(Type::Float),
            Some("bool") => Ok(Type::Bool),
            _ => Err(shape()),
        },
        SExprKind::List(items) => match items.first().and_then(SExpr::as_ident) {
            Some("list") => {
                let [_, elem] = items else { return Err(shape()) };
                Ok(Type::List(Box::new(parse_type(elem)?)))
            }
            Some("func") => {
                let [_, params_sexpr, ret_sexpr] = items else {
                    return Err(shape());
                };
                let param_sexprs = params_sexpr.as_list().ok_or_else(shape)?;
                let params = param_sexprs
                    .iter()
                    .map(parse_type)
                    .collect::<Result<Vec<_>, _>>()?;
                let ret = parse_type(ret_sexpr)?;
                Ok(Type::Function(params, Box::new(ret)))
            }
            _ => Err(shape()),
        },
    }
}
