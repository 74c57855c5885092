//! AST parser: turns s-expressions into `Form`s, dispatching on a fixed
//! table of special forms.
//!
//! `lispyc.nodes.special` declares one dataclass per special form, each
//! carrying a `name=` class attribute used by its metaclass to register
//! itself into a lookup table at import time. Rust has no metaclasses;
//! the teacher's `lexer::LEX_MAP` shows the idiomatic replacement for "build
//! a lookup table once, at process startup" - a `once_cell::sync::Lazy`
//! over a plain function-pointer map, generalized here to special forms.
use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::ast::form::{ConstantValue, Form, FormKind, Param};
use crate::ast::type_expr::parse_type;
use crate::error::{LispyError, SyntaxError};
use crate::sexpr::{Atom, Program, SExpr, SExprKind};
use crate::span::Span;

// Parameter type annotations can fail with `TypeSyntaxError`, a sibling of
// `SyntaxError` rather than a subtype of it, so every parser in this table
// returns the top-level `LispyError` instead of `SyntaxError` alone.
type SpecialFormParser = fn(&[SExpr], Span) -> Result<Form, LispyError>;

static SPECIAL_FORMS: Lazy<HashMap<&'static str, SpecialFormParser>> = Lazy::new(|| {
    let mut table: HashMap<&'static str, SpecialFormParser> = HashMap::new();
    table.insert("lambda", parse_lambda);
    table.insert("define", parse_define);
    table.insert("list", parse_list);
    table.insert("cons", parse_cons);
    table.insert("car", parse_car);
    table.insert("cdr", parse_cdr);
    table.insert("progn", parse_progn);
    table.insert("set", parse_set);
    table.insert("let", parse_let);
    table.insert("cond", parse_cond);
    table.insert("select", parse_select);
    table
});

/// Whether `name` names one of the fixed special forms. `set`/`let` reuse
/// this to reject `(set lambda 1)`-style rebinding of reserved words.
pub fn is_special_form(name: &str) -> bool {
    SPECIAL_FORMS.contains_key(name)
}

/// Parses every top-level s-expression of `program` into a `Form`.
pub fn parse_program(program: &Program) -> Result<Vec<Form>, LispyError> {
    program.body.iter().map(parse_form).collect()
}

/// Parses a single s-expression into a `Form`.
///
/// A list whose head is a registered special-form name is dispatched to
/// that form's dedicated parser; any other list is a `ComposedForm`
/// (function application).
pub fn parse_form(sexpr: &SExpr) -> Result<Form, LispyError> {
    match &sexpr.kind {
        SExprKind::Atom(Atom::Ident(name)) => Ok(Form::new(FormKind::Variable(name.clone()), sexpr.span)),
        SExprKind::Atom(Atom::Int(v)) => Ok(Form::new(FormKind::Constant(ConstantValue::Int(*v)), sexpr.span)),
        SExprKind::Atom(Atom::Float(v)) => {
            Ok(Form::new(FormKind::Constant(ConstantValue::Float(*v)), sexpr.span))
        }
        SExprKind::Atom(Atom::Bool(v)) => Ok(Form::new(FormKind::Constant(ConstantValue::Bool(*v)), sexpr.span)),
        SExprKind::List(items) => parse_list_form(items, sexpr.span),
    }
}

fn parse_list_form(items: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let Some(head) = items.first() else {
        return Ok(Form::new(FormKind::List(vec![]), span));
    };

    if let Some(name) = head.as_ident() {
        if let Some(parser) = SPECIAL_FORMS.get(name) {
            return parser(&items[1..], span);
        }
    }

    let head_form = parse_form(head)?;
    let args = items[1..].iter().map(parse_form).collect::<Result<Vec<_>, _>>()?;
    Ok(Form::new(
        FormKind::ComposedForm {
            head: Box::new(head_form),
            args,
        },
        span,
    ))
}

const LAMBDA_TEMPLATE: &str = "'(' (name type)* ')' body";

/// Parses a `((name type) ...)` parameter list, shared by `lambda` and
/// `define`. `shape` reports the caller's own template on a malformed list.
fn parse_parameters(
    param_list_sexpr: &SExpr,
    shape: impl Fn() -> SyntaxError + Copy,
) -> Result<Vec<Param>, LispyError> {
    let param_sexprs = param_list_sexpr.as_list().ok_or_else(shape)?;

    let mut parameters = Vec::with_capacity(param_sexprs.len());
    let mut seen = HashSet::new();
    for param_sexpr in param_sexprs {
        let items = param_sexpr.as_list().ok_or_else(shape)?;
        let [name_sexpr, type_sexpr] = items else {
            return Err(shape().into());
        };
        let name = name_sexpr.as_ident().ok_or_else(shape)?.to_owned();
        if !seen.insert(name.clone()) {
            return Err(SyntaxError::duplicate_name(name, param_sexpr.span).into());
        }
        let ty = parse_type(type_sexpr)?;
        parameters.push(Param { name, ty });
    }
    Ok(parameters)
}

fn parse_lambda(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("lambda", LAMBDA_TEMPLATE, span);
    let [param_list_sexpr, body_sexpr] = args else {
        return Err(shape().into());
    };
    let parameters = parse_parameters(param_list_sexpr, shape)?;
    let body = parse_form(body_sexpr)?;
    Ok(Form::new(
        FormKind::Lambda {
            parameters,
            body: Box::new(body),
        },
        span,
    ))
}

const DEFINE_TEMPLATE: &str = "name '(' (name type)* ')' body";

/// `(define name ((p1 t1) ...) body)`, sugar for `(set name (lambda ((p1 t1)
/// ...) body))` whose target name need not already exist — it is the only
/// special form that introduces a new top-level binding.
fn parse_define(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("define", DEFINE_TEMPLATE, span);
    let [name_sexpr, param_list_sexpr, body_sexpr] = args else {
        return Err(shape().into());
    };
    let name = name_sexpr.as_ident().ok_or_else(shape)?.to_owned();
    let parameters = parse_parameters(param_list_sexpr, shape)?;
    let body = parse_form(body_sexpr)?;
    Ok(Form::new(
        FormKind::Define {
            name,
            parameters,
            body: Box::new(body),
        },
        span,
    ))
}

fn parse_list(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let elements = args.iter().map(parse_form).collect::<Result<Vec<_>, _>>()?;
    Ok(Form::new(FormKind::List(elements), span))
}

const CONS_TEMPLATE: &str = "car cdr";

fn parse_cons(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("cons", CONS_TEMPLATE, span);
    let [car_sexpr, cdr_sexpr] = args else {
        return Err(shape().into());
    };
    Ok(Form::new(
        FormKind::Cons {
            car: Box::new(parse_form(car_sexpr)?),
            cdr: Box::new(parse_form(cdr_sexpr)?),
        },
        span,
    ))
}

fn parse_car(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("car", "list", span);
    let [list_sexpr] = args else {
        return Err(shape().into());
    };
    Ok(Form::new(FormKind::Car(Box::new(parse_form(list_sexpr)?)), span))
}

fn parse_cdr(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("cdr", "list", span);
    let [list_sexpr] = args else {
        return Err(shape().into());
    };
    Ok(Form::new(FormKind::Cdr(Box::new(parse_form(list_sexpr)?)), span))
}

fn parse_progn(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("progn", "form form+", span);
    if args.len() < 2 {
        return Err(shape().into());
    }
    let forms = args.iter().map(parse_form).collect::<Result<Vec<_>, _>>()?;
    Ok(Form::new(FormKind::Progn(forms), span))
}

const SET_TEMPLATE: &str = "name form";

fn parse_set(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("set", SET_TEMPLATE, span);
    let [name_sexpr, value_sexpr] = args else {
        return Err(shape().into());
    };
    let name = name_sexpr.as_ident().ok_or_else(shape)?.to_owned();
    Ok(Form::new(
        FormKind::Set {
            name,
            value: Box::new(parse_form(value_sexpr)?),
        },
        span,
    ))
}

const LET_TEMPLATE: &str = "'(' (name value)+ ')' body+";

fn parse_let(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("let", LET_TEMPLATE, span);
    let [binding_list_sexpr, rest @ ..] = args else {
        return Err(shape().into());
    };
    if rest.is_empty() {
        return Err(shape().into());
    }
    let binding_sexprs = binding_list_sexpr.as_list().ok_or_else(shape)?;
    if binding_sexprs.is_empty() {
        return Err(shape().into());
    }

    let mut bindings = Vec::with_capacity(binding_sexprs.len());
    let mut seen = HashSet::new();
    for binding_sexpr in binding_sexprs {
        let items = binding_sexpr.as_list().ok_or_else(shape)?;
        let [name_sexpr, value_sexpr] = items else {
            return Err(shape().into());
        };
        let name = name_sexpr.as_ident().ok_or_else(shape)?.to_owned();
        if !seen.insert(name.clone()) {
            return Err(SyntaxError::duplicate_name(name, binding_sexpr.span).into());
        }
        bindings.push((name, parse_form(value_sexpr)?));
    }

    let body = rest.iter().map(parse_form).collect::<Result<Vec<_>, _>>()?;
    Ok(Form::new(FormKind::Let { bindings, body }, span))
}

fn parse_branches(
    sexprs: &[SExpr],
    shape: impl Fn() -> SyntaxError + Copy,
) -> Result<Vec<(Form, Form)>, LispyError> {
    sexprs
        .iter()
        .map(|branch_sexpr| {
            let items = branch_sexpr.as_list().ok_or_else(shape)?;
            let [predicate_sexpr, value_sexpr] = items else {
                return Err(shape().into());
            };
            Ok((parse_form(predicate_sexpr)?, parse_form(value_sexpr)?))
        })
        .collect()
}

const COND_TEMPLATE: &str = "(predicate value)+ default";

fn parse_cond(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("cond", COND_TEMPLATE, span);
    if args.len() < 2 {
        return Err(shape().into());
    }
    let (default_sexpr, branch_sexprs) = args.split_last().expect("checked len >= 2 above");
    let branches = parse_branches(branch_sexprs, shape)?;
    let default = parse_form(default_sexpr)?;
    Ok(Form::new(
        FormKind::Cond {
            branches,
            default: Box::new(default),
        },
        span,
    ))
}

const SELECT_TEMPLATE: &str = "value (predicate value)+ default";

fn parse_select(args: &[SExpr], span: Span) -> Result<Form, LispyError> {
    let shape = || SyntaxError::shape("select", SELECT_TEMPLATE, span);
    if args.len() < 3 {
        return Err(shape().into());
    }
    let value = parse_form(&args[0])?;
    let (default_sexpr, branch_sexprs) = args[1..].split_last().expect("checked len >= 3 above");
    let branches = parse_branches(branch_sexprs, shape)?;
    let default = parse_form(default_sexpr)?;
    Ok(Form::new(
        FormKind::Select {
            value: Box::new(value),
            branches,
            default: Box::new(default),
        },
        span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sexpr::parse_program as parse_sexpr_program;

    fn parse(source: &str) -> Result<Vec<Form>, LispyError> {
        parse_program(&parse_sexpr_program(source).unwrap())
    }

    #[test]
    fn parses_application_as_composed_form() {
        let forms = parse("(f 1 2)").unwrap();
        assert!(matches!(&forms[0].kind, FormKind::ComposedForm { args, .. } if args.len() == 2));
    }

    #[test]
    fn parses_lambda() {
        let forms = parse("(lambda ((x int) (y float)) x)").unwrap();
        let FormKind::Lambda { parameters, .. } = &forms[0].kind else {
            panic!("expected lambda");
        };
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters[0].name, "x");
    }

    #[test]
    fn parses_define() {
        let forms = parse("(define add ((x int) (y int)) (list x y))").unwrap();
        let FormKind::Define {
            name, parameters, ..
        } = &forms[0].kind
        else {
            panic!("expected define");
        };
        assert_eq!(name, "add");
        assert_eq!(parameters.len(), 2);
    }

    #[test]
    fn rejects_duplicate_define_parameter_names() {
        let err = parse("(define f ((x int) (x int)) x)").unwrap_err();
        assert!(matches!(
            err,
            LispyError::Syntax(SyntaxError::SpecialForm(
                crate::error::SpecialFormSyntaxError::DuplicateName { .. }
            ))
        ));
    }

    #[test]
    fn rejects_duplicate_lambda_parameter_names() {
        let err = parse("(lambda ((x int) (x int)) x)").unwrap_err();
        assert!(matches!(
            err,
            LispyError::Syntax(SyntaxError::SpecialForm(
                crate::error::SpecialFormSyntaxError::DuplicateName { .. }
            ))
        ));
    }

    #[test]
    fn rejects_duplicate_let_binding_names() {
        let err = parse("(let ((x 1) (x 2)) x)").unwrap_err();
        assert!(matches!(
            err,
            LispyError::Syntax(SyntaxError::SpecialForm(
                crate::error::SpecialFormSyntaxError::DuplicateName { .. }
            ))
        ));
    }

    #[test]
    fn rejects_progn_with_one_form() {
        assert!(parse("(progn 1)").is_err());
    }

    #[test]
    fn rejects_cond_missing_branches() {
        assert!(parse("(cond 1 2)").is_err());
    }

    #[test]
    fn parses_cond_with_one_branch_and_default() {
        let forms = parse("(cond (true 1) 2)").unwrap();
        assert!(matches!(&forms[0].kind, FormKind::Cond { branches, .. } if branches.len() == 1));
    }

    #[test]
    fn parses_select() {
        let forms = parse("(select x (1 true) (2 false) false)").unwrap();
        assert!(matches!(&forms[0].kind, FormKind::Select { branches, .. } if branches.len() == 2));
    }

    #[test]
    fn empty_list_parses_as_list_form() {
        let forms = parse("()").unwrap();
        assert!(matches!(&forms[0].kind, FormKind::List(elements) if elements.is_empty()));
    }

    #[test]
    fn malformed_parameter_type_is_a_type_syntax_error_not_a_syntax_error() {
        let err = parse("(lambda ((x string)) x)").unwrap_err();
        assert!(matches!(err, LispyError::TypeSyntax(_)));
    }
}
