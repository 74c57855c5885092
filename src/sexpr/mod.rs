//! Grammar/lexer and s-expression builder.
//!
//! The surface grammar is kept in a separate `pest` grammar file rather than
//! hand-rolled, mirroring the teacher's `ast/parser.rs` (`#[derive(Parser)]
//! #[grammar = "..."]`). This module is the *only* place that talks to
//! `pest`; everything downstream works on the plain `SExpr` tree produced
//! here.
use std::hash::{Hash, Hasher};

use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;

use crate::error::SyntaxError;
use crate::span::Span;

#[derive(Parser)]
#[grammar = "sexpr/grammar.pest"]
struct SExprParser;

/// A decoded atomic value or an unresolved identifier name.
///
/// Numeric and boolean atoms are decoded once, here; identifier atoms are
/// left unresolved — numeric promotion is not applied at this stage.
#[derive(Debug, Clone)]
pub enum Atom {
    Int(i64),
    Float(f64),
    Bool(bool),
    Ident(String),
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        use Atom::*;
        match (self, other) {
            (Int(a), Int(b)) => a == b,
            // Compared bit-for-bit so that NaN atoms are equal to themselves
            // and usable as HashMap/HashSet keys in tests.
            (Float(a), Float(b)) => a.to_bits() == b.to_bits(),
            (Bool(a), Bool(b)) => a == b,
            (Ident(a), Ident(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Atom {}

impl Hash for Atom {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Atom::Int(v) => v.hash(state),
            Atom::Float(v) => v.to_bits().hash(state),
            Atom::Bool(v) => v.hash(state),
            Atom::Ident(v) => v.hash(state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SExprKind {
    Atom(Atom),
    List(Vec<SExpr>),
}

/// A single node of the uniform s-expression tree.
///
/// `span` is metadata only: equality and hashing are defined on `kind`
/// alone, so that source locations never participate in equality.
#[derive(Debug, Clone)]
pub struct SExpr {
    pub kind: SExprKind,
    pub span: Span,
}

impl PartialEq for SExpr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for SExpr {}

impl Hash for SExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl SExpr {
    pub fn as_list(&self) -> Option<&[SExpr]> {
        match &self.kind {
            SExprKind::List(xs) => Some(xs),
            SExprKind::Atom(_) => None,
        }
    }

    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            SExprKind::Atom(Atom::Ident(name)) => Some(name),
            _ => None,
        }
    }
}

/// The top level of a lispy program: an ordered sequence of s-expressions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Program {
    pub body: Vec<SExpr>,
}

/// Parse `source` into a `Program` of s-expressions.
pub fn parse_program(source: &str) -> Result<Program, SyntaxError> {
    log::debug!("parsing {} bytes of source into s-expressions", source.len());

    let mut pairs = SExprParser::parse(Rule::program, source).map_err(|err| {
        let span = pest_error_span(&err);
        SyntaxError::lexical(pest_message(&err), span)
    })?;

    let program_pair = pairs
        .next()
        .expect("the `program` rule always produces exactly one pair");

    let mut body = vec![];
    for pair in program_pair.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        body.push(build_sexpr(pair)?);
    }

    log::trace!("parsed {} top-level s-expressions", body.len());

    Ok(Program { body })
}

fn build_sexpr(pair: Pair<Rule>) -> Result<SExpr, SyntaxError> {
    debug_assert_eq!(pair.as_rule(), Rule::sexpr);
    let span = Span::from_pest(&pair.as_span());
    let inner = pair
        .into_inner()
        .next()
        .expect("`sexpr` always wraps exactly one of `list` or `atom`");

    let kind = match inner.as_rule() {
        Rule::list => {
            let elements = inner
                .into_inner()
                .map(build_sexpr)
                .collect::<Result<Vec<_>, _>>()?;
            SExprKind::List(elements)
        }
        Rule::atom => SExprKind::Atom(build_atom(inner)?),
        rule => unreachable!("unexpected rule inside `sexpr`: {rule:?}"),
    };

    Ok(SExpr { kind, span })
}

fn build_atom(pair: Pair<Rule>) -> Result<Atom, SyntaxError> {
    let span = Span::from_pest(&pair.as_span());
    let inner = pair
        .into_inner()
        .next()
        .expect("`atom` always wraps exactly one literal rule");
    let text = inner.as_str();

    Ok(match inner.as_rule() {
        Rule::boolean => Atom::Bool(text == "true"),
        Rule::integer => Atom::Int(text.parse().map_err(|_| {
            SyntaxError::lexical(format!("integer literal '{text}' is out of range"), span)
        })?),
        Rule::float | Rule::special_float => Atom::Float(text.parse().map_err(|_| {
            SyntaxError::lexical(format!("malformed float literal '{text}'"), span)
        })?),
        Rule::identifier => Atom::Ident(text.to_owned()),
        rule => unreachable!("unexpected rule inside `atom`: {rule:?}"),
    })
}

fn pest_error_span(err: &pest::error::Error<Rule>) -> Span {
    match err.line_col {
        pest::error::LineColLocation::Pos((line, col)) => Span {
            start_line: line,
            start_col: col,
            end_line: line,
            end_col: col,
        },
        pest::error::LineColLocation::Span((start_line, start_col), (end_line, end_col)) => Span {
            start_line,
            start_col,
            end_line,
            end_col,
        },
    }
}

fn pest_message(err: &pest::error::Error<Rule>) -> String {
    err.variant.message().to_string()
}
