//! Error taxonomy.
//!
//! The Python original models these as a shallow class hierarchy
//! (`LispyError` -> `SyntaxError` -> `SpecialFormSyntaxError` ->
//! `DuplicateNameError`, and separately `TypeError` -> `UnificationError` /
//! `CyclicTypeError`, and `BindingError` -> `InvalidNameError` /
//! `UnboundNameError`). Rust has no class inheritance, so each branch of that
//! hierarchy becomes a nested, sealed enum; the nesting itself encodes the
//! "subtype of" relationships, and `LispyError` is the single top-level sum
//! type every public entry point returns.
use std::fmt;

use crate::span::Span;

/// Lexical or structural parse failure, and malformed special-form shapes.
#[derive(Debug, Clone)]
pub enum SyntaxError {
    /// A lexical violation: unterminated list, unexpected character,
    /// invalid numeric form, consecutive atoms with no whitespace, etc.
    Lexical { message: String, span: Span },
    /// A well-formed s-expression with the wrong shape for a known special
    /// form, or the degenerate cases of that (duplicate binder names).
    SpecialForm(SpecialFormSyntaxError),
}

#[derive(Debug, Clone)]
pub enum SpecialFormSyntaxError {
    /// `Invalid syntax for special form <name>: expected '(' '<name>' <template> ')'`
    Shape {
        name: &'static str,
        template: &'static str,
        span: Span,
    },
    /// A duplicate parameter name in `lambda`, or a duplicate binding name in `let`.
    DuplicateName { name: String, span: Span },
}

impl SyntaxError {
    pub fn lexical(message: impl Into<String>, span: Span) -> Self {
        SyntaxError::Lexical {
            message: message.into(),
            span,
        }
    }

    pub fn shape(name: &'static str, template: &'static str, span: Span) -> Self {
        SyntaxError::SpecialForm(SpecialFormSyntaxError::Shape {
            name,
            template,
            span,
        })
    }

    pub fn duplicate_name(name: impl Into<String>, span: Span) -> Self {
        SyntaxError::SpecialForm(SpecialFormSyntaxError::DuplicateName {
            name: name.into(),
            span,
        })
    }

    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lexical { span, .. } => *span,
            SyntaxError::SpecialForm(SpecialFormSyntaxError::Shape { span, .. }) => *span,
            SyntaxError::SpecialForm(SpecialFormSyntaxError::DuplicateName { span, .. }) => *span,
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::Lexical { message, span } => write!(f, "{message} ({span})"),
            SyntaxError::SpecialForm(inner) => inner.fmt(f),
        }
    }
}

impl fmt::Display for SpecialFormSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialFormSyntaxError::Shape {
                name,
                template,
                span,
            } => write!(
                f,
                "Invalid syntax for special form {name}: expected '(' '{name}' {template} ')' ({span})"
            ),
            SpecialFormSyntaxError::DuplicateName { name, span } => {
                write!(f, "Duplicate name '{name}' ({span})")
            }
        }
    }
}

impl std::error::Error for SyntaxError {}

/// A malformed type expression inside a `lambda` parameter annotation.
#[derive(Debug, Clone)]
pub struct TypeSyntaxError {
    pub template: &'static str,
    pub span: Span,
}

impl fmt::Display for TypeSyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid syntax for type: expected {} ({})",
            self.template, self.span
        )
    }
}

impl std::error::Error for TypeSyntaxError {}

/// Semantic type failures.
#[derive(Debug, Clone)]
pub enum TypeCheckError {
    /// Umbrella for semantic type failures not attributable to unification
    /// primitives directly, e.g. "list is not homogeneous".
    Semantic { message: String, span: Span },
    Unification(UnificationError),
    Cyclic(CyclicTypeError),
}

#[derive(Debug, Clone)]
pub struct UnificationError {
    pub message: String,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CyclicTypeError {
    pub span: Span,
}

impl TypeCheckError {
    pub fn semantic(message: impl Into<String>, span: Span) -> Self {
        TypeCheckError::Semantic {
            message: message.into(),
            span,
        }
    }

    pub fn unification(message: impl Into<String>, span: Span) -> Self {
        TypeCheckError::Unification(UnificationError {
            message: message.into(),
            span,
        })
    }

    pub fn cyclic(span: Span) -> Self {
        TypeCheckError::Cyclic(CyclicTypeError { span })
    }

    pub fn span(&self) -> Span {
        match self {
            TypeCheckError::Semantic { span, .. } => *span,
            TypeCheckError::Unification(UnificationError { span, .. }) => *span,
            TypeCheckError::Cyclic(CyclicTypeError { span }) => *span,
        }
    }
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeCheckError::Semantic { message, span } => write!(f, "{message} ({span})"),
            TypeCheckError::Unification(UnificationError { message, span }) => {
                write!(f, "{message} ({span})")
            }
            TypeCheckError::Cyclic(CyclicTypeError { span }) => {
                write!(f, "Attempt to create cyclic type ({span})")
            }
        }
    }
}

impl std::error::Error for TypeCheckError {}

/// Binding-related errors: invalid or unbound names.
#[derive(Debug, Clone)]
pub enum BindingError {
    /// Attempt to bind `nil` or a special-form name.
    InvalidName { name: String, span: Span },
    /// Reference or assignment to a name not present in scope.
    UnboundName { name: String, span: Span },
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingError::InvalidName { name, span } => {
                write!(f, "Cannot bind to name '{name}': binding is disallowed ({span})")
            }
            BindingError::UnboundName { name, span } => {
                write!(f, "Unbound name '{name}' ({span})")
            }
        }
    }
}

impl std::error::Error for BindingError {}

/// The single error type returned by `parse` and `check`.
#[derive(Debug, Clone)]
pub enum LispyError {
    Syntax(SyntaxError),
    TypeSyntax(TypeSyntaxError),
    TypeCheck(TypeCheckError),
    Binding(BindingError),
}

impl fmt::Display for LispyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LispyError::Syntax(e) => e.fmt(f),
            LispyError::TypeSyntax(e) => e.fmt(f),
            LispyError::TypeCheck(e) => e.fmt(f),
            LispyError::Binding(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for LispyError {}

impl From<SyntaxError> for LispyError {
    fn from(e: SyntaxError) -> Self {
        LispyError::Syntax(e)
    }
}

impl From<TypeSyntaxError> for LispyError {
    fn from(e: TypeSyntaxError) -> Self {
        LispyError::TypeSyntax(e)
    }
}

impl From<TypeCheckError> for LispyError {
    fn from(e: TypeCheckError) -> Self {
        LispyError::TypeCheck(e)
    }
}

impl From<BindingError> for LispyError {
    fn from(e: BindingError) -> Self {
        LispyError::Binding(e)
    }
}
