//! AST parser and type syntax (components C and D).
pub mod form;
pub mod special_forms;
pub mod type_expr;

pub use form::{Form, FormKind, Param};
pub use special_forms::{is_special_form, parse_form, parse_program};
