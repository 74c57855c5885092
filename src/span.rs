//! Source locations carried on s-expression and AST nodes.
//!
//! Spans are metadata only: every type that carries one implements equality
//! and hashing by hand so that `Span` never participates in either.

/// A half-open region of source text, as (line, column) pairs.
///
/// Lines and columns are both 1-indexed, matching `pest`'s `line_col()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Span {
    pub fn from_pest(span: &pest::Span<'_>) -> Self {
        let (start_line, start_col) = span.start_pos().line_col();
        let (end_line, end_col) = span.end_pos().line_col();
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}-{}:{}",
            self.start_line, self.start_col, self.end_line, self.end_col
        )
    }
}
