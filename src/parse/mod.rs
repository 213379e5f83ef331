mod error;
mod grammar;

pub use error::ParseError;

use crate::Expr;

/// Parse expression text into an [`Expr`] tree.
///
/// Function names are not resolved here; see [`Expression::compile`](crate::Expression::compile).
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a well-formed expression.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::parse_expression
        .parse(input)
        .map_err(|e| ParseError::new(e.offset(), e.inner().to_string()))
}
