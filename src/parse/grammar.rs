use winnow::ascii::{digit0, digit1};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::{BinaryOp, Expr, UnaryOp};

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Numbers ----------------------------------------------------------------

fn number(input: &mut &str) -> ModalResult<f64> {
    (
        alt((
            (digit1, opt(('.', digit0))).void(),
            ('.', digit1).void(),
        )),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), cut_err(digit1))),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

// -- Operators --------------------------------------------------------------

fn or_op(input: &mut &str) -> ModalResult<BinaryOp> {
    "||".value(BinaryOp::Or).parse_next(input)
}

fn and_op(input: &mut &str) -> ModalResult<BinaryOp> {
    "&&".value(BinaryOp::And).parse_next(input)
}

fn compare_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt((
        "==".value(BinaryOp::Eq),
        "!=".value(BinaryOp::Neq),
        "<>".value(BinaryOp::Neq),
        "<=".value(BinaryOp::Lte),
        ">=".value(BinaryOp::Gte),
        "<".value(BinaryOp::Lt),
        ">".value(BinaryOp::Gt),
        "=".value(BinaryOp::Eq),
    ))
    .parse_next(input)
}

fn additive_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt(('+'.value(BinaryOp::Add), '-'.value(BinaryOp::Sub))).parse_next(input)
}

fn multiplicative_op(input: &mut &str) -> ModalResult<BinaryOp> {
    alt((
        '*'.value(BinaryOp::Mul),
        '/'.value(BinaryOp::Div),
        '%'.value(BinaryOp::Rem),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: ?: < || < && < cmp < +- < */% < unary < ^) ------

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        number.map(Expr::Number),
        delimited('(', cut_err(expr), (ws, cut_err(')'))),
        call_or_variable,
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "number, variable, function call or parenthesized expression",
    )))
    .parse_next(input)
}

fn call_or_variable(input: &mut &str) -> ModalResult<Expr> {
    let name = ident.parse_next(input)?;
    let args = opt(preceded((ws, '('), cut_err(arguments))).parse_next(input)?;
    Ok(match args {
        Some(args) => Expr::Call {
            function: name.to_owned(),
            args,
        },
        None => Expr::Variable(name.to_owned()),
    })
}

fn arguments(input: &mut &str) -> ModalResult<Vec<Expr>> {
    let args: Vec<Expr> = separated(0.., expr, (ws, ',')).parse_next(input)?;
    ws.parse_next(input)?;
    ')'.context(StrContext::Expected(StrContextValue::CharLiteral(')')))
        .parse_next(input)?;
    Ok(args)
}

fn power(input: &mut &str) -> ModalResult<Expr> {
    let base = primary(input)?;
    let exponent = opt(preceded((ws, '^'), cut_err(unary))).parse_next(input)?;
    Ok(match exponent {
        Some(exponent) => Expr::Binary {
            op: BinaryOp::Pow,
            lhs: Box::new(base),
            rhs: Box::new(exponent),
        },
        None => base,
    })
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    let prefix = opt(alt((
        '-'.value(Some(UnaryOp::Neg)),
        '!'.value(Some(UnaryOp::Not)),
        '+'.value(None),
    )))
    .parse_next(input)?;
    match prefix {
        Some(Some(op)) => {
            let operand = cut_err(unary).parse_next(input)?;
            Ok(Expr::Unary {
                op,
                operand: Box::new(operand),
            })
        }
        Some(None) => cut_err(unary).parse_next(input),
        None => power(input),
    }
}

/// One left-associative binary precedence level.
fn binary_level(
    input: &mut &str,
    operand: fn(&mut &str) -> ModalResult<Expr>,
    op: fn(&mut &str) -> ModalResult<BinaryOp>,
) -> ModalResult<Expr> {
    let first = operand(input)?;
    let rest: Vec<(BinaryOp, Expr)> =
        repeat(0.., (preceded(ws, op), cut_err(operand))).parse_next(input)?;
    Ok(rest.into_iter().fold(first, |lhs, (op, rhs)| Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }))
}

fn multiplicative(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, unary, multiplicative_op)
}

fn additive(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, multiplicative, additive_op)
}

fn comparison(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, additive, compare_op)
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, comparison, and_op)
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    binary_level(input, and_expr, or_op)
}

fn conditional(input: &mut &str) -> ModalResult<Expr> {
    let condition = or_expr(input)?;
    let branches = opt(preceded(
        (ws, '?'),
        cut_err((expr, preceded((ws, ':'), expr))),
    ))
    .parse_next(input)?;
    Ok(match branches {
        Some((then, otherwise)) => Expr::Conditional {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        },
        None => condition,
    })
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    conditional(input)
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_expression(input: &mut &str) -> ModalResult<Expr> {
    let parsed = expr(input)?;
    ws.parse_next(input)?;
    Ok(parsed)
}
