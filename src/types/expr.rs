use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Not, Sub};

use super::function::Function;

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Infix operators. Comparison and logical operators produce `1.0` or `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    And,
    Or,
}

/// User-facing expression AST. Variable and function names are strings.
/// Transformed into [`CompiledExpr`] during compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        function: String,
        args: Vec<Expr>,
    },
}

/// Compiled expression with every function name resolved to a [`Function`]
/// and its arity checked.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CompiledExpr {
    Number(f64),
    Variable(String),
    Unary {
        op: UnaryOp,
        operand: Box<CompiledExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<CompiledExpr>,
        rhs: Box<CompiledExpr>,
    },
    Conditional {
        condition: Box<CompiledExpr>,
        then: Box<CompiledExpr>,
        otherwise: Box<CompiledExpr>,
    },
    Call {
        function: Function,
        args: Vec<CompiledExpr>,
    },
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "^",
            BinaryOp::Eq => "==",
            BinaryOp::Neq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Fully parenthesized rendering. For finite literals the output parses back
/// to an expression that evaluates identically.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // `-2 ^ 2` parses as `-(2 ^ 2)`
            Expr::Number(n) if n.is_sign_negative() => write!(f, "({n:?})"),
            Expr::Number(n) => write!(f, "{n:?}"),
            Expr::Variable(name) => write!(f, "{name}"),
            Expr::Unary { op, operand } => write!(f, "({op}{operand})"),
            Expr::Binary { op, lhs, rhs } => write!(f, "({lhs} {op} {rhs})"),
            Expr::Conditional {
                condition,
                then,
                otherwise,
            } => write!(f, "({condition} ? {then} : {otherwise})"),
            Expr::Call { function, args } => {
                write!(f, "{function}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Expr {
    fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    #[must_use]
    pub fn pow(self, exponent: Expr) -> Expr {
        Expr::binary(BinaryOp::Pow, self, exponent)
    }

    #[must_use]
    pub fn eq(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Eq, self, other)
    }

    #[must_use]
    pub fn lt(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Lt, self, other)
    }

    #[must_use]
    pub fn gt(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Gt, self, other)
    }

    #[must_use]
    pub fn and(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::And, self, other)
    }

    #[must_use]
    pub fn or(self, other: Expr) -> Expr {
        Expr::binary(BinaryOp::Or, self, other)
    }

    /// `self ? then : otherwise`
    #[must_use]
    pub fn select(self, then: Expr, otherwise: Expr) -> Expr {
        Expr::Conditional {
            condition: Box::new(self),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// Names of all variables referenced anywhere in the tree, in first-seen
    /// order without duplicates.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        collect_variables(self, &mut out);
        out
    }
}

fn collect_variables<'a>(expr: &'a Expr, out: &mut Vec<&'a str>) {
    match expr {
        Expr::Number(_) => {}
        Expr::Variable(name) => {
            if !out.contains(&name.as_str()) {
                out.push(name);
            }
        }
        Expr::Unary { operand, .. } => collect_variables(operand, out),
        Expr::Binary { lhs, rhs, .. } => {
            collect_variables(lhs, out);
            collect_variables(rhs, out);
        }
        Expr::Conditional {
            condition,
            then,
            otherwise,
        } => {
            collect_variables(condition, out);
            collect_variables(then, out);
            collect_variables(otherwise, out);
        }
        Expr::Call { args, .. } => {
            for arg in args {
                collect_variables(arg, out);
            }
        }
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Add, self, rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Sub, self, rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Mul, self, rhs)
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::binary(BinaryOp::Div, self, rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(self),
        }
    }
}

impl Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Number(v)
    }
}

/// Reference a tracking input or another rule's output by name.
#[must_use]
pub fn var(name: &str) -> Expr {
    Expr::Variable(name.to_owned())
}

#[must_use]
pub fn num(value: f64) -> Expr {
    Expr::Number(value)
}

/// Call a built-in function by name. The name is resolved at compile time.
#[must_use]
pub fn call(function: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        function: function.to_owned(),
        args,
    }
}
