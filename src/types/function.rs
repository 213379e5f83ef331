use std::fmt;

/// Built-in functions callable from rule expressions.
///
/// Names are matched case-insensitively, so `Max(a, b)` and `max(a, b)` both
/// resolve to [`Function::Max`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Abs,
    Acos,
    Asin,
    Atan,
    Atan2,
    Ceil,
    Clamp,
    Cos,
    Exp,
    Floor,
    If,
    Lerp,
    Ln,
    Log,
    Log10,
    Max,
    Min,
    Pow,
    Round,
    Sign,
    Sin,
    Sqrt,
    Tan,
    Trunc,
}

/// Number of arguments a function accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Range(usize, usize),
    AtLeast(usize),
}

const ALL: [Function; 24] = [
    Function::Abs,
    Function::Acos,
    Function::Asin,
    Function::Atan,
    Function::Atan2,
    Function::Ceil,
    Function::Clamp,
    Function::Cos,
    Function::Exp,
    Function::Floor,
    Function::If,
    Function::Lerp,
    Function::Ln,
    Function::Log,
    Function::Log10,
    Function::Max,
    Function::Min,
    Function::Pow,
    Function::Round,
    Function::Sign,
    Function::Sin,
    Function::Sqrt,
    Function::Tan,
    Function::Trunc,
];

impl Function {
    /// Resolve a function by name, ignoring ASCII case.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Function> {
        ALL.iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Function::Abs => "abs",
            Function::Acos => "acos",
            Function::Asin => "asin",
            Function::Atan => "atan",
            Function::Atan2 => "atan2",
            Function::Ceil => "ceil",
            Function::Clamp => "clamp",
            Function::Cos => "cos",
            Function::Exp => "exp",
            Function::Floor => "floor",
            Function::If => "if",
            Function::Lerp => "lerp",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Log10 => "log10",
            Function::Max => "max",
            Function::Min => "min",
            Function::Pow => "pow",
            Function::Round => "round",
            Function::Sign => "sign",
            Function::Sin => "sin",
            Function::Sqrt => "sqrt",
            Function::Tan => "tan",
            Function::Trunc => "trunc",
        }
    }

    #[must_use]
    pub fn arity(self) -> Arity {
        match self {
            Function::Atan2 | Function::Pow => Arity::Exact(2),
            Function::Clamp | Function::If | Function::Lerp => Arity::Exact(3),
            Function::Log => Arity::Range(1, 2),
            Function::Max | Function::Min => Arity::AtLeast(2),
            _ => Arity::Exact(1),
        }
    }

    /// Apply an eagerly-evaluated function.
    ///
    /// Returns `None` for `If`, which compiles to a conditional so that only
    /// the chosen branch is evaluated. `args.len()` must satisfy
    /// [`arity()`](Self::arity); the compiler guarantees this.
    pub(crate) fn apply(self, args: &[f64]) -> Option<f64> {
        let value = match self {
            Function::If => return None,
            Function::Abs => args[0].abs(),
            Function::Acos => args[0].acos(),
            Function::Asin => args[0].asin(),
            Function::Atan => args[0].atan(),
            Function::Atan2 => args[0].atan2(args[1]),
            Function::Ceil => args[0].ceil(),
            // max/min rather than f64::clamp, which panics when lo > hi
            Function::Clamp => args[0].max(args[1]).min(args[2]),
            Function::Cos => args[0].cos(),
            Function::Exp => args[0].exp(),
            Function::Floor => args[0].floor(),
            Function::Lerp => args[0] + (args[1] - args[0]) * args[2],
            Function::Ln => args[0].ln(),
            Function::Log => match args {
                [x, base] => x.log(*base),
                _ => args[0].ln(),
            },
            Function::Log10 => args[0].log10(),
            Function::Max => args.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            Function::Min => args.iter().copied().fold(f64::INFINITY, f64::min),
            Function::Pow => args[0].powf(args[1]),
            Function::Round => args[0].round(),
            Function::Sign => {
                if args[0] == 0.0 {
                    0.0
                } else {
                    args[0].signum()
                }
            }
            Function::Sin => args[0].sin(),
            Function::Sqrt => args[0].sqrt(),
            Function::Tan => args[0].tan(),
            Function::Trunc => args[0].trunc(),
        };
        Some(value)
    }
}

impl Arity {
    #[must_use]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Range(lo, hi) => (lo..=hi).contains(&count),
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{n}"),
            Arity::Range(lo, hi) => write!(f, "{lo} to {hi}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}
