use std::fmt::{
    self,
    Write,
};

use errors::ErrorMetadata;
use strum::{
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
};
use value::{
    Document,
    FieldPath,
    FieldValue,
};

use crate::{
    functions::evaluate_function,
    EvaluateResult,
    EvaluationContext,
};

/// An expression tree. Expressions are immutable and may be evaluated
/// concurrently against different documents.
///
/// Equality is structural and uses [`FieldValue`] equality for constants, so
/// `42` and `"42"` are different constants even though both print as
/// `cst(42)` in a canonical id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    /// Evaluates to the named field of the document, or `Unset`.
    Field(FieldPath),
    /// A literal value.
    Constant(FieldValue),
    /// A call to a built-in function.
    Function(FunctionExpr),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionExpr {
    pub name: FunctionName,
    pub args: Vec<Expression>,
}

/// Built-in functions. The string form is the name used in canonical ids.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum FunctionName {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Mod,
    Abs,
    Exp,
    Ln,
    Log,
    Log10,
    Pow,
    Round,
    Ceil,
    Floor,
    Sqrt,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,

    // Logical
    And,
    Or,
    Xor,
    Not,
    Cond,
    IfError,
    IsError,
    LogicalMaximum,
    LogicalMinimum,

    // Existence and type checks
    Exists,
    IsAbsent,
    IsNull,
    IsNotNull,
    IsNan,
    IsNotNan,

    // Set membership
    EqualAny,
    NotEqualAny,
    ArrayContains,
    ArrayContainsAny,
    ArrayContainsAll,

    // Strings
    CharLength,
    ByteLength,
    ToLower,
    ToUpper,
    Trim,
    StartsWith,
    EndsWith,
    StringContains,
    StringConcat,
    StringReverse,
    Like,
    RegexContains,
    RegexMatch,

    // Arrays and maps
    ArrayLength,
    ArrayReverse,
    ArrayConcat,
    ArrayGet,
    MapGet,

    // Timestamps
    TimestampToUnixSeconds,
    TimestampToUnixMillis,
    TimestampToUnixMicros,
    UnixSecondsToTimestamp,
    UnixMillisToTimestamp,
    UnixMicrosToTimestamp,
    TimestampAdd,
    TimestampSubtract,

    // Vectors
    VectorLength,
    DotProduct,
    EuclideanDistance,
    CosineDistance,
}

/// How many arguments a function takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

impl FunctionName {
    pub fn arity(self) -> Arity {
        use FunctionName::*;
        match self {
            Abs | Exp | Ln | Log10 | Sqrt | Round | Ceil | Floor => Arity::Exactly(1),
            Not | IsError | Exists | IsAbsent | IsNull | IsNotNull | IsNan | IsNotNan => {
                Arity::Exactly(1)
            },
            CharLength | ByteLength | ToLower | ToUpper | Trim | StringReverse => {
                Arity::Exactly(1)
            },
            ArrayLength | ArrayReverse | VectorLength => Arity::Exactly(1),
            TimestampToUnixSeconds | TimestampToUnixMillis | TimestampToUnixMicros => {
                Arity::Exactly(1)
            },
            UnixSecondsToTimestamp | UnixMillisToTimestamp | UnixMicrosToTimestamp => {
                Arity::Exactly(1)
            },
            Add | Subtract | Multiply | Divide | Mod | Log | Pow => Arity::Exactly(2),
            Equal | NotEqual | LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => {
                Arity::Exactly(2)
            },
            IfError | EqualAny | NotEqualAny => Arity::Exactly(2),
            ArrayContains | ArrayContainsAny | ArrayContainsAll => Arity::Exactly(2),
            StartsWith | EndsWith | StringContains | Like | RegexContains | RegexMatch => {
                Arity::Exactly(2)
            },
            ArrayGet | MapGet => Arity::Exactly(2),
            DotProduct | EuclideanDistance | CosineDistance => Arity::Exactly(2),
            Cond | TimestampAdd | TimestampSubtract => Arity::Exactly(3),
            And | Or | Xor | LogicalMaximum | LogicalMinimum | StringConcat | ArrayConcat => {
                Arity::AtLeast(1)
            },
        }
    }
}

impl Expression {
    pub fn field(path: FieldPath) -> Self {
        Expression::Field(path)
    }

    pub fn constant(value: impl Into<FieldValue>) -> Self {
        Expression::Constant(value.into())
    }

    pub fn function(name: FunctionName, args: Vec<Expression>) -> Self {
        Expression::Function(FunctionExpr { name, args })
    }

    /// Shorthand for "field == literal".
    pub fn field_eq_literal(field: FieldPath, literal: impl Into<FieldValue>) -> Self {
        Expression::function(
            FunctionName::Equal,
            vec![Expression::Field(field), Expression::constant(literal)],
        )
    }

    /// Helper for creating an `and` call.
    pub fn and(left: Expression, right: Expression) -> Self {
        Expression::function(FunctionName::And, vec![left, right])
    }

    /// Evaluate against `document`. Never fails at the host level: undefined
    /// computations are [`EvaluateResult::Error`].
    pub fn evaluate(&self, context: EvaluationContext<'_>, document: &Document) -> EvaluateResult {
        match self {
            Expression::Field(path) => context.resolve_field(document, path),
            Expression::Constant(value) => EvaluateResult::Value(value.clone()),
            Expression::Function(function) => evaluate_function(function, context, document),
        }
    }

    /// Number of nested levels, counting leaves as one.
    pub fn depth(&self) -> usize {
        match self {
            Expression::Field(_) | Expression::Constant(_) => 1,
            Expression::Function(FunctionExpr { args, .. }) => {
                1 + args.iter().map(Expression::depth).max().unwrap_or(0)
            },
        }
    }

    /// Checks argument counts and the nesting limit.
    pub fn validate(&self, max_depth: usize) -> anyhow::Result<()> {
        let depth = self.depth();
        anyhow::ensure!(
            depth <= max_depth,
            ErrorMetadata::bad_request(
                "ExpressionTooDeep",
                format!("Expression is nested {depth} levels deep, more than the limit of {max_depth}"),
            )
        );
        self.validate_arity()
    }

    fn validate_arity(&self) -> anyhow::Result<()> {
        let Expression::Function(FunctionExpr { name, args }) = self else {
            return Ok(());
        };
        let arity = name.arity();
        anyhow::ensure!(
            arity.accepts(args.len()),
            ErrorMetadata::bad_request(
                "InvalidArgumentCount",
                format!("{name} takes {arity} arguments but was given {}", args.len()),
            )
        );
        for arg in args {
            arg.validate_arity()?;
        }
        Ok(())
    }

    /// A deterministic string form: `fld(path)`, `cst(value)` and
    /// `fn(name[arg,...])`.
    pub fn canonical_id(&self) -> String {
        let mut out = String::new();
        self.write_canonical_id(&mut out);
        out
    }

    fn write_canonical_id(&self, out: &mut String) {
        match self {
            Expression::Field(path) => {
                let _ = write!(out, "fld({})", path.canonical_string());
            },
            Expression::Constant(value) => {
                let _ = write!(out, "cst({})", value.canonical_id());
            },
            Expression::Function(FunctionExpr { name, args }) => {
                let _ = write!(out, "fn({name}[");
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    arg.write_canonical_id(out);
                }
                out.push_str("])");
            },
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical_id())
    }
}

#[cfg(test)]
mod tests {
    use errors::ErrorMetadataAnyhowExt;
    use strum::IntoEnumIterator;
    use value::{
        val,
        FieldPath,
    };

    use super::{
        Expression,
        FunctionName,
    };

    #[test]
    fn test_canonical_id() -> anyhow::Result<()> {
        let expr = Expression::field_eq_literal("foo".parse()?, 42);
        assert_eq!(expr.canonical_id(), "fn(equal[fld(foo),cst(42)])");
        let nested = Expression::function(
            FunctionName::Add,
            vec![
                Expression::field("a.`b c`".parse()?),
                Expression::constant(1.5),
            ],
        );
        assert_eq!(nested.canonical_id(), "fn(add[fld(a.`b c`),cst(1.5)])");
        assert_eq!(
            Expression::function(FunctionName::TimestampToUnixMillis, vec![]).canonical_id(),
            "fn(timestamp_to_unix_millis[])"
        );
        Ok(())
    }

    #[test]
    fn test_structural_equality_keeps_types() -> anyhow::Result<()> {
        let int = Expression::field_eq_literal("foo".parse()?, 42);
        let string = Expression::field_eq_literal("foo".parse()?, "42");
        let double = Expression::field_eq_literal("foo".parse()?, 42.0);
        assert_eq!(int.canonical_id(), string.canonical_id());
        assert_ne!(int, string);
        assert_ne!(int, double);
        assert_eq!(int, Expression::field_eq_literal("foo".parse()?, val!(42)));
        Ok(())
    }

    #[test]
    fn test_function_names_round_trip() -> anyhow::Result<()> {
        for name in FunctionName::iter() {
            assert_eq!(name.to_string().parse::<FunctionName>()?, name);
        }
        assert_eq!(FunctionName::Log10.to_string(), "log10");
        assert_eq!(FunctionName::IsNan.to_string(), "is_nan");
        assert_eq!(FunctionName::Mod.to_string(), "mod");
        Ok(())
    }

    #[test]
    fn test_validate() -> anyhow::Result<()> {
        let mut expr = Expression::field(FieldPath::key_path());
        for _ in 0..10 {
            expr = Expression::function(FunctionName::Not, vec![expr]);
        }
        assert_eq!(expr.depth(), 11);
        expr.validate(11)?;
        let err = expr.validate(10).unwrap_err();
        assert_eq!(err.short_msg(), "ExpressionTooDeep");

        let bad = Expression::and(
            Expression::constant(true),
            Expression::function(FunctionName::Not, vec![]),
        );
        let err = bad.validate(100).unwrap_err();
        assert_eq!(err.short_msg(), "InvalidArgumentCount");
        Ok(())
    }
}
