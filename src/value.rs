//! Runtime value types for LineScript

use std::fmt;

use crate::error::{ErrorKind, Result};

/// Runtime values in LineScript
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Double(f64),
    Str(String),

    /// Declared with `var x;` and never assigned
    Uninitialized,
}

impl Value {
    /// Classify a lexeme as a literal. Returns `None` for anything that
    /// has to be looked up as a variable instead.
    pub fn from_literal(lexeme: &str) -> Option<Value> {
        match lexeme {
            "true" => return Some(Value::Bool(true)),
            "false" => return Some(Value::Bool(false)),
            _ => {}
        }

        if lexeme.len() >= 2 && lexeme.starts_with('"') && lexeme.ends_with('"') {
            return Some(Value::Str(lexeme[1..lexeme.len() - 1].to_string()));
        }

        if !Self::is_numeric_literal(lexeme) {
            return None;
        }
        match lexeme.matches('.').count() {
            0 => lexeme.parse::<i64>().ok().map(Value::Int),
            1 => lexeme.parse::<f64>().ok().map(Value::Double),
            _ => None,
        }
    }

    /// Shaped like a number: optional `-`, digits and dots only. Such a
    /// lexeme is never a variable name, even when it does not parse.
    pub fn is_numeric_literal(lexeme: &str) -> bool {
        let digits = lexeme.strip_prefix('-').unwrap_or(lexeme);
        digits.chars().any(|c| c.is_ascii_digit())
            && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Double(_) => "double",
            Value::Str(_) => "string",
            Value::Uninitialized => "uninitialized",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Double(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Double(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_truthy(&self) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Int(n) => Ok(*n != 0),
            Value::Double(n) => Ok(*n != 0.0),
            other => Err(ErrorKind::InvalidOperatorForType {
                op: "truth test".to_string(),
                ty: other.type_name().to_string(),
            }
            .into()),
        }
    }

    /// Convert `self` for storage into a slot currently holding `target`.
    /// The target's type wins: Int truncates, Double widens.
    pub fn coerce_to(self, target: &Value) -> Result<Value> {
        match (target, self) {
            (Value::Uninitialized, value) => Ok(value),
            (Value::Int(_), Value::Double(d)) => Ok(Value::Int(d as i64)),
            (Value::Double(_), Value::Int(i)) => Ok(Value::Double(i as f64)),
            (target, value) if target.type_name() == value.type_name() => Ok(value),
            (target, value) => {
                Err(ErrorKind::type_mismatch(target.type_name(), value.type_name()).into())
            }
        }
    }

    /// Evaluate `self OP other`. Int and Double compare numerically;
    /// strings and bools only support equality.
    pub fn compare(&self, op: CompareOp, other: &Value) -> Result<bool> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Ok(op.apply(a, b)),
            (Value::Str(a), Value::Str(b)) if op.is_equality() => Ok(op.apply(a, b)),
            (Value::Bool(a), Value::Bool(b)) if op.is_equality() => Ok(op.apply(a, b)),
            (Value::Str(_), Value::Str(_)) | (Value::Bool(_), Value::Bool(_)) => {
                Err(ErrorKind::InvalidOperatorForType {
                    op: op.to_string(),
                    ty: self.type_name().to_string(),
                }
                .into())
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => Ok(op.apply(&a, &b)),
                _ => Err(ErrorKind::type_mismatch(self.type_name(), other.type_name()).into()),
            },
        }
    }

    /// Compound assignment `self OP= rhs`; the result keeps `self`'s type
    pub fn apply(&self, op: ArithOp, rhs: &Value) -> Result<Value> {
        match (self, rhs) {
            (Value::Str(a), Value::Str(b)) if op == ArithOp::Add => {
                Ok(Value::Str(format!("{}{}", a, b)))
            }
            (Value::Str(_), _) if op == ArithOp::Add => {
                Err(ErrorKind::type_mismatch("string", rhs.type_name()).into())
            }
            (Value::Str(_), _) | (Value::Bool(_), _) => Err(ErrorKind::InvalidOperatorForType {
                op: op.to_string(),
                ty: self.type_name().to_string(),
            }
            .into()),
            (Value::Int(a), Value::Int(b)) => Ok(Value::Int(op.apply_int(*a, *b)?)),
            _ => match (self.as_f64(), rhs.as_f64()) {
                (Some(a), Some(b)) => {
                    let result = op.apply_float(a, b)?;
                    Ok(match self {
                        Value::Int(_) => Value::Int(result as i64),
                        _ => Value::Double(result),
                    })
                }
                _ => Err(ErrorKind::type_mismatch(self.type_name(), rhs.type_name()).into()),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(n) if n.is_finite() && n.fract() == 0.0 => write!(f, "{:.1}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Str(s) => write!(f, "{}", s),
            Value::Uninitialized => write!(f, "<uninitialized>"),
        }
    }
}

/// Relational operators accepted by `if`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl CompareOp {
    pub fn parse(lexeme: &str) -> Option<Self> {
        match lexeme {
            "==" => Some(CompareOp::Equal),
            "!=" => Some(CompareOp::NotEqual),
            "<" => Some(CompareOp::Less),
            "<=" => Some(CompareOp::LessEqual),
            ">" => Some(CompareOp::Greater),
            ">=" => Some(CompareOp::GreaterEqual),
            _ => None,
        }
    }

    pub fn is_equality(self) -> bool {
        matches!(self, CompareOp::Equal | CompareOp::NotEqual)
    }

    fn apply<T: PartialOrd + ?Sized>(self, a: &T, b: &T) -> bool {
        match self {
            CompareOp::Equal => a == b,
            CompareOp::NotEqual => a != b,
            CompareOp::Less => a < b,
            CompareOp::LessEqual => a <= b,
            CompareOp::Greater => a > b,
            CompareOp::GreaterEqual => a >= b,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            CompareOp::Equal => "==",
            CompareOp::NotEqual => "!=",
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::Greater => ">",
            CompareOp::GreaterEqual => ">=",
        };
        write!(f, "{}", symbol)
    }
}

/// Arithmetic behind the compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl ArithOp {
    /// Parse a compound operator (`+=` ...). `++`/`--` are handled by the
    /// increment statement, not here.
    pub fn parse(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+=" => Some(ArithOp::Add),
            "-=" => Some(ArithOp::Subtract),
            "*=" => Some(ArithOp::Multiply),
            "/=" => Some(ArithOp::Divide),
            "%=" => Some(ArithOp::Modulo),
            _ => None,
        }
    }

    fn apply_int(self, a: i64, b: i64) -> Result<i64> {
        match self {
            ArithOp::Add => Ok(a.wrapping_add(b)),
            ArithOp::Subtract => Ok(a.wrapping_sub(b)),
            ArithOp::Multiply => Ok(a.wrapping_mul(b)),
            ArithOp::Divide | ArithOp::Modulo if b == 0 => Err(ErrorKind::DivisionByZero.into()),
            ArithOp::Divide => Ok(a.wrapping_div(b)),
            ArithOp::Modulo => Ok(a.wrapping_rem(b)),
        }
    }

    fn apply_float(self, a: f64, b: f64) -> Result<f64> {
        match self {
            ArithOp::Add => Ok(a + b),
            ArithOp::Subtract => Ok(a - b),
            ArithOp::Multiply => Ok(a * b),
            ArithOp::Divide | ArithOp::Modulo if b == 0.0 => Err(ErrorKind::DivisionByZero.into()),
            ArithOp::Divide => Ok(a / b),
            ArithOp::Modulo => Ok(a % b),
        }
    }
}

impl fmt::Display for ArithOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            ArithOp::Add => "+=",
            ArithOp::Subtract => "-=",
            ArithOp::Multiply => "*=",
            ArithOp::Divide => "/=",
            ArithOp::Modulo => "%=",
        };
        write!(f, "{}", symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        assert_eq!(Value::from_literal("42"), Some(Value::Int(42)));
        assert_eq!(Value::from_literal("-7"), Some(Value::Int(-7)));
        assert_eq!(Value::from_literal("2.5"), Some(Value::Double(2.5)));
        assert_eq!(Value::from_literal("-0.5"), Some(Value::Double(-0.5)));
        assert_eq!(Value::from_literal("true"), Some(Value::Bool(true)));
        assert_eq!(
            Value::from_literal("\"hi there\""),
            Some(Value::Str("hi there".to_string()))
        );
        assert_eq!(Value::from_literal("\"\""), Some(Value::Str(String::new())));
    }

    #[test]
    fn test_non_literals() {
        assert_eq!(Value::from_literal("counter"), None);
        assert_eq!(Value::from_literal("1.2.3"), None);
        assert_eq!(Value::from_literal("-"), None);
        assert_eq!(Value::from_literal("4-2"), None);
        assert_eq!(Value::from_literal("x1"), None);
    }

    #[test]
    fn test_numeric_shape_without_value() {
        assert!(Value::is_numeric_literal("99999999999999999999"));
        assert_eq!(Value::from_literal("99999999999999999999"), None);
        assert!(Value::is_numeric_literal("1.2.3"));
        assert!(!Value::is_numeric_literal("x1"));
        assert!(!Value::is_numeric_literal("-"));
    }

    #[test]
    fn test_mixed_numeric_compare() {
        let one = Value::Int(1);
        assert!(one.compare(CompareOp::Equal, &Value::Double(1.0)).unwrap());
        assert!(one.compare(CompareOp::Less, &Value::Double(1.5)).unwrap());
        assert!(!Value::Int(3).compare(CompareOp::GreaterEqual, &Value::Int(4)).unwrap());
    }

    #[test]
    fn test_relational_on_strings_rejected() {
        let err = Value::Str("a".into())
            .compare(CompareOp::Less, &Value::Str("b".into()))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidOperatorForType { .. }));
        assert!(Value::Str("a".into())
            .compare(CompareOp::NotEqual, &Value::Str("b".into()))
            .unwrap());
    }

    #[test]
    fn test_compare_type_mismatch() {
        let err = Value::Int(1)
            .compare(CompareOp::Equal, &Value::Str("1".into()))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn test_coercion_keeps_target_type() {
        assert_eq!(
            Value::Double(2.9).coerce_to(&Value::Int(0)).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            Value::Int(3).coerce_to(&Value::Double(0.0)).unwrap(),
            Value::Double(3.0)
        );
        assert_eq!(
            Value::Str("x".into()).coerce_to(&Value::Uninitialized).unwrap(),
            Value::Str("x".into())
        );
        assert!(Value::Bool(true).coerce_to(&Value::Int(0)).is_err());
    }

    #[test]
    fn test_compound_arithmetic() {
        assert_eq!(
            Value::Int(7).apply(ArithOp::Divide, &Value::Int(2)).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            Value::Int(7).apply(ArithOp::Multiply, &Value::Double(1.5)).unwrap(),
            Value::Int(10)
        );
        assert_eq!(
            Value::Double(1.0).apply(ArithOp::Add, &Value::Int(2)).unwrap(),
            Value::Double(3.0)
        );
        assert_eq!(
            Value::Str("ab".into()).apply(ArithOp::Add, &Value::Str("c".into())).unwrap(),
            Value::Str("abc".into())
        );
    }

    #[test]
    fn test_compound_errors() {
        let err = Value::Int(1).apply(ArithOp::Modulo, &Value::Int(0)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
        let err = Value::Str("a".into())
            .apply(ArithOp::Subtract, &Value::Str("a".into()))
            .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidOperatorForType { .. }));
        let err = Value::Bool(true).apply(ArithOp::Add, &Value::Int(1)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidOperatorForType { .. }));
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Double(0.25).to_string(), "0.25");
        assert_eq!(Value::Int(-3).to_string(), "-3");
        assert_eq!(Value::Str("hi".into()).to_string(), "hi");
    }
}
