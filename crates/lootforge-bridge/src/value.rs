//! Value model for dynamic invocation.
//!
//! Arguments and results cross the bridge as positional [`Value`] lists.
//! Operations perform no static validation; the typed accessors here report
//! arity or type mismatches as [`BridgeError::SignatureMismatch`], which is a
//! caller-visible defect and deliberately distinct from the soft "not found"
//! outcomes.

use crate::error::{BridgeError, BridgeResult};

/// A single positional argument or result value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Short tag for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

fn mismatch(operation: &str, detail: String) -> BridgeError {
    BridgeError::SignatureMismatch {
        operation: operation.to_string(),
        detail,
    }
}

/// Check that exactly `expected` arguments were supplied.
pub fn expect_arity(operation: &str, args: &[Value], expected: usize) -> BridgeResult<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(mismatch(
            operation,
            format!("expected {} arguments, got {}", expected, args.len()),
        ))
    }
}

fn arg<'a>(operation: &str, args: &'a [Value], index: usize) -> BridgeResult<&'a Value> {
    args.get(index)
        .ok_or_else(|| mismatch(operation, format!("missing argument {index}")))
}

/// Fetch argument `index` as a string.
pub fn expect_str<'a>(operation: &str, args: &'a [Value], index: usize) -> BridgeResult<&'a str> {
    let value = arg(operation, args, index)?;
    value.as_str().ok_or_else(|| {
        mismatch(
            operation,
            format!("argument {index}: expected str, got {}", value.kind()),
        )
    })
}

/// Fetch argument `index` as a float.
pub fn expect_float(operation: &str, args: &[Value], index: usize) -> BridgeResult<f64> {
    let value = arg(operation, args, index)?;
    value.as_float().ok_or_else(|| {
        mismatch(
            operation,
            format!("argument {index}: expected float, got {}", value.kind()),
        )
    })
}

/// Fetch argument `index` as a string, treating `Null` as absent.
pub fn expect_opt_str<'a>(
    operation: &str,
    args: &'a [Value],
    index: usize,
) -> BridgeResult<Option<&'a str>> {
    match arg(operation, args, index)? {
        Value::Null => Ok(None),
        Value::Str(s) => Ok(Some(s)),
        other => Err(mismatch(
            operation,
            format!(
                "argument {index}: expected str or null, got {}",
                other.kind()
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Str("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::Int(3).as_float(), None);
        assert_eq!(Value::Null.as_str(), None);
    }

    #[test]
    fn test_expect_arity_mismatch() {
        let args = vec![Value::Str("only".into())];
        let err = expect_arity("op", &args, 2).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureMismatch { .. }));
        assert!(expect_arity("op", &args, 1).is_ok());
    }

    #[test]
    fn test_expect_str_wrong_type() {
        let args = vec![Value::Int(7)];
        let err = expect_str("op", &args, 0).unwrap_err();
        assert!(matches!(err, BridgeError::SignatureMismatch { .. }));
    }

    #[test]
    fn test_expect_opt_str_null_is_absent() {
        let args = vec![Value::Null, Value::Str("x".into())];
        assert_eq!(expect_opt_str("op", &args, 0).unwrap(), None);
        assert_eq!(expect_opt_str("op", &args, 1).unwrap(), Some("x"));
    }
}
