//! FILENAME: core/table-source/src/value.rs
//! PURPOSE: Defines the scalar values and column dtypes held by a source table.
//! CONTEXT: `Value` is both cell content and the building block of row/column
//! labels, so it implements `Eq` and `Hash` (floats compare bitwise) to be
//! usable as a lookup key. `DType` carries the tabular library's dtype names.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Column data type as reported by the tabular store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DType {
    Int64,
    Float32,
    Float64,
    Bool,
    #[default]
    Object,
}

impl DType {
    /// Whether values of this dtype take part in numeric statistics.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DType::Int64 | DType::Float32 | DType::Float64)
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// Picks the narrowest dtype able to hold all given values.
    pub fn infer(values: &[Value]) -> DType {
        let mut saw_int = false;
        let mut saw_float = false;
        let mut saw_bool = false;
        let mut saw_null = false;

        for v in values {
            match v {
                Value::Null => saw_null = true,
                Value::Int(_) => saw_int = true,
                Value::Float(_) => saw_float = true,
                Value::Bool(_) => saw_bool = true,
                Value::Str(_) | Value::List(_) => return DType::Object,
            }
        }

        match (saw_bool, saw_int, saw_float) {
            (true, false, false) if !saw_null => DType::Bool,
            (false, true, false) if !saw_null => DType::Int64,
            (false, _, _) if saw_int || saw_float => DType::Float64,
            _ => DType::Object,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::Object => "object",
        };
        f.write_str(name)
    }
}

/// A single cell value or label component.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    pub fn text(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// True for `Null` and for float NaN.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value; booleans and text are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Rank used to order values of different kinds against each other.
    fn kind_rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) | Value::Float(_) => 2,
            Value::Str(_) => 3,
            Value::List(_) => 4,
        }
    }

    /// Total order used by sorting. Nulls are handled by the caller
    /// (they always go last), here they simply sort first.
    pub fn sort_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (a, b) if a.kind_rank() == 2 && b.kind_rank() == 2 => {
                let x = a.as_f64().unwrap_or(f64::NAN);
                let y = b.as_f64().unwrap_or(f64::NAN);
                x.total_cmp(&y)
            }
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Str(a), Value::Str(b)) => a.cmp(b),
            (Value::List(a), Value::List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    let ord = x.sort_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (a, b) => a.kind_rank().cmp(&b.kind_rank()),
        }
    }

    /// Representation used inside list values (text is quoted).
    fn repr(&self) -> String {
        match self {
            Value::Str(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

/// Formats a float the way the tabular library prints scalars:
/// whole numbers keep one decimal place, others use the shortest round-trip form.
pub fn float_to_string(f: f64) -> String {
    if f.is_nan() {
        "nan".to_string()
    } else if f.is_infinite() {
        let sign = if f > 0.0 { "" } else { "-" };
        format!("{}inf", sign)
    } else if f.fract() == 0.0 && f.abs() < 1e16 {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("None"),
            Value::Bool(b) => f.write_str(if *b { "True" } else { "False" }),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&float_to_string(*x)),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::repr).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind_rank().hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::Str(s) => s.hash(state),
            Value::List(items) => items.hash(state),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_scalar_printing() {
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(Value::Float(4.0).to_string(), "4.0");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::text("a")]).to_string(),
            "[1, 'a']"
        );
    }

    #[test]
    fn test_sort_cmp_mixes_ints_and_floats() {
        assert_eq!(Value::Int(2).sort_cmp(&Value::Float(2.5)), Ordering::Less);
        assert_eq!(Value::Float(3.0).sort_cmp(&Value::Int(3)), Ordering::Equal);
        assert_eq!(Value::text("b").sort_cmp(&Value::text("a")), Ordering::Greater);
    }

    #[test]
    fn test_nan_is_null() {
        assert!(Value::Float(f64::NAN).is_null());
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
        assert_eq!(Value::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn test_infer_dtype() {
        assert_eq!(DType::infer(&[Value::Int(1), Value::Int(2)]), DType::Int64);
        assert_eq!(DType::infer(&[Value::Int(1), Value::Null]), DType::Float64);
        assert_eq!(DType::infer(&[Value::Float(1.0)]), DType::Float64);
        assert_eq!(DType::infer(&[Value::Bool(true)]), DType::Bool);
        assert_eq!(DType::infer(&[Value::text("x"), Value::Int(1)]), DType::Object);
        assert_eq!(DType::Float32.to_string(), "float32");
    }
}
