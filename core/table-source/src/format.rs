//! FILENAME: core/table-source/src/format.rs
//! PURPOSE: Native value formatting for rendered cells.
//! CONTEXT: Mirrors how the tabular store displays cell values: floats use a
//! fixed display precision, missing values print as `nan`/`None` depending on
//! the column dtype, everything else uses the scalar representation.

use crate::value::{float_to_string, DType, Value};

/// Default number of decimal places for float cells.
pub const DEFAULT_PRECISION: usize = 6;

/// Format a cell value of a column with the given dtype.
pub fn format_value(value: &Value, dtype: DType) -> String {
    format_value_with_precision(value, dtype, DEFAULT_PRECISION)
}

/// Format a cell value using an explicit float precision.
pub fn format_value_with_precision(value: &Value, dtype: DType, precision: usize) -> String {
    match value {
        Value::Null => format_missing(dtype),
        Value::Float(f) if f.is_nan() => "nan".to_string(),
        Value::Float(f) => format_float(*f, precision),
        // ints stored in a float column still display like floats
        Value::Int(i) if dtype.is_float() => format_float(*i as f64, precision),
        other => other.to_string(),
    }
}

fn format_missing(dtype: DType) -> String {
    if dtype.is_numeric() {
        "nan".to_string()
    } else {
        "None".to_string()
    }
}

fn format_float(value: f64, precision: usize) -> String {
    if value.is_infinite() {
        return float_to_string(value);
    }
    format!("{:.prec$}", value, prec = precision)
}

/// Format a label component for headers. Labels never use the float precision.
pub fn format_label_value(value: &Value) -> String {
    match value {
        Value::Float(f) => float_to_string(*f),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ints_print_plain() {
        assert_eq!(format_value(&Value::Int(42), DType::Int64), "42");
        assert_eq!(format_value(&Value::Int(-3), DType::Int64), "-3");
    }

    #[test]
    fn test_floats_use_display_precision() {
        assert_eq!(format_value(&Value::Float(4.0), DType::Float32), "4.000000");
        assert_eq!(format_value(&Value::Float(1.23456789), DType::Float64), "1.234568");
        assert_eq!(format_value(&Value::Int(5), DType::Float64), "5.000000");
        assert_eq!(format_value_with_precision(&Value::Float(2.5), DType::Float64, 2), "2.50");
    }

    #[test]
    fn test_missing_values() {
        assert_eq!(format_value(&Value::Null, DType::Float64), "nan");
        assert_eq!(format_value(&Value::Float(f64::NAN), DType::Float64), "nan");
        assert_eq!(format_value(&Value::Null, DType::Object), "None");
    }

    #[test]
    fn test_other_values() {
        assert_eq!(format_value(&Value::Bool(false), DType::Bool), "False");
        assert_eq!(format_value(&Value::text("abc"), DType::Object), "abc");
        assert_eq!(format_label_value(&Value::Float(2.0)), "2.0");
    }
}
