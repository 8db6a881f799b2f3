use crate::error::{ChallengeError, Result};
use crate::types::Value;

/// 把字符串解析为浮点数，忽略前后空白
fn parse_float(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    // Rust的parse接受 nan / inf / infinity（大小写不敏感，可带符号）
    s.parse::<f64>().ok()
}

/// Checks whether a token represents a number (including `nan` and `inf`).
pub fn is_number(s: &str) -> bool {
    parse_float(s).is_some()
}

/// Checks whether a token represents a number with no fractional part.
///
/// `"2.0"` and `"1e3"` are integers, `"inf"` and `"nan"` are not.
pub fn is_integer(s: &str) -> bool {
    parse_float(s).map_or(false, |v| v.fract() == 0.0)
}

/// Checks whether a token represents a finite number.
pub fn is_finite_number(s: &str) -> bool {
    parse_float(s).map_or(false, f64::is_finite)
}

/// Checks whether a token represents NaN.
pub fn is_nan(s: &str) -> bool {
    parse_float(s).map_or(false, f64::is_nan)
}

/// Casts a token to an integer, a float or [`Value::Unknown`], in that order.
///
/// # Errors
///
/// * `ChallengeError::UnsupportedValue` - the token is not number-like at all
///
/// # Examples
///
/// ```rust
/// use ecgchallenge::{cast, Value};
///
/// assert_eq!(cast("2").unwrap(), Value::Integer(2));
/// assert_eq!(cast("2.0").unwrap(), Value::Integer(2));
/// assert_eq!(cast("2.5").unwrap(), Value::Float(2.5));
/// assert_eq!(cast("nan").unwrap(), Value::Unknown);
/// assert!(cast("abc").is_err());
/// ```
pub fn cast(s: &str) -> Result<Value> {
    if let Some(v) = parse_integer(s) {
        Ok(Value::Integer(v))
    } else if is_finite_number(s) {
        parse_float(s).map(Value::Float).ok_or_else(|| ChallengeError::UnsupportedValue(s.to_string()))
    } else if is_number(s) {
        Ok(Value::Unknown)
    } else {
        Err(ChallengeError::UnsupportedValue(s.to_string()))
    }
}

/// 整数字段解析，非整数或超出i64范围返回None
pub fn parse_integer(s: &str) -> Option<i64> {
    // 2^63 本身不可表示，上界取开区间
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    parse_float(s)
        .filter(|v| v.fract() == 0.0 && *v >= -I64_BOUND && *v < I64_BOUND)
        .map(|v| v as i64)
}

/// 数值字段解析，非数字返回None
pub fn parse_number(s: &str) -> Option<f64> {
    parse_float(s)
}
