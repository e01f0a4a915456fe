//! Arithmetic dispatch.
//!
//! # Responsibilities
//! - Parse the two operands of a calculation request
//! - Map an operation name to its arithmetic
//! - Report typed failures for bad operands, unknown operations and
//!   division by zero
//!
//! # Design Decisions
//! - Pure functions only: no logging, no shared state
//! - Operands are validated before the operation name, so a request with
//!   both problems reports the operand error
//! - `power` follows `f64::powf`; NaN and infinities are not rejected

use std::str::FromStr;
use thiserror::Error;

/// Failure of a single calculation. The `Display` text is sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("Invalid numbers")]
    InvalidNumber,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Invalid operation")]
    InvalidOperation,
}

/// Supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::Add,
        Operation::Subtract,
        Operation::Multiply,
        Operation::Divide,
        Operation::Power,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Add => "add",
            Operation::Subtract => "subtract",
            Operation::Multiply => "multiply",
            Operation::Divide => "divide",
            Operation::Power => "power",
        }
    }

    /// Apply the operation to already parsed operands.
    pub fn apply(&self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operation::Add => Ok(a + b),
            Operation::Subtract => Ok(a - b),
            Operation::Multiply => Ok(a * b),
            Operation::Divide => {
                // -0.0 == 0.0, so both zeros are rejected
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(a / b)
            }
            Operation::Power => Ok(a.powf(b)),
        }
    }
}

impl FromStr for Operation {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Operation::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or(CalcError::InvalidOperation)
    }
}

/// Length of the longest numeric prefix of `s`: an optional sign followed by
/// `Infinity`, or by decimal digits with an optional fraction and exponent.
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    if s[i..].starts_with("Infinity") {
        return i + "Infinity".len();
    }

    let digits = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let int_digits = digits(i);
    i += int_digits;
    let mut frac_digits = 0;
    if bytes.get(i) == Some(&b'.') {
        frac_digits = digits(i + 1);
        if int_digits > 0 || frac_digits > 0 {
            i += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digits(j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }
    i
}

/// Parse a single operand from its leading numeric prefix, ignoring leading
/// whitespace and any trailing text (`"5abc"` is 5, `"0x10"` is 0).
/// Missing input, no numeric prefix and NaN are all invalid.
pub fn parse_operand(raw: Option<&str>) -> Result<f64, CalcError> {
    let s = raw.ok_or(CalcError::InvalidNumber)?.trim_start();
    let prefix = &s[..numeric_prefix_len(s)];

    let value = match prefix.trim_start_matches(|c: char| c == '+' || c == '-') {
        "" => return Err(CalcError::InvalidNumber),
        "Infinity" if prefix.starts_with('-') => f64::NEG_INFINITY,
        "Infinity" => f64::INFINITY,
        _ => prefix.parse().map_err(|_| CalcError::InvalidNumber)?,
    };

    if value.is_nan() {
        return Err(CalcError::InvalidNumber);
    }
    Ok(value)
}

/// Result of a successful calculation, with the parsed operands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calculation {
    pub operation: Operation,
    pub a: f64,
    pub b: f64,
    pub result: f64,
}

/// Parse both operands, resolve `op` and compute the result.
pub fn calculate(op: &str, a: Option<&str>, b: Option<&str>) -> Result<Calculation, CalcError> {
    let a = parse_operand(a)?;
    let b = parse_operand(b)?;
    let operation: Operation = op.parse()?;
    let result = operation.apply(a, b)?;

    Ok(Calculation {
        operation,
        a,
        b,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calc(op: &str, a: &str, b: &str) -> Result<f64, CalcError> {
        calculate(op, Some(a), Some(b)).map(|c| c.result)
    }

    #[test]
    fn test_basic_operations() {
        assert_eq!(calc("add", "5", "3"), Ok(8.0));
        assert_eq!(calc("subtract", "10", "4"), Ok(6.0));
        assert_eq!(calc("multiply", "6", "7"), Ok(42.0));
        assert_eq!(calc("divide", "20", "4"), Ok(5.0));
        assert_eq!(calc("power", "2", "3"), Ok(8.0));
    }

    #[test]
    fn test_fractional_and_negative_operands() {
        assert_eq!(calc("add", "0.5", "-1.25"), Ok(-0.75));
        assert_eq!(calc("divide", "1", "4"), Ok(0.25));
        assert_eq!(calc("power", "2", "-2"), Ok(0.25));

        let root = calc("power", "2", "0.5").unwrap();
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_power_propagates_nan() {
        let result = calc("power", "-8", "0.5").unwrap();
        assert!(result.is_nan());
    }

    #[test]
    fn test_division_by_zero() {
        for a in ["0", "1", "-3.5", "1e300"] {
            assert_eq!(calc("divide", a, "0"), Err(CalcError::DivisionByZero));
        }
        assert_eq!(calc("divide", "1", "-0"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_invalid_numbers() {
        for op in ["add", "subtract", "multiply", "divide", "power", "unknown"] {
            assert_eq!(calc(op, "abc", "1"), Err(CalcError::InvalidNumber));
            assert_eq!(calc(op, "1", "abc"), Err(CalcError::InvalidNumber));
        }
        assert_eq!(calc("add", "NaN", "1"), Err(CalcError::InvalidNumber));
        assert_eq!(calc("add", "", "1"), Err(CalcError::InvalidNumber));
    }

    #[test]
    fn test_missing_operand() {
        assert_eq!(
            calculate("add", Some("1"), None).map(|c| c.result),
            Err(CalcError::InvalidNumber)
        );
        assert_eq!(
            calculate("add", None, None).map(|c| c.result),
            Err(CalcError::InvalidNumber)
        );
    }

    #[test]
    fn test_invalid_operation() {
        assert_eq!(calc("unknown", "1", "2"), Err(CalcError::InvalidOperation));
        assert_eq!(calc("ADD", "1", "2"), Err(CalcError::InvalidOperation));
    }

    #[test]
    fn test_numeric_prefix_parsing() {
        assert_eq!(parse_operand(Some("5abc")), Ok(5.0));
        assert_eq!(parse_operand(Some("0x10")), Ok(0.0));
        assert_eq!(parse_operand(Some("1e3x")), Ok(1000.0));
        assert_eq!(parse_operand(Some(" 5")), Ok(5.0));
        assert_eq!(parse_operand(Some("\t-2.5e-1 ")), Ok(-0.25));
        assert_eq!(parse_operand(Some(".5")), Ok(0.5));
        assert_eq!(parse_operand(Some("5.")), Ok(5.0));
        assert_eq!(parse_operand(Some("3e")), Ok(3.0));
        assert_eq!(parse_operand(Some("+7")), Ok(7.0));
    }

    #[test]
    fn test_infinity_spelling() {
        assert_eq!(parse_operand(Some("Infinity")), Ok(f64::INFINITY));
        assert_eq!(parse_operand(Some("-Infinityx")), Ok(f64::NEG_INFINITY));
        for raw in ["inf", "infinity", "INFINITY", "-inf", "NaN", ".", "-", "e5", "abc"] {
            assert_eq!(parse_operand(Some(raw)), Err(CalcError::InvalidNumber), "{raw}");
        }
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let calc = calculate("add", Some(" 5 "), Some("3")).unwrap();
        assert_eq!(calc.a, 5.0);
        assert_eq!(calc.operation, Operation::Add);
        assert_eq!(calc.result, 8.0);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(CalcError::InvalidNumber.to_string(), "Invalid numbers");
        assert_eq!(CalcError::DivisionByZero.to_string(), "Division by zero");
        assert_eq!(CalcError::InvalidOperation.to_string(), "Invalid operation");
    }
}
