//! The numeric tower.
//!
//! Four representations with a fixed promotion lattice:
//!
//! | kind     | storage | construction                                      |
//! |----------|---------|---------------------------------------------------|
//! | `Int32`  | `i32`   | floats truncate and saturate; `Int64` keeps the low 32 bits |
//! | `Int64`  | `i64`   | floats truncate and saturate                      |
//! | `Float`  | `Float` | rounded to `f32`, then to 7 significant digits    |
//! | `Double` | `f64`   | as is                                             |
//!
//! Operators live on `Number` and return the kind the device returns for
//! each operand pair. A few of those are surprising (`Double ^ Integer`
//! yields a `Float`; `and`/`or` against a `Boolean` yields a `Boolean`);
//! they are reproduced on purpose.

mod format;

use std::cmp::Ordering;
use std::fmt;

use brs_ir::ValueKind;

pub use format::{format_g, format_js};

const FLOAT_SIGNIFICANT_DIGITS: usize = 7;

/// Single-precision value, normalized on construction.
///
/// The stored `f64` is always the nearest value with 7 significant decimal
/// digits to the `f32` rounding of the input.
#[derive(Copy, Clone, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Float(f64);

impl Float {
    pub fn new(value: f64) -> Self {
        let single = f64::from(value as f32);
        if !single.is_finite() || single == 0.0 {
            return Float(single);
        }
        Float(round_significant(single).unwrap_or(single))
    }

    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl fmt::Debug for Float {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}f", self.0)
    }
}

/// Digits of the exact decimal expansion of any `f32` value fit in this
/// many places after the leading digit.
const EXACT_F32_DIGITS: usize = 120;

/// Rounds a finite, non-zero value to 7 significant digits, ties away
/// from zero.
///
/// The exact decimal expansion decides the rounding; the 7-digit result
/// is then parsed back, so it is the `f64` nearest to that decimal.
fn round_significant(value: f64) -> Option<f64> {
    let exact = format!("{:.prec$e}", value.abs(), prec = EXACT_F32_DIGITS);
    let (digits, exponent) = exact.split_once('e')?;
    let exponent: i32 = exponent.parse().ok()?;
    let mut digits = digits.chars().filter(char::is_ascii_digit);

    let mut mantissa: u32 = 0;
    for _ in 0..FLOAT_SIGNIFICANT_DIGITS {
        let digit = digits.next()?.to_digit(10)?;
        mantissa = mantissa.checked_mul(10)?.checked_add(digit)?;
    }
    if digits.next()?.to_digit(10)? >= 5 {
        mantissa = mantissa.checked_add(1)?;
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let shift = exponent.checked_sub(6)?;
    format!("{sign}{mantissa}e{shift}").parse().ok()
}

/// Saturating, truncating float to `Int32` conversion. NaN maps to 0.
#[inline]
pub fn int32_from_f64(value: f64) -> i32 {
    value as i32
}

/// `Int64` to `Int32` conversion: keeps the low 32 bits.
#[inline]
pub fn int32_from_i64(value: i64) -> i32 {
    value as i32
}

/// Saturating `Int64` to `Int32` conversion for integer quotients.
#[inline]
fn saturate_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Saturating, truncating float to `Int64` conversion. NaN maps to 0.
#[inline]
pub fn int64_from_f64(value: f64) -> i64 {
    value as i64
}

/// Modular float to 32-bit conversion used by bitwise operators.
///
/// Non-finite values map to 0; everything else is truncated and wrapped
/// modulo 2^32.
pub fn wrap_to_int32(value: f64) -> i32 {
    if !value.is_finite() {
        return 0;
    }
    let wrapped = value.trunc().rem_euclid(4_294_967_296.0);
    (wrapped as u32) as i32
}

/// Result of `and`/`or`: numeric operands give a number, a `Boolean`
/// operand switches to logical semantics.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BitwiseResult {
    Number(Number),
    Boolean(bool),
}

/// Right-hand side of `and`/`or`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BitwiseOperand {
    Number(Number),
    Boolean(bool),
}

/// A value of one of the four numeric kinds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Number {
    Int32(i32),
    Int64(i64),
    Float(Float),
    Double(f64),
}

impl Number {
    pub fn float(value: f64) -> Self {
        Number::Float(Float::new(value))
    }

    pub fn kind(self) -> ValueKind {
        match self {
            Number::Int32(_) => ValueKind::Int32,
            Number::Int64(_) => ValueKind::Int64,
            Number::Float(_) => ValueKind::Float,
            Number::Double(_) => ValueKind::Double,
        }
    }

    /// Host double value; `Int64` may lose precision.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int32(v) => f64::from(v),
            Number::Int64(v) => v as f64,
            Number::Float(v) => v.get(),
            Number::Double(v) => v,
        }
    }

    /// Nonzero after truncation.
    pub fn to_boolean(self) -> bool {
        match self {
            Number::Int32(v) => v != 0,
            Number::Int64(v) => v != 0,
            Number::Float(v) => v.get().trunc() != 0.0,
            Number::Double(v) => v.trunc() != 0.0,
        }
    }

    /// Converts into `kind`, following the construction rules of the
    /// target. Returns `None` for non-numeric kinds.
    pub fn convert(self, kind: ValueKind) -> Option<Number> {
        let converted = match kind {
            ValueKind::Int32 => Number::Int32(match self {
                Number::Int32(v) => v,
                Number::Int64(v) => int32_from_i64(v),
                other => int32_from_f64(other.as_f64()),
            }),
            ValueKind::Int64 => Number::Int64(match self {
                Number::Int32(v) => i64::from(v),
                Number::Int64(v) => v,
                other => int64_from_f64(other.as_f64()),
            }),
            ValueKind::Float => Number::float(self.as_f64()),
            ValueKind::Double => Number::Double(self.as_f64()),
            _ => return None,
        };
        Some(converted)
    }

    /// Shared promotion for `+`, `-` and `*`.
    fn promote(
        self,
        rhs: Number,
        int32: fn(i32, i32) -> i32,
        int64: fn(i64, i64) -> i64,
        float: fn(f64, f64) -> f64,
    ) -> Number {
        match (self, rhs) {
            (Number::Int32(a), Number::Int32(b)) => Number::Int32(int32(a, b)),
            (Number::Int32(a), Number::Int64(b)) => Number::Int64(int64(i64::from(a), b)),
            (Number::Int64(a), Number::Int32(b)) => Number::Int64(int64(a, i64::from(b))),
            (Number::Int64(a), Number::Int64(b)) => Number::Int64(int64(a, b)),
            (Number::Double(_), _) | (_, Number::Double(_)) => {
                Number::Double(float(self.as_f64(), rhs.as_f64()))
            }
            _ => Number::float(float(self.as_f64(), rhs.as_f64())),
        }
    }

    /// `+`; 32-bit integers wrap modulo 2^32.
    #[must_use]
    pub fn add(self, rhs: Number) -> Number {
        self.promote(rhs, i32::wrapping_add, i64::wrapping_add, |a, b| a + b)
    }

    #[must_use]
    pub fn sub(self, rhs: Number) -> Number {
        self.promote(rhs, i32::wrapping_sub, i64::wrapping_sub, |a, b| a - b)
    }

    #[must_use]
    pub fn mul(self, rhs: Number) -> Number {
        self.promote(rhs, i32::wrapping_mul, i64::wrapping_mul, |a, b| a * b)
    }

    /// `/` never yields an integer kind.
    #[must_use]
    pub fn div(self, rhs: Number) -> Number {
        let quotient = self.as_f64() / rhs.as_f64();
        match (self, rhs) {
            (Number::Double(_), _) | (_, Number::Double(_)) => Number::Double(quotient),
            _ => Number::float(quotient),
        }
    }

    /// `mod`: integer remainder, or the truncated float remainder.
    ///
    /// An integer zero divisor does not fail: the remainder is NaN, which
    /// an integer kind stores as 0.
    #[must_use]
    pub fn modulo(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int32(a), Number::Int32(b)) => Number::Int32(a.checked_rem(b).unwrap_or(0)),
            (Number::Int32(_) | Number::Int64(_), Number::Int64(_))
            | (Number::Int64(_), Number::Int32(_)) => {
                Number::Int64(self.as_i64().checked_rem(rhs.as_i64()).unwrap_or(0))
            }
            (Number::Double(_), _) | (_, Number::Double(_)) => {
                Number::Double((self.as_f64() % rhs.as_f64()).trunc())
            }
            _ => Number::float((self.as_f64() % rhs.as_f64()).trunc()),
        }
    }

    /// `\`: truncating division.
    ///
    /// `Int64` on either side yields `Int64`; everything else yields `Int32`.
    /// The quotient saturates, so an integer zero divisor gives the kind's
    /// maximum or minimum (0 for `0 \ 0`).
    #[must_use]
    pub fn int_divide(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int32(a), Number::Int32(b)) => match i64::from(a).checked_div(i64::from(b)) {
                Some(quotient) => Number::Int32(saturate_to_i32(quotient)),
                None => Number::Int32(int32_from_f64(f64::from(a) / 0.0)),
            },
            (Number::Int32(_) | Number::Int64(_), Number::Int64(_))
            | (Number::Int64(_), Number::Int32(_)) => {
                let (a, b) = (self.as_i64(), rhs.as_i64());
                match a.checked_div(b) {
                    Some(quotient) => Number::Int64(quotient),
                    // `i64::MIN / -1` overflows; a zero divisor goes through floats.
                    None if b == 0 => Number::Int64(int64_from_f64(self.as_f64() / 0.0)),
                    None => Number::Int64(i64::MAX),
                }
            }
            (Number::Int64(_), _) | (_, Number::Int64(_)) => {
                Number::Int64(int64_from_f64((self.as_f64() / rhs.as_f64()).trunc()))
            }
            _ => Number::Int32(int32_from_f64((self.as_f64() / rhs.as_f64()).trunc())),
        }
    }

    /// `^`.
    ///
    /// A `Double` exponent always yields a `Double`. An `Int64` on an
    /// integer side yields `Int64`. A `Double` base with an `Integer` or
    /// `Float` exponent yields a `Float`.
    #[must_use]
    pub fn pow(self, exponent: Number) -> Number {
        let power = self.as_f64().powf(exponent.as_f64());
        match (self, exponent) {
            (_, Number::Double(_)) => Number::Double(power),
            (Number::Float(_), _) => Number::float(power),
            (_, Number::Int64(_)) | (Number::Int64(_), Number::Int32(_)) => {
                Number::Int64(int64_from_f64(power))
            }
            _ => Number::float(power),
        }
    }

    /// Shift amount taken from a right operand.
    fn shift_amount(self) -> u32 {
        match self {
            Number::Int32(v) => v as u32,
            Number::Int64(v) => v as u32,
            other => wrap_to_int32(other.as_f64()) as u32,
        }
    }

    /// `<<`. The evaluator has already rejected amounts outside `0..32`.
    #[must_use]
    pub fn shl(self, rhs: Number) -> Number {
        let amount = rhs.shift_amount();
        match self {
            Number::Int32(v) => Number::Int32(v.wrapping_shl(amount)),
            Number::Int64(v) => Number::Int64(v.wrapping_shl(amount)),
            other => Number::Int32(wrap_to_int32(other.as_f64()).wrapping_shl(amount)),
        }
    }

    /// `>>`. Logical for `Integer` operands, arithmetic for the others.
    #[must_use]
    pub fn shr(self, rhs: Number) -> Number {
        let amount = rhs.shift_amount();
        match self {
            Number::Int32(v) => {
                let logical = (v as u32).wrapping_shr(amount);
                Number::Int32(i32::try_from(logical).unwrap_or(i32::MAX))
            }
            Number::Int64(v) => Number::Int64(v.wrapping_shr(amount)),
            other => Number::Int32(wrap_to_int32(other.as_f64()).wrapping_shr(amount)),
        }
    }

    fn bitwise(
        self,
        rhs: BitwiseOperand,
        int32: fn(i32, i32) -> i32,
        int64: fn(i64, i64) -> i64,
        logical: fn(bool, bool) -> bool,
    ) -> BitwiseResult {
        let rhs = match rhs {
            BitwiseOperand::Boolean(b) => {
                return BitwiseResult::Boolean(logical(self.to_boolean(), b));
            }
            BitwiseOperand::Number(n) => n,
        };
        let number = match (self, rhs) {
            (Number::Int64(_), _) | (_, Number::Int64(_)) => {
                Number::Int64(int64(self.as_i64(), rhs.as_i64()))
            }
            (Number::Int32(a), Number::Int32(b)) => Number::Int32(int32(a, b)),
            _ => Number::Int32(int32(
                wrap_to_int32(self.as_f64()),
                wrap_to_int32(rhs.as_f64()),
            )),
        };
        BitwiseResult::Number(number)
    }

    pub fn and(self, rhs: BitwiseOperand) -> BitwiseResult {
        self.bitwise(rhs, |a, b| a & b, |a, b| a & b, |a, b| a && b)
    }

    pub fn or(self, rhs: BitwiseOperand) -> BitwiseResult {
        self.bitwise(rhs, |a, b| a | b, |a, b| a | b, |a, b| a || b)
    }

    /// Bitwise complement; float kinds complement their 32-bit wrap.
    #[must_use]
    pub fn not(self) -> Number {
        match self {
            Number::Int32(v) => Number::Int32(!v),
            Number::Int64(v) => Number::Int64(!v),
            other => Number::Int32(!wrap_to_int32(other.as_f64())),
        }
    }

    /// Unary minus: multiplication by `Integer -1`.
    #[must_use]
    pub fn negate(self) -> Number {
        self.mul(Number::Int32(-1))
    }

    /// Ordering used by `<`, `>` and `=`. `Int64` pairs compare exactly,
    /// everything else as host doubles. `None` when either side is NaN.
    pub fn compare(self, rhs: Number) -> Option<Ordering> {
        match (self, rhs) {
            (Number::Int64(a), Number::Int64(b)) => Some(a.cmp(&b)),
            (Number::Int32(a), Number::Int32(b)) => Some(a.cmp(&b)),
            _ => self.as_f64().partial_cmp(&rhs.as_f64()),
        }
    }

    pub fn less_than(self, rhs: Number) -> bool {
        self.compare(rhs) == Some(Ordering::Less)
    }

    pub fn greater_than(self, rhs: Number) -> bool {
        self.compare(rhs) == Some(Ordering::Greater)
    }

    pub fn equal_to(self, rhs: Number) -> bool {
        self.compare(rhs) == Some(Ordering::Equal)
    }

    /// Non-negative or NaN; `print` puts a space in front of these.
    pub fn is_positive_or_nan(self) -> bool {
        match self {
            Number::Int32(v) => v >= 0,
            Number::Int64(v) => v >= 0,
            other => {
                let v = other.as_f64();
                v.is_nan() || v >= 0.0
            }
        }
    }

    /// Integers widen exactly; floats truncate and saturate.
    fn as_i64(self) -> i64 {
        match self {
            Number::Int32(v) => i64::from(v),
            Number::Int64(v) => v,
            other => int64_from_f64(other.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int32(v) => write!(f, "{v}"),
            Number::Int64(v) => write!(f, "{v}"),
            Number::Float(v) if v.get().is_nan() => f.write_str("nan"),
            Number::Float(v) => f.write_str(&format_g(v.get())),
            Number::Double(v) if v.is_nan() => f.write_str("nan"),
            Number::Double(v) => f.write_str(&format_js(*v)),
        }
    }
}
