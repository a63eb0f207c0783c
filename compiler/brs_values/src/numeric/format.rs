//! Text forms of floating-point values.
//!
//! `Float` prints like C's `%g` (6 significant digits, trailing zeros
//! stripped). `Double` prints the shortest round-trip digits with the
//! JavaScript `Number.prototype.toString` layout.

/// Splits the shortest (or `precision`-limited) scientific form of a finite,
/// non-negative `value` into its digits and decimal exponent.
fn scientific_parts(formatted: &str) -> (String, i32) {
    let (mantissa, exponent) = formatted.split_once('e').unwrap_or((formatted, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent.parse().unwrap_or(0))
}

fn exponent_suffix(exponent: i32, min_digits: usize) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{sign}{:0min_digits$}", exponent.unsigned_abs())
}

/// Inserts a decimal point after the first `point` digits, padding with
/// zeros on either side when needed.
fn place_point(digits: &str, point: i32) -> String {
    let len = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    if point <= 0 {
        let zeros = "0".repeat(usize::try_from(point.unsigned_abs()).unwrap_or(0));
        format!("0.{zeros}{digits}")
    } else if point >= len {
        let zeros = "0".repeat(usize::try_from(point.saturating_sub(len)).unwrap_or(0));
        format!("{digits}{zeros}")
    } else {
        let split = usize::try_from(point).unwrap_or(0);
        format!("{}.{}", &digits[..split], &digits[split..])
    }
}

fn with_fraction(digits: &str) -> String {
    match digits.split_at_checked(1) {
        Some((head, tail)) if !tail.is_empty() => format!("{head}.{tail}"),
        _ => digits.to_owned(),
    }
}

/// C `printf("%g", value)`.
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_owned();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, exponent) = scientific_parts(&format!("{:.5e}", value.abs()));
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    let body = if exponent < -4 || exponent >= PRECISION {
        format!("{}e{}", with_fraction(digits), exponent_suffix(exponent, 2))
    } else {
        place_point(digits, exponent.saturating_add(1))
    };
    format!("{sign}{body}")
}

/// JavaScript `Number.prototype.toString()`.
pub fn format_js(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let (digits, exponent) = scientific_parts(&format!("{:e}", value.abs()));
    let point = exponent.saturating_add(1);

    let body = if (-5..=21).contains(&point) {
        place_point(&digits, point)
    } else {
        format!("{}e{}", with_fraction(&digits), exponent_suffix(point.saturating_sub(1), 1))
    };
    format!("{sign}{body}")
}
