//! `print` formatting.

use brs_values::Value;

/// Width of a print zone; `,` advances to the next zone boundary.
pub const PRINT_ZONE_WIDTH: usize = 16;

/// Line ending written after a `print` that does not end in `;`.
pub const PRINT_NEWLINE: &str = "\r\n";

/// Spaces that move `column` to the start of the next print zone.
///
/// A column already on a boundary moves a full zone.
pub fn zone_padding(column: usize) -> String {
    let filled = column.checked_rem(PRINT_ZONE_WIDTH).unwrap_or(0);
    " ".repeat(PRINT_ZONE_WIDTH.saturating_sub(filled))
}

/// Text of one printed expression. Non-negative numbers and NaN get a
/// leading space where the sign would go.
pub fn format_item(value: &Value) -> String {
    match value.unbox().as_number() {
        Some(number) if number.is_positive_or_nan() => format!(" {value}"),
        _ => value.to_string(),
    }
}
