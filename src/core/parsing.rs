use crate::models::CellValue;

/// Unit suffixes stripped before numeric parsing, in stripping order
const UNIT_SUFFIXES: [&str; 3] = ["mg", "g", "kcal"];

/// Parse a unit-bearing quantity such as `"1,500kcal"` or `"120mg"`
///
/// Thousands separators and the `mg`/`g`/`kcal` suffixes are removed before
/// parsing. Returns `None` for null cells, unparseable text and non-finite
/// numbers; never fails.
pub fn parse_quantity(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Number(_) | CellValue::Null => None,
        CellValue::Text(text) => strip_and_parse(text),
    }
}

/// Text-only variant of [`parse_quantity`]
#[inline]
pub fn strip_and_parse(text: &str) -> Option<f64> {
    let mut cleaned = text.replace(',', "");
    for suffix in UNIT_SUFFIXES {
        cleaned = cleaned.replace(suffix, "");
    }

    match cleaned.trim().parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            tracing::trace!("Unparseable quantity: {:?}", text);
            None
        }
    }
}

/// Split a comma- or semicolon-delimited list into trimmed, non-empty tokens
pub fn split_list(value: &CellValue) -> Vec<String> {
    let Some(text) = value.as_text() else {
        return Vec::new();
    };

    text.split([',', ';'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
