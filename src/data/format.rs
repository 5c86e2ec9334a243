/// Placeholder shown for a value that is undefined (e.g. the average of no sales).
pub const UNDEFINED: &str = "—";

/// Group the digits of a non-negative integer string with commas.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234.5` → `$1,235` with `decimals = 0`, `$1,234.50` with `decimals = 2`.
pub fn format_currency(value: f64, decimals: usize, symbol: &str) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = format!("{sign}{symbol}{}", group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Like [`format_currency`] but renders `None` as [`UNDEFINED`].
pub fn format_optional_currency(value: Option<f64>, decimals: usize, symbol: &str) -> String {
    value
        .map(|v| format_currency(v, decimals, symbol))
        .unwrap_or_else(|| UNDEFINED.to_string())
}

/// `1234567` → `1,234,567`.
pub fn format_count(n: u64) -> String {
    group_thousands(&n.to_string())
}
