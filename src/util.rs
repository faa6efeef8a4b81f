// ---------------------------------------------------------------------------
// Number formatting helpers
// ---------------------------------------------------------------------------

/// Insert thousands separators into a plain digit string.
fn group_digits(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(*b as char);
    }
    out
}

/// Format a count with thousands separators: `2478861` → `"2,478,861"`.
pub fn format_count(n: u64) -> String {
    group_digits(&n.to_string())
}

/// Format a number with thousands separators and a fixed number of
/// decimals: `1234.567` at 2 decimals → `"1,234.57"`.
pub fn format_number(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return format!("{v}");
    }
    let magnitude = format!("{:.*}", decimals, v.abs());
    let (int_part, frac_part) = magnitude
        .split_once('.')
        .map_or((magnitude.as_str(), ""), |(i, f)| (i, f));

    let mut out = group_digits(int_part);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    // Sign follows the rounded magnitude so -0.2 at 0 decimals is "0".
    if v < 0.0 && magnitude.bytes().any(|b| b.is_ascii_digit() && b != b'0') {
        out.insert(0, '-');
    }
    out
}

/// Format a currency amount to whole dollars: `-12345.6` → `"-$12,346"`.
pub fn format_currency(v: f64) -> String {
    let n = format_number(v, 0);
    match n.strip_prefix('-') {
        Some(magnitude) => format!("-${magnitude}"),
        None => format!("${n}"),
    }
}
