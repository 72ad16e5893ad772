//! Number formatting for summary sentences

/// Format a value with no decimals and comma-grouped thousands
///
/// Rounds half to even, so `2.5` renders as `2` and `3.5` as `4`.
pub fn format_grouped(value: f64) -> String {
    let digits = format!("{:.0}", value.abs().round_ties_even());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if value.is_sign_negative() && grouped != "0" {
        grouped.insert(0, '-');
    }
    grouped
}
