//! Display formatting for money.

/// Format a rupee amount with Indian digit grouping, rounded to whole rupees.
///
/// `1234567.4` → `₹12,34,567`. Non-finite input renders as `₹0`.
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹0".to_string();
    }
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());
    format!("{sign}₹{}", group_indian(&digits))
}

/// Last three digits, then groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
