/// Formats a whole-rupee amount with Indian digit grouping: the last three
/// digits form one group, every group above that has two digits.
/// `1234567` renders as `12,34,567`.
pub fn format_inr(amount: i64) -> String {
    let negative = amount < 0;
    let digits = amount.unsigned_abs().to_string();

    let mut grouped = String::new();
    let len = digits.len();
    if len <= 3 {
        grouped.push_str(&digits);
    } else {
        let head = &digits[..len - 3];
        let tail = &digits[len - 3..];
        let mut head_groups = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let split = rest.len() - 2;
            head_groups.push(&rest[split..]);
            rest = &rest[..split];
        }
        head_groups.push(rest);
        head_groups.reverse();
        grouped.push_str(&head_groups.join(","));
        grouped.push(',');
        grouped.push_str(tail);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Converts a whole-rupee amount to paise, the unit payment gateways expect.
pub fn rupees_to_paise(amount: i64) -> i64 {
    amount * 100
}
