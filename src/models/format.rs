//! Display helpers shared by the CLI and the API row builders.

/// "$1234.50"
pub fn fmt_money(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// "+$12.00" / "-$12.00" / "$0.00"
pub fn fmt_signed_money(amount: f64) -> String {
    if amount > 0.0 {
        format!("+${:.2}", amount)
    } else if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        "$0.00".to_string()
    }
}

/// American odds with an explicit sign, "-" when unset.
pub fn fmt_odds(odds: i32) -> String {
    if odds == 0 {
        "-".to_string()
    } else {
        format!("{:+}", odds)
    }
}

/// "12.5%"
pub fn fmt_percent(value: f64) -> String {
    format!("{:.1}%", value)
}
