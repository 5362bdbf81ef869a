/// Prices are integer paise to avoid floating-point drift in cart totals.
/// 1 rupee = 100 paise, so ₹5.00 = 500 paise.
pub type Paise = i64;

/// Convert whole rupees into paise.
pub const fn rupees(amount: i64) -> Paise {
    amount * 100
}

/// Format paise as a rupee string.
/// Example: 500 -> "₹5.00", 1250 -> "₹12.50", -75 -> "-₹0.75"
pub fn format_rupees(paise: Paise) -> String {
    let sign = if paise < 0 { "-" } else { "" };
    let abs_paise = paise.abs();
    format!("{}₹{}.{:02}", sign, abs_paise / 100, abs_paise % 100)
}
