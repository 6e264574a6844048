/// Форматирование дат для таблиц
///
/// Inputs are whatever the backend sends (RFC 3339, `YYYY-MM-DD HH:MM:SS`, bare dates);
/// anything unparseable is returned unchanged.
use contracts::shared::time_window::parse_instant_str;

/// `2024-03-15T14:02:26Z` -> `15 Mar 2024, 14:02`
pub fn format_datetime(datetime_str: &str) -> String {
    parse_instant_str(datetime_str)
        .map(|instant| instant.format("%d %b %Y, %H:%M").to_string())
        .unwrap_or_else(|| datetime_str.to_string())
}

/// `2024-03-15` or `2024-03-15T14:02:26Z` -> `15 Mar 2024`
pub fn format_date(date_str: &str) -> String {
    parse_instant_str(date_str)
        .map(|instant| instant.format("%d %b %Y").to_string())
        .unwrap_or_else(|| date_str.to_string())
}

/// Amount in Kenyan shillings with thousands separators: `KES 12,500.00`
pub fn format_money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("KES {}{}.{:02}", sign, grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        assert_eq!(format_datetime("2024-03-15T14:02:26.123Z"), "15 Mar 2024, 14:02");
        assert_eq!(format_datetime("2024-12-31 23:59:59"), "31 Dec 2024, 23:59");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15 Mar 2024");
        assert_eq!(format_date("2024-03-15T14:02:26Z"), "15 Mar 2024");
    }

    #[test]
    fn test_invalid_format() {
        assert_eq!(format_datetime("invalid"), "invalid");
        assert_eq!(format_date(""), "");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0.0), "KES 0.00");
        assert_eq!(format_money(1500.0), "KES 1,500.00");
        assert_eq!(format_money(1234567.891), "KES 1,234,567.89");
        assert_eq!(format_money(-250.5), "KES -250.50");
    }
}
