//! Currency formatting for the kiosk's single locale (pt-BR, BRL).

/// Formats an amount in cents as Brazilian reais, e.g. `1900` → `"R$ 19,00"`
/// and `123456` → `"R$ 1.234,56"`.
pub fn format_brl(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let reais = (abs / 100).to_string();
    let centavos = abs % 100;

    let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
    for (i, ch) in reais.chars().enumerate() {
        if i > 0 && (reais.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}R$ {},{:02}", sign, grouped, centavos)
}

#[cfg(test)]
mod tests {
    use super::format_brl;

    #[test]
    fn formats_whole_and_fractional_amounts() {
        assert_eq!(format_brl(0), "R$ 0,00");
        assert_eq!(format_brl(5), "R$ 0,05");
        assert_eq!(format_brl(500), "R$ 5,00");
        assert_eq!(format_brl(1900), "R$ 19,00");
    }

    #[test]
    fn groups_thousands_with_dots() {
        assert_eq!(format_brl(123_456), "R$ 1.234,56");
        assert_eq!(format_brl(99_999_999), "R$ 999.999,99");
        assert_eq!(format_brl(100_000_000), "R$ 1.000.000,00");
    }

    #[test]
    fn keeps_sign_in_front() {
        assert_eq!(format_brl(-250), "-R$ 2,50");
    }
}
