//! pt-BR number formatting shared by tables, cards and exports

/// Format a number with `.` as thousands separator and `,` as decimal separator.
///
/// ```
/// use contracts::shared::format::format_decimal;
/// assert_eq!(format_decimal(1234.567, 2), "1.234,57");
/// ```
pub fn format_decimal(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let formatted = format!("{:.*}", decimals, value);
    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    let mut grouped = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    // "-0,00" reads badly in totals rows
    let sign = if digits.chars().all(|c| c == '0')
        && decimal_part.map_or(true, |d| d.chars().all(|c| c == '0'))
    {
        ""
    } else {
        sign
    };

    match decimal_part {
        Some(d) => format!("{}{},{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

/// Currency, e.g. `R$ 1.234,50`
pub fn format_money(value: f64) -> String {
    format!("R$ {}", format_decimal(value, 2))
}

/// Weight in kilograms, e.g. `1.234,50 kg`
pub fn format_weight(value: f64) -> String {
    format!("{} kg", format_decimal(value, 2))
}

/// Percentage with one decimal, e.g. `33,3%`
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_decimal(value, 1))
}

/// Integer with thousands separator
pub fn format_integer(value: f64) -> String {
    format_decimal(value, 0)
}

/// ISO date (`2024-03-15`, optionally with a time part) to `15/03/2024`.
/// Anything else is returned unchanged.
pub fn format_date_br(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    if let Some((year, rest)) = date_part.split_once('-') {
        if let Some((month, day)) = rest.split_once('-') {
            return format!("{}/{}/{}", day, month, year);
        }
    }
    date_str.to_string()
}
