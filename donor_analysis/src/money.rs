// Parsing and printing of dollar amounts as they appear in filings and exports.

/// Parses an amount, ignoring everything but digits, `.` and `-`.
///
/// `$1,250.00` is 1250. A value with no digits at all is 0.
/// Returns None when the remaining characters do not form a number (`1.2.3`).
pub fn parse_amount(s: &str) -> Option<f64> {
    let clean: String = s
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if clean.is_empty() {
        return Some(0.0);
    }
    clean.parse::<f64>().ok()
}

/// Like [`parse_amount`], with unreadable values counting as zero.
pub fn parse_amount_lenient(s: &str) -> f64 {
    parse_amount(s).unwrap_or(0.0)
}

fn whole_number(x: f64) -> String {
    // -0.0 would print as "-0"
    if x == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", x)
    }
}

/// Whole numbers without decimals, everything else with two decimals.
pub fn format_amount(x: f64) -> String {
    if x.fract() == 0.0 {
        whole_number(x)
    } else {
        format!("{:.2}", x)
    }
}

/// The amount with a dollar sign: `$100`, `$12.50`. Blank means `$0`.
/// Values that cannot be read are returned untouched.
pub fn format_dollars(raw: &str) -> String {
    let v = raw.trim();
    if v.is_empty() {
        return "$0".to_string();
    }
    match parse_amount(v) {
        Some(x) => format!("${}", format_amount(x)),
        None => v.to_string(),
    }
}

/// Rounds to whole dollars with thousands separators: `1234567.8` is `1,234,568`.
/// Halves go to the even neighbour, `22.5` is `22`.
pub fn format_thousands(x: f64) -> String {
    let digits = format!("{:.0}", x.abs());
    let negative = x < 0.0 && digits != "0";
    let mut res = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            res.push(',');
        }
        res.push(c);
    }
    if negative {
        format!("-{}", res)
    } else {
        res
    }
}

/// The comparable form of a donation value, used when matching donors across party files.
///
/// `$1,000.00` and `1000` are the same donation. Values that are not numbers
/// are compared case-insensitively.
pub fn normalize_donation(s: &str) -> String {
    let v = s.trim();
    if v.is_empty() {
        return "".to_string();
    }
    let cleaned = v.trim_start_matches('$').replace(',', "");
    match cleaned.trim().parse::<f64>() {
        Ok(x) if x.is_finite() && x.fract() == 0.0 => whole_number(x),
        Ok(x) => format!("{}", x),
        Err(_) => cleaned.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_with_symbols() {
        assert_eq!(parse_amount("$1,250.00"), Some(1250.0));
        assert_eq!(parse_amount("-35"), Some(-35.0));
        assert_eq!(parse_amount(""), Some(0.0));
        assert_eq!(parse_amount("n/a"), Some(0.0));
        assert_eq!(parse_amount("1.2.3"), None);
        assert_eq!(parse_amount_lenient("1.2.3"), 0.0);
    }

    #[test]
    fn amount_formats() {
        assert_eq!(format_amount(100.0), "100");
        assert_eq!(format_amount(12.5), "12.50");
        assert_eq!(format_amount(-0.0), "0");
        assert_eq!(format_amount(1e20), "100000000000000000000");
        assert_eq!(format_dollars("250.00"), "$250");
        assert_eq!(format_dollars("12.5"), "$12.50");
        assert_eq!(format_dollars(""), "$0");
        assert_eq!(format_dollars("1.2.3"), "1.2.3");
    }

    #[test]
    fn thousands_separators() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.4), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(1234567.8), "1,234,568");
        assert_eq!(format_thousands(-4500.0), "-4,500");
        assert_eq!(format_thousands(22.5), "22");
        assert_eq!(format_thousands(23.5), "24");
        assert_eq!(format_thousands(1234.5), "1,234");
        assert_eq!(format_thousands(-0.4), "0");
        assert_eq!(format_thousands(1e20), "100,000,000,000,000,000,000");
    }

    #[test]
    fn donation_matching_form() {
        assert_eq!(normalize_donation("$1,000.00"), "1000");
        assert_eq!(normalize_donation("12.5"), "12.5");
        assert_eq!(normalize_donation("1e20"), "100000000000000000000");
        assert_eq!(normalize_donation(" "), "");
        assert_eq!(normalize_donation("In-Kind"), "in-kind");
    }
}
