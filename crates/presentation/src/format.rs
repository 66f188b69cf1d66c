use warehouse::Value;

use crate::MetricFormat;

/// Text shown for a metric whose value is `NULL`
pub const NOT_AVAILABLE: &str = "n/a";

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format `value` with `format`. Returns `None` for text and dates.
pub fn format_metric(value: &Value, format: &MetricFormat) -> Option<String> {
    if value.is_null() {
        return Some(NOT_AVAILABLE.to_owned());
    }
    let scaled = value.as_f64()? / format.divisor;
    let number = format!("{:.*}", format.decimals, scaled.abs());
    let number = if format.group_thousands {
        match number.split_once('.') {
            Some((int, frac)) => format!("{}.{frac}", group_thousands(int)),
            None => group_thousands(&number),
        }
    } else {
        number
    };
    let sign = if scaled < 0.0 && number.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    Some(format!("{sign}{}{number}{}", format.prefix, format.suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_integers() {
        let usd = MetricFormat::grouped("$", "");
        assert_eq!(format_metric(&Value::Float(1234567.0), &usd).unwrap(), "$1,234,567");
        assert_eq!(format_metric(&Value::Integer(999), &usd).unwrap(), "$999");
        assert_eq!(format_metric(&Value::Integer(0), &usd).unwrap(), "$0");
        let txns = MetricFormat::grouped("", " Txns");
        assert_eq!(format_metric(&Value::Integer(100000), &txns).unwrap(), "100,000 Txns");
    }

    #[test]
    fn scaled_values() {
        let k = MetricFormat::scaled("", 1000.0, 1, "K Wallets");
        assert_eq!(format_metric(&Value::Integer(45678), &k).unwrap(), "45.7K Wallets");
        let m = MetricFormat::scaled("$", 1_000_000.0, 1, "M");
        assert_eq!(format_metric(&Value::Float(2_340_000.0), &m).unwrap(), "$2.3M");
    }

    #[test]
    fn negatives_keep_their_sign_outside_the_prefix() {
        let usd = MetricFormat::grouped("$", "");
        assert_eq!(format_metric(&Value::Float(-1500.0), &usd).unwrap(), "-$1,500");
        assert_eq!(format_metric(&Value::Float(-0.2), &usd).unwrap(), "$0");
    }

    #[test]
    fn nulls_and_text() {
        let f = MetricFormat::grouped("", "");
        assert_eq!(format_metric(&Value::Null, &f).unwrap(), NOT_AVAILABLE);
        assert!(format_metric(&Value::from("abc"), &f).is_none());
    }
}
