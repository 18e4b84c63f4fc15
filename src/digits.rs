//! Digit and byte-size helpers

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static DIGIT_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("digit group pattern compiles"));

/// Splits a 16 digit card number into groups of four
///
/// ```
/// use tagreader::digits::credit_card_mask_n16;
///
/// assert_eq!(credit_card_mask_n16("1234567890123456"), "1234 5678 9012 3456");
/// ```
pub fn credit_card_mask_n16(number: &str) -> String {
    DIGIT_GROUP_RE
        .find_iter(number)
        .map(|m| m.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Packs pairs of digits into single bytes; non-digits are dropped
///
/// A pair with a leading zero is stored as `100 + n` so it decodes back
/// with its zero.
pub fn digits_to_bytes(text: &str) -> Vec<u8> {
    let digits: Vec<u8> = text.bytes().filter(u8::is_ascii_digit).collect();

    digits
        .chunks(2)
        .map(|pair| match pair {
            [b'0', ones] => 100 + (ones - b'0'),
            [tens, ones] => (tens - b'0') * 10 + (ones - b'0'),
            [one] => one - b'0',
            _ => 0,
        })
        .collect()
}

/// Inverse of [`digits_to_bytes`]
pub fn bytes_to_digits(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&n| {
            if n > 99 {
                format!("0{}", n - 100)
            } else {
                n.to_string()
            }
        })
        .collect()
}

/// Units used when printing byte sizes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SizeUnits {
    /// Digits after the decimal point
    pub fixed: usize,
    pub measure: u32,
    /// One marker per power of `measure`, starting at bytes
    pub markers: String,
}

impl Default for SizeUnits {
    fn default() -> Self {
        Self {
            fixed: 1,
            measure: 1024,
            markers: "bKMGTPEZYB".to_string(),
        }
    }
}

impl SizeUnits {
    fn scale(&self, size: u64) -> (f64, usize, char) {
        #[allow(clippy::as_conversions, clippy::cast_precision_loss)]
        let mut value = size as f64;
        let measure = f64::from(self.measure.max(2));
        let last = self.markers.chars().count().saturating_sub(1);

        let mut rate = 0;
        while value >= measure && rate < last {
            value /= measure;
            rate += 1;
        }

        let marker = self.markers.chars().nth(rate).unwrap_or('b');
        (value, rate, marker)
    }
}

/// Short human size: `1536` is `1.5Kb`, `1024` is `1Kb`, `512` is `512b`
pub fn bytes_to_short_size(size: u64, units: &SizeUnits) -> String {
    let (value, rate, marker) = units.scale(size);
    if rate == 0 {
        return format!("{size}{marker}");
    }

    let fixed = units.fixed;
    let mut number = format!("{value:.fixed$}");
    if fixed > 0 && number.rsplit('.').next().is_some_and(|f| f.bytes().all(|b| b == b'0')) {
        if let Some(point) = number.find('.') {
            number.truncate(point);
        }
    }

    format!("{number}{marker}b")
}

/// Size with a fixed number of decimals: `1024` is `1.0Kb`, `512` is `512.0b`
pub fn bytes_to_fixed_size(size: u64, units: &SizeUnits) -> String {
    let (value, rate, marker) = units.scale(size);
    let fixed = units.fixed;

    if rate == 0 {
        format!("{value:.fixed$}{marker}")
    } else {
        format!("{value:.fixed$}{marker}b")
    }
}
