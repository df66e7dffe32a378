//! Chinese numerals for chapter headings.

/// Renders `value` with Chinese numerals, as used in `第十二章` headings.
///
/// Values from ten to nineteen drop the leading `一` (`十二`), interior zeros
/// collapse to a single `零` (`一百零五`), and values of ten thousand or more
/// fall back to Arabic digits.
///
/// # Examples
///
/// ```
/// use catalogue_fixtures::chinese_numeral;
///
/// assert_eq!(chinese_numeral(7), "七");
/// assert_eq!(chinese_numeral(12), "十二");
/// assert_eq!(chinese_numeral(45), "四十五");
/// assert_eq!(chinese_numeral(105), "一百零五");
/// ```
#[must_use]
pub fn chinese_numeral(value: u32) -> String {
    if value >= 10_000 {
        return value.to_string();
    }
    if value < 10 {
        return digit(value).to_string();
    }
    if value < 20 {
        let mut out = String::from('十');
        if value > 10 {
            out.push(digit(value - 10));
        }
        return out;
    }

    let digits: Vec<u32> = value
        .to_string()
        .chars()
        .filter_map(|c| c.to_digit(10))
        .collect();
    let units = ['千', '百', '十'];
    let skip = units.len() + 1 - digits.len();

    let mut out = String::new();
    let mut pending_zero = false;
    for (position, &current) in digits.iter().enumerate() {
        let unit = units.get(position + skip);
        if current == 0 {
            pending_zero = !out.is_empty();
            continue;
        }
        if pending_zero {
            out.push('零');
            pending_zero = false;
        }
        out.push(digit(current));
        if let Some(unit) = unit {
            out.push(*unit);
        }
    }
    out
}

const fn digit(value: u32) -> char {
    match value {
        1 => '一',
        2 => '二',
        3 => '三',
        4 => '四',
        5 => '五',
        6 => '六',
        7 => '七',
        8 => '八',
        9 => '九',
        _ => '零',
    }
}
