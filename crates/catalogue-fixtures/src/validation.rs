//! Title and pen-name rules shared with the client's publishing flows.
//!
//! # Validation Rules
//!
//! - Titles: 2 to 30 characters, not whitespace-only
//! - Pen names: 2 to 32 characters, letters, digits, and spaces only

/// Minimum allowed length for a book title.
pub const TITLE_MIN: usize = 2;

/// Maximum allowed length for a book title.
pub const TITLE_MAX: usize = 30;

/// Minimum allowed length for a pen name.
pub const PEN_NAME_MIN: usize = 2;

/// Maximum allowed length for a pen name.
pub const PEN_NAME_MAX: usize = 32;

/// Validates a book title.
///
/// # Examples
///
/// ```
/// use catalogue_fixtures::is_valid_title;
///
/// assert!(is_valid_title("星穹传说"));
/// assert!(!is_valid_title("星"));
/// assert!(!is_valid_title("   "));
/// ```
#[must_use]
pub fn is_valid_title(title: &str) -> bool {
    let length = title.chars().count();
    (TITLE_MIN..=TITLE_MAX).contains(&length) && !title.trim().is_empty()
}

/// Validates an author pen name.
///
/// # Examples
///
/// ```
/// use catalogue_fixtures::is_valid_pen_name;
///
/// assert!(is_valid_pen_name("Ada Lovelace"));
/// assert!(!is_valid_pen_name("A"));
/// assert!(!is_valid_pen_name("O'Brien"));
/// ```
#[must_use]
pub fn is_valid_pen_name(name: &str) -> bool {
    let length = name.chars().count();
    if !(PEN_NAME_MIN..=PEN_NAME_MAX).contains(&length) {
        return false;
    }
    if name.trim().is_empty() {
        return false;
    }
    name.chars().all(is_valid_pen_name_char)
}

const fn is_valid_pen_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' '
}

/// Drops characters a pen name may not contain.
#[must_use]
pub(crate) fn sanitize_pen_name(name: &str) -> String {
    name.chars().filter(|c| is_valid_pen_name_char(*c)).collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("剑来", true)]
    #[case("星穹传说之万古长夜", true)]
    #[case("剑", false)]
    #[case("  ", false)]
    #[case("这是一个长度远远超过了三十个字符限制的书名用于测试校验逻辑是否正确", false)]
    fn validates_titles(#[case] title: &str, #[case] expected: bool) {
        assert_eq!(is_valid_title(title), expected);
    }

    #[rstest]
    #[case("Ada Lovelace", true)]
    #[case("Writer 42", true)]
    #[case("A", false)]
    #[case("   ", false)]
    #[case("Jean-Luc", false)]
    fn validates_pen_names(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_valid_pen_name(name), expected);
    }

    #[test]
    fn sanitize_drops_punctuation() {
        assert_eq!(sanitize_pen_name("D'Arcy O'Neil"), "DArcy ONeil");
    }
}
