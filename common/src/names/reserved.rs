// Reserved Characters
//
// `@`, `#` and `$` separate the two halves of account, asset and NFT ids,
// so no bare name may contain them. Whitespace is never allowed either.

/// Reserved separator glyphs
pub const RESERVED_SEPARATORS: [char; 3] = ['@', '#', '$'];

/// Reserved characters grouped the way fixtures and diagnostics use them
pub struct ReservedChars;

impl ReservedChars {
    /// Separator glyphs as a string
    pub const SPECIAL: &'static str = "@#$";

    /// ASCII whitespace characters
    pub const WHITESPACES: &'static str = " \t\n\r\x0b\x0c";

    /// Every reserved character, separators first
    pub const ALL: &'static str = "@#$ \t\n\r\x0b\x0c";
}

/// Check whether `c` is one of the separator glyphs
pub fn is_reserved_separator(c: char) -> bool {
    RESERVED_SEPARATORS.contains(&c)
}

/// Check whether `c` counts as whitespace in a name
///
/// Unicode whitespace is included, not only the ASCII set.
pub fn is_name_whitespace(c: char) -> bool {
    c.is_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_special_plus_whitespaces() {
        assert_eq!(
            ReservedChars::ALL,
            format!("{}{}", ReservedChars::SPECIAL, ReservedChars::WHITESPACES)
        );
    }

    #[test]
    fn test_reserved_separators() {
        for c in ReservedChars::SPECIAL.chars() {
            assert!(is_reserved_separator(c));
        }
        assert!(!is_reserved_separator('_'));
        assert!(!is_reserved_separator('a'));
    }

    #[test]
    fn test_whitespace_covers_ascii_and_unicode() {
        for c in ReservedChars::WHITESPACES.chars() {
            assert!(is_name_whitespace(c), "{:?} should be whitespace", c);
        }
        // No-break space
        assert!(is_name_whitespace('\u{00a0}'));
        assert!(!is_name_whitespace('x'));
    }
}
