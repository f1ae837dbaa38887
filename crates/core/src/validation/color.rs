//! Color token format.
//!
//! Accepted: `#rgb`, `#rrggbb` (case-insensitive hex) or a palette name.

/// Named palette tokens.
pub const PALETTE: [&str; 17] = [
    "red", "orange", "amber", "yellow", "lime", "green", "emerald", "teal", "cyan", "sky", "blue",
    "indigo", "violet", "purple", "pink", "rose", "gray",
];

/// Returns true if `value` is a recognized color token.
#[must_use]
pub fn is_color_token(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => PALETTE.contains(&value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#fff", true)]
    #[case("#FF8800", true)]
    #[case("#12ab9C", true)]
    #[case("teal", true)]
    #[case("rose", true)]
    #[case("#ffff", false)]
    #[case("#gg0000", false)]
    #[case("ff8800", false)]
    #[case("Teal", false)]
    #[case("", false)]
    #[case("#", false)]
    fn test_color_tokens(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(is_color_token(value), expected);
    }
}
