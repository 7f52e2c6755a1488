//! Language codes as understood by the remote catalog.
//!
//! The catalog only distinguishes primary language subtags, so regional
//! variants collapse onto their base language (`pt-BR` is just `pt`).

/// Language used whenever the caller does not supply one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Normalizes a language code into the form used for session sharding and
/// remote requests.
///
/// Trims whitespace, keeps only the primary subtag (before `-` or `_`), and
/// lowercases it. Blank input falls back to [`DEFAULT_LANGUAGE`].
///
/// # Examples
///
/// ```
/// use marquee_catalog::normalize_language;
/// assert_eq!(normalize_language("pt-BR"), "pt");
/// assert_eq!(normalize_language(" DE "), "de");
/// assert_eq!(normalize_language(""), "en");
/// ```
pub fn normalize_language(code: impl AsRef<str>) -> String {
    let primary = code.as_ref().trim().split(['-', '_']).next().unwrap_or_default().trim();
    match primary.is_empty() {
        true => DEFAULT_LANGUAGE.to_string(),
        false => primary.to_lowercase(),
    }
}

/// Returns `true` if the code refers to English (after normalization).
pub fn is_english(code: impl AsRef<str>) -> bool {
    normalize_language(code) == DEFAULT_LANGUAGE
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("en", "en")]
    #[case("EN", "en")]
    #[case("en-US", "en")]
    #[case("pt_BR", "pt")]
    #[case("  fr  ", "fr")]
    #[case("", "en")]
    #[case("   ", "en")]
    #[case("-", "en")]
    fn normalizes_codes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_language(input), expected);
    }

    #[test]
    fn detects_english() {
        assert!(is_english("en"));
        assert!(is_english("en-GB"));
        assert!(is_english(""));
        assert!(!is_english("de"));
    }
}
