//! Comparable Names
//!
//! Titles coming from the host (file names, user input) and titles coming
//! from the remote catalog differ in casing, punctuation, articles and
//! diacritics. [`comparable_name`] folds both into the same shape so that
//! substring checks mean something.

use crate::consts::{LEADING_ARTICLE_REGEX, MODIFIER_REGEX, SEPARATOR_REGEX, TITLE_YEAR_REGEX};
use unicode_normalization::UnicodeNormalization;

/// Reduce a title to its comparable form.
///
/// Lowercases, composes (NFC), drops English articles, spells out `&`,
/// strips combining marks and modifier letters, and collapses every run of
/// punctuation or whitespace into a single space. The result is stable:
/// feeding it back in returns it unchanged.
///
/// # Examples
///
/// ```
/// use marquee_rank::comparable_name;
/// assert_eq!(comparable_name("The Office (US)"), "office us");
/// assert_eq!(comparable_name("Law & Order"), "law and order");
/// assert_eq!(comparable_name("Office, The"), "office");
/// assert_eq!(comparable_name(""), "");
/// ```
pub fn comparable_name(raw: &str) -> String {
    let mut current = normalize_once(raw);
    // Collapsing punctuation can expose a new "the " token ("the-the x"), so
    // repeat until nothing changes. Every later pass only removes text.
    loop {
        let next = normalize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn normalize_once(raw: &str) -> String {
    let lowered: String = raw.to_lowercase().nfc().collect();
    let without_suffix = lowered.replace(", the", "");
    let without_article = LEADING_ARTICLE_REGEX.replace_all(&without_suffix, " ");
    let spelled = without_article.replace('&', " and ");
    let unmarked = MODIFIER_REGEX.replace_all(&spelled, "");
    let collapsed = SEPARATOR_REGEX.replace_all(&unmarked, " ");
    collapsed.trim().to_string()
}

/// A query title split into its name and an optional bracketed year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub name: String,
    pub year: Option<i32>,
}
impl ParsedName {
    /// Split a trailing `(YYYY)` or `[YYYY]` (19xx or 20xx) off a title.
    ///
    /// # Examples
    ///
    /// ```
    /// use marquee_rank::ParsedName;
    /// let parsed = ParsedName::parse("The Office (2005)");
    /// assert_eq!(parsed.name, "The Office");
    /// assert_eq!(parsed.year, Some(2005));
    /// assert_eq!(ParsedName::parse("Dark").year, None);
    /// ```
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Some(captures) = TITLE_YEAR_REGEX.captures(trimmed) {
            let name = captures["name"].trim();
            if !name.is_empty() {
                return Self {
                    name: name.to_string(),
                    year: captures["year"].parse().ok(),
                };
            }
        }
        Self {
            name: trimmed.to_string(),
            year: None,
        }
    }

    /// The comparable form of the parsed name.
    pub fn comparable(&self) -> String {
        comparable_name(&self.name)
    }
}
