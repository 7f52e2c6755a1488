use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// A word-initial "the" followed by whitespace.
regex!(LEADING_ARTICLE_REGEX, r"\bthe\s");
regex!(MODIFIER_REGEX, r"[\p{Lm}\p{Mn}]");
regex!(SEPARATOR_REGEX, r"[^\p{L}\p{Nd}_]+");
// Title followed by a bracketed release year, e.g. "The Office (2005)" or "Dark [2017]".
regex!(TITLE_YEAR_REGEX, r"^(?P<name>.*?)\s*[\(\[](?P<year>(?:19|20)\d{2})[\)\]]\s*$");
