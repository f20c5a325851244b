//! Keyword sets used by the checks
//!
//! Class and `alt` matching is a case-insensitive substring test against one of
//! the lists below. Text matching uses the compiled patterns, which cover both
//! English and Russian vocabulary.

use once_cell::sync::Lazy;
use regex::Regex;

/// `div`/`section` classes that mark a highlighted block.
pub const HIGHLIGHT_CLASS_KEYWORDS: &[&str] = &["highlight", "block", "quote", "special", "feature"];

/// `img` alt texts that mark a scheme or diagram.
pub const SCHEME_ALT_KEYWORDS: &[&str] = &["schema", "diagram", "chart", "scheme"];

pub const FAQ_KEYWORDS: &[&str] = &["faq", "question", "accordion"];
pub const ARTICLE_KEYWORDS: &[&str] = &["post", "blog", "article"];
pub const PRODUCT_KEYWORDS: &[&str] = &["product", "card", "item", "goods"];
pub const REVIEW_KEYWORDS: &[&str] = &["review", "testimonial", "feedback"];
pub const INSTRUCTION_KEYWORDS: &[&str] = &["instruction", "manual", "guide", "tutorial"];
pub const AUTHOR_KEYWORDS: &[&str] = &["author", "writer", "byline"];

fn case_insensitive(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("invalid keyword regex")
}

/// Expertise and qualification mentions.
pub static QUALIFICATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    case_insensitive(
        r"эксперт|специалист|опыт|квалификация|образование|expert|specialist|experience|qualification|education",
    )
});

/// License and copyright notices.
pub static LICENSE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    case_insensitive(
        r"лицензия|авторское|все права защищены|license|copyright|all rights reserved|CC-BY",
    )
});

pub static CONTACT_PATTERN: Lazy<Regex> =
    Lazy::new(|| case_insensitive(r"контакт|contact|телефон|phone|адрес|address"));

pub static ABOUT_PATTERN: Lazy<Regex> =
    Lazy::new(|| case_insensitive(r"о нас|about|компания|company"));

pub static PRIVACY_PATTERN: Lazy<Regex> =
    Lazy::new(|| case_insensitive(r"политика|privacy|confidential"));

/// Link targets that count as authoritative sources.
pub static AUTHORITATIVE_LINK_PATTERN: Lazy<Regex> =
    Lazy::new(|| case_insensitive(r"wikipedia\.org|gov\.|edu\.|research"));

/// Case-insensitive substring match of `value` against any keyword.
pub fn contains_any(value: &str, keywords: &[&str]) -> bool {
    let value = value.to_lowercase();
    keywords.iter().any(|keyword| value.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_any_ignores_case() {
        assert!(contains_any("Main-FAQ-Section", FAQ_KEYWORDS));
        assert!(contains_any("ProductCard", PRODUCT_KEYWORDS));
        assert!(!contains_any("sidebar", FAQ_KEYWORDS));
    }

    #[test]
    fn qualification_pattern_matches_both_languages() {
        assert!(QUALIFICATION_PATTERN.is_match("Наш ЭКСПЕРТ расскажет"));
        assert!(QUALIFICATION_PATTERN.is_match("15 years of Experience"));
        assert!(!QUALIFICATION_PATTERN.is_match("just a paragraph"));
    }

    #[test]
    fn license_pattern_matches_notices() {
        assert!(LICENSE_PATTERN.is_match("© 2024 Все права защищены"));
        assert!(LICENSE_PATTERN.is_match("Licensed under cc-by 4.0"));
        assert!(LICENSE_PATTERN.is_match("Copyright Example Inc."));
    }

    #[test]
    fn authoritative_links() {
        assert!(AUTHORITATIVE_LINK_PATTERN.is_match("https://en.wikipedia.org/wiki/SEO"));
        assert!(AUTHORITATIVE_LINK_PATTERN.is_match("https://www.nasa.gov.example/"));
        assert!(AUTHORITATIVE_LINK_PATTERN.is_match("/Research/paper.pdf"));
        assert!(!AUTHORITATIVE_LINK_PATTERN.is_match("https://example.com/blog"));
    }
}
