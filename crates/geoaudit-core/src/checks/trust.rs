//! Trust signals: authorship, licensing and E-E-A-T

use scraper::Html;
use serde::Serialize;

use crate::keywords::{
    ABOUT_PATTERN, AUTHOR_KEYWORDS, AUTHORITATIVE_LINK_PATTERN, CONTACT_PATTERN, LICENSE_PATTERN,
    PRIVACY_PATTERN, QUALIFICATION_PATTERN,
};
use crate::parser::{
    count_class_matches, count_matching_text_nodes, count_sole_string_matches, first_content,
    select_all, select_first,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuthorSignals {
    pub author_meta: Option<String>,
    pub author_elements: usize,
    pub qualification_signals: usize,
    pub has_author_signals: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CitationLicense {
    pub license_signals: usize,
    pub has_license: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Eeat {
    pub https: bool,
    pub contact_info: bool,
    pub about_page: bool,
    pub privacy_policy: bool,
    pub authoritative_links: usize,
    /// Number of satisfied signals, 0 to 5
    pub eeat_score: u8,
}

pub fn analyze_author_signals(document: &Html) -> AuthorSignals {
    let has_author_meta = select_first(document, r#"meta[name="author"]"#).is_some();
    let author_elements = count_class_matches(document, "[class]", AUTHOR_KEYWORDS);

    AuthorSignals {
        author_meta: first_content(document, r#"meta[name="author"]"#),
        author_elements,
        qualification_signals: count_matching_text_nodes(document, &QUALIFICATION_PATTERN),
        has_author_signals: has_author_meta || author_elements > 0,
    }
}

pub fn analyze_citation_license(document: &Html) -> CitationLicense {
    let license_signals = count_matching_text_nodes(document, &LICENSE_PATTERN);

    CitationLicense {
        license_signals,
        has_license: license_signals > 0,
    }
}

pub fn analyze_eeat(document: &Html, url: &str) -> Eeat {
    let contact_info = count_sole_string_matches(document, "a, div, span", &CONTACT_PATTERN) > 0;
    let about_page = count_sole_string_matches(document, "a, div", &ABOUT_PATTERN) > 0;
    let privacy_policy = count_sole_string_matches(document, "a, div", &PRIVACY_PATTERN) > 0;
    let https = url.starts_with("https");

    let authoritative_links = select_all(document, "a[href]")
        .into_iter()
        .filter(|a| {
            a.value()
                .attr("href")
                .is_some_and(|href| AUTHORITATIVE_LINK_PATTERN.is_match(href))
        })
        .count();

    let eeat_score = [
        contact_info,
        about_page,
        privacy_policy,
        https,
        authoritative_links > 0,
    ]
    .into_iter()
    .filter(|signal| *signal)
    .count() as u8;

    Eeat {
        https,
        contact_info,
        about_page,
        privacy_policy,
        authoritative_links,
        eeat_score,
    }
}
