//! The assembled audit report

use std::time::Duration;

use scraper::Html;
use serde::{Serialize, Serializer};

use crate::checks::*;
use crate::recommendations::Recommendation;

/// One finding per check plus page metadata.
///
/// Field order is the serialisation order consumed by report renderers.
/// `recommendations` is filled in after every finding exists.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub url: String,
    #[serde(serialize_with = "serialize_load_time")]
    pub load_time: Duration,
    pub semantic_clarity: SemanticClarity,
    pub headers: Headers,
    pub structure: Structure,
    pub questions: Questions,
    pub special_content: SpecialContent,
    pub structured_data: StructuredData,
    pub author_signals: AuthorSignals,
    pub content_sync: ContentSync,
    pub dates: Dates,
    pub social_meta: SocialMeta,
    pub canonical: Canonical,
    pub llm_accessibility: LlmAccessibility,
    pub citation_license: CitationLicense,
    pub eeat: Eeat,
    pub validation: MetaValidation,
    pub recommendations: Vec<Recommendation>,
}

impl Report {
    /// Run every check over `html` in declaration order.
    pub fn from_html(url: &str, html: &str, load_time: Duration, question_examples: usize) -> Self {
        let document = Html::parse_document(html);
        Self::from_document(url, &document, load_time, question_examples)
    }

    pub fn from_document(
        url: &str,
        document: &Html,
        load_time: Duration,
        question_examples: usize,
    ) -> Self {
        Self {
            url: url.to_string(),
            load_time,
            semantic_clarity: analyze_semantic_clarity(document),
            headers: analyze_headers(document),
            structure: analyze_structure(document),
            questions: analyze_questions(document, question_examples),
            special_content: analyze_special_content(document),
            structured_data: analyze_structured_data(document),
            author_signals: analyze_author_signals(document),
            content_sync: analyze_content_sync(document),
            dates: analyze_dates(document),
            social_meta: analyze_social_meta(document),
            canonical: analyze_canonical(document, url),
            llm_accessibility: analyze_llm_accessibility(document),
            citation_license: analyze_citation_license(document),
            eeat: analyze_eeat(document, url),
            validation: validate_meta_tags(document),
            recommendations: Vec::new(),
        }
    }
}

/// Load time as shown to users, e.g. `"0.42 сек"`.
pub fn format_load_time(load_time: Duration) -> String {
    format!("{:.2} сек", load_time.as_secs_f64())
}

fn serialize_load_time<S: Serializer>(load_time: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_load_time(*load_time))
}
