//! Checks over head metadata: structured data, social tags, canonical, robots

use scraper::Html;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::parser::{
    char_len, count_elements, first_content, first_text, json_ld_blocks, select_all, select_first,
};

/// Titles shorter than this are flagged by meta validation.
pub const MIN_TITLE_LENGTH: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StructuredData {
    /// Number of JSON-LD blocks, unparsable ones included
    pub json_ld: usize,
    /// Distinct `@type` values of the blocks that parsed
    pub json_ld_types: Vec<String>,
    pub og_tags: usize,
    pub has_structured_data: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncIssue {
    TitleH1Mismatch,
    OgTitleMismatch,
}

impl SyncIssue {
    pub fn message(&self) -> &'static str {
        match self {
            SyncIssue::TitleH1Mismatch => "Title и H1 не совпадают",
            SyncIssue::OgTitleMismatch => "og:title и Title не совпадают",
        }
    }
}

impl Serialize for SyncIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContentSync {
    pub title: String,
    pub h1: String,
    pub meta_description: String,
    pub og_title: String,
    pub sync_issues: Vec<SyncIssue>,
    pub has_all_elements: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dates {
    pub date_published: Option<String>,
    pub date_modified: Option<String>,
    pub json_ld_dates: Vec<String>,
    pub has_dates: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SocialMeta {
    pub og_image: Option<String>,
    pub twitter_card: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub has_social_meta: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Canonical {
    pub canonical: String,
    pub is_self_canonical: bool,
    pub has_canonical: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LlmAccessibility {
    pub robots_meta: String,
    pub max_snippet: bool,
    pub index_follow: bool,
    pub llm_friendly: bool,
}

impl LlmAccessibility {
    pub fn has_noindex(&self) -> bool {
        self.robots_meta.to_lowercase().contains("noindex")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaIssue {
    MissingTitle,
    TitleTooShort,
    MissingDescription,
    MissingJsonLd,
    MissingOgTitle,
}

impl MetaIssue {
    pub fn message(&self) -> &'static str {
        match self {
            MetaIssue::MissingTitle => "Отсутствует тег <title>",
            MetaIssue::TitleTooShort => "Title слишком короткий (менее 10 символов)",
            MetaIssue::MissingDescription => "Отсутствует meta description",
            MetaIssue::MissingJsonLd => "Отсутствует JSON-LD разметка",
            MetaIssue::MissingOgTitle => "Отсутствует og:title",
        }
    }
}

impl Serialize for MetaIssue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.message())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetaValidation {
    pub issues: Vec<MetaIssue>,
    pub issue_count: usize,
}

/// Parse every JSON-LD block, silently skipping the ones that fail.
fn parsed_json_ld(document: &Html) -> (usize, Vec<JsonValue>) {
    let blocks = json_ld_blocks(document);
    let parsed = blocks
        .iter()
        .filter_map(|block| serde_json::from_str::<JsonValue>(block).ok())
        .collect();
    (blocks.len(), parsed)
}

pub fn analyze_structured_data(document: &Html) -> StructuredData {
    let (json_ld, parsed) = parsed_json_ld(document);

    let mut json_ld_types: Vec<String> = Vec::new();
    for block in parsed.iter().filter_map(JsonValue::as_object) {
        let types = match block.get("@type") {
            Some(JsonValue::String(t)) => vec![t.clone()],
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        };
        for t in types {
            if !json_ld_types.contains(&t) {
                json_ld_types.push(t);
            }
        }
    }

    let og_tags = select_all(document, "meta[property]")
        .into_iter()
        .filter(|meta| {
            meta.value()
                .attr("property")
                .is_some_and(|p| p.to_ascii_lowercase().starts_with("og:"))
        })
        .count();

    StructuredData {
        json_ld,
        json_ld_types,
        og_tags,
        has_structured_data: json_ld > 0,
    }
}

pub fn analyze_content_sync(document: &Html) -> ContentSync {
    let has_title = select_first(document, "title").is_some();
    let has_h1 = select_first(document, "h1").is_some();
    let description = first_content(document, r#"meta[name="description"]"#);
    let has_og_title = select_first(document, r#"meta[property="og:title"]"#).is_some();

    let title = first_text(document, "title");
    let h1 = first_text(document, "h1");
    let og_title = first_content(document, r#"meta[property="og:title"]"#).unwrap_or_default();

    let mut sync_issues = Vec::new();
    if has_title && has_h1 && title.to_lowercase() != h1.to_lowercase() {
        sync_issues.push(SyncIssue::TitleH1Mismatch);
    }
    if has_og_title && has_title && og_title != title {
        sync_issues.push(SyncIssue::OgTitleMismatch);
    }

    let has_description = select_first(document, r#"meta[name="description"]"#).is_some();

    ContentSync {
        has_all_elements: has_title && has_h1 && has_description,
        title,
        h1,
        meta_description: description.unwrap_or_default(),
        og_title,
        sync_issues,
    }
}

pub fn analyze_dates(document: &Html) -> Dates {
    let date_published = first_content(document, r#"meta[property="article:published_time"]"#);
    let date_modified = first_content(document, r#"meta[property="article:modified_time"]"#);
    let has_meta_published =
        select_first(document, r#"meta[property="article:published_time"]"#).is_some();
    let has_meta_modified =
        select_first(document, r#"meta[property="article:modified_time"]"#).is_some();

    let (_, parsed) = parsed_json_ld(document);
    let mut json_ld_dates = Vec::new();
    for block in parsed.iter().filter_map(JsonValue::as_object) {
        if let Some(published) = block.get("datePublished") {
            json_ld_dates.push(format!("published: {}", display_value(published)));
        }
        if let Some(modified) = block.get("dateModified") {
            json_ld_dates.push(format!("modified: {}", display_value(modified)));
        }
    }

    Dates {
        has_dates: has_meta_published || has_meta_modified || !json_ld_dates.is_empty(),
        date_published,
        date_modified,
        json_ld_dates,
    }
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn analyze_social_meta(document: &Html) -> SocialMeta {
    let has_og_image = select_first(document, r#"meta[property="og:image"]"#).is_some();
    let has_twitter_card = select_first(document, r#"meta[name="twitter:card"]"#).is_some();

    SocialMeta {
        og_image: first_content(document, r#"meta[property="og:image"]"#),
        twitter_card: first_content(document, r#"meta[name="twitter:card"]"#),
        og_title: first_content(document, r#"meta[property="og:title"]"#),
        og_description: first_content(document, r#"meta[property="og:description"]"#),
        has_social_meta: has_og_image || has_twitter_card,
    }
}

pub fn analyze_canonical(document: &Html, url: &str) -> Canonical {
    let link = select_first(document, r#"link[rel~="canonical"]"#);
    let canonical = link
        .and_then(|l| l.value().attr("href"))
        .map(str::to_string)
        .unwrap_or_default();

    Canonical {
        is_self_canonical: canonical.is_empty() || canonical == url,
        has_canonical: link.is_some(),
        canonical,
    }
}

pub fn analyze_llm_accessibility(document: &Html) -> LlmAccessibility {
    let robots_meta = first_content(document, r#"meta[name="robots"]"#).unwrap_or_default();

    let max_snippet = robots_meta.contains("max-snippet:-1");
    // "noindex" also satisfies the "index" substring test.
    let index_follow = robots_meta.contains("index") && robots_meta.contains("follow");
    let noindex = robots_meta.to_lowercase().contains("noindex");

    LlmAccessibility {
        llm_friendly: !noindex && max_snippet,
        robots_meta,
        max_snippet,
        index_follow,
    }
}

pub fn validate_meta_tags(document: &Html) -> MetaValidation {
    let mut issues = Vec::new();

    match select_first(document, "title") {
        None => issues.push(MetaIssue::MissingTitle),
        Some(_) if char_len(&first_text(document, "title")) < MIN_TITLE_LENGTH => {
            issues.push(MetaIssue::TitleTooShort)
        }
        Some(_) => {}
    }

    if count_elements(document, r#"meta[name="description"]"#) == 0 {
        issues.push(MetaIssue::MissingDescription);
    }

    if json_ld_blocks(document).is_empty() {
        issues.push(MetaIssue::MissingJsonLd);
    }

    if count_elements(document, r#"meta[property="og:title"]"#) == 0 {
        issues.push(MetaIssue::MissingOgTitle);
    }

    MetaValidation {
        issue_count: issues.len(),
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_structured_data_skips_malformed_blocks() {
        let html = r#"
            <head>
                <script type="application/ld+json">{"@type": "Product"</script>
                <script type="application/ld+json">{"@type": "Article"}</script>
                <meta property="og:title" content="T">
                <meta property="OG:image" content="i.png">
                <meta property="article:author" content="x">
            </head>
        "#;

        let result = analyze_structured_data(&doc(html));
        assert_eq!(result.json_ld, 2);
        assert_eq!(result.json_ld_types, vec!["Article"]);
        assert_eq!(result.og_tags, 2);
        assert!(result.has_structured_data);
    }

    #[test]
    fn test_structured_data_type_arrays_are_deduplicated() {
        let html = r#"
            <script type="application/ld+json">{"@type": ["Organization", "LocalBusiness"]}</script>
            <script type="application/ld+json">{"@type": "Organization"}</script>
            <script type="application/ld+json">[{"@type": "Ignored"}]</script>
            <script type="application/ld+json">{"name": "No type"}</script>
        "#;

        let result = analyze_structured_data(&doc(html));
        assert_eq!(result.json_ld, 4);
        assert_eq!(result.json_ld_types, vec!["Organization", "LocalBusiness"]);
    }

    #[test]
    fn test_structured_data_absent() {
        let result = analyze_structured_data(&doc("<body>plain</body>"));
        assert_eq!(result, StructuredData::default());
    }

    #[test]
    fn test_content_sync_mismatches() {
        let html = r#"
            <head>
                <title>Купить диван в Москве</title>
                <meta name="description" content="d">
                <meta property="og:title" content="купить диван в москве">
            </head>
            <body><h1>Диваны в Москве</h1></body>
        "#;

        let result = analyze_content_sync(&doc(html));
        assert_eq!(
            result.sync_issues,
            vec![SyncIssue::TitleH1Mismatch, SyncIssue::OgTitleMismatch]
        );
        assert!(result.has_all_elements);
        assert_eq!(result.og_title, "купить диван в москве");
    }

    #[test]
    fn test_content_sync_needs_both_sides() {
        let result = analyze_content_sync(&doc("<title>Only title</title>"));
        assert!(result.sync_issues.is_empty());
        assert!(!result.has_all_elements);
        assert_eq!(result.h1, "");
    }

    #[test]
    fn test_sync_issue_serializes_as_message() {
        let json = serde_json::to_value(vec![SyncIssue::TitleH1Mismatch]).unwrap();
        assert_eq!(json, serde_json::json!(["Title и H1 не совпадают"]));
    }

    #[test]
    fn test_dates_from_meta_and_json_ld() {
        let html = r#"
            <head>
                <meta property="article:published_time" content="2024-01-01">
                <script type="application/ld+json">not json</script>
                <script type="application/ld+json">
                    {"@type": "Article", "datePublished": "2024-01-01", "dateModified": 20240102}
                </script>
            </head>
        "#;

        let result = analyze_dates(&doc(html));
        assert_eq!(result.date_published.as_deref(), Some("2024-01-01"));
        assert_eq!(result.date_modified, None);
        assert_eq!(
            result.json_ld_dates,
            vec!["published: 2024-01-01", "modified: 20240102"]
        );
        assert!(result.has_dates);
    }

    #[test]
    fn test_dates_absent() {
        let result = analyze_dates(&doc("<body></body>"));
        assert!(!result.has_dates);
        assert!(result.json_ld_dates.is_empty());
    }

    #[test]
    fn test_social_meta() {
        let html = r#"
            <meta name="twitter:card" content="summary">
            <meta property="og:description" content="desc">
        "#;

        let result = analyze_social_meta(&doc(html));
        assert_eq!(result.twitter_card.as_deref(), Some("summary"));
        assert_eq!(result.og_image, None);
        assert_eq!(result.og_description.as_deref(), Some("desc"));
        assert!(result.has_social_meta);

        let none = analyze_social_meta(&doc("<p>x</p>"));
        assert!(!none.has_social_meta);
    }

    #[test]
    fn test_social_meta_serializes_nulls() {
        let json = serde_json::to_value(SocialMeta::default()).unwrap();
        assert!(json.get("og_image").unwrap().is_null());
        assert_eq!(json["has_social_meta"], false);
    }

    #[test]
    fn test_canonical_self_and_other() {
        let url = "https://site.com/page";

        let same = doc(r#"<link rel="canonical" href="https://site.com/page">"#);
        let result = analyze_canonical(&same, url);
        assert!(result.is_self_canonical);
        assert!(result.has_canonical);

        let other = doc(r#"<link rel="canonical" href="https://site.com/other">"#);
        let result = analyze_canonical(&other, url);
        assert!(!result.is_self_canonical);
        assert_eq!(result.canonical, "https://site.com/other");

        let missing = analyze_canonical(&doc("<p>x</p>"), url);
        assert!(missing.is_self_canonical);
        assert!(!missing.has_canonical);
        assert_eq!(missing.canonical, "");
    }

    #[test]
    fn test_llm_accessibility_noindex() {
        let result = analyze_llm_accessibility(&doc(
            r#"<meta name="robots" content="noindex, nofollow">"#,
        ));
        assert!(!result.llm_friendly);
        assert!(!result.max_snippet);
        assert!(result.index_follow);
        assert!(result.has_noindex());
    }

    #[test]
    fn test_llm_accessibility_friendly() {
        let result = analyze_llm_accessibility(&doc(
            r#"<meta name="robots" content="index, follow, max-snippet:-1">"#,
        ));
        assert!(result.llm_friendly);
        assert!(result.max_snippet);
        assert!(result.index_follow);
    }

    #[test]
    fn test_llm_accessibility_missing_meta() {
        let result = analyze_llm_accessibility(&doc("<p>x</p>"));
        assert_eq!(result.robots_meta, "");
        assert!(!result.llm_friendly);
        assert!(!result.has_noindex());
    }

    #[test]
    fn test_validate_meta_tags_all_missing() {
        let result = validate_meta_tags(&doc("<body>nothing</body>"));
        assert_eq!(
            result.issues,
            vec![
                MetaIssue::MissingTitle,
                MetaIssue::MissingDescription,
                MetaIssue::MissingJsonLd,
                MetaIssue::MissingOgTitle,
            ]
        );
        assert_eq!(result.issue_count, 4);
    }

    #[test]
    fn test_validate_meta_tags_short_title() {
        let html = r#"
            <head>
                <title>Short</title>
                <meta name="description" content="d">
                <meta property="og:title" content="t">
                <script type="application/ld+json">{}</script>
            </head>
        "#;

        let result = validate_meta_tags(&doc(html));
        assert_eq!(result.issues, vec![MetaIssue::TitleTooShort]);
        assert_eq!(result.issue_count, 1);
    }
}
