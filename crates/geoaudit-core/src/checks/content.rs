//! Checks over visible page content: titles, headings, structure, questions

use scraper::Html;
use serde::{Deserialize, Serialize};

use crate::keywords::{
    ARTICLE_KEYWORDS, FAQ_KEYWORDS, HIGHLIGHT_CLASS_KEYWORDS, INSTRUCTION_KEYWORDS,
    PRODUCT_KEYWORDS, REVIEW_KEYWORDS, SCHEME_ALT_KEYWORDS, contains_any,
};
use crate::parser::{
    char_len, count_class_matches, count_elements, element_text, first_content, first_text,
    select_all, visible_text,
};

pub const TITLE_OPTIMAL_LENGTH: std::ops::RangeInclusive<usize> = 50..=60;
pub const DESCRIPTION_OPTIMAL_LENGTH: std::ops::RangeInclusive<usize> = 150..=160;

/// Number of heading texts kept per level.
const HEADING_EXAMPLES: usize = 2;

/// Title, description and H1 with their lengths
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticClarity {
    pub title: String,
    pub title_length: usize,
    pub title_optimal: bool,
    pub description: String,
    pub description_length: usize,
    pub description_optimal: bool,
    pub h1: String,
    /// Case-insensitive title/H1 equality; false without an H1.
    pub title_h1_match: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Headers {
    pub h1_count: usize,
    pub h1_optimal: bool,
    pub h2_count: usize,
    pub h3_count: usize,
    pub h1_examples: Vec<String>,
    pub h2_examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// `ul` plus `ol`
    pub lists: usize,
    pub tables: usize,
    /// `blockquote` plus highlighted `div`/`section` blocks
    pub blockquotes: usize,
    pub schemes: usize,
    pub has_structured_content: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Questions {
    pub count: usize,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecialContent {
    pub faq: usize,
    pub articles: usize,
    pub products: usize,
    pub reviews: usize,
    pub instructions: usize,
    pub has_special_content: bool,
}

pub fn analyze_semantic_clarity(document: &Html) -> SemanticClarity {
    let title = first_text(document, "title");
    let description = first_content(document, r#"meta[name="description"]"#).unwrap_or_default();
    let h1 = first_text(document, "h1");

    let title_length = char_len(&title);
    let description_length = char_len(&description);
    let title_h1_match = !h1.is_empty() && title.to_lowercase() == h1.to_lowercase();

    SemanticClarity {
        title_optimal: TITLE_OPTIMAL_LENGTH.contains(&title_length),
        description_optimal: DESCRIPTION_OPTIMAL_LENGTH.contains(&description_length),
        title,
        title_length,
        description,
        description_length,
        h1,
        title_h1_match,
    }
}

pub fn analyze_headers(document: &Html) -> Headers {
    let h1_tags = select_all(document, "h1");
    let h2_tags = select_all(document, "h2");

    Headers {
        h1_count: h1_tags.len(),
        h1_optimal: h1_tags.len() == 1,
        h2_count: h2_tags.len(),
        h3_count: count_elements(document, "h3"),
        h1_examples: h1_tags
            .iter()
            .take(HEADING_EXAMPLES)
            .map(|h| element_text(*h))
            .collect(),
        h2_examples: h2_tags
            .iter()
            .take(HEADING_EXAMPLES)
            .map(|h| element_text(*h))
            .collect(),
    }
}

pub fn analyze_structure(document: &Html) -> Structure {
    let lists = count_elements(document, "ul") + count_elements(document, "ol");
    let tables = count_elements(document, "table");
    let highlighted = count_class_matches(document, "div, section", HIGHLIGHT_CLASS_KEYWORDS);
    let schemes = select_all(document, "img[alt]")
        .into_iter()
        .filter(|img| {
            img.value()
                .attr("alt")
                .is_some_and(|alt| contains_any(alt, SCHEME_ALT_KEYWORDS))
        })
        .count();

    Structure {
        lists,
        tables,
        blockquotes: count_elements(document, "blockquote") + highlighted,
        schemes,
        has_structured_content: lists > 0 || tables > 0,
    }
}

/// Sentences containing a question mark, with at most `max_examples` kept.
pub fn analyze_questions(document: &Html, max_examples: usize) -> Questions {
    let text = flatten_text(&visible_text(document));

    let sentences: Vec<String> = text
        .split(['.', '!'])
        .filter(|sentence| sentence.contains('?'))
        .map(|sentence| sentence.trim().to_string())
        .collect();

    Questions {
        count: sentences.len(),
        examples: sentences.into_iter().take(max_examples).collect(),
    }
}

/// Collapse line breaks and runs of spaces into single spaces.
fn flatten_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn analyze_special_content(document: &Html) -> SpecialContent {
    let faq = count_class_matches(document, "[class]", FAQ_KEYWORDS);
    let article_tags = count_elements(document, "article");
    let blog_posts = count_class_matches(document, "[class]", ARTICLE_KEYWORDS);
    let products = count_class_matches(document, "[class]", PRODUCT_KEYWORDS);
    let reviews = count_class_matches(document, "[class]", REVIEW_KEYWORDS);
    let instructions = count_class_matches(document, "[class]", INSTRUCTION_KEYWORDS);

    SpecialContent {
        faq,
        articles: article_tags + blog_posts,
        products,
        reviews,
        instructions,
        has_special_content: faq > 0 || article_tags > 0 || products > 0 || reviews > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_semantic_clarity_optimal_lengths() {
        let title = "A".repeat(55);
        let description = "B".repeat(155);
        let html = format!(
            r#"<html><head><title>{title}</title>
            <meta name="description" content="{description}"></head>
            <body><h1>{title}</h1></body></html>"#
        );

        let result = analyze_semantic_clarity(&doc(&html));
        assert_eq!(result.title_length, 55);
        assert!(result.title_optimal);
        assert_eq!(result.description_length, 155);
        assert!(result.description_optimal);
        assert!(result.title_h1_match);
    }

    #[test]
    fn test_semantic_clarity_boundaries() {
        for (len, optimal) in [(49, false), (50, true), (60, true), (61, false)] {
            let html = format!("<title>{}</title>", "x".repeat(len));
            let result = analyze_semantic_clarity(&doc(&html));
            assert_eq!(result.title_optimal, optimal, "title length {len}");
        }
    }

    #[test]
    fn test_semantic_clarity_missing_elements() {
        let result = analyze_semantic_clarity(&doc("<html><body><p>Hi</p></body></html>"));
        assert_eq!(result.title, "");
        assert_eq!(result.title_length, 0);
        assert!(!result.title_optimal);
        assert_eq!(result.description, "");
        assert_eq!(result.h1, "");
        assert!(!result.title_h1_match);
    }

    #[test]
    fn test_title_h1_match_is_case_insensitive() {
        let html = "<title>Купить Диван</title><h1>купить диван</h1>";
        assert!(analyze_semantic_clarity(&doc(html)).title_h1_match);

        let html = "<title>Купить диван в Москве</title><h1>Диваны в Москве</h1>";
        assert!(!analyze_semantic_clarity(&doc(html)).title_h1_match);
    }

    #[test]
    fn test_cyrillic_title_length() {
        let html = "<title>Купить диван в Москве</title>";
        assert_eq!(analyze_semantic_clarity(&doc(html)).title_length, 21);
    }

    #[test]
    fn test_headers_without_h1() {
        let result = analyze_headers(&doc("<body><h2>Sub</h2><h3>A</h3><h3>B</h3></body>"));
        assert_eq!(result.h1_count, 0);
        assert!(!result.h1_optimal);
        assert_eq!(result.h2_count, 1);
        assert_eq!(result.h3_count, 2);
        assert!(result.h1_examples.is_empty());
        assert_eq!(result.h2_examples, vec!["Sub"]);
    }

    #[test]
    fn test_headers_examples_capped_at_two() {
        let result = analyze_headers(&doc(
            "<body><h1> One </h1><h1>Two</h1><h1>Three</h1></body>",
        ));
        assert_eq!(result.h1_count, 3);
        assert!(!result.h1_optimal);
        assert_eq!(result.h1_examples, vec!["One", "Two"]);
    }

    #[test]
    fn test_structure_counts() {
        let html = r#"
            <body>
                <ul><li>a</li></ul><ol><li>b</li></ol>
                <table><tr><td>1</td></tr></table>
                <blockquote>quote</blockquote>
                <div class="key-Feature">x</div>
                <section class="special-offer">y</section>
                <span class="highlight">not counted</span>
                <img alt="Architecture Diagram" src="a.png">
                <img alt="photo" src="b.png">
                <img src="c.png">
            </body>
        "#;

        let result = analyze_structure(&doc(html));
        assert_eq!(result.lists, 2);
        assert_eq!(result.tables, 1);
        assert_eq!(result.blockquotes, 3);
        assert_eq!(result.schemes, 1);
        assert!(result.has_structured_content);
    }

    #[test]
    fn test_structure_empty_page() {
        let result = analyze_structure(&doc("<body><p>plain</p></body>"));
        assert_eq!(result, Structure::default());
    }

    #[test]
    fn test_questions_found_and_capped() {
        let html = r#"
            <body>
                <p>What is SEO? It matters. How does GEO work?</p>
                <p>Why   care?   Because!</p>
                <p>Is it hard? Is it fast?</p>
                <script>var q = "hidden?";</script>
            </body>
        "#;

        let result = analyze_questions(&doc(html), 2);
        assert_eq!(result.count, 3);
        assert_eq!(
            result.examples,
            vec![
                "What is SEO? It matters",
                "How does GEO work? Why care? Because"
            ]
        );
        assert!(result.examples.iter().all(|s| !s.contains("hidden")));
    }

    #[test]
    fn test_questions_example_cap_is_configurable() {
        let html = "<p>A? B? C? D? E? F?</p>";
        // Only `.` and `!` split sentences.
        let result = analyze_questions(&doc(html), 5);
        assert_eq!(result.count, 1);

        let html = "<p>A?. B?. C?. D?. E?. F?.</p>";
        let result = analyze_questions(&doc(html), 5);
        assert_eq!(result.count, 6);
        assert_eq!(result.examples.len(), 5);
    }

    #[test]
    fn test_flatten_text() {
        assert_eq!(flatten_text("  one\n\n two  three \n"), "one two three");
    }

    #[test]
    fn test_special_content() {
        let html = r#"
            <body>
                <div class="faq-item">Q</div>
                <article>Story</article>
                <div class="blog-post">Post</div>
                <div class="review">Great</div>
                <div class="user-guide">Steps</div>
            </body>
        "#;

        let result = analyze_special_content(&doc(html));
        assert_eq!(result.faq, 1);
        assert_eq!(result.articles, 2);
        // "faq-item" also matches the product keyword "item"
        assert_eq!(result.products, 1);
        assert_eq!(result.reviews, 1);
        assert_eq!(result.instructions, 1);
        assert!(result.has_special_content);
    }

    #[test]
    fn test_special_content_none() {
        let result = analyze_special_content(&doc("<body><p>text</p></body>"));
        assert!(!result.has_special_content);
        assert_eq!(result.articles, 0);
    }
}
