//! # geoaudit-core
//!
//! Core library for heuristic SEO/GEO audits of single HTML pages.
//!
//! This library provides:
//! - Page fetching and document query helpers
//! - A battery of independent checks over the parsed document
//! - A rule table that turns findings into severity-tagged recommendations
//! - AI fix suggestions and GEO scoring through a pluggable completion client
//!
//! ## Example
//!
//! ```no_run
//! use geoaudit_core::{Analyzer, AnalyzerConfig, LlmConfig, YandexGptClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = YandexGptClient::new(LlmConfig::from_env())?;
//! let analyzer = Analyzer::new(AnalyzerConfig::default(), client)?;
//!
//! let report = analyzer.analyze("https://example.com").await?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod checks;
pub mod config;
pub mod error;
pub mod fixes;
pub mod geo;
pub mod keywords;
pub mod llm;
pub mod parser;
pub mod recommendations;
pub mod report;
pub mod url_utils;

// Re-export commonly used types
pub use analyzer::Analyzer;
pub use config::{AnalyzerConfig, LlmConfig};
pub use error::{AnalysisError, ErrorReport, LlmError};
pub use fixes::{FixError, FixSuggester, FixSuggestion};
pub use geo::{GeoMetric, GeoRating, GeoReport, GeoScorer, GeoTableRow};
pub use llm::{CompletionClient, CompletionRequest, YandexGptClient};
pub use recommendations::{Recommendation, RecommendationEngine, Severity};
pub use report::Report;
pub use url_utils::normalize_target_url;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_report_from_html_runs_every_check() {
        let html = r#"
            <html><head>
                <title>Guide</title>
                <meta name="author" content="Anna">
            </head>
            <body><h1>Guide</h1><ul><li>Step</li></ul></body></html>
        "#;

        let report = Report::from_html("https://example.com", html, Duration::ZERO, 3);
        assert!(report.semantic_clarity.title_h1_match);
        assert!(report.author_signals.has_author_signals);
        assert!(report.structure.has_structured_content);
        assert!(report.eeat.https);
        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        let json = serde_json::to_value([Severity::Critical, Severity::Warning, Severity::Info])
            .unwrap();
        assert_eq!(json, serde_json::json!(["critical", "warning", "info"]));
    }
}
