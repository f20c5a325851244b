//! The aggregator: fetch, run every check, then attach recommendations

use std::time::Duration;

use tracing::info;

use crate::config::AnalyzerConfig;
use crate::error::AnalysisError;
use crate::fixes::FixSuggester;
use crate::llm::CompletionClient;
use crate::parser::{build_http_client, fetch_page};
use crate::recommendations::RecommendationEngine;
use crate::report::Report;

pub struct Analyzer<C> {
    http: reqwest::Client,
    config: AnalyzerConfig,
    suggester: FixSuggester<C>,
}

impl<C: CompletionClient> Analyzer<C> {
    pub fn new(config: AnalyzerConfig, client: C) -> Result<Self, AnalysisError> {
        Ok(Self {
            http: build_http_client(&config.user_agent)?,
            config,
            suggester: FixSuggester::new(client),
        })
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze the page at `url`.
    ///
    /// Fetch failures abort the run; every later step degrades instead of failing.
    pub async fn analyze(&self, url: &str) -> Result<Report, AnalysisError> {
        let page = fetch_page(&self.http, url, self.config.fetch_timeout).await?;
        info!(
            url,
            status = page.status,
            elapsed_ms = page.elapsed.as_millis() as u64,
            "Page fetched"
        );

        Ok(self.analyze_html(url, &page.body, page.elapsed).await)
    }

    /// Run checks and recommendations over already fetched HTML.
    pub async fn analyze_html(
        &self,
        url: &str,
        html: &str,
        load_time: Duration,
    ) -> Report {
        let mut report = Report::from_html(url, html, load_time, self.config.question_examples);

        let engine = RecommendationEngine::new(&self.suggester);
        let engine = if self.config.ai_fixes {
            engine
        } else {
            engine.without_ai_fixes()
        };
        report.recommendations = engine.generate(&report).await;

        info!(
            url,
            recommendations = report.recommendations.len(),
            "Analysis complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LlmError;
    use crate::llm::CompletionRequest;
    use async_trait::async_trait;

    struct Offline;

    #[async_trait]
    impl CompletionClient for Offline {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
            Err(LlmError::MissingApiKey)
        }
    }

    #[tokio::test]
    async fn test_analyze_html_attaches_recommendations() {
        let analyzer = Analyzer::new(AnalyzerConfig::default(), Offline).unwrap();
        let report = analyzer
            .analyze_html("https://site.com", "<title>Tiny</title>", Duration::from_millis(250))
            .await;

        assert_eq!(report.semantic_clarity.title, "Tiny");
        assert!(!report.recommendations.is_empty());
        assert!(
            report
                .recommendations
                .iter()
                .all(|rec| rec.fixed_code == rec.current_code)
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["load_time"], "0.25 сек");
    }

    #[tokio::test]
    async fn test_question_cap_comes_from_config() {
        let config = AnalyzerConfig {
            question_examples: 1,
            ai_fixes: false,
            ..AnalyzerConfig::default()
        };
        let analyzer = Analyzer::new(config, Offline).unwrap();
        let report = analyzer
            .analyze_html("https://site.com", "<p>One?. Two?. Three?.</p>", Duration::ZERO)
            .await;

        assert_eq!(report.questions.count, 3);
        assert_eq!(report.questions.examples, vec!["One?"]);
    }
}
