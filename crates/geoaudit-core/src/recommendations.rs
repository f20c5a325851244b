//! Recommendation engine
//!
//! A fixed, ordered rule table is evaluated against a finished report. Every rule
//! that fires yields one [`Issue`]; issues are then enriched with an AI fix
//! suggestion and turned into [`Recommendation`]s. Output order is rule order.

use serde::Serialize;

use crate::checks::MetaIssue;
use crate::fixes::{FixError, FixSuggester, FixSuggestion};
use crate::llm::CompletionClient;
use crate::report::Report;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Structurally missing or blocking
    Critical,
    /// Present but suboptimal
    Warning,
    /// Enhancement opportunity
    Info,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub current_code: String,
    pub fixed_code: String,
    pub explanation: String,
    pub changes: Vec<String>,
}

impl Recommendation {
    pub fn new(issue: Issue, fix: FixSuggestion) -> Self {
        Self {
            severity: issue.severity,
            title: issue.title,
            message: issue.message,
            current_code: issue.current_code,
            fixed_code: fix.fixed_code,
            explanation: fix.explanation,
            changes: fix.changes,
        }
    }
}

/// A fired rule before AI enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    /// Problem statement sent to the fix suggester
    pub problem: String,
    /// Current markup reconstructed from the findings
    pub current_code: String,
}

impl Issue {
    fn new(
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
        problem: impl Into<String>,
        current_code: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            title: title.into(),
            message: message.into(),
            problem: problem.into(),
            current_code: current_code.into(),
        }
    }
}

pub struct RecommendationEngine<'a, C> {
    suggester: &'a FixSuggester<C>,
    ai_fixes: bool,
}

impl<'a, C: CompletionClient> RecommendationEngine<'a, C> {
    pub fn new(suggester: &'a FixSuggester<C>) -> Self {
        Self {
            suggester,
            ai_fixes: true,
        }
    }

    /// Skip the completion service; fixes fall back to the current snippet.
    pub fn without_ai_fixes(mut self) -> Self {
        self.ai_fixes = false;
        self
    }

    /// Evaluate every rule and enrich the fired ones, one completion call at a time.
    pub async fn generate(&self, report: &Report) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();
        for issue in evaluate_rules(report) {
            let fix = if self.ai_fixes {
                self.suggester
                    .suggest(&issue.problem, &issue.current_code, &report.url)
                    .await
            } else {
                FixSuggestion::fallback(&issue.current_code, FixError::Disabled, None)
            };
            recommendations.push(Recommendation::new(issue, fix));
        }
        recommendations
    }
}

fn title_markup(title: &str) -> String {
    format!("<title>{title}</title>")
}

fn description_markup(description: &str) -> String {
    format!(r#"<meta name="description" content="{description}">"#)
}

fn robots_markup(content: &str) -> String {
    format!(r#"<meta name="robots" content="{content}">"#)
}

/// Run the rule table in its fixed order.
pub fn evaluate_rules(report: &Report) -> Vec<Issue> {
    let mut issues = Vec::new();
    let url = report.url.as_str();
    let semantic = &report.semantic_clarity;
    let headers = &report.headers;

    // Title length
    if !semantic.title_optimal {
        let length = semantic.title_length;
        let (title, adjective) = if length < 50 {
            ("Title слишком короткий", "короткий")
        } else {
            ("Title слишком длинный", "длинный")
        };
        issues.push(Issue::new(
            Severity::Warning,
            title,
            format!("Длина Title: {length} символов (рекомендуется 50-60)"),
            format!(
                "Title слишком {adjective}: {length} символов вместо рекомендуемых 50-60. \
                 Текущий title: '{}'",
                semantic.title
            ),
            title_markup(&semantic.title),
        ));
    }

    // Description length
    if !semantic.description_optimal {
        let length = semantic.description_length;
        let (title, adjective) = if length < 150 {
            ("Meta Description слишком короткий", "короткий")
        } else {
            ("Meta Description слишком длинный", "длинный")
        };
        issues.push(Issue::new(
            Severity::Warning,
            title,
            format!("Длина Description: {length} символов (рекомендуется 150-160)"),
            format!(
                "Meta Description слишком {adjective}: {length} символов вместо 150-160. \
                 Текущий description: '{}'",
                semantic.description
            ),
            description_markup(&semantic.description),
        ));
    }

    // H1 count
    if headers.h1_count == 0 {
        issues.push(Issue::new(
            Severity::Critical,
            "Отсутствует H1 заголовок",
            "На странице не найден тег H1",
            "На странице отсутствует H1 заголовок. H1 необходим для SEO и структуры контента.",
            "<!-- H1 заголовок отсутствует -->",
        ));
    } else if headers.h1_count > 1 {
        let current_code = headers
            .h1_examples
            .iter()
            .map(|h1| format!("<h1>{h1}</h1>"))
            .collect::<Vec<_>>()
            .join("\n");
        issues.push(Issue::new(
            Severity::Warning,
            "Слишком много H1 заголовков",
            format!("Найдено {} H1 тегов (рекомендуется 1)", headers.h1_count),
            format!(
                "На странице найдено {} H1 заголовков, нужно оставить только один. \
                 Примеры текущих H1: {:?}",
                headers.h1_count, headers.h1_examples
            ),
            current_code,
        ));
    }

    // Title / H1 sync
    if !semantic.title_h1_match && !semantic.title.is_empty() && !semantic.h1.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            "Title и H1 не синхронизированы",
            "Заголовок в Title и H1 должны быть согласованы",
            format!(
                "Title и H1 не синхронизированы. Title: '{}', H1: '{}'. \
                 Они должны быть согласованы для лучшего SEO.",
                semantic.title, semantic.h1
            ),
            format!("{}\n<h1>{}</h1>", title_markup(&semantic.title), semantic.h1),
        ));
    }

    if !report.structured_data.has_structured_data {
        issues.push(Issue::new(
            Severity::Info,
            "Отсутствуют структурированные данные",
            "Не найден JSON-LD или микроразметка Schema.org",
            "Отсутствуют структурированные данные (JSON-LD) для поисковых систем и LLM. \
             JSON-LD помогает поисковым системам лучше понимать контент.",
            "<!-- Структурированные данные отсутствуют -->",
        ));
    }

    if !report.author_signals.has_author_signals {
        issues.push(Issue::new(
            Severity::Warning,
            "Не указана информация об авторе",
            "Отсутствуют сигналы авторства и экспертизы",
            "Отсутствуют сигналы авторства и экспертизы (EEAT). \
             Необходимо добавить информацию об авторе для повышения доверия.",
            "<!-- Информация об авторе отсутствует -->",
        ));
    }

    if !report.dates.has_dates {
        issues.push(Issue::new(
            Severity::Info,
            "Не указаны даты публикации",
            "Отсутствуют метатеги с датами публикации и обновления",
            "Отсутствуют метатеги с датами публикации и обновления. \
             Даты важны для определения актуальности контента.",
            "<!-- Даты не указаны -->",
        ));
    }

    if !report.social_meta.has_social_meta {
        issues.push(Issue::new(
            Severity::Info,
            "Отсутствуют Open Graph теги",
            "Не найдены метатеги для социальных сетей",
            "Отсутствуют Open Graph теги для социальных сетей. \
             OG теги улучшают отображение при расшаривании в соцсетях.",
            "<!-- Open Graph теги отсутствуют -->",
        ));
    }

    let canonical = &report.canonical;
    if !canonical.is_self_canonical && !canonical.canonical.is_empty() {
        issues.push(Issue::new(
            Severity::Warning,
            "Некорректный canonical URL",
            format!("Canonical ссылка указывает на: {}", canonical.canonical),
            format!(
                "Canonical URL указывает на другой адрес: {} вместо {url}. \
                 Canonical должен указывать на текущую страницу.",
                canonical.canonical
            ),
            format!(r#"<link rel="canonical" href="{}">"#, canonical.canonical),
        ));
    }

    // Robots directives: noindex takes precedence over the snippet hint.
    let llm = &report.llm_accessibility;
    if !llm.llm_friendly {
        if llm.has_noindex() {
            issues.push(Issue::new(
                Severity::Critical,
                "Страница закрыта от индексации",
                "Robots meta тег содержит noindex",
                format!(
                    "Robots meta тег содержит 'noindex': {}. Это запрещает индексацию \
                     страницы поисковыми системами и LLM.",
                    llm.robots_meta
                ),
                robots_markup(&llm.robots_meta),
            ));
        } else if !llm.max_snippet {
            issues.push(Issue::new(
                Severity::Info,
                "Не настроены разрешения для LLM",
                "Отсутствует max-snippet:-1 в robots meta",
                format!(
                    "Отсутствует max-snippet:-1 в robots meta теге: {}. \
                     max-snippet:-1 разрешает LLM использовать фрагменты контента.",
                    llm.robots_meta
                ),
                robots_markup(&llm.robots_meta),
            ));
        }
    }

    for meta_issue in &report.validation.issues {
        match meta_issue {
            MetaIssue::TitleTooShort if !semantic.title.is_empty() => {
                issues.push(Issue::new(
                    Severity::Critical,
                    "Критическая ошибка: Title",
                    meta_issue.message(),
                    format!(
                        "Критическая ошибка: Title слишком короткий ({} символов). \
                         Минимальная рекомендуемая длина - 10 символов.",
                        semantic.title_length
                    ),
                    title_markup(&semantic.title),
                ));
            }
            MetaIssue::MissingTitle => {
                issues.push(Issue::new(
                    Severity::Critical,
                    "Критическая ошибка: отсутствует Title",
                    meta_issue.message(),
                    "Критическая ошибка: отсутствует тег <title>. \
                     Title обязателен для корректной индексации страницы.",
                    "<!-- Title отсутствует -->",
                ));
            }
            // Covered by the description, structured data and social rules above.
            _ => {}
        }
    }

    issues
}
