//! Generative-engine-optimization scoring
//!
//! The scorer asks the completion service for a fixed-schema JSON report about a
//! URL. Answers are decoded leniently: fences are stripped, an embedded object is
//! tried when the whole text is not JSON, and anything else becomes an empty report.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::llm::{CompletionClient, CompletionRequest, extract_json_object, strip_code_fences};

const SYSTEM_PROMPT: &str = "Ты - строгий аналитик GEO (Generative Engine Optimization). \
ТВОЯ ЗАДАЧА: проанализировать сайт и вернуть ТОЛЬКО ЧИСТЫЙ JSON без markdown. \
Все рекомендации писать НА РУССКОМ ЯЗЫКЕ!\n\
ПРАВИЛА:\n\
1. Поле 'score' - ТОЛЬКО целое число от 1 до 10.\n\
2. Поле 'value' - ТОЛЬКО одно из: 'Poor', 'Fair', 'Good', 'Very Good', 'Excellent'.\n\
3. Соответствие ОБЯЗАТЕЛЬНО:\n\
   - 'Poor' -> score 1-3\n\
   - 'Fair' -> score 4-5\n\
   - 'Good' -> score 6-7\n\
   - 'Very Good' -> score 8-9\n\
   - 'Excellent' -> score 10\n\
4. НИКАКИХ отклонений и пояснений вне JSON.\n\
Формат ответа:\n\
{\"metrics\": [\n\
  {\"name\": \"AI_Visibility_Score\", \"value\": \"...\", \"score\": 0, \"explanation\": \"...\"},\n\
  {\"name\": \"Source_Citations\", \"value\": \"...\", \"score\": 0, \"explanation\": \"...\"},\n\
  {\"name\": \"Brand_Mentions_in_LLMs\", \"value\": \"...\", \"score\": 0, \"explanation\": \"...\"},\n\
  {\"name\": \"Zero_Click_Presence_Rate\", \"value\": \"...\", \"score\": 0, \"explanation\": \"...\"},\n\
  {\"name\": \"Content_Freshness_Index\", \"value\": \"...\", \"score\": 0, \"explanation\": \"...\"},\n\
  {\"name\": \"Answer_Relevance_Score\", \"value\": \"...\", \"score\": 0, \"explanation\": \"...\"}\n\
 ],\n\
 \"overall\": {\"value\": \"...\", \"score\": 0, \"recommendations\": \"...\"}}";

/// The six metrics the scorer asks for, in report order.
pub const GEO_METRICS: [&str; 6] = [
    "AI_Visibility_Score",
    "Source_Citations",
    "Brand_Mentions_in_LLMs",
    "Zero_Click_Presence_Rate",
    "Content_Freshness_Index",
    "Answer_Relevance_Score",
];

const OVERALL_ROW: &str = "ОБЩАЯ ОЦЕНКА GEO";
const MISSING: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoRating {
    Poor,
    Fair,
    Good,
    #[serde(rename = "Very Good")]
    VeryGood,
    Excellent,
}

impl GeoRating {
    /// Band for a 1-10 score; `None` outside that range.
    pub fn for_score(score: u8) -> Option<Self> {
        match score {
            1..=3 => Some(GeoRating::Poor),
            4..=5 => Some(GeoRating::Fair),
            6..=7 => Some(GeoRating::Good),
            8..=9 => Some(GeoRating::VeryGood),
            10 => Some(GeoRating::Excellent),
            _ => None,
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Poor" => Some(GeoRating::Poor),
            "Fair" => Some(GeoRating::Fair),
            "Good" => Some(GeoRating::Good),
            "Very Good" => Some(GeoRating::VeryGood),
            "Excellent" => Some(GeoRating::Excellent),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GeoRating::Poor => "Poor",
            GeoRating::Fair => "Fair",
            GeoRating::Good => "Good",
            GeoRating::VeryGood => "Very Good",
            GeoRating::Excellent => "Excellent",
        }
    }
}

/// One metric as returned by the model. Fields are kept as sent, so a
/// value/score mismatch is visible to callers rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoMetric {
    pub name: String,
    pub value: Option<String>,
    pub score: Option<u8>,
    pub explanation: Option<String>,
}

impl GeoMetric {
    /// Read a metric object; a field of the wrong shape is left unset.
    pub fn from_json(value: &JsonValue) -> Self {
        Self {
            name: text_field(value, "name").unwrap_or_default(),
            value: text_field(value, "value"),
            score: score_field(value, "score"),
            explanation: text_field(value, "explanation"),
        }
    }

    pub fn rating(&self) -> Option<GeoRating> {
        self.value.as_deref().and_then(GeoRating::from_label)
    }

    /// Whether `value` matches the band of `score`.
    pub fn is_consistent(&self) -> bool {
        match (self.rating(), self.score.and_then(GeoRating::for_score)) {
            (Some(rating), Some(band)) => rating == band,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoOverall {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
}

impl GeoOverall {
    pub fn from_json(value: &JsonValue) -> Self {
        Self {
            value: text_field(value, "value"),
            score: score_field(value, "score"),
            recommendations: text_field(value, "recommendations"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GeoReport {
    pub metrics: Vec<GeoMetric>,
    pub overall: GeoOverall,
}

fn text_field(object: &JsonValue, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

/// Scores arrive as integers, floats or numeric strings. Floats are rounded;
/// anything that does not fit a `u8` is dropped.
fn score_field(object: &JsonValue, key: &str) -> Option<u8> {
    let score = match object.get(key)? {
        JsonValue::Number(number) => number.as_f64()?,
        JsonValue::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    }
    .round();

    (0.0..=f64::from(u8::MAX))
        .contains(&score)
        .then_some(score as u8)
}

/// Display row; keys are the column headers shown to users.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoTableRow {
    #[serde(rename = "Метрика")]
    pub metric: String,
    #[serde(rename = "Значение")]
    pub value: String,
    #[serde(rename = "Оценка")]
    pub score: JsonValue,
    #[serde(rename = "Описание")]
    pub description: String,
}

fn score_cell(score: Option<u8>) -> JsonValue {
    score.map_or_else(|| JsonValue::from(MISSING), JsonValue::from)
}

impl GeoReport {
    /// Build a report from a decoded answer. Non-object metric entries are
    /// skipped; everything else is kept field by field.
    pub fn from_json(value: &JsonValue) -> Self {
        let metrics = value
            .get("metrics")
            .and_then(JsonValue::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .map(GeoMetric::from_json)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            metrics,
            overall: value
                .get("overall")
                .map(GeoOverall::from_json)
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.overall == GeoOverall::default()
    }

    /// One row per metric followed by the overall row.
    pub fn table(&self) -> Vec<GeoTableRow> {
        let mut rows: Vec<GeoTableRow> = self
            .metrics
            .iter()
            .map(|metric| GeoTableRow {
                metric: metric.name.replace('_', " "),
                value: metric.value.clone().unwrap_or_else(|| MISSING.to_string()),
                score: score_cell(metric.score),
                description: metric
                    .explanation
                    .clone()
                    .unwrap_or_else(|| "Пояснение недоступно".to_string()),
            })
            .collect();

        rows.push(GeoTableRow {
            metric: OVERALL_ROW.to_string(),
            value: self
                .overall
                .value
                .clone()
                .unwrap_or_else(|| MISSING.to_string()),
            score: score_cell(self.overall.score),
            description: self
                .overall
                .recommendations
                .clone()
                .unwrap_or_else(|| "Рекомендации недоступны".to_string()),
        });
        rows
    }

    /// Metrics whose value does not match their score band.
    pub fn inconsistent_metrics(&self) -> impl Iterator<Item = &GeoMetric> {
        self.metrics.iter().filter(|metric| !metric.is_consistent())
    }
}

/// Decode a model answer, falling back to the first `{...}` span, then to empty.
pub fn parse_geo_response(raw: &str) -> GeoReport {
    let cleaned = strip_code_fences(raw);
    if let Ok(value @ JsonValue::Object(_)) = serde_json::from_str::<JsonValue>(cleaned) {
        return GeoReport::from_json(&value);
    }

    match extract_json_object(cleaned).map(|object| serde_json::from_str::<JsonValue>(object)) {
        Some(Ok(value)) => GeoReport::from_json(&value),
        Some(Err(err)) => {
            warn!(error = %err, "GEO response is not valid JSON");
            GeoReport::default()
        }
        None => {
            warn!("GEO response contains no JSON object");
            GeoReport::default()
        }
    }
}

pub struct GeoScorer<C> {
    client: C,
}

impl<C: CompletionClient> GeoScorer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Score `url`. Any failure yields an empty report.
    pub async fn score(&self, url: &str) -> GeoReport {
        let request = CompletionRequest::new(SYSTEM_PROMPT, url.trim())
            .temperature(0.1)
            .max_tokens(2000);

        match self.client.complete(&request).await {
            Ok(raw) => {
                let report = parse_geo_response(&raw);
                let inconsistent = report.inconsistent_metrics().count();
                if inconsistent > 0 {
                    debug!(url, inconsistent, "GEO metrics with mismatched value and score");
                }
                report
            }
            Err(err) => {
                warn!(url, error = %err, "GEO scoring failed");
                GeoReport::default()
            }
        }
    }
}
