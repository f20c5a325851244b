use url::Url;

use crate::error::AnalysisError;

/// Normalize user input into an absolute `http(s)` URL.
///
/// Trims whitespace and prepends `https://` when no `http://`/`https://` scheme
/// is given. Empty input and strings that still fail to parse are rejected.
pub fn normalize_target_url(input: &str) -> Result<String, AnalysisError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::InvalidUrl("URL не может быть пустым".to_string()));
    }

    let candidate = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) if parsed.host_str().is_some() => Ok(candidate),
        Ok(_) => Err(AnalysisError::InvalidUrl(format!("{candidate}: missing host"))),
        Err(e) => Err(AnalysisError::InvalidUrl(format!("{candidate}: {e}"))),
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
