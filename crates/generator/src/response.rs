use once_cell::sync::Lazy;
use regex::Regex;

static PYTHON_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:python|py)[ \t]*\r?\n(.*?)```").expect("valid fence pattern")
});

static ANY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[^\n`]*\r?\n(.*?)```").expect("valid fence pattern"));

const SCRIPT_START: &str = "from diagrams import";

/// Pull the script out of a model response.
///
/// Preference order: a ```python fence, any fence, everything from the
/// first `from diagrams import`, the whole text.
pub fn extract_code(text: &str) -> String {
    if let Some(code) = PYTHON_FENCE.captures(text).and_then(|c| c.get(1)) {
        return code.as_str().trim().to_string();
    }
    if let Some(code) = ANY_FENCE.captures(text).and_then(|c| c.get(1)) {
        return code.as_str().trim().to_string();
    }
    if let Some(start) = text.find(SCRIPT_START) {
        return text[start..].trim().to_string();
    }
    text.trim().to_string()
}
