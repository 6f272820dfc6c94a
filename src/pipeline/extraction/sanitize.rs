use std::sync::LazyLock;

use regex::Regex;

static HORIZONTAL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}\u{2000}-\u{200A}\u{3000}]+").unwrap());

static EXCESS_NEWLINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Clean raw OCR output before line parsing.
///
/// Normalizes line endings, strips control characters, collapses horizontal
/// whitespace, and drops symbol-only lines (table rules, stray glyphs). Blank
/// lines survive as separators but never more than one in a row.
pub fn clean_ocr_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");

    let lines: Vec<String> = normalized
        .lines()
        .map(|line| {
            let visible: String = line
                .chars()
                .filter(|c| !c.is_control() || *c == '\t')
                .collect();
            HORIZONTAL_WHITESPACE
                .replace_all(&visible, " ")
                .trim()
                .to_string()
        })
        .filter(|line| line.is_empty() || line.chars().any(|c| c.is_ascii_alphanumeric()))
        .collect();

    let joined = lines.join("\n");
    let cleaned = EXCESS_NEWLINES.replace_all(&joined, "\n\n").trim().to_string();

    tracing::debug!(
        raw_len = raw.len(),
        cleaned_len = cleaned.len(),
        lines = cleaned.lines().count(),
        "Cleaned OCR text"
    );
    cleaned
}
