use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::models::ReferenceRange;

/// One line that looked like a test row. Consumed by the resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct RawMatch {
    pub name: String,
    pub value: f64,
    pub unit: Option<String>,
    /// The range expression as it appeared on the line, e.g. `70-100`.
    pub range_text: Option<String>,
    /// 1-based line number in the cleaned text.
    pub line_number: usize,
}

// Without a separator, name words after the first must not start with a digit
// so the value is never absorbed into the name. A bare `-` word is allowed.
// '.' and ':' never appear in a name.
const NAME: &str =
    r"(?P<name>\p{L}[\p{L}\p{N}\-/()%]*(?:\s+(?:-|[\p{L}(/%][\p{L}\p{N}\-/()%]*))*)";
// A colon marks where the name ends, so any word may start with a digit or hyphen.
const COLON_NAME: &str =
    r"(?P<name>\p{L}[\p{L}\p{N}\-/()%]*(?:\s+[\p{L}\p{N}\-(/%][\p{L}\p{N}\-/()%]*)*)";
const VALUE: &str = r"(?P<value>[-+]?\d+(?:\.\d+)?)";
// `mg/dL`, `%`, `µg/L`, or a digit-led unit such as `10^3/uL`.
const UNIT: &str = r"(?:\s*(?P<unit>[\p{L}%µ/][\p{L}\p{N}%µ/.^*]{0,11}|\d+[\^/][\p{L}\p{N}%µ/.^*]{0,10}))?";
const REST: &str = r"(?P<rest>(?:[\s(\[].*)?)";

/// `Glucose 2 hr PP: 140 mg/dL (70-140)`
static COLON_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{COLON_NAME}\s*:\s*{VALUE}{UNIT}{REST}$")).unwrap()
});

/// `Serum Creatinine - 1.4 mg/dL`
static HYPHEN_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^{NAME}\s*-\s*{VALUE}{UNIT}{REST}$")).unwrap()
});

/// `Hemoglobin   9.5 g/dL   12.0 - 17.5`
static SPACE_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{NAME}\s+{VALUE}{UNIT}{REST}$")).unwrap());

static BETWEEN_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:\.\d+)?)\s*(?:-|–|—|\bto\b)\s*(\d+(?:\.\d+)?)").unwrap()
});

static LESS_THAN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<=?|≤)\s*(\d+(?:\.\d+)?)").unwrap());

static GREATER_THAN_RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:>=?|≥)\s*(\d+(?:\.\d+)?)").unwrap());

/// Names shorter than this are treated as a failed form.
const MIN_NAME_CHARS: usize = 3;

/// Parse every line of cleaned text, lazily, skipping lines that match neither form.
pub fn parse_lines(text: &str) -> impl Iterator<Item = RawMatch> + '_ {
    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| parse_line(line, idx + 1))
}

/// Try the separator forms (colon, then hyphen), then the space form.
pub fn parse_line(line: &str, line_number: usize) -> Option<RawMatch> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let parsed = [&*COLON_FORM, &*HYPHEN_FORM, &*SPACE_FORM]
        .into_iter()
        .find_map(|pattern| pattern.captures(line).and_then(|caps| from_captures(&caps, line_number)));

    if parsed.is_none() {
        tracing::trace!(line_number, "Line matched no test row form");
    }
    parsed
}

fn from_captures(caps: &Captures<'_>, line_number: usize) -> Option<RawMatch> {
    let name = caps.name("name")?.as_str().trim();
    if name.chars().count() < MIN_NAME_CHARS {
        return None;
    }
    let value: f64 = caps.name("value")?.as_str().parse().ok()?;
    let unit = caps
        .name("unit")
        .map(|m| m.as_str().to_string())
        .filter(|u| !u.is_empty());
    let range_text = caps.name("rest").and_then(|m| find_range_text(m.as_str()));

    Some(RawMatch {
        name: name.to_string(),
        value,
        unit,
        range_text,
        line_number,
    })
}

/// First range expression in the text: between, then less-than, then greater-than.
fn find_range_text(rest: &str) -> Option<String> {
    [&*BETWEEN_RANGE, &*LESS_THAN_RANGE, &*GREATER_THAN_RANGE]
        .into_iter()
        .find_map(|pattern| pattern.find(rest))
        .map(|m| m.as_str().trim().to_string())
}

/// Turn a range expression into a `ReferenceRange`, or `None` if nothing
/// numeric is recognizable.
pub fn parse_range_text(text: &str) -> Option<ReferenceRange> {
    if let Some(caps) = BETWEEN_RANGE.captures(text) {
        let low = caps[1].parse().ok()?;
        let high = caps[2].parse().ok()?;
        return Some(ReferenceRange::between(low, high));
    }
    if let Some(caps) = LESS_THAN_RANGE.captures(text) {
        return Some(ReferenceRange::less_than(caps[1].parse().ok()?));
    }
    if let Some(caps) = GREATER_THAN_RANGE.captures(text) {
        return Some(ReferenceRange::greater_than(caps[1].parse().ok()?));
    }
    None
}
