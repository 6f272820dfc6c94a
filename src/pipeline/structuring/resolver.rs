use std::collections::HashSet;

use crate::intelligence::ReferenceTable;
use crate::models::TestRecord;

use super::parser::{parse_range_text, RawMatch};

/// Words that mark header and metadata lines (`Patient ID: 1042`, `Page 2 of 3`).
const NOISE_WORDS: &[&str] = &[
    "page", "name", "date", "patient", "lab", "result", "age", "sex", "gender", "id", "no", "dr",
    "ref", "unit", "time",
];

/// Names shorter than this are rejected outright.
const MIN_NAME_CHARS: usize = 2;

/// True when any word of the name is a metadata marker.
pub fn is_noise_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .any(|w| NOISE_WORDS.contains(&w))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Turn raw matches into unclassified test records.
///
/// Noise lines are dropped, names resolved against `table`, and only the
/// first line per canonical name is kept. An inline range replaces the table
/// range; an inline unit replaces the table unit.
pub fn resolve_matches<I>(matches: I, table: &ReferenceTable) -> Vec<TestRecord>
where
    I: IntoIterator<Item = RawMatch>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();
    let mut candidates = 0usize;

    for raw in matches {
        candidates += 1;
        let name = collapse_whitespace(&raw.name);

        if name.chars().count() < MIN_NAME_CHARS || is_noise_name(&name) {
            tracing::trace!(line_number = raw.line_number, "Dropped metadata line");
            continue;
        }

        let reference = table.lookup(&name);
        if !reference.is_known() {
            tracing::trace!(
                line_number = raw.line_number,
                test = %reference.canonical_name,
                "Unrecognized test name"
            );
        }

        let key = reference.canonical_name.to_lowercase();
        if seen.contains(&key) {
            tracing::trace!(
                line_number = raw.line_number,
                test = %reference.canonical_name,
                "Dropped duplicate test"
            );
            continue;
        }

        let range = raw
            .range_text
            .as_deref()
            .and_then(parse_range_text)
            .unwrap_or_else(|| reference.range());
        let unit = raw.unit.unwrap_or(reference.unit);

        seen.insert(key);
        records.push(TestRecord::new(
            reference.canonical_name,
            raw.value,
            unit,
            range,
        ));
    }

    tracing::debug!(candidates, records = records.len(), "Resolved test records");
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::ReferenceEntry;
    use crate::models::{RangeKind, ReferenceRange, TestStatus};
    use crate::pipeline::structuring::parse_lines;

    fn resolve(text: &str) -> Vec<TestRecord> {
        resolve_matches(parse_lines(text), ReferenceTable::builtin())
    }

    #[test]
    fn inline_range_and_unit_win() {
        let records = resolve("Hemoglobin   9.5 g/dL   12.0 - 17.5");
        assert_eq!(records.len(), 1);
        let hb = &records[0];
        assert_eq!(hb.name, "Hemoglobin");
        assert_eq!(hb.value, 9.5);
        assert_eq!(hb.unit, "g/dL");
        assert_eq!(hb.range, ReferenceRange::between(12.0, 17.5));
        assert_eq!(hb.display_range, "12 - 17.5");
        assert_eq!(hb.status, TestStatus::Unknown);
    }

    #[test]
    fn inline_range_overrides_table_range() {
        let records = resolve("Glucose: 250 mg/dL (80-120)");
        assert_eq!(records[0].name, "Blood Glucose");
        assert_eq!(records[0].range, ReferenceRange::between(80.0, 120.0));
    }

    #[test]
    fn table_fills_missing_range_and_unit() {
        let records = resolve("TSH 6.2");
        assert_eq!(records[0].name, "TSH");
        assert_eq!(records[0].unit, "mIU/L");
        assert_eq!(records[0].range, ReferenceRange::between(0.4, 4.0));
    }

    #[test]
    fn one_sided_inline_range_replaces_table_bounds() {
        let records = resolve("Total Cholesterol 240 mg/dL < 200");
        assert_eq!(records[0].range.kind(), RangeKind::LessThan);
        assert_eq!(records[0].range.low(), None);
    }

    #[test]
    fn metadata_lines_are_dropped() {
        let text = "Patient Name: John Smith\nPatient ID: 10423\nPage 1 of 2\nAge: 45\nLab No: 77";
        assert!(resolve(text).is_empty());
        assert!(is_noise_name("Patient Name"));
        assert!(is_noise_name("Ref. Range"));
        assert!(!is_noise_name("Hemoglobin"));
        // Whole words only.
        assert!(!is_noise_name("Sodium"));
    }

    #[test]
    fn unknown_tests_are_kept_without_range() {
        let records = resolve("lactate dehydrogenase 310 U/L");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Lactate Dehydrogenase");
        assert_eq!(records[0].unit, "U/L");
        assert!(records[0].range.is_none());
        assert_eq!(records[0].display_range, "N/A");
    }

    #[test]
    fn first_occurrence_wins_per_canonical_name() {
        let text = "Hemoglobin 9.5 g/dL\nHaemoglobin 14.0 g/dL\nHgb 15.1";
        let records = resolve(text);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].value, 9.5);
    }

    #[test]
    fn internal_whitespace_is_collapsed_before_lookup() {
        let matches = vec![RawMatch {
            name: "Total   Cholesterol".into(),
            value: 180.0,
            unit: None,
            range_text: None,
            line_number: 1,
        }];
        let records = resolve_matches(matches, ReferenceTable::builtin());
        assert_eq!(records[0].name, "Total Cholesterol");
    }

    #[test]
    fn custom_table_is_used() {
        let table = ReferenceTable::from_entries(vec![ReferenceEntry {
            alias: "lactate".into(),
            canonical_name: "Lactate".into(),
            low: Some(0.5),
            high: Some(2.2),
            unit: "mmol/L".into(),
        }]);
        let records = resolve_matches(parse_lines("Lactate: 3.1"), &table);
        assert_eq!(records[0].name, "Lactate");
        assert_eq!(records[0].unit, "mmol/L");
        assert_eq!(records[0].range, ReferenceRange::between(0.5, 2.2));
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(resolve("").is_empty());
        assert!(resolve("LAB REPORT\nCOMPLETE BLOOD COUNT").is_empty());
    }

    #[test]
    fn names_with_numbers_resolve_to_their_test() {
        let records = resolve(
            "Glucose 2 hr PP: 140 mg/dL\n\
             Vitamin D 25-OH: 20 ng/mL\n\
             Glucose - Fasting 95 mg/dL",
        );
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Blood Glucose", "Vitamin D"]);
        assert_eq!(records[0].value, 140.0);
        assert_eq!(records[1].value, 20.0);
        assert_eq!(records[1].range, ReferenceRange::between(30.0, 100.0));
    }
}
