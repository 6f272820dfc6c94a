use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::ReferenceDataError;
use crate::models::ReferenceRange;

/// One alias row of the reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    /// Lowercase lookup key.
    pub alias: String,
    pub canonical_name: String,
    pub low: Option<f64>,
    pub high: Option<f64>,
    #[serde(default)]
    pub unit: String,
}

/// Result of a knowledge-base lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMatch {
    pub low: Option<f64>,
    pub high: Option<f64>,
    pub unit: String,
    pub canonical_name: String,
    matched: bool,
}

impl ReferenceMatch {
    pub fn range(&self) -> ReferenceRange {
        ReferenceRange::from_bounds(self.low, self.high)
    }

    /// True when the name resolved to a table entry.
    pub fn is_known(&self) -> bool {
        self.matched
    }
}

/// Built-in table: (alias, low, high, unit, canonical name). Declaration order
/// breaks ties between equally long substring matches.
#[rustfmt::skip]
const BUILTIN_ALIASES: &[(&str, f64, f64, &str, &str)] = &[
    // Haematology
    ("hemoglobin",           12.0, 17.5, "g/dL",   "Hemoglobin"),
    ("haemoglobin",          12.0, 17.5, "g/dL",   "Hemoglobin"),
    ("hb",                   12.0, 17.5, "g/dL",   "Hemoglobin"),
    ("hgb",                  12.0, 17.5, "g/dL",   "Hemoglobin"),
    ("hematocrit",           36.0, 52.0, "%",      "Hematocrit"),
    ("haematocrit",          36.0, 52.0, "%",      "Hematocrit"),
    ("packed cell volume",   36.0, 52.0, "%",      "Packed Cell Volume"),
    ("pcv",                  36.0, 52.0, "%",      "Packed Cell Volume"),
    ("rbc",                  4.0,  5.9,  "M/µL",   "Red Blood Cells"),
    ("red blood cell",       4.0,  5.9,  "M/µL",   "Red Blood Cells"),
    ("wbc",                  4.0,  11.0, "K/µL",   "White Blood Cells"),
    ("white blood cell",     4.0,  11.0, "K/µL",   "White Blood Cells"),
    ("leukocyte",            4.0,  11.0, "K/µL",   "Leukocytes"),
    ("platelet",             150.0, 400.0, "K/µL", "Platelets"),
    ("thrombocyte",          150.0, 400.0, "K/µL", "Platelets"),
    ("mcv",                  80.0, 100.0, "fL",    "MCV"),
    ("mch",                  27.0, 33.0, "pg",     "MCH"),
    ("mchc",                 32.0, 36.0, "g/dL",   "MCHC"),
    ("rdw",                  11.5, 14.5, "%",      "RDW"),
    ("neutrophil",           40.0, 75.0, "%",      "Neutrophils"),
    ("lymphocyte",           20.0, 45.0, "%",      "Lymphocytes"),
    ("monocyte",             2.0,  10.0, "%",      "Monocytes"),
    ("eosinophil",           1.0,  6.0,  "%",      "Eosinophils"),
    ("basophil",             0.0,  1.0,  "%",      "Basophils"),

    // Glucose / diabetes
    ("glucose",              70.0, 100.0, "mg/dL", "Blood Glucose"),
    ("fasting glucose",      70.0, 100.0, "mg/dL", "Fasting Blood Glucose"),
    ("fasting sugar",        70.0, 100.0, "mg/dL", "Fasting Blood Sugar"),
    ("fbs",                  70.0, 100.0, "mg/dL", "Fasting Blood Sugar"),
    ("random glucose",       70.0, 140.0, "mg/dL", "Random Blood Glucose"),
    ("random blood sugar",   70.0, 140.0, "mg/dL", "Random Blood Sugar"),
    ("rbs",                  70.0, 140.0, "mg/dL", "Random Blood Sugar"),
    ("blood sugar",          70.0, 140.0, "mg/dL", "Blood Sugar"),
    ("hba1c",                4.0,  5.6,  "%",      "HbA1c"),
    ("glycated hemoglobin",  4.0,  5.6,  "%",      "Glycated Hemoglobin"),

    // Lipids
    ("total cholesterol",    0.0,  200.0, "mg/dL", "Total Cholesterol"),
    ("cholesterol",          0.0,  200.0, "mg/dL", "Total Cholesterol"),
    ("ldl",                  0.0,  130.0, "mg/dL", "LDL Cholesterol"),
    ("hdl",                  40.0, 60.0, "mg/dL",  "HDL Cholesterol"),
    ("triglyceride",         0.0,  150.0, "mg/dL", "Triglycerides"),
    ("vldl",                 0.0,  30.0, "mg/dL",  "VLDL"),
    ("non-hdl",              0.0,  160.0, "mg/dL", "Non-HDL Cholesterol"),

    // Liver function
    ("sgpt",                 0.0,  40.0, "U/L",    "SGPT (ALT)"),
    ("alt",                  0.0,  40.0, "U/L",    "ALT"),
    ("sgot",                 0.0,  40.0, "U/L",    "SGOT (AST)"),
    ("ast",                  0.0,  40.0, "U/L",    "AST"),
    ("alkaline phosphatase", 44.0, 147.0, "U/L",   "Alkaline Phosphatase"),
    ("alp",                  44.0, 147.0, "U/L",   "ALP"),
    ("ggt",                  0.0,  60.0, "U/L",    "GGT"),
    ("total bilirubin",      0.2,  1.2,  "mg/dL",  "Bilirubin Total"),
    ("bilirubin",            0.2,  1.2,  "mg/dL",  "Bilirubin Total"),
    ("direct bilirubin",     0.0,  0.3,  "mg/dL",  "Bilirubin Direct"),
    ("indirect bilirubin",   0.0,  0.9,  "mg/dL",  "Bilirubin Indirect"),
    ("albumin",              3.5,  5.0,  "g/dL",   "Albumin"),
    ("total protein",        6.0,  8.3,  "g/dL",   "Total Protein"),
    ("globulin",             2.0,  3.5,  "g/dL",   "Globulin"),

    // Kidney function
    ("creatinine",           0.6,  1.2,  "mg/dL",  "Creatinine"),
    ("serum creatinine",     0.6,  1.2,  "mg/dL",  "Serum Creatinine"),
    ("blood urea nitrogen",  7.0,  20.0, "mg/dL",  "BUN"),
    ("bun",                  7.0,  20.0, "mg/dL",  "BUN"),
    ("urea",                 7.0,  20.0, "mg/dL",  "Blood Urea"),
    ("uric acid",            2.4,  7.0,  "mg/dL",  "Uric Acid"),
    ("egfr",                 60.0, 120.0, "mL/min", "eGFR"),

    // Thyroid
    ("tsh",                  0.4,  4.0,  "mIU/L",  "TSH"),
    ("thyroid stimulating",  0.4,  4.0,  "mIU/L",  "TSH"),
    ("t3",                   80.0, 200.0, "ng/dL", "T3"),
    ("t4",                   5.0,  12.0, "µg/dL",  "T4"),
    ("free t3",              2.3,  4.2,  "pg/mL",  "Free T3"),
    ("free t4",              0.8,  1.8,  "ng/dL",  "Free T4"),

    // Electrolytes
    ("sodium",               136.0, 145.0, "mEq/L", "Sodium"),
    ("potassium",            3.5,  5.0,  "mEq/L",  "Potassium"),
    ("chloride",             98.0, 107.0, "mEq/L", "Chloride"),
    ("bicarbonate",          22.0, 29.0, "mEq/L",  "Bicarbonate"),
    ("calcium",              8.5,  10.5, "mg/dL",  "Calcium"),
    ("phosphorus",           2.5,  4.5,  "mg/dL",  "Phosphorus"),
    ("magnesium",            1.7,  2.4,  "mg/dL",  "Magnesium"),

    // Vitamins and iron
    ("vitamin d",            30.0, 100.0, "ng/mL", "Vitamin D"),
    ("25-oh",                30.0, 100.0, "ng/mL", "Vitamin D (25-OH)"),
    ("vitamin b12",          190.0, 900.0, "pg/mL", "Vitamin B12"),
    ("b12",                  190.0, 900.0, "pg/mL", "Vitamin B12"),
    ("folate",               2.7,  17.0, "ng/mL",  "Folate"),
    ("ferritin",             12.0, 300.0, "ng/mL", "Ferritin"),
    ("serum iron",           60.0, 170.0, "µg/dL", "Serum Iron"),
    ("iron",                 60.0, 170.0, "µg/dL", "Serum Iron"),
    ("tibc",                 240.0, 450.0, "µg/dL", "TIBC"),

    // Inflammatory / other
    ("crp",                  0.0,  1.0,  "mg/dL",  "C-Reactive Protein"),
    ("c-reactive protein",   0.0,  1.0,  "mg/dL",  "C-Reactive Protein"),
    ("esr",                  0.0,  20.0, "mm/hr",  "ESR"),
    ("psa",                  0.0,  4.0,  "ng/mL",  "PSA"),
    ("hcg",                  0.0,  5.0,  "mIU/mL", "hCG"),
];

static BUILTIN: LazyLock<ReferenceTable> = LazyLock::new(|| {
    let entries = BUILTIN_ALIASES
        .iter()
        .map(|&(alias, low, high, unit, canonical)| ReferenceEntry {
            alias: alias.into(),
            canonical_name: canonical.into(),
            low: Some(low),
            high: Some(high),
            unit: unit.into(),
        })
        .collect();
    ReferenceTable::from_entries(entries)
});

/// Alias table mapping raw test names to canonical names and reference bounds.
///
/// Read-only after construction, so one table can serve any number of
/// concurrent analyses.
#[derive(Debug, Clone)]
pub struct ReferenceTable {
    entries: Vec<ReferenceEntry>,
    /// Lowercase alias -> index of its first declaration.
    exact: HashMap<String, usize>,
}

impl ReferenceTable {
    /// The bundled table.
    pub fn builtin() -> &'static ReferenceTable {
        &BUILTIN
    }

    /// Build a table from entries. Aliases are lowercased and trimmed; when an
    /// alias repeats, the first declaration wins.
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Self {
        let entries: Vec<ReferenceEntry> = entries
            .into_iter()
            .map(|mut e| {
                e.alias = e.alias.trim().to_lowercase();
                e
            })
            .filter(|e| !e.alias.is_empty())
            .collect();

        let mut exact = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            exact.entry(entry.alias.clone()).or_insert(idx);
        }

        Self { entries, exact }
    }

    /// Load a replacement table from a JSON array of entries.
    pub fn from_json_file(path: &Path) -> Result<Self, ReferenceDataError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ReferenceDataError::Load(path.display().to_string(), e.to_string())
        })?;
        let entries: Vec<ReferenceEntry> = serde_json::from_str(&json).map_err(|e| {
            ReferenceDataError::Parse(path.display().to_string(), e.to_string())
        })?;
        let table = Self::from_entries(entries);
        if table.is_empty() {
            return Err(ReferenceDataError::Empty(path.display().to_string()));
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    /// Resolve a raw test name.
    ///
    /// Exact alias match first (case-insensitive). Otherwise the longest alias
    /// that is a substring of the name, or that contains the name; equally
    /// long candidates resolve to the earliest declared. Unmatched names come
    /// back title-cased with no bounds and no unit.
    pub fn lookup(&self, raw_name: &str) -> ReferenceMatch {
        let name = raw_name.trim().to_lowercase();

        if let Some(&idx) = self.exact.get(&name) {
            return self.entries[idx].to_match();
        }

        let mut best: Option<&ReferenceEntry> = None;
        if !name.is_empty() {
            for entry in &self.entries {
                if name.contains(entry.alias.as_str()) || entry.alias.contains(name.as_str()) {
                    let longer = best.map_or(true, |b| entry.alias.len() > b.alias.len());
                    if longer {
                        best = Some(entry);
                    }
                }
            }
        }

        match best {
            Some(entry) => entry.to_match(),
            None => ReferenceMatch {
                low: None,
                high: None,
                unit: String::new(),
                canonical_name: title_case(raw_name.trim()),
                matched: false,
            },
        }
    }
}

impl ReferenceEntry {
    fn to_match(&self) -> ReferenceMatch {
        ReferenceMatch {
            low: self.low,
            high: self.high,
            unit: self.unit.clone(),
            canonical_name: self.canonical_name.clone(),
            matched: true,
        }
    }
}

/// Uppercase the first letter of every alphabetic run, lowercase the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}
