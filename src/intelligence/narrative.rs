use crate::models::{Direction, Finding, PatientProfile, ReportSummary, TestRecord, TestStatus};

use super::messages::{MessageTemplates, PLAIN_LANGUAGE_PREFIX};

/// Explanation text for a high and a low reading.
#[derive(Debug, Clone, Copy)]
pub struct Explanation {
    pub high: &'static str,
    pub low: &'static str,
}

/// Keyed by a substring of the lowercased test name. First matching key wins,
/// so more specific keys must come before keys they contain.
pub const EXPLANATIONS: &[(&str, Explanation)] = &[
    (
        "hemoglobin",
        Explanation {
            high: "High hemoglobin can occur due to dehydration, smoking, or certain lung conditions. \
                   It does not always mean something serious, but your doctor should review it.",
            low: "Low hemoglobin is the most common sign of anaemia. You may feel tired, \
                  short of breath, or dizzy. Iron, B12, or folate deficiency are common causes. \
                  A doctor can determine the exact cause and recommend treatment.",
        },
    ),
    (
        "blood glucose",
        Explanation {
            high: "Higher-than-normal blood glucose may indicate pre-diabetes or diabetes. \
                   Diet, exercise, weight management, and (if advised) medications are key approaches.",
            low: "Low blood glucose (hypoglycaemia) can cause shakiness, confusion, or weakness. \
                  If you take diabetes medication, discuss this with your doctor promptly.",
        },
    ),
    (
        "fasting blood sugar",
        Explanation {
            high: "An elevated fasting glucose may suggest your body is having difficulty \
                   regulating blood sugar overnight. This warrants a follow-up with your doctor.",
            low: "A fasting glucose below normal is relatively uncommon and can cause symptoms. \
                  Please inform your doctor, especially if you feel unwell.",
        },
    ),
    (
        "hba1c",
        Explanation {
            high: "HbA1c reflects your average blood sugar over 3 months. A raised value suggests \
                   blood sugar has been consistently elevated, which is important to address.",
            low: "A low HbA1c may occur if you have had episodes of hypoglycaemia. \
                  Your doctor can advise on adjusting your management plan.",
        },
    ),
    (
        "total cholesterol",
        Explanation {
            high: "High total cholesterol may increase the risk of heart disease over time. \
                   A heart-healthy diet, exercise, and sometimes medication can help.",
            low: "Very low cholesterol is uncommon and usually not a concern, \
                  but your doctor should review it in context.",
        },
    ),
    (
        "ldl cholesterol",
        Explanation {
            high: "High LDL ('bad') cholesterol is a key risk factor for heart disease. \
                   Reducing saturated fats and increasing fibre can help lower it.",
            low: "Low LDL is generally positive for heart health.",
        },
    ),
    (
        "hdl cholesterol",
        Explanation {
            high: "High HDL ('good') cholesterol is generally protective for the heart.",
            low: "Low HDL may increase cardiovascular risk. Regular aerobic exercise \
                  and avoiding smoking can help raise HDL levels.",
        },
    ),
    (
        "triglycerides",
        Explanation {
            high: "High triglycerides are linked to heart and pancreas risk. \
                   Reducing sugar, refined carbs, and alcohol usually helps.",
            low: "Low triglycerides are generally considered healthy.",
        },
    ),
    (
        "creatinine",
        Explanation {
            high: "Elevated creatinine may indicate reduced kidney function. \
                   Staying well hydrated and avoiding nephrotoxic substances is important. \
                   Your doctor may request further kidney tests.",
            low: "Low creatinine can occur in people with low muscle mass. \
                  Usually not a concern on its own.",
        },
    ),
    (
        "tsh",
        Explanation {
            high: "High TSH suggests the thyroid gland may be underactive (hypothyroidism). \
                   Symptoms include fatigue, weight gain, and feeling cold. \
                   Thyroid hormone replacement therapy is effective.",
            low: "Low TSH may indicate an overactive thyroid (hyperthyroidism). \
                  Symptoms include weight loss, fast heartbeat, and anxiety. \
                  Your doctor will likely run further thyroid tests.",
        },
    ),
];

/// Lifestyle tips keyed by a substring of the lowercased test name.
pub const LIFESTYLE_TIPS: &[(&str, &[&str])] = &[
    (
        "blood glucose",
        &[
            "🥗 Choose low-glycaemic foods (vegetables, whole grains, legumes)",
            "🚶 Walk for at least 30 minutes daily",
            "💧 Drink 8+ glasses of water each day",
            "⚖️ Maintain a healthy weight",
            "🧘 Manage stress, as it affects blood sugar",
        ],
    ),
    (
        "cholesterol",
        &[
            "🥦 Eat more soluble fibre (oats, apples, beans)",
            "🐟 Include omega-3 rich foods (salmon, walnuts, flaxseeds)",
            "🧈 Reduce saturated and trans fats",
            "🚴 Exercise most days of the week",
            "🚭 Avoid smoking",
        ],
    ),
    (
        "hemoglobin",
        &[
            "🥩 Eat iron-rich foods (spinach, lean red meat, lentils)",
            "🍊 Pair iron foods with vitamin C to boost absorption",
            "🩺 Ask your doctor about iron supplements if needed",
            "🥚 Include B12 sources (eggs, dairy, fish)",
        ],
    ),
    (
        "creatinine",
        &[
            "💧 Stay well hydrated throughout the day",
            "🧂 Limit high-salt, high-protein processed foods",
            "🚫 Avoid unnecessary pain-killer overuse (NSAIDs)",
            "🩺 Get kidney function monitored regularly",
        ],
    ),
    (
        "tsh",
        &[
            "😴 Prioritise 7-9 hours of sleep nightly",
            "🧘 Practice stress management (yoga, meditation)",
            "💊 Take prescribed thyroid medication consistently",
            "🩺 Get thyroid levels re-tested as your doctor advises",
        ],
    ),
];

/// Used when no finding maps to a tip key. The last two are appended to every
/// specific tip list as well.
pub const GENERIC_LIFESTYLE: &[&str] = &[
    "😴 Get 7-8 hours of quality sleep each night",
    "💧 Stay hydrated and drink 8 glasses of water daily",
    "🥗 Eat a balanced diet with plenty of fruits and vegetables",
    "🚶 Be physically active for at least 30 minutes most days",
    "🧘 Manage stress through mindfulness, hobbies, or social connection",
    "🩺 Keep regular follow-up appointments with your doctor",
    "🚭 Avoid smoking and limit alcohol",
];

/// Explanation for a test name and direction, or empty when no key matches.
pub fn explanation_for(test_name: &str, status: TestStatus) -> &'static str {
    let name = test_name.to_lowercase();
    EXPLANATIONS
        .iter()
        .find(|(key, _)| name.contains(key))
        .map(|(_, e)| match status {
            TestStatus::High => e.high,
            TestStatus::Low => e.low,
            TestStatus::Normal | TestStatus::Unknown => "",
        })
        .unwrap_or("")
}

/// Tip lists whose key occurs in the test name, in table order.
fn lifestyle_for(test_name: &str) -> impl Iterator<Item = &'static str> {
    let name = test_name.to_lowercase();
    LIFESTYLE_TIPS
        .iter()
        .filter(move |(key, _)| name.contains(key))
        .flat_map(|(_, tips)| tips.iter().copied())
}

fn build_finding(record: &TestRecord) -> Finding {
    let direction = match record.status {
        TestStatus::Low => Direction::Lower,
        _ => Direction::Higher,
    };
    Finding {
        name: record.name.clone(),
        status: record.status,
        value: record.value,
        unit: record.unit.clone(),
        ref_range: record.display_range.clone(),
        direction,
        severity: record.severity,
        severity_word: record.severity.word().into(),
        explanation: explanation_for(&record.name, record.status).into(),
    }
}

/// Deduplicate while keeping the first occurrence of each tip.
fn dedup_preserving_order(tips: Vec<&'static str>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tips.into_iter()
        .filter(|t| seen.insert(*t))
        .map(String::from)
        .collect()
}

/// Build the plain-language summary for classified records.
///
/// Age only changes tone: at or above `senior_age` every description gets a
/// plain-language lead-in.
pub fn generate_summary(
    records: &[TestRecord],
    patient: &PatientProfile,
    senior_age: u32,
) -> ReportSummary {
    if records.is_empty() {
        return ReportSummary {
            heading: MessageTemplates::no_data_heading(),
            description: MessageTemplates::no_data_description(),
            findings: Vec::new(),
            lifestyle: GENERIC_LIFESTYLE.iter().map(|s| s.to_string()).collect(),
            total: 0,
            abnormal_count: 0,
            normal_count: 0,
            unranged_count: 0,
        };
    }

    let total = records.len();
    let is_senior = patient.age.is_some_and(|age| age >= senior_age);
    let prefix = if is_senior { PLAIN_LANGUAGE_PREFIX } else { "" };

    let abnormal: Vec<&TestRecord> = records.iter().filter(|r| r.status.is_abnormal()).collect();
    let abnormal_count = abnormal.len();
    let normal_count = total - abnormal_count;
    let unranged_count = records
        .iter()
        .filter(|r| r.status == TestStatus::Unknown)
        .count();

    let (heading, description) = match abnormal_count {
        0 => (
            MessageTemplates::all_normal_heading(),
            MessageTemplates::all_normal_description(prefix, total),
        ),
        1 => (
            MessageTemplates::single_abnormal_heading(),
            MessageTemplates::single_abnormal_description(prefix, total),
        ),
        n => (
            MessageTemplates::multi_abnormal_heading(n),
            MessageTemplates::multi_abnormal_description(prefix, total, normal_count, n),
        ),
    };

    let findings: Vec<Finding> = abnormal.iter().map(|r| build_finding(r)).collect();

    let mut tips: Vec<&'static str> = findings
        .iter()
        .flat_map(|f| lifestyle_for(&f.name))
        .collect();
    if tips.is_empty() {
        tips.extend(GENERIC_LIFESTYLE.iter().copied());
    } else {
        tips.extend(GENERIC_LIFESTYLE[GENERIC_LIFESTYLE.len() - 2..].iter().copied());
    }

    tracing::debug!(
        total,
        abnormal = abnormal_count,
        senior = is_senior,
        gender = patient.gender.as_str(),
        "Generated report summary"
    );

    ReportSummary {
        heading,
        description,
        findings,
        lifestyle: dedup_preserving_order(tips),
        total,
        abnormal_count,
        normal_count,
        unranged_count,
    }
}
