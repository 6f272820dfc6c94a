/// Heading and description templates for report summaries.
/// Calm, non-diagnostic framing: values are described, never diagnosed.
pub struct MessageTemplates;

/// Lead-in for older patients.
pub const PLAIN_LANGUAGE_PREFIX: &str = "In simple terms: ";

impl MessageTemplates {
    /// Shown when no test rows were recognized.
    pub fn no_data_heading() -> String {
        "No Data Extracted".into()
    }

    /// Points at the input, not the patient.
    pub fn no_data_description() -> String {
        "We could not identify any lab values from this report. \
         The file may be unclear or in an unsupported format."
            .into()
    }

    /// No value was high or low.
    pub fn all_normal_heading() -> String {
        "All Values Within Normal Range".into()
    }

    /// `prefix` is [`PLAIN_LANGUAGE_PREFIX`] for older patients, else empty.
    /// `total` counts every extracted test.
    pub fn all_normal_description(prefix: &str, total: usize) -> String {
        format!(
            "{}Your report shows {} test values. \
             All of them are within the expected reference ranges. \
             This is a positive result. Continue your healthy habits and \
             attend routine check-ups with your doctor.",
            prefix, total,
        )
    }

    /// Exactly one value is high or low.
    pub fn single_abnormal_heading() -> String {
        "One Value Needs Attention".into()
    }

    /// Single-abnormal body; `total` as in [`Self::all_normal_description`].
    pub fn single_abnormal_description(prefix: &str, total: usize) -> String {
        format!(
            "{}Your report shows {} values. \
             One result is outside the normal range. This alone may not be serious, \
             but it is worth discussing with your doctor.",
            prefix, total,
        )
    }

    /// Heading carries the abnormal count, e.g. `3 Values Need Attention`.
    pub fn multi_abnormal_heading(abnormal: usize) -> String {
        format!("{} Values Need Attention", abnormal)
    }

    /// `normal` is everything not abnormal, unranged values included.
    pub fn multi_abnormal_description(
        prefix: &str,
        total: usize,
        normal: usize,
        abnormal: usize,
    ) -> String {
        format!(
            "{}Your report shows {} values: \
             {} are normal and {} are outside the expected range. \
             Please share this report with your doctor for proper evaluation.",
            prefix, total, normal, abnormal,
        )
    }
}
