use crate::models::*;

use super::types::{AssembledContext, TrendPoint};

/// Visits sorted newest first. Equal dates keep their input order.
fn newest_first(history: &[HistoricalVisit]) -> Vec<&HistoricalVisit> {
    let mut visits: Vec<&HistoricalVisit> = history.iter().collect();
    visits.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
    visits
}

fn trend_direction(change: f64) -> TrendDirection {
    if change > 0.0 {
        TrendDirection::Up
    } else if change < 0.0 {
        TrendDirection::Down
    } else {
        TrendDirection::Unchanged
    }
}

/// Compare each current record with its most recent prior reading.
///
/// Names match case-insensitively. Records never seen before are skipped.
pub fn compare_with_history(records: &[TestRecord], history: &[HistoricalVisit]) -> Vec<TrendPoint> {
    trends_against(records, &newest_first(history))
}

/// `visits` must already be newest first.
fn trends_against(records: &[TestRecord], visits: &[&HistoricalVisit]) -> Vec<TrendPoint> {
    records
        .iter()
        .filter_map(|current| {
            let (visit, previous) = visits.iter().find_map(|visit| {
                visit
                    .records
                    .iter()
                    .find(|r| r.name.eq_ignore_ascii_case(&current.name))
                    .map(|r| (*visit, r))
            })?;

            let change = current.value - previous.value;
            Some(TrendPoint {
                name: current.name.clone(),
                unit: current.unit.clone(),
                previous_date: visit.visit_date,
                previous_value: previous.value,
                current_value: current.value,
                change,
                direction: trend_direction(change),
                previous_status: previous.status,
                current_status: current.status,
                improved: previous.status.is_abnormal() && current.status == TestStatus::Normal,
                worsened: previous.status == TestStatus::Normal && current.status.is_abnormal(),
            })
        })
        .collect()
}

/// Build the data context for the assistant: current results, up to
/// `max_visits` prior visits (newest first), and trends against them.
pub fn build_assistant_context(
    records: &[TestRecord],
    history: &[HistoricalVisit],
    max_visits: usize,
) -> AssembledContext {
    let mut sections = Vec::new();

    if records.is_empty() {
        sections.push((
            "CURRENT LAB RESULTS",
            "No current clinical data available.".to_string(),
        ));
    } else {
        sections.push(("CURRENT LAB RESULTS", format_current(records)));
    }

    let visits: Vec<&HistoricalVisit> = newest_first(history).into_iter().take(max_visits).collect();
    if !visits.is_empty() {
        sections.push(("PATIENT HISTORY", format_history(&visits)));
    }

    // Trends only look at visits the assistant can see.
    let trends = trends_against(records, &visits);
    if !trends.is_empty() {
        sections.push(("TRENDS", format_trends(&trends)));
    }

    let text = sections
        .iter()
        .map(|(label, content)| format!("<{label}>\n{content}\n</{label}>"))
        .collect::<Vec<_>>()
        .join("\n\n");

    tracing::debug!(
        records = records.len(),
        visits = visits.len(),
        trends = trends.len(),
        "Assembled assistant context"
    );

    AssembledContext {
        text,
        current_records: records.len(),
        visits_included: visits.len(),
        trends,
    }
}

fn value_with_unit(value: f64, unit: &str) -> String {
    if unit.is_empty() {
        value.to_string()
    } else {
        format!("{value} {unit}")
    }
}

fn format_current(records: &[TestRecord]) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "- {}: {} | Status: {} | Severity: {} | Range: {}",
                r.name,
                value_with_unit(r.value, &r.unit),
                r.status.as_str(),
                r.severity.as_str(),
                r.display_range,
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_history(visits: &[&HistoricalVisit]) -> String {
    visits
        .iter()
        .map(|visit| {
            let mut block = format!("[Visit Date: {}]", visit.visit_date);
            for r in &visit.records {
                block.push_str(&format!("\n- {}: {}", r.name, value_with_unit(r.value, &r.unit)));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_trends(trends: &[TrendPoint]) -> String {
    trends
        .iter()
        .map(|t| {
            let mut line = format!(
                "- {}: {} -> {} ({}, since {})",
                t.name,
                value_with_unit(t.previous_value, &t.unit),
                value_with_unit(t.current_value, &t.unit),
                t.direction.as_str(),
                t.previous_date,
            );
            if t.improved {
                line.push_str(" [back in range]");
            } else if t.worsened {
                line.push_str(" [now out of range]");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
