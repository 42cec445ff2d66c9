//! Read-only statistics over absence records.
//!
//! # Responsibility
//! - Derive reason frequencies, per-month counts and headline figures.
//!
//! # Invariants
//! - Functions are pure: no state, no I/O, input order is the only order
//!   they depend on.
//! - Reasons are tallied by stored text, including labels whose category has
//!   since been removed.
//! - Frequency ties resolve to the reason encountered first in the input.

use crate::model::record::AbsenceRecord;
use std::collections::HashMap;

/// Number of calendar months bucketed by `monthly_counts`.
pub const MONTHS_PER_YEAR: usize = 12;

/// How many records carry one reason label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
}

/// Headline figures for one year plus all-time reason breakdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsSummary {
    pub year: i32,
    /// All records regardless of year.
    pub total_days: usize,
    pub top_reason: Option<String>,
    /// All-time tally in first-encounter order.
    pub reason_frequency: Vec<ReasonCount>,
    /// Counts for `year` only, indexed by zero-based month.
    pub monthly_counts: [usize; MONTHS_PER_YEAR],
}

/// Tallies records per reason, in order of first appearance.
pub fn reason_frequency(records: &[AbsenceRecord]) -> Vec<ReasonCount> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tally: Vec<ReasonCount> = Vec::new();

    for record in records {
        match positions.get(record.reason.as_str()) {
            Some(&index) => tally[index].count += 1,
            None => {
                positions.insert(record.reason.as_str(), tally.len());
                tally.push(ReasonCount {
                    reason: record.reason.clone(),
                    count: 1,
                });
            }
        }
    }

    tally
}

/// Counts records of `year` per month; other years are skipped.
pub fn monthly_counts(records: &[AbsenceRecord], year: i32) -> [usize; MONTHS_PER_YEAR] {
    let mut counts = [0usize; MONTHS_PER_YEAR];
    for record in records.iter().filter(|record| record.year() == year) {
        counts[record.month0() as usize] += 1;
    }
    counts
}

/// Most frequent reason, or `None` when there are no records.
pub fn top_reason(records: &[AbsenceRecord]) -> Option<String> {
    top_of(&reason_frequency(records))
}

pub fn total_days(records: &[AbsenceRecord]) -> usize {
    records.len()
}

/// Computes every figure in one pass over the frequency table.
pub fn summarize(records: &[AbsenceRecord], year: i32) -> StatsSummary {
    let frequency = reason_frequency(records);
    StatsSummary {
        year,
        total_days: total_days(records),
        top_reason: top_of(&frequency),
        monthly_counts: monthly_counts(records, year),
        reason_frequency: frequency,
    }
}

fn top_of(frequency: &[ReasonCount]) -> Option<String> {
    // Strict `>` keeps the earliest entry on ties.
    let mut best: Option<&ReasonCount> = None;
    for entry in frequency {
        if best.map_or(true, |current| entry.count > current.count) {
            best = Some(entry);
        }
    }
    best.map(|entry| entry.reason.clone())
}

#[cfg(test)]
mod tests {
    use super::{monthly_counts, reason_frequency, summarize, top_reason, ReasonCount};
    use crate::calendar::CalendarDay;
    use crate::model::record::AbsenceRecord;

    fn record(y: i32, m: u32, d: u32, reason: &str) -> AbsenceRecord {
        AbsenceRecord::new(CalendarDay::from_ymd(y, m, d).unwrap(), reason)
    }

    #[test]
    fn frequency_keeps_first_encounter_order() {
        let records = vec![
            record(2024, 1, 1, "B"),
            record(2024, 1, 2, "A"),
            record(2024, 1, 3, "B"),
        ];
        assert_eq!(
            reason_frequency(&records),
            vec![
                ReasonCount {
                    reason: "B".to_string(),
                    count: 2
                },
                ReasonCount {
                    reason: "A".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn top_reason_tie_goes_to_first_seen() {
        let records = vec![
            record(2024, 3, 1, "X"),
            record(2024, 3, 2, "Y"),
            record(2024, 3, 3, "Y"),
            record(2024, 3, 4, "X"),
        ];
        assert_eq!(top_reason(&records).as_deref(), Some("X"));
        assert_eq!(top_reason(&[]), None);
    }

    #[test]
    fn monthly_counts_bucket_december_last() {
        let records = vec![record(2024, 12, 31, "A"), record(2024, 12, 1, "B")];
        let counts = monthly_counts(&records, 2024);
        assert_eq!(counts[11], 2);
        assert_eq!(counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn summary_mixes_all_time_and_yearly_figures() {
        let records = vec![
            record(2023, 6, 1, "A"),
            record(2024, 6, 1, "B"),
            record(2024, 7, 1, "B"),
        ];
        let summary = summarize(&records, 2024);

        assert_eq!(summary.year, 2024);
        assert_eq!(summary.total_days, 3);
        assert_eq!(summary.top_reason.as_deref(), Some("B"));
        assert_eq!(summary.reason_frequency.len(), 2);
        assert_eq!(summary.monthly_counts[5], 1);
        assert_eq!(summary.monthly_counts[6], 1);
    }
}
