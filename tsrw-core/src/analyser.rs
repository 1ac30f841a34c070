//! Summary statistics over an ingested [`RecordStore`]

use crate::error::{Result, TsrwError};
use crate::logger::Logger;
use crate::models::{Entry, EntryId};
use crate::store::RecordStore;

/// Line counts of one ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CaseCounts {
    /// Parsed plus skipped data lines
    pub total: usize,
    pub parsed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    pub total_duration: f64,
    /// Longest entries first
    pub top_entries: Vec<(EntryId, &'a Entry)>,
    pub case_counts: CaseCounts,
    /// Status and count, in the order statuses were first seen
    pub status_counts: Vec<(String, usize)>,
}

/// Rejects negative top-x values
pub fn validate_top_x(top_x: i64, logger: &Logger) -> Result<usize> {
    usize::try_from(top_x).map_err(|_| {
        logger.error(format!(
            "Analyser: Invalid top_x value: {}. Must be a non-negative integer.",
            top_x
        ));
        TsrwError::InvalidTopX(top_x)
    })
}

pub fn analyze(store: &RecordStore, top_x: usize) -> Analysis<'_> {
    Analysis {
        total_duration: total_duration(store),
        top_entries: top_entries(store, top_x),
        case_counts: case_counts(store),
        status_counts: status_counts(store),
    }
}

pub fn total_duration(store: &RecordStore) -> f64 {
    store.duration_index().values().iter().sum()
}

/// The `top_x` longest entries, reading the duration index from its end
pub fn top_entries(store: &RecordStore, top_x: usize) -> Vec<(EntryId, &Entry)> {
    store
        .duration_index()
        .ids()
        .iter()
        .rev()
        .take(top_x)
        .filter_map(|&id| store.get(id).map(|entry| (id, entry)))
        .collect()
}

pub fn case_counts(store: &RecordStore) -> CaseCounts {
    let parsed = store.size();
    let skipped = store.review_lines().len();
    CaseCounts {
        total: parsed + skipped,
        parsed,
        skipped,
    }
}

pub fn status_counts(store: &RecordStore) -> Vec<(String, usize)> {
    store
        .status_groups()
        .iter()
        .map(|group| (group.status.clone(), group.ids.len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RejectReason;

    fn sample_store() -> RecordStore {
        let mut store = RecordStore::new();
        let rows = [
            ("R1", "TC1", 10.5, "Passed"),
            ("R2", "TC2", 5.2, "Failed"),
            ("R3", "TC3", 15.8, "Passed"),
            ("R4", "TC4", 2.1, "Failed"),
        ];
        for (i, (requirement, test_case, duration, status)) in rows.into_iter().enumerate() {
            store.add_entry(
                i as EntryId + 1,
                Entry {
                    requirement: requirement.into(),
                    test_case: test_case.into(),
                    duration,
                    status: status.into(),
                },
            );
        }
        store
    }

    #[test]
    fn test_analyze() {
        let store = sample_store();
        let analysis = analyze(&store, 2);

        assert!((analysis.total_duration - 33.6).abs() < 1e-9);
        assert_eq!(analysis.top_entries.len(), 2);
        assert_eq!(analysis.top_entries[0].0, 3);
        assert_eq!(analysis.top_entries[0].1.duration, 15.8);
        assert_eq!(analysis.top_entries[1].0, 1);
        assert_eq!(analysis.top_entries[1].1.duration, 10.5);
    }

    #[test]
    fn test_validate_top_x() {
        let logger = Logger::new();
        assert_eq!(validate_top_x(0, &logger).ok(), Some(0));
        assert_eq!(validate_top_x(5, &logger).ok(), Some(5));

        let err = validate_top_x(-5, &logger).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid top_x value: -5. Must be a non-negative integer."
        );
        assert_eq!(logger.messages(crate::logger::Level::Error).len(), 1);
    }

    #[test]
    fn test_top_entries_empty_store() {
        let store = RecordStore::new();
        assert!(top_entries(&store, 5).is_empty());
    }

    #[test]
    fn test_top_entries_larger_than_store() {
        let store = sample_store();
        let durations: Vec<f64> = top_entries(&store, 10)
            .iter()
            .map(|(_, e)| e.duration)
            .collect();
        assert_eq!(durations, vec![15.8, 10.5, 5.2, 2.1]);
    }

    #[test]
    fn test_top_entries_zero() {
        assert!(top_entries(&sample_store(), 0).is_empty());
    }

    #[test]
    fn test_top_entries_ties_keep_earliest_first() {
        let mut store = RecordStore::new();
        for id in 1..=3 {
            store.add_entry(
                id,
                Entry {
                    requirement: "R".into(),
                    test_case: "TC".into(),
                    duration: 4.0,
                    status: "Passed".into(),
                },
            );
        }
        let ids: Vec<EntryId> = top_entries(&store, 2).iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_case_and_status_counts() {
        let mut store = sample_store();
        store.add_review_line(6, RejectReason::EmptyField);

        assert_eq!(
            case_counts(&store),
            CaseCounts {
                total: 5,
                parsed: 4,
                skipped: 1,
            }
        );
        assert_eq!(
            status_counts(&store),
            vec![("Passed".to_string(), 2), ("Failed".to_string(), 2)]
        );
    }
}
