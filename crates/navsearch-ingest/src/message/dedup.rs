//! Candidate deduplication

use navsearch_common::types::MessageRecord;
use std::collections::HashSet;

/// Collapse records to unique ids, keeping the first occurrence of each id
/// in first-seen order. Later duplicates are dropped silently.
pub fn dedup_by_id(records: Vec<MessageRecord>) -> Vec<MessageRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.id.clone()))
        .collect()
}
