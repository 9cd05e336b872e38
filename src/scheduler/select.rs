//! Due-item selection policy.
//!
//! A record is due when it is not learned and its due date is missing or not
//! after today. Due records are presented oldest first, with undated records
//! ahead of everything else.

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::domain::WordRecord;

/// Whether `record` should be offered for review on `today`.
pub fn is_due(record: &WordRecord, today: NaiveDate) -> bool {
    if record.learned {
        return false;
    }
    match record.next_due {
        None => true,
        Some(due) => due <= today,
    }
}

/// Presentation order: no due date first, then earliest due date, then word id.
pub fn due_order(a: &WordRecord, b: &WordRecord) -> Ordering {
    match (a.next_due, b.next_due) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(da), Some(db)) => da.cmp(&db),
    }
    .then_with(|| a.word_id.cmp(&b.word_id))
}

/// Filter, order and truncate `records` to at most `limit` due entries.
pub fn select_due<'a, I>(records: I, today: NaiveDate, limit: usize) -> Vec<&'a WordRecord>
where
    I: IntoIterator<Item = &'a WordRecord>,
{
    let mut due: Vec<&WordRecord> = records.into_iter().filter(|r| is_due(r, today)).collect();
    due.sort_by(|a, b| due_order(a, b));
    due.truncate(limit);
    due
}
