//! Merging scraped dates into the calendar document.
//!
//! The merge is a set union keyed on event UIDs: dates already represented
//! in the document are left alone (and their entries are never rewritten),
//! genuinely new dates are appended before the terminator, and a run that
//! finds nothing new does not touch the file at all.

use chrono::{DateTime, Utc};

use crate::date::FridayDate;
use crate::error::{UpdateError, UpdateResult};
use crate::ics;
use crate::store::{ExistingCalendar, IcsStore};

/// What a merge run did.
#[derive(Debug, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Every extracted date was already present; the store was not touched.
    UpToDate,
    /// The document was rewritten with the listed dates added. `created` is
    /// true when there was no prior document.
    Written {
        added: Vec<FridayDate>,
        created: bool,
    },
}

/// The extracted dates that are not yet represented in the document,
/// in the order they were extracted.
pub fn pending_dates(existing: Option<&ExistingCalendar>, extracted: &[FridayDate]) -> Vec<FridayDate> {
    match existing {
        Some(cal) => extracted
            .iter()
            .copied()
            .filter(|d| !cal.dates.contains(d))
            .collect(),
        None => extracted.to_vec(),
    }
}

/// Merge the extracted dates into the stored calendar.
///
/// Appends to an existing document without changing any byte of its prior
/// content, or synthesizes a fresh document when none exists. When nothing
/// is new the store is not written.
pub fn merge(
    store: &IcsStore,
    extracted: &[FridayDate],
    dtstamp: DateTime<Utc>,
) -> UpdateResult<MergeOutcome> {
    let existing = store.load()?;
    let new_dates = pending_dates(existing.as_ref(), extracted);

    if new_dates.is_empty() {
        return Ok(MergeOutcome::UpToDate);
    }

    let (content, created) = match existing {
        Some(cal) => (append_events(&cal.content, &new_dates, dtstamp)?, false),
        None => (ics::new_calendar(extracted, dtstamp), true),
    };

    store.save(&content)?;

    Ok(MergeOutcome::Written {
        added: new_dates,
        created,
    })
}

/// Insert event blocks immediately before the document terminator, leaving
/// everything before it byte-for-byte unchanged.
fn append_events(
    document: &str,
    dates: &[FridayDate],
    dtstamp: DateTime<Utc>,
) -> UpdateResult<String> {
    let at = document
        .rfind(ics::TERMINATOR)
        .ok_or(UpdateError::MissingTerminator)?;
    let (head, tail) = document.split_at(at);

    let mut out = String::with_capacity(document.len() + dates.len() * 400);
    out.push_str(head);
    if !head.is_empty() && !head.ends_with('\n') {
        out.push_str("\r\n");
    }
    for date in dates {
        out.push_str(&ics::vevent(*date, dtstamp));
        out.push_str("\r\n");
    }
    out.push_str(tail);

    Ok(out)
}
