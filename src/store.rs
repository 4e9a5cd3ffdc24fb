//! Persistence for the calendar file.
//!
//! Existing event UIDs are recovered by scanning the document text for the
//! UID pattern rather than parsing the full calendar format. That is all the
//! merge logic needs, and it keeps the scan isolated here in case a real
//! parser ever replaces it.

use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;

use crate::date::FridayDate;
use crate::error::UpdateResult;

/// A calendar document read from disk, plus the dates already represented
/// in it (recovered from its UIDs).
pub struct ExistingCalendar {
    pub content: String,
    pub dates: BTreeSet<FridayDate>,
}

/// Reads and rewrites the persisted calendar file.
pub struct IcsStore {
    path: PathBuf,
}

impl IcsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the calendar file. A missing file is a valid initial state and
    /// yields `None`; any other read failure is fatal.
    pub fn load(&self) -> UpdateResult<Option<ExistingCalendar>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let dates = scan_dates(&content);
                Ok(Some(ExistingCalendar { content, dates }))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the calendar file with a complete document (atomic write:
    /// temp file + rename).
    pub fn save(&self, content: &str) -> UpdateResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let temp = self.path.with_extension("ics.tmp");
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// Scan document text for event UIDs and map them back to their dates.
///
/// Matches both the canonical 8-digit UID and the dashed-date variant.
pub fn scan_dates(content: &str) -> BTreeSet<FridayDate> {
    uid_regex()
        .captures_iter(content)
        .filter_map(|caps| {
            let compact = format!("{}{}{}", &caps[1], &caps[2], &caps[3]);
            FridayDate::from_compact(&compact)
        })
        .collect()
}

fn uid_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"UID:bandcamp-friday-(\d{4})-?(\d{2})-?(\d{2})@github\.com")
            .expect("Invalid regex")
    })
}
