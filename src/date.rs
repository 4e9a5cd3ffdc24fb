//! The Bandcamp Friday date value and its event UID.

use std::fmt;

use chrono::NaiveDate;

const UID_PREFIX: &str = "bandcamp-friday-";
const UID_SUFFIX: &str = "@github.com";

/// A single Bandcamp Friday, identified by its calendar day.
///
/// The canonical text form is `YYYYMMDD`, whose lexicographic order matches
/// chronological order. There is no time component; the event spans the
/// whole day in the calendar's time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FridayDate(NaiveDate);

impl FridayDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Parse the canonical `YYYYMMDD` form.
    pub fn from_compact(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y%m%d").ok().map(Self)
    }

    /// The canonical `YYYYMMDD` form.
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// The deterministic event UID for this date.
    ///
    /// UIDs are the sole deduplication key: one UID per date, and the date
    /// can always be recovered from the UID (see [`FridayDate::from_uid`]).
    pub fn uid(&self) -> String {
        format!("{}{}{}", UID_PREFIX, self.compact(), UID_SUFFIX)
    }

    /// Recover the date from an event UID.
    ///
    /// Accepts both the canonical 8-digit form and the dashed variant
    /// (`bandcamp-friday-2025-01-03@github.com`) that older calendar files
    /// may contain.
    pub fn from_uid(uid: &str) -> Option<Self> {
        let date_part = uid.strip_prefix(UID_PREFIX)?.strip_suffix(UID_SUFFIX)?;
        let compact: String = date_part.chars().filter(|c| *c != '-').collect();
        if compact.len() != 8 || !compact.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Self::from_compact(&compact)
    }
}

impl fmt::Display for FridayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_round_trip() {
        let date = FridayDate::from_compact("20251003").unwrap();
        assert_eq!(date.compact(), "20251003");
    }

    #[test]
    fn test_from_compact_rejects_garbage() {
        assert!(FridayDate::from_compact("2025-10-03").is_none());
        assert!(FridayDate::from_compact("20251303").is_none());
        assert!(FridayDate::from_compact("not-a-date").is_none());
    }

    #[test]
    fn test_uid_round_trip() {
        let date = FridayDate::from_compact("20250103").unwrap();
        let uid = date.uid();
        assert_eq!(uid, "bandcamp-friday-20250103@github.com");
        assert_eq!(FridayDate::from_uid(&uid), Some(date));
    }

    #[test]
    fn test_distinct_dates_have_distinct_uids() {
        let a = FridayDate::from_compact("20251003").unwrap();
        let b = FridayDate::from_compact("20251107").unwrap();
        assert_ne!(a.uid(), b.uid());
    }

    #[test]
    fn test_from_uid_dashed_variant() {
        let uid = "bandcamp-friday-2025-01-03@github.com";
        let date = FridayDate::from_uid(uid).unwrap();
        assert_eq!(date.compact(), "20250103");
        // Normalizing reproduces the canonical UID, not the dashed one
        assert_eq!(date.uid(), "bandcamp-friday-20250103@github.com");
    }

    #[test]
    fn test_from_uid_rejects_foreign_uids() {
        assert!(FridayDate::from_uid("something-else-20250103@github.com").is_none());
        assert!(FridayDate::from_uid("bandcamp-friday-20250103@example.com").is_none());
        assert!(FridayDate::from_uid("bandcamp-friday-202501@github.com").is_none());
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut dates = vec![
            FridayDate::from_compact("20251205").unwrap(),
            FridayDate::from_compact("20251003").unwrap(),
            FridayDate::from_compact("20251107").unwrap(),
        ];
        dates.sort();
        let compact: Vec<String> = dates.iter().map(|d| d.compact()).collect();
        assert_eq!(compact, ["20251003", "20251107", "20251205"]);
    }
}
