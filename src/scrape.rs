//! Scraping Bandcamp Friday dates from isitbandcampfriday.com.
//!
//! The page embeds its fundraiser list as an HTML-escaped JSON attribute on
//! the `bandcamp-friday-vm` div. Extraction is best-effort: a missing anchor
//! or malformed payload yields an empty result, and one bad item never
//! aborts the rest.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use chrono::DateTime;
use serde::Deserialize;

use crate::date::FridayDate;

/// Attribute carrying the JSON fundraiser list.
const FUNDRAISERS_ATTR: &str = "data-fundraisers=\"";

/// Per-item date format, e.g. `Fri, 03 Oct 2025 07:00:00 -0000`.
const DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S %z";

#[derive(Debug, Deserialize)]
struct Fundraiser {
    date: String,
}

/// Extraction result: the deduplicated dates in ascending order, plus how
/// many items were dropped because they could not be decoded.
#[derive(Debug, Default)]
pub struct Extraction {
    pub dates: Vec<FridayDate>,
    pub skipped: usize,
}

/// Fetch the page body. Non-2xx responses are errors; the caller treats any
/// failure here as "no dates found" and ends the run as a no-op.
pub async fn fetch(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Bad response from {}", url))?;

    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;

    Ok(body)
}

/// Extract the upcoming Bandcamp Friday dates from page markup.
///
/// Never fails: a missing anchor or undecodable payload produces an empty
/// extraction, and individual unparseable items are counted in `skipped`
/// while the rest are processed.
pub fn extract_dates(html: &str) -> Extraction {
    let Some(payload) = fundraisers_payload(html) else {
        return Extraction::default();
    };

    let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(&payload) else {
        return Extraction::default();
    };

    let mut dates = BTreeSet::new();
    let mut skipped = 0;

    // Items are decoded one at a time so a single bad one (missing date
    // field, unparseable date string) doesn't abort the rest.
    for item in items {
        let Ok(fundraiser) = serde_json::from_value::<Fundraiser>(item) else {
            skipped += 1;
            continue;
        };

        match DateTime::parse_from_str(&fundraiser.date, DATE_FORMAT) {
            // The date of interest is the wall-clock day in the string's
            // own offset, not the UTC day.
            Ok(dt) => {
                dates.insert(FridayDate::new(dt.date_naive()));
            }
            Err(_) => skipped += 1,
        }
    }

    Extraction {
        dates: dates.into_iter().collect(),
        skipped,
    }
}

/// Locate the fundraiser attribute and return its entity-decoded value.
fn fundraisers_payload(html: &str) -> Option<String> {
    let start = html.find(FUNDRAISERS_ATTR)? + FUNDRAISERS_ATTR.len();
    let len = html[start..].find('"')?;
    Some(unescape_entities(&html[start..start + len]))
}

/// Decode the HTML entities the page uses to embed JSON in an attribute.
fn unescape_entities(value: &str) -> String {
    value
        .replace("&quot;", "\"")
        .replace("&#34;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(attr: &str) -> String {
        format!(
            "<html>\n<div id=\"bandcamp-friday-vm\" class=\"pane\" data-fundraisers=\"{}\" data-is-dev=\"false\">\n</div>\n</html>",
            attr
        )
    }

    fn item(date: &str) -> String {
        format!(
            "{{&quot;date&quot;:&quot;{}&quot;,&quot;url&quot;:&quot;https://daily.bandcamp.com/features/bandcamp-fridays&quot;,&quot;zero_revshare&quot;:true}}",
            date
        )
    }

    fn compact(extraction: &Extraction) -> Vec<String> {
        extraction.dates.iter().map(|d| d.compact()).collect()
    }

    #[test]
    fn test_extract_dates_sorted() {
        let html = page_with(&format!(
            "[{},{},{}]",
            item("Fri, 03 Oct 2025 07:00:00 -0000"),
            item("Fri, 07 Nov 2025 08:00:00 -0000"),
            item("Fri, 05 Dec 2025 08:00:00 -0000"),
        ));

        let extraction = extract_dates(&html);
        assert_eq!(compact(&extraction), ["20251003", "20251107", "20251205"]);
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn test_extract_dates_deduplicates() {
        let html = page_with(&format!(
            "[{},{}]",
            item("Fri, 03 Oct 2025 07:00:00 -0000"),
            item("Fri, 03 Oct 2025 07:00:00 -0000"),
        ));

        let extraction = extract_dates(&html);
        assert_eq!(compact(&extraction), ["20251003"]);
    }

    #[test]
    fn test_extract_dates_missing_anchor() {
        let extraction = extract_dates("<html><body>No data here</body></html>");
        assert!(extraction.dates.is_empty());
        assert_eq!(extraction.skipped, 0);
    }

    #[test]
    fn test_extract_dates_invalid_json() {
        let html = page_with("invalid json");
        assert!(extract_dates(&html).dates.is_empty());
    }

    #[test]
    fn test_extract_dates_skips_malformed_item() {
        let html = page_with(&format!(
            "[{},{}]",
            item("Invalid date format"),
            item("Fri, 03 Oct 2025 07:00:00 -0000"),
        ));

        let extraction = extract_dates(&html);
        assert_eq!(compact(&extraction), ["20251003"]);
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn test_extract_dates_skips_item_without_date_field() {
        let html = page_with(&format!(
            "[{{&quot;url&quot;:&quot;https://example.com&quot;}},{}]",
            item("Fri, 03 Oct 2025 07:00:00 -0000"),
        ));

        let extraction = extract_dates(&html);
        assert_eq!(compact(&extraction), ["20251003"]);
        assert_eq!(extraction.skipped, 1);
    }

    #[test]
    fn test_extract_dates_uses_local_day_of_offset() {
        // 23:00 -0800 is already Oct 4th in UTC; the calendar day must stay
        // the one the page named.
        let html = page_with(&format!(
            "[{}]",
            item("Fri, 03 Oct 2025 23:00:00 -0800"),
        ));

        let extraction = extract_dates(&html);
        assert_eq!(compact(&extraction), ["20251003"]);
    }

    #[test]
    fn test_unescape_entities() {
        assert_eq!(unescape_entities("&quot;a&quot;"), "\"a\"");
        assert_eq!(unescape_entities("a &amp;&lt;b&gt;"), "a &<b>");
    }
}
