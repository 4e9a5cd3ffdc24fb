//! VEVENT generation and the fixed calendar preamble.
//!
//! Events are anchored to America/Los_Angeles with a DST-aware VTIMEZONE
//! block; each one spans start-of-day to 23:59:59 local. Output uses CRLF
//! line endings and folds long content lines per RFC 5545.

use chrono::{DateTime, Utc};

use crate::config;
use crate::date::FridayDate;

/// Closing token of the calendar document. New events are inserted
/// immediately before it.
pub const TERMINATOR: &str = "END:VCALENDAR";

const TZID: &str = "America/Los_Angeles";

const SUMMARY: &str = "Bandcamp Friday";

const DESCRIPTION: &str =
    "Bandcamp waives its revenue share on this day. Support artists directly!\n\nhttps://isitbandcampfriday.com/";

/// Maximum content line length in octets per RFC 5545.
const MAX_LINE_OCTETS: usize = 75;

/// Fixed calendar header: product metadata, calendar name, and the
/// America/Los_Angeles VTIMEZONE definition.
pub const CALENDAR_HEADER: &str = concat!(
    "BEGIN:VCALENDAR\r\n",
    "VERSION:2.0\r\n",
    "PRODID:-//Bandcamp Friday Calendar//EN\r\n",
    "CALSCALE:GREGORIAN\r\n",
    "METHOD:PUBLISH\r\n",
    "X-WR-CALNAME:Bandcamp Friday\r\n",
    "X-WR-TIMEZONE:America/Los_Angeles\r\n",
    "X-WR-CALDESC:Bandcamp Friday - when Bandcamp waives its revenue share\r\n",
    "BEGIN:VTIMEZONE\r\n",
    "TZID:America/Los_Angeles\r\n",
    "BEGIN:DAYLIGHT\r\n",
    "TZOFFSETFROM:-0800\r\n",
    "TZOFFSETTO:-0700\r\n",
    "DTSTART:19700308T020000\r\n",
    "RRULE:FREQ=YEARLY;BYMONTH=3;BYDAY=2SU\r\n",
    "TZNAME:PDT\r\n",
    "END:DAYLIGHT\r\n",
    "BEGIN:STANDARD\r\n",
    "TZOFFSETFROM:-0700\r\n",
    "TZOFFSETTO:-0800\r\n",
    "DTSTART:19701101T020000\r\n",
    "RRULE:FREQ=YEARLY;BYMONTH=11;BYDAY=1SU\r\n",
    "TZNAME:PST\r\n",
    "END:STANDARD\r\n",
    "END:VTIMEZONE\r\n",
);

/// Generate a VEVENT block for one Bandcamp Friday.
///
/// Pure function of the date and the supplied wall-clock stamp. The stamp
/// only feeds the informational DTSTAMP field; merge logic never reads it.
/// The returned block uses CRLF line endings and has no trailing newline.
pub fn vevent(date: FridayDate, dtstamp: DateTime<Utc>) -> String {
    let day = date.compact();

    let lines = [
        "BEGIN:VEVENT".to_string(),
        format!("UID:{}", date.uid()),
        format!("DTSTAMP:{}", dtstamp.format("%Y%m%dT%H%M%SZ")),
        format!("DTSTART;TZID={}:{}T000000", TZID, day),
        format!("DTEND;TZID={}:{}T235959", TZID, day),
        format!("SUMMARY:{}", SUMMARY),
        fold_line(&format!("DESCRIPTION:{}", escape_text(DESCRIPTION))),
        format!("URL:{}", config::SOURCE_URL),
        "STATUS:CONFIRMED".to_string(),
        "TRANSP:TRANSPARENT".to_string(),
        "END:VEVENT".to_string(),
    ];

    lines.join("\r\n")
}

/// Build a complete calendar document from scratch: fixed header, one event
/// per date in the given order, terminator.
pub fn new_calendar(dates: &[FridayDate], dtstamp: DateTime<Utc>) -> String {
    let events = dates
        .iter()
        .map(|d| vevent(*d, dtstamp))
        .collect::<Vec<_>>()
        .join("\r\n");

    format!("{}{}\r\n{}\r\n", CALENDAR_HEADER, events, TERMINATOR)
}

/// Escape a TEXT property value per RFC 5545.
fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Fold a content line at 75 octets, continuation lines prefixed with a
/// single space. Folds only at UTF-8 character boundaries.
fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + 8);
    let mut width = 0;

    for c in line.chars() {
        if width + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1; // the continuation space
        }
        out.push(c);
        width += c.len_utf8();
    }

    out
}
