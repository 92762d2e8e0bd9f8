//! Encodes a calendar event as a minimal vCalendar object.
//!
//! Summary and location are written without escaping, so commas, semicolons
//! and newlines in them end up verbatim in the payload.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::payload::{CalendarDetails, DisplayPayload, ModeDetails};
use crate::strings::{StringSource, LANGCONFIG_COMPONENT};

const DATETIME_STAMP: &str = "%Y%m%dT%H%M%S";
const DATE_STAMP: &str = "%Y%m%d";
const FALLBACK_PATTERN: &str = "%Y-%m-%d %H:%M";

/// Input for the calendar-event mode. Timestamps are UTC epoch seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarEvent {
    /// Event summary.
    pub summary: String,
    /// Event location.
    pub location: String,
    /// Start time.
    pub start: i64,
    /// End time.
    pub end: i64,
    /// Whether the event spans whole days.
    pub all_day: bool,
}

impl CalendarEvent {
    fn start_utc(&self) -> DateTime<Utc> {
        utc(self.start)
    }

    fn end_utc(&self) -> DateTime<Utc> {
        utc(self.end)
    }

    /// Whether start and end fall on the same UTC calendar day.
    #[must_use]
    pub fn is_single_day(&self) -> bool {
        self.start_utc().date_naive() == self.end_utc().date_naive()
    }

    /// The vCalendar payload, one property per `\n`-terminated line.
    #[must_use]
    pub fn vcalendar(&self) -> String {
        let stamp = if self.all_day { DATE_STAMP } else { DATETIME_STAMP };
        format!(
            "BEGIN:VCALENDAR\n\
             VERSION:2.0\n\
             BEGIN:VEVENT\n\
             SUMMARY:{summary}\n\
             LOCATION:{location}\n\
             DTSTART:{start}\n\
             DTEND:{end}\n\
             END:VEVENT\n\
             END:VCALENDAR\n",
            summary = self.summary,
            location = self.location,
            start = self.start_utc().format(stamp),
            end = self.end_utc().format(stamp),
        )
    }

    /// Builds the payload. Human-readable dates use the site timezone.
    #[must_use]
    pub fn build(&self, strings: &dyn StringSource, timezone: Tz) -> DisplayPayload {
        let date_pattern = strings.get_string("strftimedate", LANGCONFIG_COMPONENT);
        let date = |at: DateTime<Utc>| userdate(at, timezone, &date_pattern);
        let (start, end) = (self.start_utc(), self.end_utc());

        let (start_label, end_label) = match (self.all_day, self.is_single_day()) {
            (false, true) => {
                let time_pattern = strings.get_string("strftimetime", LANGCONFIG_COMPONENT);
                (
                    format!("{} - ", date(start)),
                    userdate(end, timezone, &time_pattern),
                )
            }
            (true, true) => (date(start), String::new()),
            (_, false) => (format!("{} - ", date(start)), date(end)),
        };

        DisplayPayload::content(None, self.vcalendar()).with_details(ModeDetails::Calendar(
            CalendarDetails {
                summary: non_empty(&self.summary),
                location: non_empty(&self.location),
                start: start_label,
                end: end_label,
            },
        ))
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Formats a timestamp with a locale pattern, dropping leading zeros from the
/// day and 12-hour fields. Unparseable patterns fall back to ISO-like output.
/// Out-of-range timestamps read as the epoch.
fn utc(timestamp: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(timestamp, 0).unwrap_or_else(|| {
        tracing::warn!(timestamp, "event timestamp out of range");
        DateTime::<Utc>::UNIX_EPOCH
    })
}

fn userdate(at: DateTime<Utc>, timezone: Tz, pattern: &str) -> String {
    let pattern = pattern.replace("%d", "%-d").replace("%I", "%-I");
    let pattern = if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        tracing::warn!(pattern, "invalid date pattern");
        FALLBACK_PATTERN.to_string()
    } else {
        pattern
    };
    at.with_timezone(&timezone).format(&pattern).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strings::EnglishStrings;
    use chrono::TimeZone;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp()
    }

    fn hackathon(start: i64, end: i64, all_day: bool) -> CalendarEvent {
        CalendarEvent {
            summary: "Hackathon".into(),
            location: "HS06".into(),
            start,
            end,
            all_day,
        }
    }

    fn calendar(payload: &DisplayPayload) -> &CalendarDetails {
        match payload.details() {
            Some(ModeDetails::Calendar(details)) => details,
            other => panic!("expected calendar details, got {other:?}"),
        }
    }

    #[test]
    fn test_multi_day_timed_event() {
        let event = hackathon(ts(2025, 10, 15, 10, 0), ts(2025, 10, 17, 12, 0), false);
        let payload = event.build(&EnglishStrings::new(), chrono_tz::UTC);

        assert!(payload.qr_content().contains("DTSTART:20251015T100000\n"));
        assert!(payload.qr_content().contains("DTEND:20251017T120000\n"));
        assert!(!payload.has_link());

        let details = calendar(&payload);
        assert_eq!(details.start, "15 October 2025 - ");
        assert_eq!(details.end, "17 October 2025");
    }

    #[test]
    fn test_same_day_timed_event_shows_end_time() {
        let event = hackathon(ts(2025, 10, 15, 10, 0), ts(2025, 10, 15, 12, 30), false);
        let details = calendar(&event.build(&EnglishStrings::new(), chrono_tz::UTC)).clone();
        assert_eq!(details.start, "15 October 2025 - ");
        assert_eq!(details.end, "12:30 PM");
    }

    #[test]
    fn test_all_day_single_day() {
        let event = hackathon(ts(2025, 3, 5, 0, 0), ts(2025, 3, 5, 23, 59), true);
        let payload = event.build(&EnglishStrings::new(), chrono_tz::UTC);

        assert!(payload.qr_content().contains("DTSTART:20250305\n"));
        assert!(payload.qr_content().contains("DTEND:20250305\n"));
        let details = calendar(&payload);
        assert_eq!(details.start, "5 March 2025");
        assert_eq!(details.end, "");
    }

    #[test]
    fn test_all_day_multi_day() {
        let event = hackathon(ts(2025, 3, 5, 0, 0), ts(2025, 3, 7, 0, 0), true);
        let details = calendar(&event.build(&EnglishStrings::new(), chrono_tz::UTC)).clone();
        assert_eq!(details.start, "5 March 2025 - ");
        assert_eq!(details.end, "7 March 2025");
    }

    #[test]
    fn test_vcalendar_layout() {
        let event = hackathon(ts(2025, 10, 15, 10, 0), ts(2025, 10, 17, 12, 0), false);
        assert_eq!(
            event.vcalendar(),
            "BEGIN:VCALENDAR\nVERSION:2.0\nBEGIN:VEVENT\nSUMMARY:Hackathon\nLOCATION:HS06\n\
             DTSTART:20251015T100000\nDTEND:20251017T120000\nEND:VEVENT\nEND:VCALENDAR\n"
        );
    }

    #[test]
    fn test_summary_is_not_escaped() {
        let event = CalendarEvent {
            summary: "Talk; Q&A, part 1".into(),
            ..hackathon(0, 0, false)
        };
        assert!(event.vcalendar().contains("SUMMARY:Talk; Q&A, part 1\n"));
    }

    #[test]
    fn test_empty_summary_and_location_are_null() {
        let event = CalendarEvent {
            summary: String::new(),
            location: String::new(),
            ..hackathon(0, 3_600, false)
        };
        let details = calendar(&event.build(&EnglishStrings::new(), chrono_tz::UTC)).clone();
        assert!(details.summary.is_none());
        assert!(details.location.is_none());
    }

    #[test]
    fn test_display_uses_site_timezone() {
        // 23:30 UTC is already the next day in Berlin.
        let event = hackathon(ts(2025, 10, 15, 23, 30), ts(2025, 10, 17, 12, 0), false);
        let details =
            calendar(&event.build(&EnglishStrings::new(), chrono_tz::Europe::Berlin)).clone();
        assert_eq!(details.start, "16 October 2025 - ");
        assert!(event.vcalendar().contains("DTSTART:20251015T233000"));
    }

    #[test]
    fn test_out_of_range_timestamp_reads_as_epoch() {
        let event = hackathon(i64::MAX, ts(1970, 1, 1, 12, 0), false);
        assert!(event.is_single_day());
        assert!(event.vcalendar().contains("DTSTART:19700101T000000\n"));
        assert!(event.vcalendar().contains("DTEND:19700101T120000\n"));
    }

    #[test]
    fn test_invalid_pattern_falls_back() {
        let strings =
            EnglishStrings::new().with_override(LANGCONFIG_COMPONENT, "strftimedate", "%Q");
        let event = hackathon(ts(2025, 10, 15, 10, 0), ts(2025, 10, 17, 12, 0), false);
        let details = calendar(&event.build(&strings, chrono_tz::UTC)).clone();
        assert_eq!(details.end, "2025-10-17 12:00");
    }
}
