//! Eligibility filter
//!
//! Decides which stored notifications may be shown for one request. The
//! filter is pure: the same records, clock reading and context always give
//! the same answer.

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::types::{NotificationRecord, RequestContext};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Full eligibility check for the current request
///
/// Returns a dense vector of the records that pass every rule, so indexing
/// into it for random selection is unbiased.
pub fn filter(
    records: &[NotificationRecord],
    now: NaiveDateTime,
    ctx: &RequestContext,
) -> Vec<NotificationRecord> {
    records
        .iter()
        .filter(|record| is_eligible(record, now, ctx))
        .cloned()
        .collect()
}

pub fn is_eligible(record: &NotificationRecord, now: NaiveDateTime, ctx: &RequestContext) -> bool {
    is_published(record, now) && matches_display_rules(record, ctx)
}

/// Enabled, titled, and inside its schedule window
pub fn is_published(record: &NotificationRecord, now: NaiveDateTime) -> bool {
    is_enabled(record) && is_within_schedule(record, now)
}

/// Enabled and titled; the part of eligibility that does not depend on
/// the clock or the visitor
pub fn is_enabled(record: &NotificationRecord) -> bool {
    record.enabled && record.has_title()
}

/// Compared at whole-second resolution, so all of 23:59:59 on the end date
/// still counts
pub fn is_within_schedule(record: &NotificationRecord, now: NaiveDateTime) -> bool {
    let now = now.with_nanosecond(0).unwrap_or(now);

    if let Some(start) = schedule_start(record) {
        if now < start {
            return false;
        }
    }

    if let Some(end) = schedule_end(record) {
        if now > end {
            return false;
        }
    }

    true
}

/// Audience and page-type rules
pub fn matches_display_rules(record: &NotificationRecord, ctx: &RequestContext) -> bool {
    if record.hide_for_logged_in && ctx.is_logged_in {
        return false;
    }

    record.show_on.matches(ctx.page_type)
}

/// Midnight at the start of `start_date`, if it parses
pub fn schedule_start(record: &NotificationRecord) -> Option<NaiveDateTime> {
    parse_date(&record.start_date).and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// 23:59:59 on `end_date`, if it parses
pub fn schedule_end(record: &NotificationRecord) -> Option<NaiveDateTime> {
    parse_date(&record.end_date).and_then(|date| date.and_hms_opt(23, 59, 59))
}

/// Lenient date parsing: anything unparseable counts as "no date"
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    // Accept a trailing time component but compare on the date alone
    let date_part = value.split(['T', ' ']).next().unwrap_or(value);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notifications::types::{PageType, ShowOn};
    use chrono::Duration;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn noon_today() -> NaiveDateTime {
        at("2026-10-15", "12:00:00")
    }

    fn guest_on(page_type: PageType) -> RequestContext {
        RequestContext::new(false, page_type)
    }

    #[test]
    fn test_disabled_records_never_pass() {
        let record = NotificationRecord {
            enabled: false,
            ..NotificationRecord::titled("Off")
        };

        for page_type in [PageType::Home, PageType::Post, PageType::Page, PageType::Other] {
            for logged_in in [true, false] {
                let ctx = RequestContext::new(logged_in, page_type);
                assert!(filter(&[record.clone()], noon_today(), &ctx).is_empty());
            }
        }
    }

    #[test]
    fn test_empty_title_never_passes() {
        let blank = NotificationRecord::titled("");
        let spaces = NotificationRecord::titled("   ");
        let ctx = guest_on(PageType::Home);

        assert!(filter(&[blank, spaces], noon_today(), &ctx).is_empty());
    }

    #[test]
    fn test_start_date_tomorrow() {
        let record = NotificationRecord {
            start_date: "2026-10-16".into(),
            ..NotificationRecord::titled("Soon")
        };
        let ctx = guest_on(PageType::Other);

        assert!(!is_eligible(&record, at("2026-10-15", "23:59:59"), &ctx));
        assert!(is_eligible(&record, at("2026-10-16", "00:00:00"), &ctx));
        assert!(is_eligible(&record, at("2026-10-17", "08:00:00"), &ctx));
    }

    #[test]
    fn test_end_date_is_inclusive_through_end_of_day() {
        let today = NotificationRecord {
            end_date: "2026-10-15".into(),
            ..NotificationRecord::titled("Today")
        };
        let yesterday = NotificationRecord {
            end_date: "2026-10-14".into(),
            ..NotificationRecord::titled("Yesterday")
        };
        let ctx = guest_on(PageType::Other);

        assert!(is_eligible(&today, at("2026-10-15", "23:59:59"), &ctx));
        assert!(!is_eligible(&today, at("2026-10-15", "23:59:59") + Duration::seconds(1), &ctx));
        assert!(!is_eligible(&yesterday, noon_today(), &ctx));
    }

    #[test]
    fn test_end_date_includes_fractional_last_second() {
        let record = NotificationRecord {
            end_date: "2026-10-15".into(),
            ..NotificationRecord::titled("Today")
        };
        let last_second = at("2026-10-15", "23:59:59") + Duration::milliseconds(500);

        assert!(is_within_schedule(&record, last_second));
        assert!(!is_within_schedule(&record, last_second + Duration::milliseconds(500)));
    }

    #[test]
    fn test_unparseable_dates_are_ignored() {
        let record = NotificationRecord {
            start_date: "next tuesday".into(),
            end_date: "2026-13-45".into(),
            ..NotificationRecord::titled("Sloppy")
        };

        assert!(is_eligible(&record, noon_today(), &guest_on(PageType::Other)));
    }

    #[test]
    fn test_date_parsing_variants() {
        let expected = NaiveDate::from_ymd_opt(2026, 10, 15);
        assert_eq!(parse_date("2026-10-15"), expected);
        assert_eq!(parse_date(" 2026/10/15 "), expected);
        assert_eq!(parse_date("2026-10-15T10:00:00"), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("15.10.2026"), None);
    }

    #[test]
    fn test_hide_for_logged_in() {
        let record = NotificationRecord {
            hide_for_logged_in: true,
            ..NotificationRecord::titled("Guests only")
        };

        assert!(!is_eligible(&record, noon_today(), &RequestContext::new(true, PageType::Home)));
        assert!(is_eligible(&record, noon_today(), &RequestContext::new(false, PageType::Home)));
    }

    #[test]
    fn test_homepage_rule() {
        let record = NotificationRecord {
            show_on: ShowOn::Homepage,
            ..NotificationRecord::titled("Front")
        };

        assert!(is_eligible(&record, noon_today(), &guest_on(PageType::Home)));
        for page_type in [PageType::Post, PageType::Page, PageType::Other] {
            assert!(!is_eligible(&record, noon_today(), &guest_on(page_type)));
        }
    }

    #[test]
    fn test_mixed_list_scenario() {
        let a = NotificationRecord::titled("A");
        let b = NotificationRecord {
            enabled: false,
            ..NotificationRecord::titled("B")
        };
        let c = NotificationRecord {
            start_date: "2027-01-01".into(),
            ..NotificationRecord::titled("C")
        };

        let eligible = filter(&[a.clone(), b, c], noon_today(), &guest_on(PageType::Other));
        assert_eq!(eligible, vec![a]);
    }
}
