use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

/// Current instant truncated to whole seconds, so values survive a JSON round trip unchanged.
pub(crate) fn now_utc() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

pub(crate) fn format_offset(value: OffsetDateTime) -> String {
    value.to_offset(UtcOffset::UTC).format(&Rfc3339).unwrap_or_else(|_| value.to_string())
}

/// Whole seconds between two instants, clamped at zero.
pub(crate) fn elapsed_seconds(from: OffsetDateTime, to: OffsetDateTime) -> u64 {
    u64::try_from((to - from).whole_seconds()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn format_offset_normalizes_to_utc() {
        let value = datetime!(2025-01-02 13:20:30 +03:00);
        assert_eq!(format_offset(value), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn now_has_no_subsecond_component() {
        assert_eq!(now_utc().nanosecond(), 0);
    }

    #[test]
    fn elapsed_seconds_clamps_negative_spans() {
        let start = datetime!(2025-01-02 10:00:00 UTC);
        let end = datetime!(2025-01-02 10:02:00 UTC);
        assert_eq!(elapsed_seconds(start, end), 120);
        assert_eq!(elapsed_seconds(end, start), 0);
    }
}
