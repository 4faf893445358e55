//! Time helpers.

use chrono::{DateTime, Utc};

/// Current Unix timestamp in milliseconds (UTC).
pub fn unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render a millisecond Unix timestamp as an RFC 3339 string.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_else(|| DateTime::<Utc>::from_timestamp_millis(0).unwrap())
        .to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_timestamp_millis_is_recent() {
        // given: a known lower bound (2024-01-01)
        let lower_bound = 1_704_067_200_000i64;

        // when:
        let now = unix_timestamp_millis();

        // then:
        assert!(now > lower_bound);
    }

    #[test]
    fn test_timestamp_to_rfc3339() {
        // given: 2023-01-01T00:00:00Z in milliseconds
        let millis = 1_672_531_200_000i64;

        // when:
        let rendered = timestamp_to_rfc3339(millis);

        // then:
        assert!(rendered.starts_with("2023-01-01T00:00:00"));
    }
}
