use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A canonical snapshot time label with minute precision.
///
/// Snapshot files embed their window start as a `YYYYMMDD_HHMM00` substring
/// (seconds are always zero at any catalog granularity). A `TimeLabel` wraps
/// the underlying instant with sub-minute components zeroed, so formatting
/// and catalog matching are total and lossless.
///
/// # Examples
///
/// ```
/// use wamdens_types::label::TimeLabel;
/// use chrono::NaiveDateTime;
///
/// let t: NaiveDateTime = "2023-05-12T16:05:30".parse().unwrap();
/// let label = TimeLabel::from_datetime(t);
///
/// // Seconds are dropped, not rounded
/// assert_eq!(label.to_string(), "20230512_160500");
///
/// // Floor and ceiling to a 10-minute grid
/// assert_eq!(label.floor_to(10).to_string(), "20230512_160000");
/// assert_eq!(label.ceil_to(10).to_string(), "20230512_161000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeLabel(NaiveDateTime);

impl TimeLabel {
    /// `strftime` pattern of the canonical label.
    pub const FORMAT: &'static str = "%Y%m%d_%H%M00";

    /// Build a label from an instant, truncating seconds and sub-seconds.
    pub fn from_datetime(t: NaiveDateTime) -> Self {
        let truncated = NaiveTime::from_hms_opt(t.hour(), t.minute(), 0)
            .expect("hour and minute taken from a valid time");
        Self(t.date().and_time(truncated))
    }

    /// Parse a canonical `YYYYMMDD_HHMM00` string.
    ///
    /// ```
    /// use wamdens_types::label::TimeLabel;
    ///
    /// let label = TimeLabel::parse("20230512_161000").unwrap();
    /// assert_eq!(label.to_string(), "20230512_161000");
    /// assert!(TimeLabel::parse("not-a-label").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, chrono::ParseError> {
        let t = NaiveDateTime::parse_from_str(s, "%Y%m%d_%H%M%S")?;
        Ok(Self::from_datetime(t))
    }

    /// The instant this label denotes (window start).
    pub fn datetime(&self) -> NaiveDateTime {
        self.0
    }

    /// Whether the label sits on a `granularity_minutes` boundary.
    pub fn is_aligned(&self, granularity_minutes: u32) -> bool {
        granularity_minutes > 0 && self.0.minute() % granularity_minutes == 0
    }

    /// Round down to the nearest `granularity_minutes` boundary.
    pub fn floor_to(&self, granularity_minutes: u32) -> Self {
        let excess = self.0.minute() % granularity_minutes.max(1);
        Self(self.0 - Duration::minutes(i64::from(excess)))
    }

    /// Round up to the nearest `granularity_minutes` boundary.
    ///
    /// A label already on a boundary is returned unchanged.
    pub fn ceil_to(&self, granularity_minutes: u32) -> Self {
        if self.is_aligned(granularity_minutes) {
            *self
        } else {
            self.floor_to(granularity_minutes).step(1, granularity_minutes)
        }
    }

    /// Move by `steps` grid intervals (negative steps move backward).
    ///
    /// Stepping uses calendar arithmetic, so day and hour rollovers are
    /// handled: `20230512_235000` stepped forward by one 10-minute interval
    /// is `20230513_000000`.
    pub fn step(&self, steps: i64, granularity_minutes: u32) -> Self {
        Self(self.0 + Duration::minutes(steps * i64::from(granularity_minutes)))
    }
}

impl fmt::Display for TimeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(Self::FORMAT))
    }
}

impl From<NaiveDateTime> for TimeLabel {
    fn from(t: NaiveDateTime) -> Self {
        Self::from_datetime(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_format_zeroes_seconds() {
        let label = TimeLabel::from_datetime(dt("2023-05-12T16:10:45.500"));
        assert_eq!(label.to_string(), "20230512_161000");
    }

    #[test]
    fn test_parse_roundtrip() {
        let label = TimeLabel::parse("20230512_160000").unwrap();
        assert_eq!(label.datetime(), dt("2023-05-12T16:00:00"));
        assert_eq!(TimeLabel::parse(&label.to_string()).unwrap(), label);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(TimeLabel::parse("20230512-1600").is_err());
        assert!(TimeLabel::parse("").is_err());
    }

    #[test]
    fn test_floor_and_ceil() {
        let label = TimeLabel::from_datetime(dt("2023-05-12T16:05:00"));
        assert_eq!(label.floor_to(10).to_string(), "20230512_160000");
        assert_eq!(label.ceil_to(10).to_string(), "20230512_161000");
    }

    #[test]
    fn test_ceil_on_boundary_is_identity() {
        let label = TimeLabel::from_datetime(dt("2023-05-12T16:10:00"));
        assert_eq!(label.ceil_to(10), label);
        assert_eq!(label.floor_to(10), label);
    }

    #[test]
    fn test_step_crosses_hour_and_day() {
        let label = TimeLabel::from_datetime(dt("2023-05-12T23:50:00"));
        assert_eq!(label.step(1, 10).to_string(), "20230513_000000");
        assert_eq!(label.step(-1, 10).to_string(), "20230512_234000");

        let hour_edge = TimeLabel::from_datetime(dt("2023-05-12T16:50:00"));
        assert_eq!(hour_edge.step(1, 10).to_string(), "20230512_170000");
    }

    #[test]
    fn test_alignment() {
        assert!(TimeLabel::from_datetime(dt("2023-05-12T16:30:00")).is_aligned(10));
        assert!(!TimeLabel::from_datetime(dt("2023-05-12T16:35:00")).is_aligned(10));
    }

    #[test]
    fn test_ordering_follows_time() {
        let earlier = TimeLabel::parse("20230512_160000").unwrap();
        let later = TimeLabel::parse("20230512_161000").unwrap();
        assert!(earlier < later);
    }
}
