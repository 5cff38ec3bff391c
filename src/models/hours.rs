use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Time of day as minutes since midnight. Business hours arrive as
/// zero-padded "HH:mm" strings; parsing them up front keeps comparisons
/// numeric instead of relying on string ordering staying lexicographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| anyhow::anyhow!("invalid time format: {s}"))?;
        let hour: u16 = h.parse().map_err(|_| anyhow::anyhow!("invalid hour in: {s}"))?;
        let minute: u16 = m
            .parse()
            .map_err(|_| anyhow::anyhow!("invalid minute in: {s}"))?;
        if hour > 23 || minute > 59 {
            return Err(anyhow::anyhow!("time out of range: {s}"));
        }
        Ok(TimeOfDay(hour * 60 + minute))
    }

    pub fn from_datetime(dt: &NaiveDateTime) -> Self {
        TimeOfDay((dt.hour() * 60 + dt.minute()) as u16)
    }

    pub fn as_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// One weekday's open/close window for a business. Day 0 is Sunday,
/// matching how the rows are keyed in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayHours {
    pub day_of_week: u8,
    pub is_open: bool,
    pub start_time: String,
    pub end_time: String,
}

impl DayHours {
    /// Whether the instant falls inside this row's open window, boundaries
    /// included. Callers must have matched the weekday already.
    pub fn contains(&self, dt: &NaiveDateTime) -> anyhow::Result<bool> {
        let open = TimeOfDay::parse(&self.start_time)?;
        let close = TimeOfDay::parse(&self.end_time)?;
        let t = TimeOfDay::from_datetime(dt);
        Ok(t >= open && t <= close)
    }

    pub fn window(&self) -> String {
        format!("{}-{}", self.start_time, self.end_time)
    }
}

pub fn weekday_of(dt: &NaiveDateTime) -> u8 {
    dt.weekday().num_days_from_sunday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    fn monday_hours() -> DayHours {
        DayHours {
            day_of_week: 1,
            is_open: true,
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
        }
    }

    #[test]
    fn test_parse_valid_time() {
        assert_eq!(TimeOfDay::parse("09:30").unwrap().as_hhmm(), "09:30");
        assert_eq!(TimeOfDay::parse("00:00").unwrap().as_hhmm(), "00:00");
        assert_eq!(TimeOfDay::parse("23:59").unwrap().as_hhmm(), "23:59");
    }

    #[test]
    fn test_parse_invalid_time() {
        assert!(TimeOfDay::parse("25:00").is_err());
        assert!(TimeOfDay::parse("09:60").is_err());
        assert!(TimeOfDay::parse("0930").is_err());
        assert!(TimeOfDay::parse("nine").is_err());
    }

    #[test]
    fn test_time_ordering_matches_clock() {
        let a = TimeOfDay::parse("08:30").unwrap();
        let b = TimeOfDay::parse("09:00").unwrap();
        let c = TimeOfDay::parse("17:00").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn test_contains_within_window() {
        let hours = monday_hours();
        // 2025-06-16 is a Monday
        assert!(hours.contains(&dt("2025-06-16 09:00")).unwrap());
        assert!(hours.contains(&dt("2025-06-16 12:30")).unwrap());
        assert!(hours.contains(&dt("2025-06-16 17:00")).unwrap());
    }

    #[test]
    fn test_contains_outside_window() {
        let hours = monday_hours();
        assert!(!hours.contains(&dt("2025-06-16 08:30")).unwrap());
        assert!(!hours.contains(&dt("2025-06-16 17:01")).unwrap());
        assert!(!hours.contains(&dt("2025-06-16 23:00")).unwrap());
    }

    #[test]
    fn test_weekday_of() {
        assert_eq!(weekday_of(&dt("2025-06-15 10:00")), 0); // Sunday
        assert_eq!(weekday_of(&dt("2025-06-16 10:00")), 1); // Monday
        assert_eq!(weekday_of(&dt("2025-06-21 10:00")), 6); // Saturday
    }

    #[test]
    fn test_window_string() {
        assert_eq!(monday_hours().window(), "09:00-17:00");
    }
}
