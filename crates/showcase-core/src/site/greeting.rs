//! Time-of-day greeting and footer year

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPeriod {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DayPeriod {
    /// Morning 5-11, afternoon 12-17, evening 18-22, night otherwise
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => DayPeriod::Morning,
            12..=17 => DayPeriod::Afternoon,
            18..=22 => DayPeriod::Evening,
            _ => DayPeriod::Night,
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            DayPeriod::Morning => "Доброе утро",
            DayPeriod::Afternoon => "Добрый день",
            DayPeriod::Evening => "Добрый вечер",
            DayPeriod::Night => "Доброй ночи",
        }
    }
}

pub fn greeting_for_hour(hour: u32) -> &'static str {
    DayPeriod::from_hour(hour).greeting()
}

pub fn greeting_at<Tz: TimeZone>(now: &DateTime<Tz>) -> &'static str {
    greeting_for_hour(now.hour())
}

/// Greeting for the local wall clock
pub fn greeting_now() -> &'static str {
    greeting_at(&Local::now())
}

/// Year shown in the footer copyright line
pub fn footer_year<Tz: TimeZone>(now: &DateTime<Tz>) -> i32 {
    now.year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_period_boundaries() {
        assert_eq!(DayPeriod::from_hour(4), DayPeriod::Night);
        assert_eq!(DayPeriod::from_hour(5), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(11), DayPeriod::Morning);
        assert_eq!(DayPeriod::from_hour(12), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(17), DayPeriod::Afternoon);
        assert_eq!(DayPeriod::from_hour(18), DayPeriod::Evening);
        assert_eq!(DayPeriod::from_hour(22), DayPeriod::Evening);
        assert_eq!(DayPeriod::from_hour(23), DayPeriod::Night);
        assert_eq!(DayPeriod::from_hour(0), DayPeriod::Night);
    }

    #[test]
    fn test_greeting_at_fixed_time() {
        let evening = Utc.with_ymd_and_hms(2024, 12, 31, 19, 30, 0).unwrap();
        assert_eq!(greeting_at(&evening), "Добрый вечер");
        assert_eq!(footer_year(&evening), 2024);
    }
}
