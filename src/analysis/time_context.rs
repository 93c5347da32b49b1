//! Wall-clock derived time context

use super::models::{TimeContext, TimeOfDay};
use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use std::sync::Arc;

/// Source of the current local time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Reads the system's local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Always reports the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

impl TimeContext {
    /// Derive the context for a given local date and time
    pub fn at(moment: NaiveDateTime) -> Self {
        let hour = moment.hour();
        let day_of_week = moment.weekday();
        let time_of_day = TimeOfDay::from_hour(hour);
        let is_weekday = !matches!(day_of_week, Weekday::Sat | Weekday::Sun);

        Self {
            time_of_day,
            day_of_week,
            hour,
            is_business_hours: is_weekday && (9..=17).contains(&hour),
            greeting: time_of_day.greeting().to_string(),
        }
    }
}

/// Produces a fresh [`TimeContext`] per request from an injected clock
#[derive(Clone)]
pub struct TimeContextProvider {
    clock: Arc<dyn Clock>,
}

impl TimeContextProvider {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn now(&self) -> TimeContext {
        TimeContext::at(self.clock.now())
    }
}

impl Default for TimeContextProvider {
    fn default() -> Self {
        Self::system()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(year, month, day)
            .unwrap()
            .and_hms_opt(hour, 15, 0)
            .unwrap()
    }

    #[test]
    fn test_business_hours_on_weekday() {
        // 2024-03-06 is a Wednesday
        assert!(TimeContext::at(at(2024, 3, 6, 9)).is_business_hours);
        assert!(TimeContext::at(at(2024, 3, 6, 17)).is_business_hours);
        assert!(!TimeContext::at(at(2024, 3, 6, 8)).is_business_hours);
        assert!(!TimeContext::at(at(2024, 3, 6, 18)).is_business_hours);
    }

    #[test]
    fn test_no_business_hours_on_weekend() {
        // 2024-03-09 is a Saturday
        let context = TimeContext::at(at(2024, 3, 9, 11));
        assert!(!context.is_business_hours);
        assert!(context.is_weekend());
        assert_eq!(context.day_name(), "Saturday");
    }

    #[test]
    fn test_greeting_matches_time_of_day() {
        let context = TimeContext::at(at(2024, 3, 6, 7));
        assert_eq!(context.time_of_day, TimeOfDay::Morning);
        assert_eq!(context.greeting, "Good morning");

        let context = TimeContext::at(at(2024, 3, 6, 22));
        assert_eq!(context.time_of_day, TimeOfDay::Night);
        assert_eq!(context.greeting, "Hello, night owl");
    }

    #[test]
    fn test_provider_reads_injected_clock() {
        let provider = TimeContextProvider::new(Arc::new(FixedClock(at(2024, 3, 6, 13))));
        let context = provider.now();
        assert_eq!(context.time_of_day, TimeOfDay::Afternoon);
        assert_eq!(context.day_of_week, Weekday::Wed);
        assert_eq!(context.hour, 13);
    }
}
