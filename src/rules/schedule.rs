//! Rule Scheduling
//!
//! Weekday + time-of-day windows and inclusive calendar date ranges, evaluated
//! against restaurant-local civil time.

use jiff::civil::{self, Date, DateTime, Time, Weekday};

/// Set of weekdays on which a scheduled rule is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// No days.
    pub const NONE: Self = Self(0);

    /// Every day of the week.
    pub const ALL: Self = Self(0b111_1111);

    /// Build a set from individual weekdays.
    #[must_use]
    pub fn from_days(days: &[Weekday]) -> Self {
        days.iter().fold(Self::NONE, |set, day| set.with(*day))
    }

    /// Return a copy of the set with `day` added.
    #[must_use]
    pub const fn with(self, day: Weekday) -> Self {
        Self(self.0 | Self::bit(day))
    }

    /// Returns true if `day` is in the set.
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & Self::bit(day) != 0
    }

    /// Returns true if no day is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    const fn bit(day: Weekday) -> u8 {
        match day {
            Weekday::Monday => 1,
            Weekday::Tuesday => 1 << 1,
            Weekday::Wednesday => 1 << 2,
            Weekday::Thursday => 1 << 3,
            Weekday::Friday => 1 << 4,
            Weekday::Saturday => 1 << 5,
            Weekday::Sunday => 1 << 6,
        }
    }
}

/// Outcome of checking a schedule against a local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleCheck {
    /// The rule is active now.
    Active,

    /// Today's weekday is not enabled.
    InactiveWeekday,

    /// The time of day falls outside the window.
    OutsideWindow,

    /// The window starts after it ends.
    Misconfigured,
}

/// Weekly schedule with an inclusive time-of-day window.
///
/// Windows never wrap past midnight; a start later than the end is a misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    days: WeekdaySet,
    start: Time,
    end: Time,
}

impl Schedule {
    /// Create a schedule.
    pub const fn new(days: WeekdaySet, start: Time, end: Time) -> Self {
        Self { days, start, end }
    }

    /// Enabled weekdays.
    pub const fn days(&self) -> WeekdaySet {
        self.days
    }

    /// Window start (inclusive).
    pub const fn start(&self) -> Time {
        self.start
    }

    /// Window end (inclusive).
    pub const fn end(&self) -> Time {
        self.end
    }

    /// Check the schedule at `now`, compared at minute granularity.
    pub fn check(&self, now: DateTime) -> ScheduleCheck {
        if self.start > self.end {
            return ScheduleCheck::Misconfigured;
        }

        if !self.days.contains(now.date().weekday()) {
            return ScheduleCheck::InactiveWeekday;
        }

        let time = truncate_to_minute(now.time());

        if time < self.start || time > self.end {
            return ScheduleCheck::OutsideWindow;
        }

        ScheduleCheck::Active
    }
}

/// Outcome of checking a date range against a local date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeCheck {
    /// The date lies within the range.
    Within,

    /// The range has not started yet.
    Before,

    /// The range has ended.
    After,
}

/// Inclusive calendar date range; a missing bound is open on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<Date>,
    end: Option<Date>,
}

impl DateRange {
    /// Create a date range.
    pub const fn new(start: Option<Date>, end: Option<Date>) -> Self {
        Self { start, end }
    }

    /// First active date, if bounded.
    pub const fn start(&self) -> Option<Date> {
        self.start
    }

    /// Last active date, if bounded.
    pub const fn end(&self) -> Option<Date> {
        self.end
    }

    /// Check whether `date` falls within the range.
    pub fn check(&self, date: Date) -> DateRangeCheck {
        if self.start.is_some_and(|start| date < start) {
            return DateRangeCheck::Before;
        }

        if self.end.is_some_and(|end| date > end) {
            return DateRangeCheck::After;
        }

        DateRangeCheck::Within
    }
}

/// Parse an `HH:MM` (or `HH:MM:SS`) clock time.
pub(crate) fn parse_clock(value: &str) -> Option<Time> {
    let value = value.trim();

    Time::strptime("%H:%M", value)
        .or_else(|_short| Time::strptime("%H:%M:%S", value))
        .ok()
}

/// Parse a `YYYY-MM-DD` calendar date, also accepting a full datetime and keeping its date.
pub(crate) fn parse_date(value: &str) -> Option<Date> {
    let value = value.trim();

    value
        .parse::<Date>()
        .ok()
        .or_else(|| value.parse::<DateTime>().ok().map(|datetime| datetime.date()))
}

fn truncate_to_minute(time: Time) -> Time {
    civil::time(time.hour(), time.minute(), 0, 0)
}
